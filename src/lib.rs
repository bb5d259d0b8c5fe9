//! Control-flow graphs, reaching-definitions dataflow, and Def-Use/Use-Def
//! chains for C and Java, built over an already-parsed `tree-sitter` tree.
//!
//! The syntax-tree producer, CLI argument handling, clipboard/stdin
//! acquisition, and graph-render back ends are explicitly out of scope
//! (§1): callers bring their own `tree_sitter::Tree` and get back a `Cfg`,
//! a reaching-definitions [`DataflowResult`], and chain sets.
//!
//! ```no_run
//! use flowchains::{Config, Language, build_cfg, reaching_definitions, solve, def_use, use_def};
//!
//! let src = "int main(){ int x=5; if (x>0) { x=x+1; } return x; }";
//! let mut parser = tree_sitter::Parser::new();
//! parser.set_language(&Language::C.grammar()).unwrap();
//! let tree = parser.parse(src, None).unwrap();
//!
//! let config = Config::default();
//! let cfg = build_cfg(&tree, src.as_bytes(), Language::C, &config).unwrap();
//! let result = solve(&cfg, &reaching_definitions(), &config).unwrap();
//! let chains = def_use(&cfg, &result, &config);
//! let _ = use_def(&cfg, &result, &config);
//! ```

pub mod batch;
pub mod cfg;
pub mod chains;
pub mod config;
pub mod dataflow;
pub mod error;
pub mod syntax;

pub use cfg::{Cfg, CfgFragment, CfgNode, NodeId, NodeKind, NodeMetadata};
pub use chains::{ChainEdge, DefUseChain, DefUseResult, UseDefChain, UseDefResult, def_use, use_def};
pub use config::Config;
pub use dataflow::reaching::{ReachingDefinition, reaching_definitions_problem as reaching_definitions};
pub use dataflow::solver::solve;
pub use dataflow::{DataflowResult, Problem};
pub use error::{CoreError, CoreResult};
pub use syntax::Language;

/// Build the CFG for a whole translation unit (§6). Multiple function/
/// method definitions in `tree` share one `Cfg`, one node-id space, and one
/// `entry_node_ids`/`exit_node_ids` list, which is what lets
/// [`chains::parameter_alias`] search across function boundaries.
///
/// A single function's construction error is logged via `tracing::warn!`
/// and that function is skipped (§7); `build_cfg` itself only returns `Err`
/// for whole-unit failures that precede any per-function work.
pub fn build_cfg(
    tree: &tree_sitter::Tree,
    source: &[u8],
    language: Language,
    config: &Config,
) -> CoreResult<Cfg> {
    cfg::builder::build_cfg(tree, source, language, config)
}
