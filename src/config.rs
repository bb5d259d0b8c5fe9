use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

/// Knobs that change observable behaviour of the analyses.
///
/// Unlike the CLI driver this library doesn't own, `Config` has no project-
/// discovery or output-format sections: just the handful of switches the
/// core algorithms themselves branch on.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reject a syntax tree containing an `ERROR`/`MISSING` node before
    /// visiting any function body. See `CoreError::SyntaxTreeHasError`.
    pub strict_syntax: bool,
    /// Run the one-level inter-procedural parameter-alias step (§4.K) when
    /// extracting Def-Use/Use-Def chains.
    pub resolve_parameter_aliases: bool,
    /// Add speculative `"function_call"`-labelled `call -> callee entry` /
    /// `"function_return"`-labelled `callee exit -> call` edges, additive
    /// to the normal successor edge. Off by default: partial, speculative.
    pub function_call_edges: bool,
    /// Multiplier applied to node count to bound dataflow solver iterations
    /// before `CoreError::DataflowDidNotConverge` is raised.
    pub max_iterations_multiplier: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            strict_syntax: true,
            resolve_parameter_aliases: true,
            function_call_edges: false,
            max_iterations_multiplier: 10,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> CoreResult<Config> {
        toml::from_str(text).map_err(|e| CoreError::ParserNotReady(e.to_string()))
    }

    pub fn load(path: &std::path::Path) -> CoreResult<Config> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CoreError::ParserNotReady(e.to_string()))?;
        Config::from_toml(&text)
    }
}
