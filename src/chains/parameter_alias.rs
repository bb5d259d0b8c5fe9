//! One-level inter-procedural parameter-alias resolution (§4.K, steps
//! 1–5). The result for a variable name depends only on that name, never
//! on which use site asked — so callers memoize per variable.

use std::collections::{BTreeSet, HashSet};

use crate::cfg::{Cfg, NodeId};

/// Every definition node whose value can reach `variable` as a parameter,
/// one level deep: for each function where `variable` is a parameter, find
/// call sites, extract the aligned argument identifier, and find the
/// definitions of that argument that reach the call site.
pub fn parameter_aliases(cfg: &Cfg, variable: &str) -> BTreeSet<NodeId> {
    let mut aliases = BTreeSet::new();

    for &entry_id in &cfg.entry_node_ids {
        let entry = cfg.node(entry_id);
        let Some(param_index) = entry.metadata.definitions.iter().position(|d| d == variable) else {
            continue;
        };
        // The Entry node's source text is the function name it was built
        // from (cfg/builder.rs::build_function).
        let function_name = entry.source_text.as_str();

        for node in cfg.nodes.values() {
            for (call_index, callee) in node.metadata.calls.iter().enumerate() {
                if callee != function_name {
                    continue;
                }
                let Some(args) = node.metadata.call_arguments.get(call_index) else {
                    continue;
                };
                let Some(arg_name) = args.get(param_index) else {
                    continue;
                };
                let call_site = node.id;

                for def_node in cfg.nodes.values() {
                    if def_node.metadata.definitions.iter().any(|d| d == arg_name)
                        && reaches_call_site(cfg, def_node.id, call_site, arg_name)
                    {
                        aliases.insert(def_node.id);
                    }
                }
            }
        }
    }

    aliases
}

/// Depth-first search forward from `def_node`, pruning any intermediate
/// node (other than `def_node` itself) that redefines `variable` — such a
/// node kills the definition before it can reach `call_site`. A definition
/// node is never its own call site in practice (a def-site and a call-site
/// are different nodes), and the original this is grounded on
/// (`examples/original_source/.../def_use.py:156-159`) does not special-case
/// that coincidence, so neither do we.
fn reaches_call_site(cfg: &Cfg, def_node: NodeId, call_site: NodeId, variable: &str) -> bool {
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut stack = vec![def_node];
    visited.insert(def_node);

    while let Some(n) = stack.pop() {
        for &succ in &cfg.node(n).successors {
            if succ == call_site {
                return true;
            }
            if visited.contains(&succ) {
                continue;
            }
            visited.insert(succ);
            if cfg.node(succ).metadata.definitions.iter().any(|d| d == variable) {
                continue;
            }
            stack.push(succ);
        }
    }
    false
}
