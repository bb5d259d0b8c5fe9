//! Traversal context (§4.D): explicit stacks and maps threaded through the
//! builder, rather than thread-locals or exceptions (§9's design note).

use std::collections::HashMap;

use super::NodeId;

#[derive(Debug, Default)]
pub struct ControlFlowContext {
    break_targets: Vec<NodeId>,
    continue_targets: Vec<NodeId>,
    entry_ids: Vec<NodeId>,
    exit_ids: Vec<NodeId>,

    labels: HashMap<String, NodeId>,
    forward_gotos: HashMap<String, Vec<NodeId>>,

    /// name -> entry node id, populated as each function is visited; used
    /// later by the chain extractor's parameter-alias step (§4.K).
    pub function_definitions: HashMap<String, NodeId>,

    /// name -> exit node id, populated alongside `function_definitions`.
    /// Only consulted by the speculative `function_call`/`function_return`
    /// edge pass (Open Question (b), gated behind `Config::function_call_edges`).
    pub function_exits: HashMap<String, NodeId>,
}

impl ControlFlowContext {
    pub fn new() -> Self {
        ControlFlowContext::default()
    }

    pub fn push_function_scope(&mut self, entry: NodeId, exit: NodeId) {
        self.entry_ids.push(entry);
        self.exit_ids.push(exit);
    }

    pub fn pop_function_scope(&mut self) {
        self.entry_ids.pop();
        self.exit_ids.pop();
    }

    pub fn exit_target(&self) -> Option<NodeId> {
        self.exit_ids.last().copied()
    }

    pub fn push_loop_scope(&mut self, break_target: NodeId, continue_target: NodeId) {
        self.break_targets.push(break_target);
        self.continue_targets.push(continue_target);
    }

    pub fn pop_loop_scope(&mut self) {
        self.break_targets.pop();
        self.continue_targets.pop();
    }

    pub fn push_switch_scope(&mut self, break_target: NodeId) {
        self.break_targets.push(break_target);
    }

    pub fn pop_switch_scope(&mut self) {
        self.break_targets.pop();
    }

    pub fn break_target(&self) -> Option<NodeId> {
        self.break_targets.last().copied()
    }

    pub fn continue_target(&self) -> Option<NodeId> {
        self.continue_targets.last().copied()
    }

    /// Records `name -> id`; returns any goto references recorded before
    /// the label was known, so the caller can wire them immediately.
    pub fn add_label(&mut self, name: &str, id: NodeId) -> Vec<NodeId> {
        self.labels.insert(name.to_string(), id);
        self.forward_gotos.remove(name).unwrap_or_default()
    }

    /// Returns `Some(label_id)` if `name` is already known; otherwise
    /// records a forward reference and returns `None`.
    pub fn add_goto_ref(&mut self, name: &str, goto_id: NodeId) -> Option<NodeId> {
        if let Some(&label_id) = self.labels.get(name) {
            Some(label_id)
        } else {
            self.forward_gotos
                .entry(name.to_string())
                .or_default()
                .push(goto_id);
            None
        }
    }

    /// Any gotos whose label never appeared in the function (§7: these are
    /// `MissingJumpTarget` once the function body has been fully visited).
    pub fn dangling_gotos(&self) -> impl Iterator<Item = (&str, &[NodeId])> {
        self.forward_gotos.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Clears every per-function scope (break/continue/switch stacks,
    /// entry/exit scopes, labels, forward gotos), leaving
    /// `function_definitions` untouched. Called after each function is
    /// built, successfully or not, so a mid-construction error in one
    /// function can never leave a stray break/continue/label target that
    /// would silently validate a jump in a later sibling function.
    /// Removes any `function_definitions` entry whose entry-node id was
    /// rolled back (§7: an aborted function must leave no trace, including
    /// in the cross-function registry the chain extractor's parameter-alias
    /// step reads from).
    pub fn prune_function_definitions_from(&mut self, floor: NodeId) {
        self.function_definitions.retain(|_, &mut id| id < floor);
        self.function_exits.retain(|_, &mut id| id < floor);
    }

    pub fn reset_function_scope(&mut self) {
        self.break_targets.clear();
        self.continue_targets.clear();
        self.entry_ids.clear();
        self.exit_ids.clear();
        self.labels.clear();
        self.forward_gotos.clear();
    }
}
