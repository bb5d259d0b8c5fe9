//! The CFG data model (§3, component C) and its builder (§4.D–§4.H,
//! components D–H). Storage is an arena of integer-id nodes — never an
//! owning-pointer tree — per spec §9's design note on cyclic graphs.

pub mod builder;
pub mod c;
pub mod context;
pub mod java;
pub mod postprocess;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

pub type NodeId = usize;

/// The closed set of CFG node kinds (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Entry,
    Exit,
    Statement,
    Condition,
    LoopHeader,
    Break,
    Continue,
    Return,
    SwitchHead,
    Case,
    Default,
    Label,
    Goto,
}

/// AST-derived def/use/call metadata attached to a node (§3, §4.A).
#[derive(Debug, Default, Clone)]
pub struct NodeMetadata {
    pub calls: Vec<String>,
    pub definitions: Vec<String>,
    pub uses: Vec<String>,
    /// Ordered argument identifiers for each entry in `calls`, by index.
    /// Captured at construction time rather than re-walked from a
    /// borrowed syntax node later, so a `Cfg` never needs to outlive the
    /// `tree_sitter::Tree` it was built from (§4.K step 3 needs this at
    /// chain-extraction time, which may run long after parsing).
    pub call_arguments: Vec<Vec<String>>,
    /// True only for a compound-assignment (`+=`, `-=`, ...) or
    /// increment/decrement (`x++`, `++x`, ...) node, where the operand's old
    /// value is read by the same operation that writes its new one (§4.A,
    /// §8 scenario 6). A *simple* assignment like `x=x+1` also has `x` in
    /// both `definitions` and `uses`, but must not get this flag: its RHS
    /// use reaches from whatever definition of `x` was already live going
    /// in, never from the assignment node itself.
    pub self_def_use: bool,
}

#[derive(Debug, Clone)]
pub struct CfgNode {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Stable id of the originating syntax node (`tree_sitter::Node::id`),
    /// when this node was built from one. Synthetic scaffolding nodes
    /// (synthetic Entry/Exit, passthrough exits) have none.
    pub syntax_id: Option<usize>,
    pub source_text: String,
    pub successors: BTreeSet<NodeId>,
    pub predecessors: BTreeSet<NodeId>,
    pub edge_labels: HashMap<NodeId, String>,
    pub metadata: NodeMetadata,
}

impl CfgNode {
    pub fn edge_label(&self, successor: NodeId) -> Option<&str> {
        self.edge_labels.get(&successor).map(String::as_str)
    }
}

/// Opaque rollback point produced by [`Cfg::checkpoint`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct CfgCheckpoint {
    next_id: NodeId,
    entry_len: usize,
    exit_len: usize,
}

impl CfgCheckpoint {
    /// The node-id floor below which ids predate the checkpoint. Any id at
    /// or above this was created after the checkpoint and is discarded by
    /// [`Cfg::rollback`].
    pub(crate) fn node_id_floor(&self) -> NodeId {
        self.next_id
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cfg {
    pub function_name: Option<String>,
    pub nodes: BTreeMap<NodeId, CfgNode>,
    pub entry_node_ids: Vec<NodeId>,
    pub exit_node_ids: Vec<NodeId>,
    next_id: NodeId,
}

impl Cfg {
    pub fn new() -> Self {
        Cfg::default()
    }

    pub fn node(&self, id: NodeId) -> &CfgNode {
        self.nodes.get(&id).expect("dangling CfgNode id")
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut CfgNode {
        self.nodes.get_mut(&id).expect("dangling CfgNode id")
    }

    /// Fixed pre-order node iteration, by ascending id (= creation order).
    /// Required by the dataflow solver for deterministic fixpoint runs
    /// (§4.I, §5 ordering guarantees).
    pub fn node_ids_in_order(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// A marker the builder takes before attempting one function's CFG so
    /// that a mid-construction error can discard exactly that function's
    /// partial nodes (§7: a function's construction error aborts only that
    /// function, leaving no trace in the returned `Cfg`).
    pub(crate) fn checkpoint(&self) -> CfgCheckpoint {
        CfgCheckpoint {
            next_id: self.next_id,
            entry_len: self.entry_node_ids.len(),
            exit_len: self.exit_node_ids.len(),
        }
    }

    /// Undo every node/edge created and every entry/exit id pushed since
    /// `checkpoint` was taken.
    pub(crate) fn rollback(&mut self, checkpoint: CfgCheckpoint) {
        self.nodes.retain(|&id, _| id < checkpoint.next_id);
        for node in self.nodes.values_mut() {
            node.successors.retain(|&s| s < checkpoint.next_id);
            node.predecessors.retain(|&p| p < checkpoint.next_id);
            node.edge_labels.retain(|&s, _| s < checkpoint.next_id);
        }
        self.entry_node_ids.truncate(checkpoint.entry_len);
        self.exit_node_ids.truncate(checkpoint.exit_len);
        self.next_id = checkpoint.next_id;
    }

    pub fn create_node(&mut self, kind: NodeKind, source_text: impl Into<String>) -> NodeId {
        self.create_node_with(kind, source_text, None, NodeMetadata::default())
    }

    pub fn create_node_with(
        &mut self,
        kind: NodeKind,
        source_text: impl Into<String>,
        syntax_id: Option<usize>,
        metadata: NodeMetadata,
    ) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        let text = source_text.into();
        debug!(target: "cfg", "node {id} <- {kind:?} text={text:?} defs={:?} uses={:?}", metadata.definitions, metadata.uses);
        self.nodes.insert(
            id,
            CfgNode {
                id,
                kind,
                syntax_id,
                source_text: text,
                successors: BTreeSet::new(),
                predecessors: BTreeSet::new(),
                edge_labels: HashMap::new(),
                metadata,
            },
        );
        id
    }

    pub fn add_edge(&mut self, from: NodeId, to: NodeId, label: Option<&str>) {
        debug!(target: "cfg", "edge {from} -> {to} label={label:?}");
        self.node_mut(from).successors.insert(to);
        self.node_mut(to).predecessors.insert(from);
        if let Some(l) = label {
            self.node_mut(from).edge_labels.insert(to, l.to_string());
        }
    }

    /// Wire every exit in `from_exits` to `to`, with the same label.
    pub fn connect_all(&mut self, from_exits: &[NodeId], to: NodeId, label: Option<&str>) {
        for &f in from_exits {
            self.add_edge(f, to, label);
        }
    }

    pub fn remove_node(&mut self, id: NodeId) {
        let preds: Vec<NodeId> = self.node(id).predecessors.iter().copied().collect();
        let succs: Vec<NodeId> = self.node(id).successors.iter().copied().collect();
        for p in preds {
            self.node_mut(p).successors.remove(&id);
            self.node_mut(p).edge_labels.remove(&id);
        }
        for s in succs {
            self.node_mut(s).predecessors.remove(&id);
        }
        self.nodes.remove(&id);
    }
}

/// Result of visiting one syntax construct: the fragment's single entry and
/// the set of exits still open for fall-through wiring. An empty
/// `exit_ids` means the construct terminates control flow on every path
/// (return/break/continue/goto) — §9's "dead code after terminators".
#[derive(Debug, Clone)]
pub struct CfgFragment {
    pub entry_id: NodeId,
    pub exit_ids: Vec<NodeId>,
}

impl CfgFragment {
    pub fn single(id: NodeId) -> Self {
        CfgFragment {
            entry_id: id,
            exit_ids: vec![id],
        }
    }

    pub fn terminal(id: NodeId) -> Self {
        CfgFragment {
            entry_id: id,
            exit_ids: Vec::new(),
        }
    }
}
