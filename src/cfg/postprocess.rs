//! Post-processing (§2 component H, §4.E "Post-processing", §9): collapse
//! synthetic scaffolding nodes while preserving connectivity and edge
//! labels. Grounded on `CFGVisitor._passthrough_entry_exit_nodes` in the
//! original prototype — same three-step algorithm, arena-native here.

use std::collections::HashSet;

use super::{Cfg, NodeId, NodeKind};

fn is_scaffolding(cfg: &Cfg, id: NodeId) -> bool {
    let node = cfg.node(id);
    match node.kind {
        NodeKind::Entry => !cfg.entry_node_ids.contains(&id),
        NodeKind::Exit => !cfg.exit_node_ids.contains(&id),
        NodeKind::Case | NodeKind::Default => true,
        _ => node.source_text.to_ascii_lowercase().contains("else"),
    }
}

/// Removes every scaffolding node, rewiring each predecessor directly to
/// each successor. The outgoing edge label (the label the scaffolding node
/// itself carried toward its successor) wins over the incoming one when
/// both exist, because it is the one carrying `true`/`false`/case-value
/// semantics (§9).
pub fn passthrough_scaffolding(cfg: &mut Cfg) {
    let to_remove: HashSet<NodeId> = cfg
        .node_ids_in_order()
        .filter(|&id| is_scaffolding(cfg, id))
        .collect();

    let mut ordered: Vec<NodeId> = to_remove.iter().copied().collect();
    ordered.sort_unstable();

    for id in ordered {
        if !cfg.nodes.contains_key(&id) {
            continue;
        }
        let preds: Vec<NodeId> = cfg.node(id).predecessors.iter().copied().collect();
        let succs: Vec<NodeId> = cfg.node(id).successors.iter().copied().collect();

        for &p in &preds {
            for &s in &succs {
                let outgoing = cfg.node(id).edge_label(s).map(str::to_string);
                let incoming = cfg.node(p).edge_label(id).map(str::to_string);
                let label = outgoing.or(incoming);
                cfg.add_edge(p, s, label.as_deref());
            }
        }

        cfg.remove_node(id);
    }
}
