//! Java-language visitor particulars (§2 component G): method signatures,
//! `for`-loop field names, enhanced-for, and switch-group bodies — which
//! unlike C group statements inside a distinct node from the label(s).

use tree_sitter::Node;

use crate::config::Config;
use crate::error::CoreResult;
use crate::syntax::{Language, child_by_field, named_children, required_child_by_field, source_text};

use super::builder::{visit, visit_for_generic, wire_body};
use super::context::ControlFlowContext;
use super::{Cfg, CfgFragment, NodeKind};

const LANG: Language = Language::Java;

/// `(method_name, parameter_identifiers, body)`.
pub fn function_signature<'a>(fn_node: Node<'a>, source: &[u8]) -> CoreResult<(String, Vec<String>, Node<'a>)> {
    let name_node = required_child_by_field(fn_node, "name")?;
    let name = source_text(name_node, source).to_string();

    let mut params = Vec::new();
    if let Some(list) = child_by_field(fn_node, "parameters") {
        for param in named_children(list) {
            if param.kind() != "formal_parameter" && param.kind() != "spread_parameter" {
                continue;
            }
            match child_by_field(param, "name") {
                Some(n) => params.push(source_text(n, source).to_string()),
                None => {
                    tracing::warn!(target: "cfg", "ambiguous formal parameter, recording raw text");
                    params.push(source_text(param, source).to_string());
                }
            }
        }
    }

    let body = required_child_by_field(fn_node, "body")?;
    Ok((name, params, body))
}

pub fn visit_for(
    node: Node,
    source: &[u8],
    cfg: &mut Cfg,
    ctx: &mut ControlFlowContext,
    config: &Config,
) -> CoreResult<CfgFragment> {
    visit_for_generic(node, LANG, source, cfg, ctx, config, "init", "update")
}

/// `for (T x : iterable) body` lowers to a synthetic `hasNext`/`next`
/// header pair (§4.E table, "Enhanced-for").
pub fn visit_enhanced_for(
    node: Node,
    source: &[u8],
    cfg: &mut Cfg,
    ctx: &mut ControlFlowContext,
    config: &Config,
) -> CoreResult<CfgFragment> {
    let name = required_child_by_field(node, "name")?;
    let value = required_child_by_field(node, "value")?;
    let var = source_text(name, source);
    let iterable = source_text(value, source);

    let header_id = cfg.create_node(NodeKind::LoopHeader, format!("hasNext({iterable})"));
    let assign_id = cfg.create_node(NodeKind::Statement, format!("{var} = next()"));
    cfg.node_mut(assign_id).metadata.definitions.push(var.to_string());
    cfg.node_mut(assign_id).metadata.uses.push(iterable.to_string());

    let exit_id = cfg.create_node(NodeKind::Exit, "EXIT: enhanced for");

    cfg.add_edge(header_id, assign_id, Some("true"));

    ctx.push_loop_scope(exit_id, header_id);
    let body = child_by_field(node, "body");
    wire_body(cfg, ctx, LANG, source, config, body, assign_id, header_id, None)?;
    ctx.pop_loop_scope();

    cfg.add_edge(header_id, exit_id, Some("false"));

    Ok(CfgFragment {
        entry_id: header_id,
        exit_ids: vec![exit_id],
    })
}

pub fn visit_switch(
    node: Node,
    source: &[u8],
    cfg: &mut Cfg,
    ctx: &mut ControlFlowContext,
    config: &Config,
) -> CoreResult<CfgFragment> {
    let scrutinee = required_child_by_field(node, "condition")?;
    let head_id = super::builder::create_condition(cfg, LANG, source, scrutinee, NodeKind::SwitchHead);
    let exit_id = cfg.create_node(NodeKind::Exit, "EXIT: switch");

    ctx.push_switch_scope(exit_id);
    let body = required_child_by_field(node, "body")?;

    let mut fallthrough: Vec<usize> = Vec::new();
    let mut any_body = false;
    for group in named_children(body) {
        match group.kind() {
            "switch_block_statement_group" => {
                any_body = true;
                fallthrough = visit_statement_group(group, source, cfg, ctx, config, head_id, &fallthrough)?;
            }
            "switch_rule" => {
                any_body = true;
                visit_switch_rule(group, source, cfg, ctx, config, head_id, exit_id)?;
                fallthrough = Vec::new();
            }
            _ => {}
        }
    }
    ctx.pop_switch_scope();

    cfg.connect_all(&fallthrough, exit_id, None);
    if !any_body {
        cfg.add_edge(head_id, exit_id, None);
    }

    Ok(CfgFragment {
        entry_id: head_id,
        exit_ids: vec![exit_id],
    })
}

/// A colon-style group: one or more `switch_label`s followed by a shared
/// statement sequence. Multiple labels all point at the same `Case` node;
/// only the first label's value becomes that node's display text (§4.E
/// table, "Switch block group — Java").
fn visit_statement_group(
    group: Node,
    source: &[u8],
    cfg: &mut Cfg,
    ctx: &mut ControlFlowContext,
    config: &Config,
    switch_head: usize,
    incoming_fallthrough: &[usize],
) -> CoreResult<Vec<usize>> {
    let mut labels = Vec::new();
    let mut statements = Vec::new();
    for child in named_children(group) {
        if child.kind() == "switch_label" {
            labels.push(child);
        } else {
            statements.push(child);
        }
    }

    let (case_kind, label_text, first_edge_label) = switch_label_text(labels.first().copied(), source);
    let case_id = cfg.create_node(case_kind, label_text);
    cfg.add_edge(switch_head, case_id, Some(&first_edge_label));
    for extra in labels.iter().skip(1) {
        let (_, _, edge_label) = switch_label_text(Some(*extra), source);
        cfg.add_edge(switch_head, case_id, Some(&edge_label));
    }
    cfg.connect_all(incoming_fallthrough, case_id, None);

    let mut frontier = vec![case_id];
    let mut diverged = false;
    for stmt in statements {
        let frag = visit(stmt, LANG, source, cfg, ctx, config)?;
        cfg.connect_all(&frontier, frag.entry_id, None);
        frontier = frag.exit_ids;
        if frontier.is_empty() {
            diverged = true;
            break;
        }
    }

    if diverged {
        Ok(Vec::new())
    } else if frontier.len() == 1 && frontier[0] == case_id {
        Ok(vec![case_id])
    } else {
        Ok(frontier)
    }
}

/// An arrow-style `label -> stmt/block/throw` arm. Unlike a colon group,
/// an arrow arm never falls through: its tail always lands on the switch
/// exit, as if every arm ended in an implicit `break`.
fn visit_switch_rule(
    rule: Node,
    source: &[u8],
    cfg: &mut Cfg,
    ctx: &mut ControlFlowContext,
    config: &Config,
    switch_head: usize,
    exit_id: usize,
) -> CoreResult<()> {
    let label = named_children(rule).into_iter().find(|n| n.kind() == "switch_label");
    let (case_kind, label_text, edge_label) = switch_label_text(label, source);
    let case_id = cfg.create_node(case_kind, label_text);
    cfg.add_edge(switch_head, case_id, Some(&edge_label));

    let arm = named_children(rule).into_iter().find(|n| n.kind() != "switch_label");
    match arm {
        Some(body) => {
            let frag = visit(body, LANG, source, cfg, ctx, config)?;
            cfg.add_edge(case_id, frag.entry_id, None);
            cfg.connect_all(&frag.exit_ids, exit_id, None);
        }
        None => cfg.add_edge(case_id, exit_id, None),
    }
    Ok(())
}

fn switch_label_text(label: Option<Node>, source: &[u8]) -> (NodeKind, String, String) {
    match label {
        Some(l) => {
            let value = named_children(l).into_iter().next();
            match value {
                Some(v) => (
                    NodeKind::Case,
                    format!("CASE: {}", source_text(v, source)),
                    source_text(v, source).to_string(),
                ),
                None => (NodeKind::Default, "DEFAULT".to_string(), "default".to_string()),
            }
        }
        None => (NodeKind::Default, "DEFAULT".to_string(), "default".to_string()),
    }
}
