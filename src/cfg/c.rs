//! C-language visitor particulars (§2 component F): function signatures,
//! `for`-loop field names, and switch/case fall-through, which differ
//! enough from Java to warrant their own module even though most
//! constructs share `builder::visit`.

use tree_sitter::Node;

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::syntax::defuse::innermost_identifier;
use crate::syntax::{Language, child_by_field, named_children, required_child_by_field, source_text};

use super::builder::{visit, visit_for_generic};
use super::context::ControlFlowContext;
use super::{Cfg, CfgFragment, NodeKind};

const LANG: Language = Language::C;

/// `(function_name, parameter_identifiers, body)`.
pub fn function_signature<'a>(fn_node: Node<'a>, source: &[u8]) -> CoreResult<(String, Vec<String>, Node<'a>)> {
    let declarator = required_child_by_field(fn_node, "declarator")?;
    let func_declarator = find_function_declarator(declarator).ok_or_else(|| CoreError::MissingField {
        field: "declarator",
        node_kind: fn_node.kind().to_string(),
    })?;

    let name_node = required_child_by_field(func_declarator, "declarator")?;
    let name = innermost_identifier(name_node, source).unwrap_or_else(|| source_text(name_node, source).to_string());

    let mut params = Vec::new();
    if let Some(list) = child_by_field(func_declarator, "parameters") {
        for param in named_children(list) {
            if param.kind() != "parameter_declaration" {
                continue;
            }
            if let Some(decl) = child_by_field(param, "declarator") {
                match innermost_identifier(decl, source) {
                    Some(name) => params.push(name),
                    None => {
                        // Ambiguous declarator shape (§7 warning): fall
                        // back to the parameter's raw text, deterministically.
                        tracing::warn!(target: "cfg", "ambiguous parameter declarator, recording raw text");
                        params.push(source_text(param, source).to_string());
                    }
                }
            }
        }
    }

    let body = required_child_by_field(fn_node, "body")?;
    Ok((name, params, body))
}

/// Unwrap `pointer_declarator` layers to the nested `function_declarator`.
fn find_function_declarator(node: Node) -> Option<Node> {
    if node.kind() == "function_declarator" {
        return Some(node);
    }
    if node.kind() == "pointer_declarator" {
        return child_by_field(node, "declarator").and_then(find_function_declarator);
    }
    None
}

pub fn visit_for(
    node: Node,
    source: &[u8],
    cfg: &mut Cfg,
    ctx: &mut ControlFlowContext,
    config: &Config,
) -> CoreResult<CfgFragment> {
    visit_for_generic(node, LANG, source, cfg, ctx, config, "initializer", "update")
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
    for case in named_children(body) {
        if case.kind() != "case_statement" {
            continue;
        }
        any_body = true;
        let group_exits = visit_case_group(case, source, cfg, ctx, config, head_id, &fallthrough)?;
        fallthrough = group_exits;
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

/// One `case <value>:`/`default:` group. `case_statement` in the C grammar
/// holds both the label and the statements up to the next label in its own
/// children, so both are extracted here rather than via a separate body
/// node (§4.E table, "Case group ... C").
fn visit_case_group(
    case: Node,
    source: &[u8],
    cfg: &mut Cfg,
    ctx: &mut ControlFlowContext,
    config: &Config,
    switch_head: usize,
    incoming_fallthrough: &[usize],
) -> CoreResult<Vec<usize>> {
    let value = child_by_field(case, "value");
    let (case_kind, label_text, edge_label) = match value {
        Some(v) => (
            NodeKind::Case,
            format!("CASE: {}", source_text(v, source)),
            source_text(v, source).to_string(),
        ),
        None => (NodeKind::Default, "DEFAULT".to_string(), "default".to_string()),
    };
    let case_id = cfg.create_node(case_kind, label_text);
    cfg.add_edge(switch_head, case_id, Some(&edge_label));
    // Fall-through from the previous case group's tail into this one.
    cfg.connect_all(incoming_fallthrough, case_id, None);

    let value_id = value.map(|v| v.id());
    let stmts: Vec<Node> = named_children(case)
        .into_iter()
        .filter(|n| Some(n.id()) != value_id)
        .collect();

    let mut frontier = vec![case_id];
    let mut diverged = false;
    for stmt in stmts {
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
        // No statements at all: the group itself falls through.
        Ok(vec![case_id])
    } else {
        Ok(frontier)
    }
}
