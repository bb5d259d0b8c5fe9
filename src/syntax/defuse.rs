//! AST utilities (§2 component B, §4.A): identifier extraction for calls,
//! definitions, and uses, parameterised per language.

use tree_sitter::Node;

use super::{Language, child_by_field, collect_identifiers, named_children, source_text};
use crate::cfg::NodeMetadata;

/// Build the `calls`/`definitions`/`uses` triple for one statement-level
/// node (an `expression_statement`, `declaration`/`local_variable_declaration`,
/// or a bare expression such as the condition of a loop).
pub fn extract_metadata(node: Node, lang: Language, source: &[u8]) -> NodeMetadata {
    let mut found = Vec::new();
    collect_calls(node, lang, source, &mut found);
    let calls = found.iter().map(|(name, _)| name.clone()).collect();
    let call_arguments = found.into_iter().map(|(_, args)| args).collect();
    let (definitions, uses, self_def_use) = def_use(node, lang, source);
    NodeMetadata {
        calls,
        definitions,
        uses,
        call_arguments,
        self_def_use,
    }
}

/// Unwraps statement wrappers and dispatches to the construct that actually
/// introduces a definition. Everything else falls back to "every identifier
/// it contains, minus call-callee positions, is a use". The third element
/// is true only for a compound-assignment/increment-decrement node, where
/// the operand is read and written by the very same node (§4.A, §8 scenario
/// 6) — a plain simple assignment never sets it, even though its `definitions`
/// and `uses` can name the same variable (`x=x+1`).
fn def_use(node: Node, lang: Language, source: &[u8]) -> (Vec<String>, Vec<String>, bool) {
    match node.kind() {
        "expression_statement" => match node.named_child(0) {
            Some(inner) => def_use(inner, lang, source),
            None => (Vec::new(), Vec::new(), false),
        },

        "declaration" if lang == Language::C => {
            let mut defs = Vec::new();
            let mut uses = Vec::new();
            for child in named_children(node) {
                if child.kind() == "init_declarator" {
                    if let Some(d) = child_by_field(child, "declarator") {
                        if let Some(name) = innermost_identifier(d, source) {
                            defs.push(name);
                        }
                    }
                    if let Some(v) = child_by_field(child, "value") {
                        collect_uses(v, source, &mut uses);
                    }
                }
            }
            (defs, uses, false)
        }

        "local_variable_declaration" if lang == Language::Java => {
            let mut defs = Vec::new();
            let mut uses = Vec::new();
            for child in named_children(node) {
                if child.kind() == "variable_declarator" {
                    if let Some(d) = child_by_field(child, "name") {
                        defs.push(source_text(d, source).to_string());
                    }
                    if let Some(v) = child_by_field(child, "value") {
                        collect_uses(v, source, &mut uses);
                    }
                }
            }
            (defs, uses, false)
        }

        "assignment_expression" => {
            let mut defs = Vec::new();
            let mut uses = Vec::new();
            let operator = child_by_field(node, "operator")
                .map(|o| source_text(o, source))
                .unwrap_or("=");
            let compound = operator != "=";
            if let Some(left) = child_by_field(node, "left") {
                if let Some(name) = innermost_identifier(left, source) {
                    defs.push(name.clone());
                    // Compound assignment reads its own lhs too (§4.A).
                    if compound {
                        uses.push(name);
                    }
                } else {
                    // Complex lvalue (e.g. array element): every identifier
                    // it contains is a use, never a definition.
                    collect_uses(left, source, &mut uses);
                }
            }
            if let Some(right) = child_by_field(node, "right") {
                collect_uses(right, source, &mut uses);
            }
            (defs, uses, compound)
        }

        "update_expression" => {
            // `x++`, `++x`, `x--`, `--x`: the operand is both def and use,
            // producing a self-referential chain (§8 scenario 6).
            let mut defs = Vec::new();
            let mut uses = Vec::new();
            if let Some(arg) = child_by_field(node, "argument") {
                if let Some(name) = innermost_identifier(arg, source) {
                    defs.push(name.clone());
                    uses.push(name);
                }
            }
            let self_def_use = !defs.is_empty();
            (defs, uses, self_def_use)
        }

        _ => {
            let mut uses = Vec::new();
            collect_uses(node, source, &mut uses);
            (Vec::new(), uses, false)
        }
    }
}

/// Collect identifier uses, skipping call-callee positions and method-call
/// names (the callee itself is not a "use" of a variable).
fn collect_uses(node: Node, source: &[u8], out: &mut Vec<String>) {
    match node.kind() {
        "call_expression" => {
            if let Some(args) = child_by_field(node, "arguments") {
                for child in named_children(args) {
                    collect_uses(child, source, out);
                }
            }
        }
        "method_invocation" => {
            if let Some(obj) = child_by_field(node, "object") {
                collect_uses(obj, source, out);
            }
            if let Some(args) = child_by_field(node, "arguments") {
                for child in named_children(args) {
                    collect_uses(child, source, out);
                }
            }
        }
        "identifier" => out.push(source_text(node, source).to_string()),
        _ => {
            for child in named_children(node) {
                collect_uses(child, source, out);
            }
        }
    }
}

/// Walk `node`'s subtree for call/method-invocation constructs, recording
/// each callee name paired with its ordered argument identifiers, in
/// encounter order (ordered list, §3). The argument identifiers are
/// captured eagerly here — rather than by re-walking a borrowed syntax
/// node during chain extraction — so a built `Cfg` never needs to outlive
/// the `tree_sitter::Tree` it was parsed from (§4.K step 3).
pub fn collect_calls(node: Node, lang: Language, source: &[u8], out: &mut Vec<(String, Vec<String>)>) {
    match node.kind() {
        "call_expression" if lang == Language::C => {
            if let Some(f) = child_by_field(node, "function") {
                out.push((source_text(f, source).to_string(), extract_call_arguments(node, lang, source)));
            }
            if let Some(args) = child_by_field(node, "arguments") {
                for child in named_children(args) {
                    collect_calls(child, lang, source, out);
                }
            }
        }
        "method_invocation" if lang == Language::Java => {
            if let Some(name) = child_by_field(node, "name") {
                out.push((source_text(name, source).to_string(), extract_call_arguments(node, lang, source)));
            }
            if let Some(args) = child_by_field(node, "arguments") {
                for child in named_children(args) {
                    collect_calls(child, lang, source, out);
                }
            }
        }
        _ => {
            for child in named_children(node) {
                collect_calls(child, lang, source, out);
            }
        }
    }
}

/// Descend through pointer/array declarators to the declared identifier
/// (Open Question (c): identifier preferred over raw declarator text).
pub fn innermost_identifier(node: Node, source: &[u8]) -> Option<String> {
    if node.kind() == "identifier" {
        return Some(source_text(node, source).to_string());
    }
    let mut ids = Vec::new();
    collect_identifiers(node, source, &mut ids);
    ids.into_iter().next()
}

/// Ordered argument identifiers at a call site, for parameter-alias
/// resolution (§4.K step 3). One identifier per argument position: the
/// argument itself if it is a bare identifier, otherwise the first
/// identifier found inside it.
pub fn extract_call_arguments(call_node: Node, lang: Language, source: &[u8]) -> Vec<String> {
    let args_field = match lang {
        Language::C => "arguments",
        Language::Java => "arguments",
    };
    let Some(args) = child_by_field(call_node, args_field) else {
        return Vec::new();
    };
    named_children(args)
        .into_iter()
        .filter_map(|arg| {
            if arg.kind() == "identifier" {
                Some(source_text(arg, source).to_string())
            } else {
                let mut ids = Vec::new();
                collect_identifiers(arg, source, &mut ids);
                ids.into_iter().next()
            }
        })
        .collect()
}
