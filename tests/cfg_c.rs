//! End-to-end CFG construction tests over real C snippets, parsed with
//! `tree-sitter` the same way the teacher's `taint.rs` tests parse Rust
//! snippets (SPEC_FULL §3.5).

use flowchains::{Config, Language, NodeKind, build_cfg};

fn build(src: &str) -> flowchains::Cfg {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&Language::C.grammar()).unwrap();
    let tree = parser.parse(src, None).unwrap();
    build_cfg(&tree, src.as_bytes(), Language::C, &Config::default()).unwrap()
}

#[test]
fn do_while_loop_wires_body_before_condition_check() {
    let cfg = build("int main(){ int x=0; do { x=x+1; } while(x<10); return x; }");
    let header = cfg.nodes.values().find(|n| n.kind == NodeKind::LoopHeader).unwrap();
    let mut labels: Vec<_> = header.edge_labels.values().cloned().collect();
    labels.sort();
    assert_eq!(labels, vec!["false".to_string(), "true".to_string()]);
}

#[test]
fn for_loop_continue_targets_the_update_statement() {
    let cfg = build("int main(){ int i; for(i=0;i<10;i=i+1){ if(i==3){continue;} } return i; }");
    let cont = cfg.nodes.values().find(|n| n.kind == NodeKind::Continue).unwrap();
    assert_eq!(cont.successors.len(), 1);
    let target = *cont.successors.iter().next().unwrap();
    assert!(cfg.node(target).source_text.contains("i=i+1"));
}

#[test]
fn for_loop_without_update_continues_to_header() {
    let cfg = build("int main(){ int i=0; for(;i<10;){ i=i+1; } return i; }");
    let header = cfg.nodes.values().find(|n| n.kind == NodeKind::LoopHeader).unwrap();
    // body's sole statement must fall straight back into the header since
    // there is no update clause to land on instead.
    let body_stmt = cfg
        .nodes
        .values()
        .find(|n| n.source_text.contains("i=i+1"))
        .unwrap();
    assert!(body_stmt.successors.contains(&header.id));
}

#[test]
fn nested_if_else_produces_four_way_condition_merge() {
    let cfg = build(
        "int main(){ int x=0; if (x>0) { x=1; } else { if (x<0) { x=-1; } else { x=2; } } return x; }",
    );
    let conditions: Vec<_> = cfg.nodes.values().filter(|n| n.kind == NodeKind::Condition).collect();
    assert_eq!(conditions.len(), 2);
    for cond in conditions {
        let mut labels: Vec<_> = cond.edge_labels.values().cloned().collect();
        labels.sort();
        assert_eq!(labels, vec!["false".to_string(), "true".to_string()]);
    }
}

#[test]
fn switch_without_default_has_no_default_edge() {
    let cfg = build("int main(){ int x=1; switch(x){ case 1: x=2; break; } return x; }");
    let head = cfg.nodes.values().find(|n| n.kind == NodeKind::SwitchHead).unwrap();
    assert!(!head.edge_labels.values().any(|l| l == "default"));
}

#[test]
fn no_case_or_default_nodes_survive_postprocessing() {
    let cfg = build("int main(){ int x=1; switch(x){ case 1: x=2; break; default: x=0; } return x; }");
    assert!(!cfg.nodes.values().any(|n| n.kind == NodeKind::Case));
    assert!(!cfg.nodes.values().any(|n| n.kind == NodeKind::Default));
}

#[test]
fn exactly_one_entry_and_exit_per_function() {
    let cfg = build("int f(int a){ return a; } int g(int b){ return b+1; }");
    assert_eq!(cfg.entry_node_ids.len(), 2);
    assert_eq!(cfg.exit_node_ids.len(), 2);
}

#[test]
fn edge_successor_predecessor_symmetry_holds_everywhere() {
    let cfg = build(
        "int main(){ int x=0; while(x<10){ x=x+1; if(x==5){break;} } switch(x){ case 5: x=0; break; default: x=1; } return x; }",
    );
    for node in cfg.nodes.values() {
        for &succ in &node.successors {
            assert!(
                cfg.node(succ).predecessors.contains(&node.id),
                "edge {} -> {succ} missing reverse predecessor link",
                node.id
            );
        }
        for &pred in &node.predecessors {
            assert!(
                cfg.node(pred).successors.contains(&node.id),
                "edge {} -> {} missing forward successor link",
                pred,
                node.id
            );
        }
    }
}

#[test]
fn missing_jump_target_is_reported_and_function_is_skipped() {
    // `break;` outside any loop/switch: the function build fails, is
    // skipped (§7), and the translation unit still has zero entries.
    let src = "int main(){ break; return 0; }";
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&Language::C.grammar()).unwrap();
    let tree = parser.parse(src, None).unwrap();
    let cfg = build_cfg(&tree, src.as_bytes(), Language::C, &Config::default()).unwrap();
    assert!(cfg.entry_node_ids.is_empty());
}

#[test]
fn strict_syntax_rejects_a_broken_translation_unit() {
    let src = "int main( { return 0; }";
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&Language::C.grammar()).unwrap();
    let tree = parser.parse(src, None).unwrap();
    let err = build_cfg(&tree, src.as_bytes(), Language::C, &Config::default()).unwrap_err();
    assert!(matches!(err, flowchains::CoreError::SyntaxTreeHasError { .. }));
}

#[test]
fn non_strict_mode_tolerates_a_broken_tree() {
    let src = "int main( { return 0; }";
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&Language::C.grammar()).unwrap();
    let tree = parser.parse(src, None).unwrap();
    let config = Config { strict_syntax: false, ..Config::default() };
    assert!(build_cfg(&tree, src.as_bytes(), Language::C, &config).is_ok());
}

#[test]
fn function_call_edges_are_additive_and_off_by_default() {
    let src = "void helper(int a){ a=a+1; } int main(){ int x=5; helper(x); return 0; }";
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&Language::C.grammar()).unwrap();
    let tree = parser.parse(src, None).unwrap();

    let without = build_cfg(&tree, src.as_bytes(), Language::C, &Config::default()).unwrap();
    let call_site = without.nodes.values().find(|n| n.metadata.calls.contains(&"helper".to_string())).unwrap();
    assert!(!call_site.edge_labels.values().any(|l| l == "function_call"));

    let config = Config { function_call_edges: true, ..Config::default() };
    let with = build_cfg(&tree, src.as_bytes(), Language::C, &config).unwrap();
    let call_site = with.nodes.values().find(|n| n.metadata.calls.contains(&"helper".to_string())).unwrap();
    let helper_entry = with.nodes.values().find(|n| n.kind == NodeKind::Entry && n.source_text == "helper").unwrap();
    assert_eq!(call_site.edge_label(helper_entry.id), Some("function_call"));

    let helper_exit = with.nodes.values().find(|n| n.kind == NodeKind::Exit && n.source_text == "helper").unwrap();
    assert_eq!(helper_exit.edge_label(call_site.id), Some("function_return"));

    // the ordinary successor edge from the call site into main's own
    // control flow must still be present alongside the speculative pair.
    assert!(call_site.successors.len() >= 2);
}
