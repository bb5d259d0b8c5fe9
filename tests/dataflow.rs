//! Reaching-definitions dataflow properties over real CFGs (SPEC_FULL
//! §3.5, spec §8 "Dataflow / chain laws").

use flowchains::{Config, Language, build_cfg, reaching_definitions, solve};

fn build(src: &str) -> flowchains::Cfg {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&Language::C.grammar()).unwrap();
    let tree = parser.parse(src, None).unwrap();
    build_cfg(&tree, src.as_bytes(), Language::C, &Config::default()).unwrap()
}

#[test]
fn if_else_merge_unions_both_branches_definitions() {
    let cfg = build("int main(){ int x; if (1) { x=1; } else { x=2; } return x; }");
    let result = solve(&cfg, &reaching_definitions(), &Config::default()).unwrap();

    let ret = cfg.nodes.values().find(|n| n.metadata.uses.contains(&"x".to_string())).unwrap();
    let reaching: Vec<_> = result.in_facts[&ret.id]
        .iter()
        .filter(|f| f.variable_name == "x")
        .collect();
    // Both the then- and else-branch definitions of x reach the merge
    // point; neither kills the other since they're on disjoint paths.
    assert_eq!(reaching.len(), 2);
}

#[test]
fn loop_back_edge_still_converges() {
    let cfg = build("int main(){ int x=0; while(x<100){ x=x+1; } return x; }");
    // solve() would return Err(DataflowDidNotConverge) if the fixpoint
    // never stabilized; a simple loop body must converge well within the
    // default 10x node-count guard.
    let result = solve(&cfg, &reaching_definitions(), &Config::default());
    assert!(result.is_ok());
}

#[test]
fn deeply_nested_loops_converge_within_default_iteration_budget() {
    let cfg = build(
        "int main(){ int x=0; int i=0; int j=0; int k=0; \
         while(i<10){ while(j<10){ while(k<10){ x=x+1; k=k+1; } j=j+1; } i=i+1; } return x; }",
    );
    assert!(solve(&cfg, &reaching_definitions(), &Config::default()).is_ok());
}

#[test]
fn redefinition_inside_the_loop_kills_the_pre_loop_definition_at_the_header() {
    let cfg = build("int main(){ int x=0; while(x<10){ x=x+1; } return x; }");
    let result = solve(&cfg, &reaching_definitions(), &Config::default()).unwrap();

    let header = cfg.nodes.values().find(|n| n.kind == flowchains::NodeKind::LoopHeader).unwrap();
    let in_header = &result.in_facts[&header.id];
    let from_init = in_header.iter().find(|f| f.variable_name == "x").map(|f| f.node_id);
    let def_init = cfg
        .nodes
        .values()
        .find(|n| n.metadata.definitions.contains(&"x".to_string()) && n.source_text.contains("x=0"))
        .unwrap();
    let def_incr = cfg
        .nodes
        .values()
        .find(|n| n.metadata.definitions.contains(&"x".to_string()) && n.source_text.contains("x=x+1"))
        .unwrap();

    // At the header, x can reach from either the pre-loop init (first
    // iteration) or the body's increment (subsequent iterations) — a
    // textbook reaching-definitions union at a loop header.
    let reaching_ids: Vec<_> = in_header
        .iter()
        .filter(|f| f.variable_name == "x")
        .map(|f| f.node_id)
        .collect();
    assert!(reaching_ids.contains(&def_init.id));
    assert!(reaching_ids.contains(&def_incr.id));
    let _ = from_init;
}

#[test]
fn solver_rejects_a_pathologically_low_iteration_budget() {
    let cfg = build(
        "int main(){ int x=0; while(x<10){ x=x+1; } while(x<20){ x=x+1; } while(x<30){ x=x+1; } return x; }",
    );
    let stingy = Config { max_iterations_multiplier: 0, ..Config::default() };
    let err = solve(&cfg, &reaching_definitions(), &stingy).unwrap_err();
    assert!(matches!(err, flowchains::CoreError::DataflowDidNotConverge { .. }));
}

#[test]
fn empty_function_body_still_produces_a_valid_fixpoint() {
    let cfg = build("void noop(){}");
    assert!(solve(&cfg, &reaching_definitions(), &Config::default()).is_ok());
}
