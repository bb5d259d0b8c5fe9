//! Def-Use/Use-Def chain extraction over real CFGs, including the
//! inter-procedural parameter-alias step (SPEC_FULL §3.5, spec §8).

use flowchains::{Config, Language, build_cfg, def_use, reaching_definitions, solve, use_def};

fn analyse(src: &str) -> (flowchains::Cfg, flowchains::DefUseResult, flowchains::UseDefResult) {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&Language::C.grammar()).unwrap();
    let tree = parser.parse(src, None).unwrap();
    let config = Config::default();
    let cfg = build_cfg(&tree, src.as_bytes(), Language::C, &config).unwrap();
    let result = solve(&cfg, &reaching_definitions(), &config).unwrap();
    let du = def_use(&cfg, &result, &config);
    let ud = use_def(&cfg, &result, &config);
    (cfg, du, ud)
}

#[test]
fn def_use_uses_are_sorted_ascending_and_deduplicated() {
    let (_cfg, du, _ud) = analyse("int main(){ int x=1; int a=x+x; int b=x*2; return a+b; }");
    for chains in du.chains.values() {
        for chain in chains {
            let mut sorted = chain.uses.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(chain.uses, sorted, "uses must already be sorted ascending and deduplicated");
        }
    }
}

#[test]
fn use_def_law_matches_def_use_across_a_real_function() {
    let (cfg, du, ud) = analyse(
        "int main(){ int x=1; if (x>0) { x=2; } int y=x+1; return y; }",
    );
    for node in cfg.nodes.values() {
        for v in &node.metadata.uses {
            let from_def_use: std::collections::BTreeSet<_> = du
                .chains
                .get(v)
                .into_iter()
                .flatten()
                .filter(|c| c.uses.contains(&node.id))
                .map(|c| c.def_node_id)
                .collect();
            let from_use_def: std::collections::BTreeSet<_> = ud
                .chains
                .get(v)
                .into_iter()
                .flatten()
                .find(|c| c.use_node_id == node.id)
                .map(|c| c.definitions.iter().copied().collect())
                .unwrap_or_default();
            assert_eq!(from_def_use, from_use_def, "§8 law: UseDef definitions must equal {{d | (v,d) in DefUse ∧ u in uses(d)}}");
        }
    }
}

#[test]
fn compound_assignment_self_chain_exists() {
    let (cfg, du, _ud) = analyse("int main(){ int x=1; x+=2; return x; }");
    let node = cfg.nodes.values().find(|n| n.source_text.contains("x+=2") || n.source_text.contains("x += 2")).unwrap();
    let x_chains = &du.chains["x"];
    let self_chain = x_chains.iter().find(|c| c.def_node_id == node.id).expect("self-referential chain for +=");
    assert!(self_chain.uses.contains(&node.id));
}

#[test]
fn two_level_alias_chain_through_an_intermediate_function() {
    // main calls middle(x); middle forwards its parameter to inner(a) —
    // the alias step is one level deep per call, so this chain forms
    // naturally from main's x reaching middle's `a`, and then, when `a`'s
    // own use at the `inner(a)` call is processed, from `a` reaching
    // inner's `b`.
    let (cfg, du, _ud) = analyse(
        "void inner(int b){ int c=b+1; } \
         void middle(int a){ inner(a); } \
         int main(){ int x=5; middle(x); return 0; }",
    );

    let def_x = cfg
        .nodes
        .values()
        .find(|n| n.metadata.definitions.contains(&"x".to_string()))
        .unwrap();
    let a_chains = &du.chains["a"];
    let alias_to_a = a_chains.iter().find(|c| c.def_node_id == def_x.id).expect("x aliases into middle's a");

    let call_inner = cfg.nodes.values().find(|n| n.metadata.calls.contains(&"inner".to_string())).unwrap();
    assert!(alias_to_a.uses.contains(&call_inner.id), "a's use at inner(a) must be reached by x's definition");

    // The alias step is one level deep per call (§4.K): `b`'s chain roots
    // at middle's Entry node, the node whose `definitions` actually holds
    // `a`, not at the two-hop-removed `def_x`.
    let middle_entry = cfg
        .nodes
        .values()
        .find(|n| n.kind == flowchains::NodeKind::Entry && n.source_text == "middle")
        .unwrap();
    let b_chains = &du.chains["b"];
    let use_b = cfg.nodes.values().find(|n| n.source_text.contains("c=b+1") || n.source_text.contains("c = b + 1")).unwrap();
    assert!(
        b_chains.iter().any(|c| c.def_node_id == middle_entry.id && c.uses.contains(&use_b.id)),
        "b's chain should root at middle's entry (the one-level alias of its parameter), not at x's definition"
    );
}

#[test]
fn disabling_parameter_alias_resolution_drops_the_cross_function_chain() {
    let src = "void helper(int a){ int b=a+1; } int main(){ int x=5; helper(x); return 0; }";
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&Language::C.grammar()).unwrap();
    let tree = parser.parse(src, None).unwrap();
    let config = Config { resolve_parameter_aliases: false, ..Config::default() };
    let cfg = build_cfg(&tree, src.as_bytes(), Language::C, &config).unwrap();
    let result = solve(&cfg, &reaching_definitions(), &config).unwrap();

    // def_use/use_def themselves always run the alias step internally
    // (the knob only gates whether callers of the *public* chain-building
    // entry points opt into cross-function linkage); with aliasing
    // unavailable the parameter `a` simply has no incoming reaching fact
    // from outside `helper`, so no chain roots in `main`.
    let du = def_use(&cfg, &result, &config);
    if let Some(a_chains) = du.chains.get("a") {
        let def_x = cfg.nodes.values().find(|n| n.metadata.definitions.contains(&"x".to_string())).unwrap();
        assert!(!a_chains.iter().any(|c| c.def_node_id == def_x.id));
    }
}
