//! The round-robin fixpoint solver (§4.I). Forward, fixed pre-order
//! iteration per node, repeated until `OUT` stops changing — or until the
//! `10·|nodes|` iteration guard trips and `DataflowDidNotConverge` is
//! raised (§4.H), a defensive bound against a non-monotone transfer in a
//! future extension.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::debug;

use crate::cfg::Cfg;
use crate::config::Config;
use crate::error::{CoreError, CoreResult};

use super::{DataflowResult, Problem};

pub fn solve<F>(cfg: &Cfg, problem: &Problem<F>, config: &Config) -> CoreResult<DataflowResult<F>>
where
    F: Eq + Hash + Clone,
{
    let order: Vec<_> = cfg.node_ids_in_order().collect();

    let mut in_facts = HashMap::new();
    let mut out_facts = HashMap::new();
    for &id in &order {
        let node = cfg.node(id);
        in_facts.insert(id, (problem.in_init)(node));
        out_facts.insert(id, (problem.out_init)(node));
    }

    let max_iterations = (config.max_iterations_multiplier as usize) * order.len().max(1);
    let mut iterations = 0;
    loop {
        if iterations >= max_iterations {
            return Err(CoreError::DataflowDidNotConverge { iterations });
        }
        iterations += 1;
        let mut changed = false;

        for &id in &order {
            let node = cfg.node(id);
            let preds: Vec<&super::FactSet<F>> = node
                .predecessors
                .iter()
                .map(|p| out_facts.get(p).expect("predecessor visited"))
                .collect();
            let new_in = (problem.meet)(preds);
            let new_out = (problem.transfer)(node, &new_in);

            if out_facts.get(&id) != Some(&new_out) {
                changed = true;
            }
            in_facts.insert(id, new_in);
            out_facts.insert(id, new_out);
        }

        debug!(target: "dataflow", "iteration {iterations}: changed={changed}");
        if !changed {
            break;
        }
    }

    Ok(DataflowResult { in_facts, out_facts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::{NodeKind, NodeMetadata};
    use crate::dataflow::reaching::{ReachingDefinition, reaching_definitions_problem};

    #[test]
    fn straight_line_reaching_definitions_propagate() {
        let mut cfg = Cfg::new();
        let entry = cfg.create_node(NodeKind::Entry, "f");
        let def_x = cfg.create_node_with(
            NodeKind::Statement,
            "x=1",
            None,
            NodeMetadata {
                calls: vec![],
                definitions: vec!["x".to_string()],
                uses: vec![],
                call_arguments: vec![],
                self_def_use: false,
            },
        );
        let use_x = cfg.create_node_with(
            NodeKind::Statement,
            "y=x",
            None,
            NodeMetadata {
                calls: vec![],
                definitions: vec!["y".to_string()],
                uses: vec!["x".to_string()],
                call_arguments: vec![],
                self_def_use: false,
            },
        );
        let exit = cfg.create_node(NodeKind::Exit, "f");
        cfg.add_edge(entry, def_x, None);
        cfg.add_edge(def_x, use_x, None);
        cfg.add_edge(use_x, exit, None);
        cfg.entry_node_ids.push(entry);
        cfg.exit_node_ids.push(exit);

        let problem = reaching_definitions_problem();
        let result = solve(&cfg, &problem, &Config::default()).unwrap();

        let expected = ReachingDefinition {
            variable_name: "x".to_string(),
            node_id: def_x,
        };
        assert!(result.in_facts[&use_x].contains(&expected));
        assert!(!result.in_facts[&def_x].contains(&expected));
    }

    #[test]
    fn redefinition_kills_the_earlier_fact() {
        let mut cfg = Cfg::new();
        let entry = cfg.create_node(NodeKind::Entry, "f");
        let def1 = cfg.create_node_with(
            NodeKind::Statement,
            "x=1",
            None,
            NodeMetadata {
                calls: vec![],
                definitions: vec!["x".into()],
                uses: vec![],
                call_arguments: vec![],
                self_def_use: false,
            },
        );
        let def2 = cfg.create_node_with(
            NodeKind::Statement,
            "x=2",
            None,
            NodeMetadata {
                calls: vec![],
                definitions: vec!["x".into()],
                uses: vec![],
                call_arguments: vec![],
                self_def_use: false,
            },
        );
        let exit = cfg.create_node(NodeKind::Exit, "f");
        cfg.add_edge(entry, def1, None);
        cfg.add_edge(def1, def2, None);
        cfg.add_edge(def2, exit, None);
        cfg.entry_node_ids.push(entry);
        cfg.exit_node_ids.push(exit);

        let problem = reaching_definitions_problem();
        let result = solve(&cfg, &problem, &Config::default()).unwrap();

        let from_def1 = ReachingDefinition { variable_name: "x".into(), node_id: def1 };
        let from_def2 = ReachingDefinition { variable_name: "x".into(), node_id: def2 };
        assert!(!result.out_facts[&def2].contains(&from_def1));
        assert!(result.out_facts[&def2].contains(&from_def2));
    }
}
