//! Reaching-definitions instance (§2 component J, §4.J): gen/kill transfer
//! over `(variable_name, defining_node_id)` facts, union meet, empty init.

use crate::cfg::CfgNode;

use super::{FactSet, Problem};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReachingDefinition {
    pub variable_name: String,
    pub node_id: usize,
}

pub fn reaching_definitions_problem() -> Problem<ReachingDefinition> {
    Problem {
        meet: Box::new(|sets: Vec<&FactSet<ReachingDefinition>>| {
            let mut out = FactSet::new();
            for s in sets {
                out.extend(s.iter().cloned());
            }
            out
        }),
        transfer: Box::new(|node: &CfgNode, in_set: &FactSet<ReachingDefinition>| {
            let defined = &node.metadata.definitions;
            let mut out: FactSet<ReachingDefinition> = in_set
                .iter()
                .filter(|fact| !defined.contains(&fact.variable_name))
                .cloned()
                .collect();
            for v in defined {
                out.insert(ReachingDefinition {
                    variable_name: v.clone(),
                    node_id: node.id,
                });
            }
            out
        }),
        in_init: Box::new(|_| FactSet::new()),
        out_init: Box::new(|_| FactSet::new()),
    }
}
