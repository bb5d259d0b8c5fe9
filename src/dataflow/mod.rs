//! The monotone dataflow framework (§2 component I, §4.I, §9): a dataflow
//! problem is a record of four callables, not a class hierarchy, so the
//! solver carries no problem-specific state.

pub mod reaching;
pub mod solver;

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::cfg::{CfgNode, NodeId};

pub type FactSet<F> = HashSet<F>;

/// `meet`, `transfer`, `in_init`, `out_init` — exactly the four operations
/// §4.I names. `solve` dispatches through this record without knowing
/// anything about the concrete fact type.
pub struct Problem<F> {
    pub meet: Box<dyn Fn(Vec<&FactSet<F>>) -> FactSet<F>>,
    pub transfer: Box<dyn Fn(&CfgNode, &FactSet<F>) -> FactSet<F>>,
    pub in_init: Box<dyn Fn(&CfgNode) -> FactSet<F>>,
    pub out_init: Box<dyn Fn(&CfgNode) -> FactSet<F>>,
}

#[derive(Debug, Clone)]
pub struct DataflowResult<F: Eq + Hash> {
    pub in_facts: HashMap<NodeId, FactSet<F>>,
    pub out_facts: HashMap<NodeId, FactSet<F>>,
}
