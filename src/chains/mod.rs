//! Chain extractor (§2 component K, §4.K): Def-Use and Use-Def chains over
//! a solved reaching-definitions result, including one-level inter-
//! procedural parameter-alias resolution.

pub mod parameter_alias;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::cfg::{Cfg, NodeId};
use crate::config::Config;
use crate::dataflow::DataflowResult;
use crate::dataflow::reaching::ReachingDefinition;

use parameter_alias::parameter_aliases;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefUseChain {
    pub variable_name: String,
    pub def_node_id: NodeId,
    /// Strictly ascending, de-duplicated (§8).
    pub uses: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct DefUseResult {
    pub chains: HashMap<String, Vec<DefUseChain>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseDefChain {
    pub variable_name: String,
    pub use_node_id: NodeId,
    pub definitions: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct UseDefResult {
    pub chains: HashMap<String, Vec<UseDefChain>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct ChainEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub label: String,
}

impl DefUseResult {
    /// Edge-only export (§6): one `{source, target, label}` per def→use
    /// pair, `source` = the definition, `target` = the use. Always
    /// available; only the `Serialize` impl on `ChainEdge` is gated behind
    /// the `serialize` feature.
    pub fn to_edges(&self) -> Vec<ChainEdge> {
        let mut edges = Vec::new();
        for chains in self.chains.values() {
            for chain in chains {
                for &use_id in &chain.uses {
                    edges.push(ChainEdge {
                        source: chain.def_node_id,
                        target: use_id,
                        label: chain.variable_name.clone(),
                    });
                }
            }
        }
        edges
    }
}

/// `D(u,v)` from §4.K: reaching definitions of `v` at `u`, plus one level
/// of parameter aliases, plus — for a node that both defines and uses the
/// same variable (compound assignment, increment/decrement) — `u` itself,
/// since the old value is read before the new one is written at the same
/// node and so never appears as a separately "reaching" fact (§8 scenario
/// 6).
pub fn def_use(cfg: &Cfg, result: &DataflowResult<ReachingDefinition>, config: &Config) -> DefUseResult {
    let mut alias_cache: HashMap<String, BTreeSet<NodeId>> = HashMap::new();
    let mut chain_uses: BTreeMap<(String, NodeId), BTreeSet<NodeId>> = BTreeMap::new();

    for u in cfg.node_ids_in_order() {
        let node = cfg.node(u);
        if node.metadata.uses.is_empty() {
            continue;
        }
        let Some(in_facts) = result.in_facts.get(&u) else {
            continue;
        };

        for v in &node.metadata.uses {
            let mut defs: BTreeSet<NodeId> = in_facts
                .iter()
                .filter(|fact| &fact.variable_name == v)
                .map(|fact| fact.node_id)
                .collect();

            if node.metadata.self_def_use && node.metadata.definitions.contains(v) {
                defs.insert(u);
            }

            if config.resolve_parameter_aliases {
                let aliases = alias_cache.entry(v.clone()).or_insert_with(|| parameter_aliases(cfg, v));
                defs.extend(aliases.iter().copied());
            }

            for d in defs {
                chain_uses.entry((v.clone(), d)).or_default().insert(u);
            }
        }
    }

    let mut chains: HashMap<String, Vec<DefUseChain>> = HashMap::new();
    for ((variable_name, def_node_id), uses) in chain_uses {
        chains.entry(variable_name.clone()).or_default().push(DefUseChain {
            variable_name,
            def_node_id,
            uses: uses.into_iter().collect(),
        });
    }
    DefUseResult { chains }
}

/// Derived directly from [`def_use`]'s `D(u,v)` so that the §8 law — "the
/// set of definition ids attached in UseDef equals `{ d | (v,d) ∈ DefUse
/// chains ∧ u ∈ uses(d) }`" — holds by construction rather than by a
/// second, independently-computed pass.
pub fn use_def(cfg: &Cfg, result: &DataflowResult<ReachingDefinition>, config: &Config) -> UseDefResult {
    let def_use_result = def_use(cfg, result, config);

    let mut chain_defs: BTreeMap<(String, NodeId), BTreeSet<NodeId>> = BTreeMap::new();
    for chains in def_use_result.chains.values() {
        for chain in chains {
            for &u in &chain.uses {
                chain_defs
                    .entry((chain.variable_name.clone(), u))
                    .or_default()
                    .insert(chain.def_node_id);
            }
        }
    }

    let mut chains: HashMap<String, Vec<UseDefChain>> = HashMap::new();
    for ((variable_name, use_node_id), definitions) in chain_defs {
        chains.entry(variable_name.clone()).or_default().push(UseDefChain {
            variable_name,
            use_node_id,
            definitions: definitions.into_iter().collect(),
        });
    }
    UseDefResult { chains }
}
