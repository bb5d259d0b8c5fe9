//! Parallel CFG construction across independent inputs (SPEC_FULL §3.4).
//! Each build is privately owned end to end (§5), so there is nothing to
//! synchronize beyond collecting results — the same shape as the teacher's
//! `commands/scan.rs` file-level `rayon` fan-out, generalized here to
//! function/file-level parallelism over `build_cfg` calls.

use rayon::prelude::*;

use crate::config::Config;
use crate::error::CoreResult;
use crate::syntax::Language;
use crate::{Cfg, build_cfg};

/// One independent build request: a parsed tree, its source bytes, and the
/// language it was parsed as.
pub struct BuildInput<'a> {
    pub tree: &'a tree_sitter::Tree,
    pub source: &'a [u8],
    pub language: Language,
}

/// Build every input's CFG in parallel. Order of `inputs` is preserved in
/// the returned `Vec`; each entry is independent of its neighbours, so one
/// input's `Err` never affects another's result.
pub fn build_cfgs_parallel(inputs: &[BuildInput], config: &Config) -> Vec<CoreResult<Cfg>> {
    inputs
        .par_iter()
        .map(|input| build_cfg(input.tree, input.source, input.language, config))
        .collect()
}
