//! Closed dispatch vocabulary for the CFG builder, keyed by the external
//! parser's `kind()` string. Mirrors the teacher's `labels::Kind` /
//! `phf_map!` dispatch-table pattern: the builder never matches on raw
//! kind strings directly, it goes through `lookup` once per node.

use super::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Construct {
    FunctionDef,
    Block,
    Linear,
    If,
    While,
    DoWhile,
    For,
    EnhancedFor,
    Break,
    Continue,
    Return,
    Switch,
    /// A single `case <value>: ...` group (C) or switch-label group (Java).
    Case,
    Default,
    Labeled,
    Goto,
    /// A call node is still sequenced like `Linear`; tagged separately so
    /// the builder can record `metadata.calls`.
    Call,
    Trivia,
    Other,
}

#[inline]
pub fn lookup(lang: Language, raw: &str) -> Construct {
    match lang {
        Language::C => super::c::KINDS.get(raw).copied().unwrap_or(Construct::Other),
        Language::Java => super::java::KINDS.get(raw).copied().unwrap_or(Construct::Other),
    }
}
