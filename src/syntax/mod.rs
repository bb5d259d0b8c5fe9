//! The syntax-tree adapter (§4.A): a thin, read-only view over a parsed
//! `tree_sitter::Tree` plus the identifier-extraction helpers the CFG
//! builder and chain extractor both need.

pub mod c;
pub mod defuse;
pub mod java;
pub mod kinds;

use tree_sitter::Node;

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    C,
    Java,
}

impl Language {
    pub fn grammar(self) -> tree_sitter::Language {
        match self {
            Language::C => tree_sitter_c::LANGUAGE.into(),
            Language::Java => tree_sitter_java::LANGUAGE.into(),
        }
    }
}

/// Accepts a caller-supplied language tag (e.g. forwarded from a CLI's
/// file-extension heuristic, which itself stays out of this crate's scope
/// per §1/§6) and rejects anything outside the two supported languages with
/// `CoreError::UnsupportedLanguage` rather than panicking.
impl std::convert::TryFrom<&str> for Language {
    type Error = CoreError;

    fn try_from(tag: &str) -> CoreResult<Language> {
        match tag.to_ascii_lowercase().as_str() {
            "c" => Ok(Language::C),
            "java" => Ok(Language::Java),
            other => Err(CoreError::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// UTF-8 decode of `node`'s byte range; empty string when the range is empty
/// or not valid UTF-8 (tree-sitter guarantees byte ranges fall on source
/// boundaries, so this is only reachable on clearly malformed input).
pub fn source_text<'a>(node: Node<'a>, source: &'a [u8]) -> &'a str {
    std::str::from_utf8(&source[node.start_byte()..node.end_byte()]).unwrap_or("")
}

pub fn child_by_field<'a>(node: Node<'a>, field: &'static str) -> Option<Node<'a>> {
    node.child_by_field_name(field)
}

pub fn required_child_by_field<'a>(node: Node<'a>, field: &'static str) -> CoreResult<Node<'a>> {
    node.child_by_field_name(field).ok_or_else(|| CoreError::MissingField {
        field,
        node_kind: node.kind().to_string(),
    })
}

pub fn named_children<'a>(node: Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Depth-first walk pushing children in reverse so `visit` sees them
/// left-to-right (an explicit stack, not recursion: large translation
/// units can otherwise blow the native stack).
pub fn dfs<'a, F: FnMut(Node<'a>)>(root: Node<'a>, mut visit: F) {
    let mut stack = vec![root];
    while let Some(n) = stack.pop() {
        visit(n);
        let mut cursor = n.walk();
        let kids: Vec<_> = n.children(&mut cursor).collect();
        for kid in kids.into_iter().rev() {
            stack.push(kid);
        }
    }
}

/// True if the subtree rooted at `node` contains an `ERROR` or `MISSING`
/// node (tree-sitter's own error-recovery markers).
pub fn has_error(node: Node) -> bool {
    let mut found = false;
    dfs(node, |n| {
        if n.is_error() || n.is_missing() {
            found = true;
        }
    });
    found
}

/// Recursively collect every `identifier`-kind leaf under `node`, in
/// left-to-right order.
pub fn collect_identifiers<'a>(node: Node<'a>, source: &'a [u8], out: &mut Vec<String>) {
    dfs(node, |n| {
        if n.kind() == "identifier" {
            out.push(source_text(n, source).to_string());
        }
    });
}
