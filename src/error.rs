use thiserror::Error;

pub type CoreResult<T, E = CoreError> = Result<T, E>;

/// Error kinds from the failure-semantics design: construction and dataflow
/// each fail deterministically rather than panicking.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("parser not ready: {0}")]
    ParserNotReady(String),

    #[error("syntax tree has an ERROR/MISSING node at byte {byte}: {context}")]
    SyntaxTreeHasError { byte: usize, context: String },

    #[error("missing required field `{field}` on node `{node_kind}`")]
    MissingField {
        field: &'static str,
        node_kind: String,
    },

    #[error("{jump} has no enclosing target ({context})")]
    MissingJumpTarget { jump: &'static str, context: String },

    #[error("reaching-definitions solver did not converge after {iterations} iterations")]
    DataflowDidNotConverge { iterations: usize },
}
