// Error types for repository lookup and reference resolution

use thiserror::Error;

use crate::model::DefinitionKind;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors raised by a metadata repository
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// No definition of this kind carries the identifier
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// Requested kind
        kind: DefinitionKind,
        /// Requested identifier
        id: String,
    },

    /// The definition document could not be read
    #[error("invalid definition document: {0}")]
    Format(#[from] serde_json::Error),
}

/// Errors that abort a resolution pass
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The repository could not supply a referenced definition
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// A reference chain revisits a definition, or nesting exceeded the depth bound
    #[error("reference cycle detected: {}", chain.join(" -> "))]
    CycleDetected {
        /// Identifiers along the offending chain, in visiting order
        chain: Vec<String>,
    },

    /// The repository returned a definition of another kind
    #[error("expected {expected} '{id}', repository returned a {actual}")]
    KindMismatch {
        /// Requested identifier
        id: String,
        /// Kind that was requested
        expected: DefinitionKind,
        /// Kind that came back
        actual: DefinitionKind,
    },
}
