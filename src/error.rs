//! Error taxonomy shared across the pipeline

use thiserror::Error;

use crate::model::DefinitionRef;
use crate::render::{QualifiedName, RenderError};
use crate::resolver::{RepositoryError, ResolveError};

/// Boxed error returned by external collaborators (data sources, providers)
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for the top-level pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Resolution or configuration failure tied to a BI definition
#[derive(Error, Debug)]
#[error("{definition}: {source}")]
pub struct BiError {
    /// The definition being resolved when the failure occurred
    pub definition: DefinitionRef,
    /// Underlying cause
    #[source]
    pub source: ResolveError,
}

impl BiError {
    /// Create an error for a definition
    pub fn new(definition: DefinitionRef, source: ResolveError) -> Self {
        Self { definition, source }
    }
}

/// Execution failure within one step of a data flow
#[derive(Error, Debug)]
pub enum DataFlowError {
    /// The step failed with an underlying error
    #[error("step '{step}' failed: {source}")]
    Failed {
        /// Name or identifier of the failing step
        step: String,
        /// Underlying cause
        #[source]
        source: BoxError,
    },

    /// The step failed with an explicit message
    #[error("step '{step}' failed: {message}")]
    Message {
        /// Name or identifier of the failing step
        step: String,
        /// Failure description
        message: String,
    },
}

impl DataFlowError {
    /// Wrap an underlying error with the identity of the failing step
    pub fn failed(step: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Failed {
            step: step.into(),
            source: source.into(),
        }
    }

    /// Create an error with an explicit message
    pub fn message(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Message {
            step: step.into(),
            message: message.into(),
        }
    }

    /// Name or identifier of the failing step
    pub fn step(&self) -> &str {
        match self {
            Self::Failed { step, .. } | Self::Message { step, .. } => step,
        }
    }
}

/// A view element rejected by its component's validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("element '{element}' is invalid at {path}")]
pub struct ViewValidationError {
    /// Qualified name of the offending element
    pub element: QualifiedName,
    /// Root-to-element path of slash-separated element names
    pub path: String,
}

/// Errors surfaced by the top-level report pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// Definition resolution failed
    #[error(transparent)]
    Definition(#[from] BiError),

    /// Definition lookup failed outside of resolution
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Query or indicator execution failed
    #[error(transparent)]
    DataFlow(#[from] DataFlowError),

    /// View rendering failed
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The report has no view with the requested name
    #[error("report '{report}' has no view named '{view}'")]
    ViewNotFound {
        /// Report name or identifier
        report: String,
        /// Requested view
        view: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DefinitionKind;
    use std::error::Error as _;

    #[test]
    fn test_data_flow_error_names_step() {
        let io = std::io::Error::other("connection reset");
        let err = DataFlowError::failed("Monthly sales", io);
        assert_eq!(err.step(), "Monthly sales");
        assert_eq!(err.to_string(), "step 'Monthly sales' failed: connection reset");
        assert!(err.source().is_some());

        let err = DataFlowError::message("q1", "no data source");
        assert_eq!(err.to_string(), "step 'q1' failed: no data source");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_bi_error_surfaces_definition() {
        let err = BiError::new(
            DefinitionRef {
                kind: DefinitionKind::Query,
                id: "q1".to_string(),
                name: None,
            },
            ResolveError::Repository(RepositoryError::NotFound {
                kind: DefinitionKind::Query,
                id: "base".to_string(),
            }),
        );
        assert_eq!(err.to_string(), "query 'q1': query 'base' not found");
    }
}
