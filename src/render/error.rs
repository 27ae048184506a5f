//! Render error types

use thiserror::Error;

use crate::error::ViewValidationError;
use crate::expression::ExpressionError;
use crate::result::ResultError;

/// Result type for rendering
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised while parsing or rendering a view
#[derive(Error, Debug)]
pub enum RenderError {
    /// View markup could not be read, or output could not be written
    #[error("markup error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// View markup is well-formed XML but not a valid view
    #[error("malformed view: {message}")]
    Malformed {
        /// What is wrong
        message: String,
    },

    /// An element failed validation (diagnostics mode)
    #[error(transparent)]
    Validation(#[from] ViewValidationError),

    /// An expression bound to an element failed
    #[error("at {path}: {source}")]
    Expression {
        /// Path of the element holding the expression
        path: String,
        /// Underlying failure
        #[source]
        source: ExpressionError,
    },

    /// A component referenced a dataset the report did not produce
    #[error("at {path}: no dataset named '{name}'")]
    UnknownDataset {
        /// Dataset name
        name: String,
        /// Path of the referencing element
        path: String,
    },

    /// An attribute value is not usable
    #[error("at {path}: invalid {attribute} '{value}': {message}")]
    InvalidAttribute {
        /// Attribute name
        attribute: String,
        /// Attribute value
        value: String,
        /// Path of the element
        path: String,
        /// What is wrong
        message: String,
    },

    /// Result rows could not be read
    #[error(transparent)]
    Result(#[from] ResultError),
}

impl RenderError {
    /// Create a malformed-view error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}
