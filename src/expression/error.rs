//! Error types for expression parsing, compilation and evaluation

use thiserror::Error;

use super::types::FunctionError;

/// Result type for parsing
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for compiled programs
pub type EvalResult<T> = Result<T, EvalFailure>;

/// Result type for the public evaluator API
pub type ExpressionResult<T> = Result<T, ExpressionError>;

/// Syntax errors raised by the tokenizer and parser
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Unexpected token
    #[error("unexpected token '{token}' at position {position}")]
    UnexpectedToken {
        /// The unexpected token that was found
        token: String,
        /// Position where the token was found
        position: usize,
    },

    /// Unexpected end of input
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// Expected token
    #[error("expected {expected} at position {position}")]
    ExpectedToken {
        /// The expected token description
        expected: String,
        /// Position where the token was expected
        position: usize,
    },

    /// Unclosed string literal
    #[error("unclosed string literal starting at position {position}")]
    UnclosedString {
        /// Position of the opening quote
        position: usize,
    },

    /// Invalid number literal
    #[error("invalid number '{literal}' at position {position}")]
    InvalidNumber {
        /// The literal text
        literal: String,
        /// Position of the literal
        position: usize,
    },
}

/// Failures raised while a compiled expression runs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalFailure {
    /// Operand types not supported by a binary operator
    #[error("operator '{operator}' cannot be applied to {left} and {right}")]
    InvalidOperands {
        /// Operator symbol
        operator: &'static str,
        /// Type of the left operand
        left: &'static str,
        /// Type of the right operand
        right: &'static str,
    },

    /// Operand type not supported by a unary operator
    #[error("operator '{operator}' cannot be applied to {operand}")]
    InvalidOperand {
        /// Operator symbol
        operator: &'static str,
        /// Type of the operand
        operand: &'static str,
    },

    /// Division or remainder by zero
    #[error("division by zero")]
    DivisionByZero,

    /// Arithmetic result out of range
    #[error("arithmetic overflow in '{operator}'")]
    Overflow {
        /// Operator symbol
        operator: &'static str,
    },

    /// Member access on a value that has no members
    #[error("cannot read member '{member}' of {type_name}")]
    InvalidMember {
        /// Member name
        member: String,
        /// Type of the accessed value
        type_name: &'static str,
    },

    /// A vocabulary function rejected its arguments
    #[error(transparent)]
    Function(#[from] FunctionError),
}

/// Errors surfaced by [`ExpressionEvaluator`](super::ExpressionEvaluator)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    /// The expression text is malformed or binds to an unknown vocabulary entry
    #[error("cannot compile expression '{expression}': {message}")]
    Compile {
        /// The offending expression text
        expression: String,
        /// What went wrong
        message: String,
    },

    /// A compiled expression failed while running
    #[error("evaluation of '{expression}' failed: {source}")]
    Evaluation {
        /// The expression text
        expression: String,
        /// Underlying failure
        #[source]
        source: EvalFailure,
    },
}

impl ExpressionError {
    /// Create a compile error for an expression
    pub fn compile(expression: &str, message: impl Into<String>) -> Self {
        Self::Compile {
            expression: expression.to_string(),
            message: message.into(),
        }
    }

    /// The expression text the error refers to
    pub fn expression(&self) -> &str {
        match self {
            Self::Compile { expression, .. } | Self::Evaluation { expression, .. } => expression,
        }
    }
}
