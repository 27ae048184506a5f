//! Report expression language
//!
//! Small expressions bound to view elements (`expr`, `test` and `{...}`
//! attribute values). Evaluation goes through [`ExpressionEvaluator`], which
//! takes a scope-chain fast path for bare identifiers and compiles everything
//! else once per render scope.

#![warn(missing_docs)]

pub mod ast;
pub mod compiler;
pub mod error;
pub mod evaluator;
pub mod operators;
pub mod parser;
pub mod scope;
pub mod tokenizer;
pub mod types;

pub use ast::{BinaryOperator, ExpressionNode, UnaryOperator};
pub use compiler::{CompiledExpression, ExpressionCompiler};
pub use error::{EvalFailure, ExpressionError, ExpressionResult, ParseError};
pub use evaluator::{EXPRESSION_CACHE_TAG, ExpressionEvaluator, is_simple_identifier};
pub use parser::parse_expression;
pub use scope::{EmptyScope, ScopedObject};
pub use types::{ExpressionType, FunctionError, TypeFunction, TypeVocabulary};
