//! Compiles expression syntax trees into closure programs
//!
//! Vocabulary calls are bound while compiling, so a compiled expression never
//! consults the vocabulary again.

use std::fmt;

use super::ast::{BinaryOperator, ExpressionNode};
use super::error::{EvalFailure, EvalResult, ExpressionError, ExpressionResult};
use super::operators::{apply_binary, apply_unary};
use super::parser::parse_expression;
use super::scope::ScopedObject;
use super::types::TypeVocabulary;
use crate::model::Value;

type Program = Box<dyn Fn(&dyn ScopedObject) -> EvalResult<Value> + Send + Sync>;

/// A compiled expression, evaluated against one scope object
pub struct CompiledExpression {
    source: String,
    program: Program,
}

impl fmt::Debug for CompiledExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledExpression")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl CompiledExpression {
    /// Source text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Run against a scope; field references see this scope only
    pub fn evaluate(&self, scope: &dyn ScopedObject) -> ExpressionResult<Value> {
        (self.program)(scope).map_err(|source| ExpressionError::Evaluation {
            expression: self.source.clone(),
            source,
        })
    }
}

/// Expression compiler over a type vocabulary
pub struct ExpressionCompiler<'v> {
    vocabulary: &'v TypeVocabulary,
}

impl<'v> ExpressionCompiler<'v> {
    /// Create a compiler
    pub fn new(vocabulary: &'v TypeVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Parse and compile expression text
    pub fn compile(&self, source: &str) -> ExpressionResult<CompiledExpression> {
        let ast = parse_expression(source)
            .map_err(|e| ExpressionError::compile(source, e.to_string()))?;
        let program = self.compile_node(ast, source)?;
        Ok(CompiledExpression {
            source: source.to_string(),
            program,
        })
    }

    fn compile_node(&self, node: ExpressionNode, source: &str) -> ExpressionResult<Program> {
        let program: Program = match node {
            ExpressionNode::Literal(value) => {
                Box::new(move |_: &dyn ScopedObject| Ok(value.clone()))
            }

            ExpressionNode::Identifier(name) => {
                Box::new(move |scope: &dyn ScopedObject| {
                    Ok(scope.try_get(&name).unwrap_or_default())
                })
            }

            ExpressionNode::Member { target, member } => {
                let target = self.compile_node(*target, source)?;
                Box::new(move |scope: &dyn ScopedObject| match target(scope)? {
                    Value::Empty => Ok(Value::Empty),
                    Value::Object(record) => Ok(record.get(&member).cloned().unwrap_or_default()),
                    other => Err(EvalFailure::InvalidMember {
                        member: member.clone(),
                        type_name: other.type_name(),
                    }),
                })
            }

            ExpressionNode::Call {
                type_name,
                function,
                args,
            } => {
                let bound = self
                    .vocabulary
                    .bind(&type_name, &function, args.len())
                    .map_err(|e| ExpressionError::compile(source, e.to_string()))?;
                let args = args
                    .into_iter()
                    .map(|arg| self.compile_node(arg, source))
                    .collect::<ExpressionResult<Vec<_>>>()?;
                Box::new(move |scope: &dyn ScopedObject| {
                    let values = args
                        .iter()
                        .map(|arg| arg(scope))
                        .collect::<EvalResult<Vec<_>>>()?;
                    Ok(bound.invoke(&values)?)
                })
            }

            ExpressionNode::Binary { op, left, right } => {
                let left = self.compile_node(*left, source)?;
                let right = self.compile_node(*right, source)?;
                match op {
                    BinaryOperator::And => Box::new(move |scope: &dyn ScopedObject| {
                        Ok(Value::Boolean(
                            left(scope)?.is_truthy() && right(scope)?.is_truthy(),
                        ))
                    }),
                    BinaryOperator::Or => Box::new(move |scope: &dyn ScopedObject| {
                        Ok(Value::Boolean(
                            left(scope)?.is_truthy() || right(scope)?.is_truthy(),
                        ))
                    }),
                    op => Box::new(move |scope: &dyn ScopedObject| {
                        apply_binary(op, &left(scope)?, &right(scope)?)
                    }),
                }
            }

            ExpressionNode::Unary { op, operand } => {
                let operand = self.compile_node(*operand, source)?;
                Box::new(move |scope: &dyn ScopedObject| apply_unary(op, &operand(scope)?))
            }
        };
        Ok(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::types::FunctionError;
    use crate::model::Record;
    use pretty_assertions::assert_eq;

    fn scope() -> Record {
        let mut record = Record::new();
        record.insert("a".to_string(), Value::Integer(2));
        record.insert("b".to_string(), Value::Integer(3));
        record.insert(
            "order".to_string(),
            Value::object([("total", Value::Integer(40))]),
        );
        record
    }

    fn eval(source: &str) -> ExpressionResult<Value> {
        let vocabulary = TypeVocabulary::standard();
        ExpressionCompiler::new(&vocabulary)
            .compile(source)?
            .evaluate(&scope())
    }

    #[test]
    fn test_arithmetic_over_scope() {
        assert_eq!(eval("a + b * 2").unwrap(), Value::Integer(8));
        assert_eq!(eval("order.total - a").unwrap(), Value::Integer(38));
        assert_eq!(eval("missing + 1").unwrap(), Value::Empty);
        assert_eq!(eval("order.missing").unwrap(), Value::Empty);
    }

    #[test]
    fn test_logical_short_circuit() {
        // The right operand would fail if evaluated
        assert_eq!(eval("a > 1 or 1 / 0").unwrap(), Value::Boolean(true));
        assert_eq!(eval("a < 1 and 1 / 0").unwrap(), Value::Boolean(false));
    }

    #[test]
    fn test_vocabulary_calls() {
        assert_eq!(
            eval("Duration.hours(a) + Duration.minutes(30)").unwrap(),
            Value::Duration(chrono::TimeDelta::minutes(150))
        );
        assert_eq!(eval("Text.upper('x' & b)").unwrap(), Value::from("X3"));
    }

    #[test]
    fn test_compile_errors_name_the_text() {
        let err = eval("Color.red()").unwrap_err();
        assert!(matches!(err, ExpressionError::Compile { ref expression, .. } if expression == "Color.red()"));
        assert!(matches!(eval("a +"), Err(ExpressionError::Compile { .. })));
        assert!(matches!(eval("Duration.days()"), Err(ExpressionError::Compile { .. })));
    }

    #[test]
    fn test_evaluation_errors_wrap_the_cause() {
        assert_eq!(
            eval("a / 0").unwrap_err(),
            ExpressionError::Evaluation {
                expression: "a / 0".to_string(),
                source: EvalFailure::DivisionByZero,
            }
        );
        assert!(matches!(
            eval("a.b"),
            Err(ExpressionError::Evaluation {
                source: EvalFailure::InvalidMember { .. },
                ..
            })
        ));
        assert!(matches!(
            eval("Uuid.parse('nope')"),
            Err(ExpressionError::Evaluation {
                source: EvalFailure::Function(FunctionError::EvaluationError { .. }),
                ..
            })
        ));
    }
}
