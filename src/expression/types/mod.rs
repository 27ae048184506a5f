//! Type vocabulary available to compiled expressions
//!
//! A vocabulary maps type names (`Uuid`, `Timestamp`, `Duration`, ...) to the
//! static functions callable as `Type.function(args)`. Calls are bound once,
//! at compile time; the vocabulary counts those bindings.

mod duration;
mod identifier;
mod math;
mod text;
mod timestamp;

pub use duration::DurationType;
pub use identifier::UuidType;
pub use math::MathType;
pub use text::TextType;
pub use timestamp::TimestampType;

use std::sync::atomic::{AtomicUsize, Ordering};

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::model::Value;

/// Result type for vocabulary functions
pub type FunctionResult<T> = Result<T, FunctionError>;

/// Vocabulary binding and invocation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FunctionError {
    /// No type registered under the name
    #[error("unknown type '{name}'")]
    UnknownType {
        /// Type name
        name: String,
    },

    /// Type has no such function
    #[error("type '{type_name}' has no function '{name}'")]
    UnknownFunction {
        /// Type name
        type_name: String,
        /// Function name
        name: String,
    },

    /// Invalid number of arguments
    #[error("function '{name}' expects {min}-{max} arguments, got {actual}")]
    InvalidArity {
        /// Qualified function name
        name: String,
        /// Minimum arguments
        min: usize,
        /// Maximum arguments
        max: usize,
        /// Actual arguments provided
        actual: usize,
    },

    /// Invalid argument type
    #[error("function '{name}' argument {index} expects {expected}, got {actual}")]
    InvalidArgumentType {
        /// Qualified function name
        name: String,
        /// Argument index
        index: usize,
        /// Expected type
        expected: &'static str,
        /// Actual type
        actual: &'static str,
    },

    /// Runtime evaluation error
    #[error("function '{name}' evaluation error: {message}")]
    EvaluationError {
        /// Qualified function name
        name: String,
        /// Error message
        message: String,
    },
}

/// Native implementation of a vocabulary function
pub type NativeFunction = fn(&FunctionCall<'_>) -> FunctionResult<Value>;

/// One invocation of a vocabulary function
pub struct FunctionCall<'a> {
    /// Qualified name, `Type.function`
    pub name: &'a str,
    /// Evaluated arguments
    pub args: &'a [Value],
}

impl FunctionCall<'_> {
    /// Argument at `index`; arity is checked at bind time
    pub fn arg(&self, index: usize) -> &Value {
        static ABSENT: Value = Value::Empty;
        self.args.get(index).unwrap_or(&ABSENT)
    }

    /// String argument
    pub fn string(&self, index: usize) -> FunctionResult<&str> {
        let value = self.arg(index);
        value.as_str().ok_or_else(|| self.type_error(index, "String", value))
    }

    /// Integer argument; whole decimals are accepted
    pub fn integer(&self, index: usize) -> FunctionResult<i64> {
        let value = self.arg(index);
        value
            .as_integer()
            .ok_or_else(|| self.type_error(index, "Integer", value))
    }

    /// Build an argument type error
    pub fn type_error(&self, index: usize, expected: &'static str, value: &Value) -> FunctionError {
        FunctionError::InvalidArgumentType {
            name: self.name.to_string(),
            index,
            expected,
            actual: value.type_name(),
        }
    }

    /// Build a runtime error
    pub fn error(&self, message: impl Into<String>) -> FunctionError {
        FunctionError::EvaluationError {
            name: self.name.to_string(),
            message: message.into(),
        }
    }
}

/// A function exposed by an [`ExpressionType`]
#[derive(Debug, Clone, Copy)]
pub struct TypeFunction {
    /// Function name
    pub name: &'static str,
    /// Minimum number of arguments
    pub min_arity: usize,
    /// Maximum number of arguments
    pub max_arity: usize,
    /// Implementation
    pub implementation: NativeFunction,
}

impl TypeFunction {
    /// Function taking exactly `arity` arguments
    pub const fn new(name: &'static str, arity: usize, implementation: NativeFunction) -> Self {
        Self {
            name,
            min_arity: arity,
            max_arity: arity,
            implementation,
        }
    }

    /// Function taking between `min` and `max` arguments
    pub const fn variadic(
        name: &'static str,
        min: usize,
        max: usize,
        implementation: NativeFunction,
    ) -> Self {
        Self {
            name,
            min_arity: min,
            max_arity: max,
            implementation,
        }
    }
}

/// A type whose static functions are callable from expressions
pub trait ExpressionType: Send + Sync {
    /// Name used in expressions
    fn name(&self) -> &'static str;

    /// Functions exposed by the type
    fn functions(&self) -> Vec<TypeFunction>;

    /// Documentation for the type
    fn documentation(&self) -> &'static str {
        ""
    }
}

/// A function bound at compile time
#[derive(Debug, Clone)]
pub struct BoundFunction {
    qualified_name: String,
    function: TypeFunction,
}

impl BoundFunction {
    /// Qualified name, `Type.function`
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Invoke with evaluated arguments; any absent argument yields an absent result
    pub fn invoke(&self, args: &[Value]) -> FunctionResult<Value> {
        if args.iter().any(Value::is_empty) {
            return Ok(Value::Empty);
        }
        (self.function.implementation)(&FunctionCall {
            name: &self.qualified_name,
            args,
        })
    }
}

/// Registry of expression types
pub struct TypeVocabulary {
    types: FxHashMap<&'static str, FxHashMap<&'static str, TypeFunction>>,
    bindings: AtomicUsize,
}

impl std::fmt::Debug for TypeVocabulary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.types.keys().collect();
        names.sort();
        f.debug_struct("TypeVocabulary")
            .field("types", &names)
            .field("bindings", &self.bindings())
            .finish()
    }
}

impl Default for TypeVocabulary {
    fn default() -> Self {
        Self::standard()
    }
}

impl TypeVocabulary {
    /// Create an empty vocabulary
    pub fn empty() -> Self {
        Self {
            types: FxHashMap::default(),
            bindings: AtomicUsize::new(0),
        }
    }

    /// Vocabulary with the unique-identifier, timestamp, duration, text and math types
    pub fn standard() -> Self {
        let mut vocabulary = Self::empty();
        vocabulary.register(UuidType);
        vocabulary.register(TimestampType);
        vocabulary.register(DurationType);
        vocabulary.register(TextType);
        vocabulary.register(MathType);
        vocabulary
    }

    /// Register a type; a later registration under the same name replaces the earlier one
    pub fn register(&mut self, expression_type: impl ExpressionType) {
        let name = expression_type.name();
        let functions = expression_type
            .functions()
            .into_iter()
            .map(|f| (f.name, f))
            .collect();
        if self.types.insert(name, functions).is_some() {
            log::warn!("expression type '{name}' registered twice; keeping the later one");
        }
    }

    /// Check if a type is registered
    pub fn contains_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Bind a call site to a function, checking arity
    pub fn bind(&self, type_name: &str, function: &str, arity: usize) -> FunctionResult<BoundFunction> {
        let functions = self
            .types
            .get(type_name)
            .ok_or_else(|| FunctionError::UnknownType {
                name: type_name.to_string(),
            })?;
        let found = functions
            .get(function)
            .ok_or_else(|| FunctionError::UnknownFunction {
                type_name: type_name.to_string(),
                name: function.to_string(),
            })?;
        let qualified_name = format!("{type_name}.{function}");
        if arity < found.min_arity || arity > found.max_arity {
            return Err(FunctionError::InvalidArity {
                name: qualified_name,
                min: found.min_arity,
                max: found.max_arity,
                actual: arity,
            });
        }

        self.bindings.fetch_add(1, Ordering::Relaxed);
        Ok(BoundFunction {
            qualified_name,
            function: *found,
        })
    }

    /// Number of successful bindings since creation
    pub fn bindings(&self) -> usize {
        self.bindings.load(Ordering::Relaxed)
    }
}
