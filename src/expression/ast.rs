//! Expression syntax tree

use std::fmt;

use crate::model::Value;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// `or`
    Or,
    /// `and`
    And,
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `&`
    Concatenate,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Modulo,
}

impl BinaryOperator {
    /// Source symbol of the operator
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Or => "or",
            Self::And => "and",
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Concatenate => "&",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// Arithmetic negation
    Negate,
    /// Logical negation
    Not,
}

impl UnaryOperator {
    /// Source symbol of the operator
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Negate => "-",
            Self::Not => "not",
        }
    }
}

/// Parsed expression
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionNode {
    /// Constant value
    Literal(Value),

    /// Key looked up on the current scope object
    Identifier(String),

    /// Member access on an object value
    Member {
        /// Expression producing the object
        target: Box<ExpressionNode>,
        /// Member name
        member: String,
    },

    /// Vocabulary call, `Type.function(args)`
    Call {
        /// Type name
        type_name: String,
        /// Function name
        function: String,
        /// Arguments in call order
        args: Vec<ExpressionNode>,
    },

    /// Binary operation
    Binary {
        /// Operator
        op: BinaryOperator,
        /// Left operand
        left: Box<ExpressionNode>,
        /// Right operand
        right: Box<ExpressionNode>,
    },

    /// Unary operation
    Unary {
        /// Operator
        op: UnaryOperator,
        /// Operand
        operand: Box<ExpressionNode>,
    },
}

impl ExpressionNode {
    /// Create a literal node
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Create an identifier node
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    /// Create a member access node
    pub fn member(target: ExpressionNode, member: impl Into<String>) -> Self {
        Self::Member {
            target: Box::new(target),
            member: member.into(),
        }
    }

    /// Create a binary operation node
    pub fn binary(op: BinaryOperator, left: ExpressionNode, right: ExpressionNode) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create a unary operation node
    pub fn unary(op: UnaryOperator, operand: ExpressionNode) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }
}
