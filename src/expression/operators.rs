//! Operator semantics over [`Value`]
//!
//! Integers promote to decimals when mixed. Arithmetic and comparison on an
//! absent operand yield an absent result; `&` treats absent as the empty
//! string; equality never propagates absence.

use std::cmp::Ordering;

use rust_decimal::Decimal;

use super::ast::{BinaryOperator, UnaryOperator};
use super::error::{EvalFailure, EvalResult};
use crate::model::Value;

/// Apply a non-logical binary operator
pub fn apply_binary(op: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
    match op {
        BinaryOperator::Equal => Ok(Value::Boolean(values_equal(left, right))),
        BinaryOperator::NotEqual => Ok(Value::Boolean(!values_equal(left, right))),
        BinaryOperator::Concatenate => Ok(Value::String(format!("{left}{right}"))),
        BinaryOperator::Or => Ok(Value::Boolean(left.is_truthy() || right.is_truthy())),
        BinaryOperator::And => Ok(Value::Boolean(left.is_truthy() && right.is_truthy())),
        _ if left.is_empty() || right.is_empty() => Ok(Value::Empty),
        BinaryOperator::LessThan
        | BinaryOperator::LessThanOrEqual
        | BinaryOperator::GreaterThan
        | BinaryOperator::GreaterThanOrEqual => compare(op, left, right),
        BinaryOperator::Add => add(left, right),
        BinaryOperator::Subtract => subtract(left, right),
        BinaryOperator::Multiply => multiply(left, right),
        BinaryOperator::Divide => divide(left, right),
        BinaryOperator::Modulo => modulo(left, right),
    }
}

/// Apply a unary operator
pub fn apply_unary(op: UnaryOperator, operand: &Value) -> EvalResult<Value> {
    match (op, operand) {
        (UnaryOperator::Not, value) => Ok(Value::Boolean(!value.is_truthy())),
        (UnaryOperator::Negate, Value::Empty) => Ok(Value::Empty),
        (UnaryOperator::Negate, Value::Integer(i)) => i
            .checked_neg()
            .map(Value::Integer)
            .ok_or(EvalFailure::Overflow { operator: "-" }),
        (UnaryOperator::Negate, Value::Decimal(d)) => Ok(Value::Decimal(-*d)),
        (UnaryOperator::Negate, Value::Duration(d)) => Ok(Value::Duration(-*d)),
        (op, other) => Err(EvalFailure::InvalidOperand {
            operator: op.symbol(),
            operand: other.type_name(),
        }),
    }
}

/// Value equality with integer/decimal promotion
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Integer(_), Value::Decimal(_)) | (Value::Decimal(_), Value::Integer(_)) => {
            left.as_decimal() == right.as_decimal()
        }
        _ => left == right,
    }
}

fn invalid(op: BinaryOperator, left: &Value, right: &Value) -> EvalFailure {
    EvalFailure::InvalidOperands {
        operator: op.symbol(),
        left: left.type_name(),
        right: right.type_name(),
    }
}

fn overflow(op: BinaryOperator) -> EvalFailure {
    EvalFailure::Overflow {
        operator: op.symbol(),
    }
}

/// Both operands as decimals when at least one is a decimal and both are numeric
fn decimal_pair(left: &Value, right: &Value) -> Option<(Decimal, Decimal)> {
    match (left, right) {
        (Value::Decimal(_), Value::Decimal(_) | Value::Integer(_))
        | (Value::Integer(_), Value::Decimal(_)) => Some((left.as_decimal()?, right.as_decimal()?)),
        _ => None,
    }
}

fn compare(op: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
    let ordering = match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
        (Value::Duration(a), Value::Duration(b)) => a.cmp(b),
        (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
        _ => {
            let (a, b) = decimal_pair(left, right).ok_or_else(|| invalid(op, left, right))?;
            a.cmp(&b)
        }
    };
    let result = match op {
        BinaryOperator::LessThan => ordering == Ordering::Less,
        BinaryOperator::LessThanOrEqual => ordering != Ordering::Greater,
        BinaryOperator::GreaterThan => ordering == Ordering::Greater,
        _ => ordering != Ordering::Less,
    };
    Ok(Value::Boolean(result))
}

fn add(left: &Value, right: &Value) -> EvalResult<Value> {
    let op = BinaryOperator::Add;
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => {
            a.checked_add(*b).map(Value::Integer).ok_or(overflow(op))
        }
        (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{a}{b}"))),
        (Value::Timestamp(ts), Value::Duration(d)) | (Value::Duration(d), Value::Timestamp(ts)) => ts
            .checked_add_signed(*d)
            .map(Value::Timestamp)
            .ok_or(overflow(op)),
        (Value::Duration(a), Value::Duration(b)) => {
            a.checked_add(b).map(Value::Duration).ok_or(overflow(op))
        }
        _ => {
            let (a, b) = decimal_pair(left, right).ok_or_else(|| invalid(op, left, right))?;
            a.checked_add(b).map(Value::Decimal).ok_or(overflow(op))
        }
    }
}

fn subtract(left: &Value, right: &Value) -> EvalResult<Value> {
    let op = BinaryOperator::Subtract;
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => {
            a.checked_sub(*b).map(Value::Integer).ok_or(overflow(op))
        }
        (Value::Timestamp(ts), Value::Duration(d)) => ts
            .checked_sub_signed(*d)
            .map(Value::Timestamp)
            .ok_or(overflow(op)),
        (Value::Timestamp(a), Value::Timestamp(b)) => Ok(Value::Duration(a.signed_duration_since(*b))),
        (Value::Duration(a), Value::Duration(b)) => {
            a.checked_sub(b).map(Value::Duration).ok_or(overflow(op))
        }
        _ => {
            let (a, b) = decimal_pair(left, right).ok_or_else(|| invalid(op, left, right))?;
            a.checked_sub(b).map(Value::Decimal).ok_or(overflow(op))
        }
    }
}

fn multiply(left: &Value, right: &Value) -> EvalResult<Value> {
    let op = BinaryOperator::Multiply;
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => {
            a.checked_mul(*b).map(Value::Integer).ok_or(overflow(op))
        }
        (Value::Duration(d), Value::Integer(n)) | (Value::Integer(n), Value::Duration(d)) => {
            let factor = i32::try_from(*n).map_err(|_| overflow(op))?;
            d.checked_mul(factor).map(Value::Duration).ok_or(overflow(op))
        }
        _ => {
            let (a, b) = decimal_pair(left, right).ok_or_else(|| invalid(op, left, right))?;
            a.checked_mul(b).map(Value::Decimal).ok_or(overflow(op))
        }
    }
}

fn divide(left: &Value, right: &Value) -> EvalResult<Value> {
    let op = BinaryOperator::Divide;
    let (a, b) = match (left, right) {
        (Value::Integer(_), Value::Integer(_)) => (
            left.as_decimal().ok_or_else(|| invalid(op, left, right))?,
            right.as_decimal().ok_or_else(|| invalid(op, left, right))?,
        ),
        _ => decimal_pair(left, right).ok_or_else(|| invalid(op, left, right))?,
    };
    if b.is_zero() {
        return Err(EvalFailure::DivisionByZero);
    }
    a.checked_div(b)
        .map(|q| Value::Decimal(q.normalize()))
        .ok_or(overflow(op))
}

fn modulo(left: &Value, right: &Value) -> EvalResult<Value> {
    let op = BinaryOperator::Modulo;
    match (left, right) {
        (Value::Integer(_), Value::Integer(0)) => Err(EvalFailure::DivisionByZero),
        (Value::Integer(a), Value::Integer(b)) => {
            a.checked_rem(*b).map(Value::Integer).ok_or(overflow(op))
        }
        _ => {
            let (a, b) = decimal_pair(left, right).ok_or_else(|| invalid(op, left, right))?;
            if b.is_zero() {
                return Err(EvalFailure::DivisionByZero);
            }
            a.checked_rem(b).map(Value::Decimal).ok_or(overflow(op))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeDelta};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::str::FromStr;

    fn dec(text: &str) -> Value {
        Value::Decimal(Decimal::from_str(text).unwrap())
    }

    fn ts(text: &str) -> Value {
        Value::Timestamp(DateTime::parse_from_rfc3339(text).unwrap())
    }

    #[rstest]
    #[case(BinaryOperator::Add, Value::Integer(2), Value::Integer(3), Value::Integer(5))]
    #[case(BinaryOperator::Add, Value::Integer(2), dec("0.5"), dec("2.5"))]
    #[case(BinaryOperator::Subtract, dec("1.5"), Value::Integer(1), dec("0.5"))]
    #[case(BinaryOperator::Multiply, Value::Integer(4), Value::Integer(5), Value::Integer(20))]
    #[case(BinaryOperator::Divide, Value::Integer(7), Value::Integer(2), dec("3.5"))]
    #[case(BinaryOperator::Divide, Value::Integer(6), Value::Integer(3), dec("2"))]
    #[case(BinaryOperator::Modulo, Value::Integer(7), Value::Integer(3), Value::Integer(1))]
    #[case(BinaryOperator::Add, Value::from("a"), Value::from("b"), Value::from("ab"))]
    #[case(BinaryOperator::Concatenate, Value::from("n="), Value::Integer(3), Value::from("n=3"))]
    #[case(BinaryOperator::Concatenate, Value::Empty, Value::from("x"), Value::from("x"))]
    #[case(BinaryOperator::Add, Value::Empty, Value::Integer(1), Value::Empty)]
    #[case(BinaryOperator::LessThan, Value::Integer(1), dec("1.5"), Value::Boolean(true))]
    #[case(BinaryOperator::GreaterThanOrEqual, Value::from("b"), Value::from("a"), Value::Boolean(true))]
    #[case(BinaryOperator::Equal, Value::Integer(2), dec("2.0"), Value::Boolean(true))]
    #[case(BinaryOperator::NotEqual, Value::Empty, Value::Integer(0), Value::Boolean(true))]
    #[case(BinaryOperator::LessThan, Value::Empty, Value::Integer(0), Value::Empty)]
    fn test_apply_binary(
        #[case] op: BinaryOperator,
        #[case] left: Value,
        #[case] right: Value,
        #[case] expected: Value,
    ) {
        assert_eq!(apply_binary(op, &left, &right).unwrap(), expected);
    }

    #[test]
    fn test_timestamp_arithmetic() {
        let start = ts("2024-01-01T00:00:00Z");
        let later = apply_binary(
            BinaryOperator::Add,
            &start,
            &Value::Duration(TimeDelta::days(2)),
        )
        .unwrap();
        assert_eq!(later, ts("2024-01-03T00:00:00Z"));
        assert_eq!(
            apply_binary(BinaryOperator::Subtract, &later, &start).unwrap(),
            Value::Duration(TimeDelta::days(2))
        );
        assert_eq!(
            apply_binary(
                BinaryOperator::Multiply,
                &Value::Duration(TimeDelta::hours(1)),
                &Value::Integer(3)
            )
            .unwrap(),
            Value::Duration(TimeDelta::hours(3))
        );
    }

    #[test]
    fn test_failures() {
        assert_eq!(
            apply_binary(BinaryOperator::Divide, &Value::Integer(1), &Value::Integer(0)),
            Err(EvalFailure::DivisionByZero)
        );
        assert_eq!(
            apply_binary(BinaryOperator::Modulo, &Value::Integer(1), &Value::Integer(0)),
            Err(EvalFailure::DivisionByZero)
        );
        assert_eq!(
            apply_binary(BinaryOperator::Add, &Value::Integer(i64::MAX), &Value::Integer(1)),
            Err(EvalFailure::Overflow { operator: "+" })
        );
        assert_eq!(
            apply_binary(BinaryOperator::Subtract, &Value::from("a"), &Value::Integer(1)),
            Err(EvalFailure::InvalidOperands {
                operator: "-",
                left: "String",
                right: "Integer",
            })
        );
    }

    #[test]
    fn test_apply_unary() {
        assert_eq!(
            apply_unary(UnaryOperator::Negate, &Value::Integer(3)).unwrap(),
            Value::Integer(-3)
        );
        assert_eq!(
            apply_unary(UnaryOperator::Not, &Value::Empty).unwrap(),
            Value::Boolean(true)
        );
        assert!(apply_unary(UnaryOperator::Negate, &Value::from("x")).is_err());
    }
}
