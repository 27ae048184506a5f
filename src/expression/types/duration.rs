//! Duration type

use chrono::TimeDelta;

use super::{ExpressionType, FunctionCall, FunctionResult, TypeFunction};
use crate::model::Value;

/// `Duration.days(n)`, `Duration.hours(n)`, `Duration.minutes(n)`, `Duration.seconds(n)`
pub struct DurationType;

impl ExpressionType for DurationType {
    fn name(&self) -> &'static str {
        "Duration"
    }

    fn functions(&self) -> Vec<TypeFunction> {
        vec![
            TypeFunction::new("days", 1, |call| span(call, TimeDelta::try_days)),
            TypeFunction::new("hours", 1, |call| span(call, TimeDelta::try_hours)),
            TypeFunction::new("minutes", 1, |call| span(call, TimeDelta::try_minutes)),
            TypeFunction::new("seconds", 1, |call| span(call, TimeDelta::try_seconds)),
        ]
    }

    fn documentation(&self) -> &'static str {
        "Signed spans of time built from whole units"
    }
}

fn span(call: &FunctionCall<'_>, build: fn(i64) -> Option<TimeDelta>) -> FunctionResult<Value> {
    let amount = call.integer(0)?;
    build(amount)
        .map(Value::Duration)
        .ok_or_else(|| call.error(format!("{amount} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::types::TypeVocabulary;
    use rstest::rstest;

    #[rstest]
    #[case("days", 2, TimeDelta::days(2))]
    #[case("hours", -3, TimeDelta::hours(-3))]
    #[case("minutes", 90, TimeDelta::minutes(90))]
    #[case("seconds", 5, TimeDelta::seconds(5))]
    fn test_units(#[case] unit: &str, #[case] amount: i64, #[case] expected: TimeDelta) {
        let vocabulary = TypeVocabulary::standard();
        let function = vocabulary.bind("Duration", unit, 1).unwrap();
        assert_eq!(
            function.invoke(&[Value::Integer(amount)]).unwrap(),
            Value::Duration(expected)
        );
    }

    #[test]
    fn test_out_of_range() {
        let vocabulary = TypeVocabulary::standard();
        let days = vocabulary.bind("Duration", "days", 1).unwrap();
        assert!(days.invoke(&[Value::Integer(i64::MAX)]).is_err());
        assert!(days.invoke(&[Value::from("two")]).is_err());
    }
}
