//! Timestamp type

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::{ExpressionType, FunctionCall, FunctionResult, TypeFunction};
use crate::model::Value;

/// `Timestamp.parse(text)`, `Timestamp.now()`
pub struct TimestampType;

impl ExpressionType for TimestampType {
    fn name(&self) -> &'static str {
        "Timestamp"
    }

    fn functions(&self) -> Vec<TypeFunction> {
        vec![
            TypeFunction::new("parse", 1, parse),
            TypeFunction::new("now", 0, |_| Ok(Value::Timestamp(Utc::now().fixed_offset()))),
        ]
    }

    fn documentation(&self) -> &'static str {
        "Points in time; parses RFC 3339, or a date or local date-time taken as UTC"
    }
}

fn parse(call: &FunctionCall<'_>) -> FunctionResult<Value> {
    if let Value::Timestamp(ts) = call.arg(0) {
        return Ok(Value::Timestamp(*ts));
    }
    let text = call.string(0)?.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Ok(Value::Timestamp(ts));
    }
    if let Ok(local) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Value::Timestamp(local.and_utc().fixed_offset()));
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Value::Timestamp(midnight.and_utc().fixed_offset()));
        }
    }
    Err(call.error(format!("'{text}' is not a timestamp")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::types::TypeVocabulary;
    use rstest::rstest;

    #[rstest]
    #[case("2024-03-01T10:30:00+02:00", "2024-03-01T10:30:00+02:00")]
    #[case("2024-03-01T10:30:00", "2024-03-01T10:30:00+00:00")]
    #[case("2024-03-01", "2024-03-01T00:00:00+00:00")]
    fn test_parse(#[case] input: &str, #[case] expected: &str) {
        let vocabulary = TypeVocabulary::standard();
        let parse = vocabulary.bind("Timestamp", "parse", 1).unwrap();
        assert_eq!(
            parse.invoke(&[Value::from(input)]).unwrap(),
            Value::Timestamp(DateTime::parse_from_rfc3339(expected).unwrap())
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let vocabulary = TypeVocabulary::standard();
        let parse = vocabulary.bind("Timestamp", "parse", 1).unwrap();
        assert!(parse.invoke(&[Value::from("yesterday")]).is_err());
    }
}
