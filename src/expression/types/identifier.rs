//! Unique-identifier type

use uuid::Uuid;

use super::{ExpressionType, FunctionCall, FunctionResult, TypeFunction};
use crate::model::Value;

/// `Uuid.parse(text)`, `Uuid.new()`
pub struct UuidType;

impl ExpressionType for UuidType {
    fn name(&self) -> &'static str {
        "Uuid"
    }

    fn functions(&self) -> Vec<TypeFunction> {
        vec![
            TypeFunction::new("parse", 1, parse),
            TypeFunction::new("new", 0, |_| Ok(Value::Uuid(Uuid::new_v4()))),
        ]
    }

    fn documentation(&self) -> &'static str {
        "Unique identifiers in hyphenated or simple form"
    }
}

fn parse(call: &FunctionCall<'_>) -> FunctionResult<Value> {
    match call.arg(0) {
        Value::Uuid(id) => Ok(Value::Uuid(*id)),
        Value::String(text) => Uuid::parse_str(text.trim())
            .map(Value::Uuid)
            .map_err(|e| call.error(e.to_string())),
        other => Err(call.type_error(0, "String", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::types::TypeVocabulary;

    #[test]
    fn test_parse() {
        let vocabulary = TypeVocabulary::standard();
        let parse = vocabulary.bind("Uuid", "parse", 1).unwrap();
        let text = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        assert_eq!(
            parse.invoke(&[Value::from(text)]).unwrap(),
            Value::Uuid(Uuid::parse_str(text).unwrap())
        );
        assert!(parse.invoke(&[Value::from("nope")]).is_err());
        assert!(parse.invoke(&[Value::Integer(1)]).is_err());
    }

    #[test]
    fn test_new_is_random() {
        let vocabulary = TypeVocabulary::standard();
        let new = vocabulary.bind("Uuid", "new", 0).unwrap();
        assert_ne!(new.invoke(&[]).unwrap(), new.invoke(&[]).unwrap());
    }
}
