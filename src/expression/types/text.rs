//! Text type

use super::{ExpressionType, TypeFunction};
use crate::model::Value;

/// `Text.upper(s)`, `Text.lower(s)`, `Text.len(s)`
pub struct TextType;

impl ExpressionType for TextType {
    fn name(&self) -> &'static str {
        "Text"
    }

    fn functions(&self) -> Vec<TypeFunction> {
        vec![
            TypeFunction::new("upper", 1, |call| {
                Ok(Value::from(call.string(0)?.to_uppercase()))
            }),
            TypeFunction::new("lower", 1, |call| {
                Ok(Value::from(call.string(0)?.to_lowercase()))
            }),
            TypeFunction::new("len", 1, |call| {
                let count = call.string(0)?.chars().count();
                i64::try_from(count)
                    .map(Value::Integer)
                    .map_err(|_| call.error("length out of range"))
            }),
        ]
    }
}
