//! Math type

use rust_decimal::RoundingStrategy;

use super::{ExpressionType, FunctionCall, FunctionResult, TypeFunction};
use crate::model::Value;

/// `Math.round(x[, places])`, `Math.abs(x)`
pub struct MathType;

impl ExpressionType for MathType {
    fn name(&self) -> &'static str {
        "Math"
    }

    fn functions(&self) -> Vec<TypeFunction> {
        vec![
            TypeFunction::variadic("round", 1, 2, round),
            TypeFunction::new("abs", 1, abs),
        ]
    }

    fn documentation(&self) -> &'static str {
        "Numeric helpers; rounding is half away from zero"
    }
}

fn round(call: &FunctionCall<'_>) -> FunctionResult<Value> {
    let places = if call.args.len() > 1 {
        let places = call.integer(1)?;
        u32::try_from(places).map_err(|_| call.error(format!("invalid precision {places}")))?
    } else {
        0
    };
    match call.arg(0) {
        Value::Integer(i) => Ok(Value::Integer(*i)),
        Value::Decimal(d) => Ok(Value::Decimal(
            d.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero),
        )),
        other => Err(call.type_error(0, "Decimal", other)),
    }
}

fn abs(call: &FunctionCall<'_>) -> FunctionResult<Value> {
    match call.arg(0) {
        Value::Integer(i) => i
            .checked_abs()
            .map(Value::Integer)
            .ok_or_else(|| call.error("integer overflow")),
        Value::Decimal(d) => Ok(Value::Decimal(d.abs())),
        Value::Duration(d) => Ok(Value::Duration(d.abs())),
        other => Err(call.type_error(0, "Decimal", other)),
    }
}
