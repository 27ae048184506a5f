use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};

use super::{has_required, view_name};
use crate::model::Value;
use crate::render::{
    Element, MarkupWriter, QualifiedName, RenderContext, RenderError, RenderResult, ViewComponent,
    ViewRenderer,
};

/// `<value expr="..." format="...">`: writes an evaluated value as text
///
/// `format` is a strftime pattern for timestamps and a number of decimal
/// places for integers and decimals. Other values ignore it.
#[derive(Debug, Default)]
pub struct ValueComponent;

impl ViewComponent for ValueComponent {
    fn element_name(&self) -> QualifiedName {
        view_name("value")
    }

    fn validate(&self, element: &Element, _context: &RenderContext<'_>) -> bool {
        has_required(element, "expr")
    }

    fn render(
        &self,
        element: &Element,
        renderer: &ViewRenderer<'_>,
        writer: &mut MarkupWriter<'_>,
        context: &RenderContext<'_>,
    ) -> RenderResult<()> {
        let expr = element.attribute("expr").unwrap_or_default();
        let value = renderer.evaluate(element, context, expr)?;
        let text = match element.non_empty_attribute("format") {
            Some(format) => format_value(element, &value, format)?,
            None => value.to_string(),
        };
        writer.text(&text)
    }
}

fn format_value(element: &Element, value: &Value, format: &str) -> RenderResult<String> {
    let invalid = |message: &str| RenderError::InvalidAttribute {
        attribute: "format".to_string(),
        value: format.to_string(),
        path: element.path.clone(),
        message: message.to_string(),
    };

    match value {
        Value::Timestamp(ts) => {
            let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
            if items.iter().any(|item| matches!(item, Item::Error)) {
                return Err(invalid("not a valid date format"));
            }
            let mut text = String::new();
            write!(text, "{}", ts.format_with_items(items.into_iter()))
                .map_err(|_| invalid("timestamp cannot be formatted"))?;
            Ok(text)
        }
        Value::Integer(_) | Value::Decimal(_) => {
            let places: u32 = format
                .parse()
                .map_err(|_| invalid("expected a number of decimal places"))?;
            let number = value.as_decimal().unwrap_or_default();
            Ok(format!(
                "{:.*}",
                places as usize,
                number.round_dp_with_strategy(places, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
            ))
        }
        other => Ok(other.to_string()),
    }
}
