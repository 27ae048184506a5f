use super::XHTML_NAMESPACE;
use crate::render::{
    ANY_LOCAL_NAME, Element, MarkupWriter, QualifiedName, RenderContext, RenderResult, ViewComponent, ViewRenderer,
};

/// Copies any XHTML element to the output
///
/// Attribute values written as `{expr}` are replaced by the evaluated
/// expression; everything else is copied verbatim.
#[derive(Debug, Default)]
pub struct MarkupComponent;

impl ViewComponent for MarkupComponent {
    fn element_name(&self) -> QualifiedName {
        QualifiedName::new(XHTML_NAMESPACE, ANY_LOCAL_NAME)
    }

    fn validate(&self, _element: &Element, _context: &RenderContext<'_>) -> bool {
        true
    }

    fn render(
        &self,
        element: &Element,
        renderer: &ViewRenderer<'_>,
        writer: &mut MarkupWriter<'_>,
        context: &RenderContext<'_>,
    ) -> RenderResult<()> {
        let mut attributes = Vec::with_capacity(element.attributes.len());
        for (name, value) in &element.attributes {
            let value = match bound_expression(value) {
                Some(expr) => renderer.evaluate(element, context, expr)?.to_string(),
                None => value.clone(),
            };
            attributes.push((name.as_str(), value));
        }
        let attributes: Vec<(&str, &str)> = attributes
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
            .collect();

        let name = element.name.local.as_str();
        if element.children.is_empty() {
            return writer.empty_element(name, &attributes);
        }
        writer.start_element(name, &attributes)?;
        renderer.render_children(element, writer, context)?;
        writer.end_element(name)
    }
}

fn bound_expression(value: &str) -> Option<&str> {
    value
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .map(str::trim)
        .filter(|expr| !expr.is_empty())
}
