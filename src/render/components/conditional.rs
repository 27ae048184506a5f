use super::{has_required, view_name};
use crate::render::{
    Element, MarkupWriter, QualifiedName, RenderContext, RenderResult, ViewComponent, ViewRenderer,
};

/// `<if test="...">`: renders its children when the test is truthy
#[derive(Debug, Default)]
pub struct IfComponent;

impl ViewComponent for IfComponent {
    fn element_name(&self) -> QualifiedName {
        view_name("if")
    }

    fn validate(&self, element: &Element, _context: &RenderContext<'_>) -> bool {
        has_required(element, "test")
    }

    fn render(
        &self,
        element: &Element,
        renderer: &ViewRenderer<'_>,
        writer: &mut MarkupWriter<'_>,
        context: &RenderContext<'_>,
    ) -> RenderResult<()> {
        let test = element.attribute("test").unwrap_or_default();
        if renderer.evaluate(element, context, test)?.is_truthy() {
            renderer.render_children(element, writer, context)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{render, scope};
    use crate::model::Value;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Value::Integer(5), "big")]
    #[case(Value::Integer(2), "")]
    #[case(Value::Empty, "")]
    fn test_if_renders_children_when_truthy(#[case] n: Value, #[case] expected: &str) {
        let html = render(
            r#"<view xmlns="urn:bi-report:view"><if test="n > 3">big</if></view>"#,
            &scope(&[("n", n)]),
        )
        .unwrap();
        assert_eq!(html, expected);
    }
}
