use super::{has_required, view_name};
use crate::render::{
    Element, MarkupWriter, QualifiedName, RenderContext, RenderResult, ViewComponent, ViewRenderer,
};

/// `<label key="...">`: writes a translated string
#[derive(Debug, Default)]
pub struct LabelComponent;

impl ViewComponent for LabelComponent {
    fn element_name(&self) -> QualifiedName {
        view_name("label")
    }

    fn validate(&self, element: &Element, _context: &RenderContext<'_>) -> bool {
        has_required(element, "key")
    }

    fn render(
        &self,
        element: &Element,
        renderer: &ViewRenderer<'_>,
        writer: &mut MarkupWriter<'_>,
        _context: &RenderContext<'_>,
    ) -> RenderResult<()> {
        let key = element.attribute("key").unwrap_or_default();
        writer.text(&renderer.localize(key))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::test_support::{render_with, scope};
    use crate::render::{CatalogLocalizer, ViewRenderer, global_registry};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_label_is_localized_with_key_fallback() {
        let localizer = CatalogLocalizer::new("fr-FR").with_string("fr", "total", "Total");
        let renderer = ViewRenderer::new(global_registry()).with_localizer(Arc::new(localizer));
        let html = render_with(
            &renderer,
            r#"<view xmlns="urn:bi-report:view"><label key="total"/>|<label key="region"/></view>"#,
            &scope(&[]),
            None,
        )
        .unwrap();
        assert_eq!(html, "Total|region");
    }
}
