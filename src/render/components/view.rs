use super::view_name;
use crate::render::{
    Element, MarkupWriter, QualifiedName, RenderContext, RenderResult, ViewComponent, ViewRenderer,
};

/// `<view>`: document root, renders its children
#[derive(Debug, Default)]
pub struct ViewRootComponent;

impl ViewComponent for ViewRootComponent {
    fn element_name(&self) -> QualifiedName {
        view_name("view")
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
        renderer.render_children(element, writer, context)
    }
}
