//! The view component trait

use super::context::RenderContext;
use super::dispatcher::ViewRenderer;
use super::element::{Element, QualifiedName};
use super::error::RenderResult;
use super::writer::MarkupWriter;

/// A renderer bound to one element name
///
/// Components are stateless and shared by every render operation; anything a
/// render needs to remember belongs on the [`RenderContext`].
pub trait ViewComponent: Send + Sync {
    /// The element name this component handles; a local name of
    /// [`ANY_LOCAL_NAME`](super::ANY_LOCAL_NAME) claims the whole namespace
    fn element_name(&self) -> QualifiedName;

    /// Check that the element is usable before it is rendered
    fn validate(&self, element: &Element, context: &RenderContext<'_>) -> bool;

    /// Render the element; children go back through `renderer`
    fn render(
        &self,
        element: &Element,
        renderer: &ViewRenderer<'_>,
        writer: &mut MarkupWriter<'_>,
        context: &RenderContext<'_>,
    ) -> RenderResult<()>;
}
