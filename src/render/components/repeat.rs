use super::{has_required, view_name};
use crate::render::{
    Element, MarkupWriter, QualifiedName, RenderContext, RenderError, RenderResult, ViewComponent,
    ViewRenderer,
};

/// `<repeat source="...">`: renders its children once per dataset row
///
/// Children see the row first, then the dataset's execution metadata
/// (`query`, `startTime`, `elapsed`, ...), then the enclosing scopes.
/// A dataset's rows can be read once per render.
#[derive(Debug, Default)]
pub struct RepeatComponent;

impl ViewComponent for RepeatComponent {
    fn element_name(&self) -> QualifiedName {
        view_name("repeat")
    }

    fn validate(&self, element: &Element, _context: &RenderContext<'_>) -> bool {
        has_required(element, "source")
    }

    fn render(
        &self,
        element: &Element,
        renderer: &ViewRenderer<'_>,
        writer: &mut MarkupWriter<'_>,
        context: &RenderContext<'_>,
    ) -> RenderResult<()> {
        let source = element.attribute("source").unwrap_or_default();
        let entry = context
            .dataset(source)
            .ok_or_else(|| RenderError::UnknownDataset {
                name: source.to_string(),
                path: element.path.clone(),
            })?;

        let rows = entry.result().take_rows()?;
        let metadata = context.child(entry.as_scope());
        let mut count = 0usize;
        for row in rows {
            let row_context = metadata.child(&row);
            renderer.render_children(element, writer, &row_context)?;
            count += 1;
        }
        log::trace!("repeat over '{source}' rendered {count} rows");
        Ok(())
    }
}
