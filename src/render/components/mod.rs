//! Built-in view components
//!
//! The view vocabulary lives in [`VIEW_NAMESPACE`]. Elements in the XHTML
//! namespace are copied to the output by a wildcard component.

mod conditional;
mod label;
mod markup;
mod repeat;
mod value;
mod view;

pub use conditional::IfComponent;
pub use label::LabelComponent;
pub use markup::MarkupComponent;
pub use repeat::RepeatComponent;
pub use value::ValueComponent;
pub use view::ViewRootComponent;

use super::element::{Element, QualifiedName};
use super::registry::ComponentRegistryBuilder;

/// Namespace of the view vocabulary
pub const VIEW_NAMESPACE: &str = "urn:bi-report:view";

/// Namespace passed through to the output
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Add every built-in component to a registry builder
pub fn register_builtin_components(builder: ComponentRegistryBuilder) -> ComponentRegistryBuilder {
    builder
        .component::<ViewRootComponent>()
        .component::<RepeatComponent>()
        .component::<ValueComponent>()
        .component::<IfComponent>()
        .component::<LabelComponent>()
        .component::<MarkupComponent>()
}

fn view_name(local: &str) -> QualifiedName {
    QualifiedName::new(VIEW_NAMESPACE, local)
}

fn has_required(element: &Element, attribute: &str) -> bool {
    element.non_empty_attribute(attribute).is_some()
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::model::{Record, Value};
    use crate::render::{
        MarkupWriter, RenderContext, RenderResult, ViewDocument, ViewRenderer, global_registry,
    };
    use crate::result::ResultSet;

    pub fn scope(entries: &[(&str, Value)]) -> Record {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    pub fn render_with(
        renderer: &ViewRenderer<'_>,
        markup: &str,
        scope: &Record,
        datasets: Option<&ResultSet>,
    ) -> RenderResult<String> {
        let mut context = RenderContext::root(scope);
        if let Some(datasets) = datasets {
            context = context.with_datasets(datasets);
        }
        let document = ViewDocument::parse(markup)?;
        let mut out = Vec::new();
        {
            let mut writer = MarkupWriter::new(&mut out);
            renderer.render_document(&document, &mut writer, &context)?;
        }
        Ok(String::from_utf8(out).unwrap_or_default())
    }

    pub fn render(markup: &str, scope: &Record) -> RenderResult<String> {
        let renderer = ViewRenderer::new(global_registry());
        render_with(&renderer, markup, scope, None)
    }
}
