//! Component dispatch, validation modes and missing components

mod common;

use bi_report::model::Value;
use bi_report::render::{
    Element, QualifiedName, VIEW_ERROR_CLASS, ViewDocument, global_registry,
};
use bi_report::{
    ComponentRegistry, MarkupWriter, RenderContext, RenderError, RenderMode, ViewComponent,
    ViewRenderer,
};
use common::record;
use pretty_assertions::assert_eq;

/// Renders its children inside an element of the same local name
struct Container(&'static str);

impl ViewComponent for Container {
    fn element_name(&self) -> QualifiedName {
        QualifiedName::local(self.0)
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
    ) -> bi_report::render::RenderResult<()> {
        writer.start_element(self.0, &[])?;
        renderer.render_children(element, writer, context)?;
        writer.end_element(self.0)
    }
}

/// `<row id="...">`; invalid without an id
struct Row;

impl ViewComponent for Row {
    fn element_name(&self) -> QualifiedName {
        QualifiedName::local("row")
    }

    fn validate(&self, element: &Element, _context: &RenderContext<'_>) -> bool {
        element.non_empty_attribute("id").is_some()
    }

    fn render(
        &self,
        element: &Element,
        _renderer: &ViewRenderer<'_>,
        writer: &mut MarkupWriter<'_>,
        _context: &RenderContext<'_>,
    ) -> bi_report::render::RenderResult<()> {
        let id = element.attribute("id").unwrap_or_default();
        writer.empty_element("row", &[("id", id)])
    }
}

fn registry() -> ComponentRegistry {
    ComponentRegistry::builder()
        .with(Container("report"))
        .with(Container("table"))
        .with(Row)
        .build()
}

fn render(registry: &ComponentRegistry, mode: RenderMode, markup: &str) -> Result<String, RenderError> {
    let scope = record(&[("name", Value::from("Ada"))]);
    let context = RenderContext::root(&scope);
    let renderer = ViewRenderer::new(registry).with_mode(mode);
    let mut out = Vec::new();
    renderer.render(markup, &mut out, &context)?;
    Ok(String::from_utf8(out).expect("utf-8 output"))
}

#[test]
fn test_valid_tree_renders_in_document_order() {
    let html = render(
        &registry(),
        RenderMode::Diagnostics,
        r#"<report><table><row id="1"/><row id="2"/></table></report>"#,
    )
    .unwrap();
    assert_eq!(html, r#"<report><table><row id="1"/><row id="2"/></table></report>"#);
}

#[test]
fn test_production_annotation_carries_ancestor_path() {
    let html = render(
        &registry(),
        RenderMode::Production,
        r#"<report><table><row/><row id="2"/></table></report>"#,
    )
    .unwrap();
    assert_eq!(
        html,
        format!(
            r#"<report><table><span class="{VIEW_ERROR_CLASS}">Invalid element 'row' at /report/table/row</span><row id="2"/></table></report>"#
        )
    );
}

#[test]
fn test_diagnostics_validation_failure_aborts() {
    let err = render(
        &registry(),
        RenderMode::Diagnostics,
        r#"<report><table><row/></table></report>"#,
    )
    .unwrap_err();
    match err {
        RenderError::Validation(e) => {
            assert_eq!(e.element, QualifiedName::local("row"));
            assert_eq!(e.path, "/report/table/row");
            assert_eq!(e.to_string(), "element 'row' is invalid at /report/table/row");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_missing_component_emits_exactly_one_marker() {
    let html = render(
        &registry(),
        RenderMode::Diagnostics,
        r#"<report><chart><row id="hidden"/></chart><row id="1"/></report>"#,
    )
    .unwrap();
    assert_eq!(html.matches("<!--").count(), 1);
    assert_eq!(
        html,
        r#"<report><!-- no component for 'chart' at /report/chart --><row id="1"/></report>"#
    );
}

#[test]
fn test_namespace_wildcard_is_a_fallback() {
    let html = render(
        global_registry(),
        RenderMode::Diagnostics,
        r#"<div xmlns="http://www.w3.org/1999/xhtml" xmlns:v="urn:bi-report:view" class="card"><v:value expr="name"/><v:widget/></div>"#,
    )
    .unwrap();
    assert_eq!(
        html,
        r#"<div class="card">Ada<!-- no component for '{urn:bi-report:view}widget' at /div/widget --></div>"#
    );
}

#[test]
fn test_built_tree_gets_paths() {
    let root = Element::new(QualifiedName::local("report")).with_child(
        Element::new(QualifiedName::local("table")).with_child(Element::new(QualifiedName::local("row"))),
    );
    let document = ViewDocument::from_root(root);
    let registry = registry();
    let renderer = ViewRenderer::new(&registry).with_mode(RenderMode::Production);
    let scope = record(&[]);
    let context = RenderContext::root(&scope);
    let mut out = Vec::new();
    {
        let mut writer = MarkupWriter::new(&mut out);
        renderer.render_document(&document, &mut writer, &context).unwrap();
    }
    let html = String::from_utf8(out).unwrap();
    assert!(html.contains("at /report/table/row"), "{html}");
}

#[test]
fn test_global_registry_is_shared_across_threads() {
    let markup = r#"<view xmlns="urn:bi-report:view"><value expr="n * 2"/></view>"#;
    let outputs: Vec<String> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|n| {
                s.spawn(move || {
                    let scope = record(&[("n", Value::Integer(n))]);
                    let context = RenderContext::root(&scope);
                    let renderer = ViewRenderer::new(global_registry());
                    let mut out = Vec::new();
                    renderer.render(markup, &mut out, &context).unwrap();
                    String::from_utf8(out).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(outputs, vec!["0", "2", "4", "6"]);
}
