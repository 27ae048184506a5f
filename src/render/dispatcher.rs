//! Element dispatch
//!
//! Every element is looked up in the registry by qualified name, then by its
//! namespace wildcard. A missing component leaves a comment in the output and
//! rendering continues. A component that rejects its element fails the render
//! in diagnostics mode; in production mode an inline error annotation naming
//! the element's path is written instead.

use std::io;
use std::sync::Arc;

use super::context::RenderContext;
use super::element::{Element, Node, ViewDocument};
use super::error::{RenderError, RenderResult};
use super::localization::{KeyLocalizer, Localizer};
use super::registry::ComponentRegistry;
use super::writer::MarkupWriter;
use crate::config::RenderMode;
use crate::error::ViewValidationError;
use crate::expression::ExpressionEvaluator;
use crate::model::Value;

/// CSS class of production-mode validation annotations
pub const VIEW_ERROR_CLASS: &str = "view-error";

/// Renders view documents through a component registry
pub struct ViewRenderer<'r> {
    registry: &'r ComponentRegistry,
    evaluator: Arc<ExpressionEvaluator>,
    localizer: Arc<dyn Localizer>,
    mode: RenderMode,
}

impl<'r> ViewRenderer<'r> {
    /// Create a renderer with a fresh evaluator, no translations and the build's default mode
    pub fn new(registry: &'r ComponentRegistry) -> Self {
        Self {
            registry,
            evaluator: Arc::new(ExpressionEvaluator::default()),
            localizer: Arc::new(KeyLocalizer),
            mode: RenderMode::default(),
        }
    }

    /// Set the render mode
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Use a shared evaluator
    pub fn with_evaluator(mut self, evaluator: Arc<ExpressionEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Use a localizer
    pub fn with_localizer(mut self, localizer: Arc<dyn Localizer>) -> Self {
        self.localizer = localizer;
        self
    }

    /// The render mode
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// The expression evaluator
    pub fn evaluator(&self) -> &ExpressionEvaluator {
        &self.evaluator
    }

    /// Parse view markup and render it to `out`
    pub fn render(
        &self,
        markup: &str,
        out: &mut dyn io::Write,
        context: &RenderContext<'_>,
    ) -> RenderResult<()> {
        let document = ViewDocument::parse(markup)?;
        let mut writer = MarkupWriter::new(out);
        self.render_document(&document, &mut writer, context)
    }

    /// Render a parsed view
    pub fn render_document(
        &self,
        document: &ViewDocument,
        writer: &mut MarkupWriter<'_>,
        context: &RenderContext<'_>,
    ) -> RenderResult<()> {
        self.dispatch(&document.root, writer, context)
    }

    /// Validate and render one element through its component
    pub fn dispatch(
        &self,
        element: &Element,
        writer: &mut MarkupWriter<'_>,
        context: &RenderContext<'_>,
    ) -> RenderResult<()> {
        let Some(component) = self.registry.find(&element.name) else {
            log::warn!("no component for '{}' at {}", element.name, element.path);
            return writer.comment(&format!(
                "no component for '{}' at {}",
                element.name, element.path
            ));
        };

        if !component.validate(element, context) {
            let error = ViewValidationError {
                element: element.name.clone(),
                path: element.path.clone(),
            };
            match self.mode {
                RenderMode::Diagnostics => return Err(error.into()),
                RenderMode::Production => {
                    log::warn!("{error}");
                    writer.start_element("span", &[("class", VIEW_ERROR_CLASS)])?;
                    writer.text(&format!("Invalid element '{}' at {}", element.name.local, element.path))?;
                    return writer.end_element("span");
                }
            }
        }

        component.render(element, self, writer, context)
    }

    /// Render an element's children in document order
    pub fn render_children(
        &self,
        element: &Element,
        writer: &mut MarkupWriter<'_>,
        context: &RenderContext<'_>,
    ) -> RenderResult<()> {
        for child in &element.children {
            match child {
                Node::Element(child) => self.dispatch(child, writer, context)?,
                Node::Text(text) => writer.text(text)?,
            }
        }
        Ok(())
    }

    /// Evaluate an expression held by `element`
    pub fn evaluate(
        &self,
        element: &Element,
        context: &RenderContext<'_>,
        text: &str,
    ) -> RenderResult<Value> {
        self.evaluator
            .evaluate(context, text)
            .map_err(|source| RenderError::Expression {
                path: element.path.clone(),
                source,
            })
    }

    /// Translated text for a key
    pub fn localize(&self, key: &str) -> String {
        self.localizer.localize(key)
    }
}
