//! View rendering
//!
//! A view is parsed into an element tree and walked in document order. Each
//! element is dispatched to the [`ViewComponent`] registered for its qualified
//! name; components validate their element, write output through a streaming
//! [`MarkupWriter`] and evaluate bound expressions against a chain of
//! [`RenderContext`]s.

#![warn(missing_docs)]

pub mod component;
pub mod components;
pub mod context;
pub mod dispatcher;
pub mod element;
pub mod error;
pub mod localization;
pub mod registry;
pub mod writer;

pub use component::ViewComponent;
pub use components::{VIEW_NAMESPACE, XHTML_NAMESPACE};
pub use context::RenderContext;
pub use dispatcher::{VIEW_ERROR_CLASS, ViewRenderer};
pub use element::{ANY_LOCAL_NAME, Element, Node, QualifiedName, ViewDocument};
pub use error::{RenderError, RenderResult};
pub use localization::{CatalogLocalizer, KeyLocalizer, Localizer};
pub use registry::{ComponentRegistry, ComponentRegistryBuilder, global_registry};
pub use writer::MarkupWriter;
