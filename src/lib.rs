//! Business-intelligence report engine
//!
//! Resolves declarative BI definitions (queries, data sources, parameters,
//! indicators, reports and views) into fully materialized graphs, executes
//! them against pluggable data sources and renders report views through a
//! component-based view engine with scoped expression evaluation.
//!
//! ```no_run
//! use bi_report::{Arguments, InMemoryRepository, MemoryDataSource, ReportEngine};
//!
//! # fn main() -> bi_report::Result<()> {
//! let repository = InMemoryRepository::from_json_str("[]")?;
//! let data = MemoryDataSource::new();
//! let engine = ReportEngine::new(&repository, &data);
//! let mut out = Vec::new();
//! engine.render_report("sales", None, &Arguments::new(), &mut out)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod execution;
pub mod expression;
pub mod model;
pub mod render;
pub mod report;
pub mod resolver;
pub mod result;

pub use config::{EngineConfig, RenderMode};
pub use error::{BiError, BoxError, DataFlowError, Error, Result, ViewValidationError};
pub use execution::{DataSource, DataSourceProvider, MemoryDataSource, ProviderRegistry, QueryExecutor};
pub use expression::{ExpressionError, ExpressionEvaluator, ScopedObject, TypeVocabulary};
pub use model::{Definition, DefinitionHeader, DefinitionKind, Value};
pub use render::{
    ComponentRegistry, MarkupWriter, RenderContext, RenderError, ViewComponent, ViewRenderer,
    global_registry,
};
pub use report::ReportEngine;
pub use resolver::{InMemoryRepository, MetadataRepository, ReferenceResolver, ResolveError};
pub use result::{Arguments, IndicatorResultContext, ResultContext, ResultSet};
