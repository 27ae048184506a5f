//! Query and indicator execution
//!
//! The driver between resolved definitions and the renderer: it binds
//! arguments, runs each query through a [`DataSource`] picked by a
//! [`DataSourceProvider`], caps the row stream and wraps the outcome in a
//! [`ResultContext`](crate::result::ResultContext). Failures name the query
//! that failed.

#![warn(missing_docs)]

mod binding;
mod executor;
mod memory;

pub use binding::{BindError, bind_arguments};
pub use executor::QueryExecutor;
pub use memory::MemoryDataSource;

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::BoxError;
use crate::model::{DataSourceDefinition, QueryDefinition};
use crate::result::{Arguments, RowStream};

/// Executes queries against a backing store
pub trait DataSource: Send + Sync {
    /// Run `query` with bound `arguments`, returning a lazily produced row stream
    fn execute(&self, query: &QueryDefinition, arguments: &Arguments) -> Result<RowStream, BoxError>;
}

/// Picks the data source for a data source definition
pub trait DataSourceProvider: Send + Sync {
    /// The data source that serves `definition`
    fn data_source(&self, definition: &DataSourceDefinition) -> Result<&dyn DataSource, BoxError>;
}

/// Provider that maps a definition's `provider` name to a registered data source
#[derive(Default)]
pub struct ProviderRegistry {
    sources: FxHashMap<String, Arc<dyn DataSource>>,
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.sources.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a data source under a provider name
    pub fn register(&mut self, provider: impl Into<String>, source: Arc<dyn DataSource>) {
        let provider = provider.into();
        if self.sources.insert(provider.clone(), source).is_some() {
            log::warn!("data source provider '{provider}' registered twice; the later registration wins");
        }
    }

    /// Builder-style registration
    pub fn with(mut self, provider: impl Into<String>, source: Arc<dyn DataSource>) -> Self {
        self.register(provider, source);
        self
    }
}

impl DataSourceProvider for ProviderRegistry {
    fn data_source(&self, definition: &DataSourceDefinition) -> Result<&dyn DataSource, BoxError> {
        self.sources
            .get(&definition.provider)
            .map(|source| source.as_ref())
            .ok_or_else(|| format!("no data source provider named '{}'", definition.provider).into())
    }
}
