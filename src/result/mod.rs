//! Execution results
//!
//! A [`ResultContext`] wraps one completed query execution; an
//! [`IndicatorResultContext`] adds the owning indicator and the measure or
//! stratifier its rows represent. A [`ResultSet`] collects the results of a
//! report run under the names views refer to them by.

#![warn(missing_docs)]

mod arguments;
mod context;

pub use arguments::Arguments;
pub use context::{IndicatorResultContext, ResultContext};

use indexmap::IndexMap;
use thiserror::Error;

use crate::expression::ScopedObject;
use crate::model::{Record, Value};

/// One result row
pub type Row = Record;

/// Lazily produced, single-pass row sequence
pub type RowStream = Box<dyn Iterator<Item = Row> + Send>;

/// Result type for result access
pub type ResultResult<T> = Result<T, ResultError>;

/// Result access errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResultError {
    /// The row stream was already handed out
    #[error("rows of '{query}' were already consumed")]
    AlreadyConsumed {
        /// Query name or identifier
        query: String,
    },
}

/// A named entry of a [`ResultSet`]
#[derive(Debug)]
pub enum ResultEntry {
    /// Dataset query result
    Query(ResultContext),
    /// Indicator member result
    Indicator(IndicatorResultContext),
}

impl ResultEntry {
    /// The underlying query result
    pub fn result(&self) -> &ResultContext {
        match self {
            Self::Query(result) => result,
            Self::Indicator(indicator) => indicator.result(),
        }
    }

    /// The entry as a scope object
    pub fn as_scope(&self) -> &dyn ScopedObject {
        match self {
            Self::Query(result) => result,
            Self::Indicator(indicator) => indicator,
        }
    }
}

impl ScopedObject for ResultEntry {
    fn try_get(&self, key: &str) -> Option<Value> {
        self.as_scope().try_get(key)
    }
}

impl From<ResultContext> for ResultEntry {
    fn from(result: ResultContext) -> Self {
        Self::Query(result)
    }
}

impl From<IndicatorResultContext> for ResultEntry {
    fn from(result: IndicatorResultContext) -> Self {
        Self::Indicator(result)
    }
}

/// Results of a report run, in execution order
#[derive(Debug, Default)]
pub struct ResultSet {
    entries: IndexMap<String, ResultEntry>,
}

impl ResultSet {
    /// Create an empty result set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a result under `name`, returning the entry it replaced
    pub fn insert(&mut self, name: impl Into<String>, entry: impl Into<ResultEntry>) -> Option<ResultEntry> {
        let name = name.into();
        let replaced = self.entries.insert(name.clone(), entry.into());
        if replaced.is_some() {
            log::warn!("result '{name}' was produced twice; keeping the later one");
        }
        replaced
    }

    /// Result stored under `name`
    pub fn get(&self, name: &str) -> Option<&ResultEntry> {
        self.entries.get(name)
    }

    /// Names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of results
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no results
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
