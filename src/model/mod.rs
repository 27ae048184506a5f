//! Definition model and value types
//!
//! Passive BI definitions (queries, indicators, reports, views, data sources,
//! parameters, formats) forming a graph through child fields, and the value
//! type shared by result rows and expressions.

#![warn(missing_docs)]

pub mod definition;
pub mod definitions;
pub mod value;

pub use definition::{BiDefinition, Definition, DefinitionHeader, DefinitionKind, DefinitionRef};
pub use definitions::{
    DataSourceDefinition, FormatDefinition, IndicatorDefinition, ParameterDefinition,
    ParameterType, QueryDefinition, ReportDefinition, ViewDefinition,
};
pub use value::{Record, Value};
