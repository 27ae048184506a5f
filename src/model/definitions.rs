//! Concrete definition kinds

use chrono::{DateTime, TimeDelta};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::definition::{BiDefinition, Definition, DefinitionHeader, DefinitionKind};
use super::value::Value;
use crate::error::BiError;
use crate::resolver::ResolutionPass;

macro_rules! definition_kind {
    ($ty:ident, $kind:ident, |$this:ident, $pass:ident| $body:block) => {
        impl BiDefinition for $ty {
            const KIND: DefinitionKind = DefinitionKind::$kind;

            fn header(&self) -> &DefinitionHeader {
                &self.header
            }

            fn header_mut(&mut self) -> &mut DefinitionHeader {
                &mut self.header
            }

            fn resolve_children(
                &mut self,
                $pass: &mut ResolutionPass<'_>,
            ) -> Result<(), BiError> {
                let $this = self;
                $body
            }

            fn from_definition(definition: Definition) -> Option<Self> {
                match definition {
                    Definition::$kind(d) => Some(d),
                    _ => None,
                }
            }

            fn into_definition(self) -> Definition {
                Definition::$kind(self)
            }
        }
    };
}

/// Display format for a parameter or value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatDefinition {
    /// Shared header
    #[serde(flatten)]
    pub header: DefinitionHeader,

    /// Format pattern (strftime for timestamps, decimal places for numbers)
    #[serde(default)]
    pub pattern: String,
}

definition_kind!(FormatDefinition, Format, |_this, _pass| { Ok(()) });

/// Connection description for a data source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSourceDefinition {
    /// Shared header
    #[serde(flatten)]
    pub header: DefinitionHeader,

    /// Provider name used to pick a driver
    #[serde(default)]
    pub provider: String,

    /// Provider-specific connection string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,

    /// Extra provider settings
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, String>,
}

definition_kind!(DataSourceDefinition, DataSource, |_this, _pass| { Ok(()) });

/// Declared type of a parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    /// Free text
    #[default]
    String,
    /// 64-bit integer
    Integer,
    /// Decimal number
    Decimal,
    /// true / false
    Boolean,
    /// Unique identifier
    Uuid,
    /// RFC 3339 timestamp
    Timestamp,
    /// Span of time, as seconds or with a `d`/`h`/`m`/`s` suffix
    Duration,
}

impl ParameterType {
    /// Parse a textual argument into a typed value
    pub fn parse(&self, text: &str) -> Result<Value, String> {
        let text = text.trim();
        match self {
            Self::String => Ok(Value::String(text.to_string())),
            Self::Integer => text
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| e.to_string()),
            Self::Decimal => text
                .parse::<Decimal>()
                .map(Value::Decimal)
                .map_err(|e| e.to_string()),
            Self::Boolean => match text.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(Value::Boolean(true)),
                "false" | "0" | "no" => Ok(Value::Boolean(false)),
                other => Err(format!("'{other}' is not a boolean")),
            },
            Self::Uuid => Uuid::parse_str(text)
                .map(Value::Uuid)
                .map_err(|e| e.to_string()),
            Self::Timestamp => DateTime::parse_from_rfc3339(text)
                .map(Value::Timestamp)
                .map_err(|e| e.to_string()),
            Self::Duration => parse_duration(text).map(Value::Duration),
        }
    }
}

fn parse_duration(text: &str) -> Result<TimeDelta, String> {
    let (number, unit) = match text.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&text[..idx], c),
        _ => (text, 's'),
    };
    let amount: i64 = number
        .trim()
        .parse()
        .map_err(|_| format!("'{text}' is not a duration"))?;
    let delta = match unit {
        'd' => TimeDelta::try_days(amount),
        'h' => TimeDelta::try_hours(amount),
        'm' => TimeDelta::try_minutes(amount),
        's' => TimeDelta::try_seconds(amount),
        other => return Err(format!("unknown duration unit '{other}'")),
    };
    delta.ok_or_else(|| format!("duration '{text}' is out of range"))
}

/// Query or report parameter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    /// Shared header
    #[serde(flatten)]
    pub header: DefinitionHeader,

    /// Declared value type
    #[serde(default, rename = "type")]
    pub parameter_type: ParameterType,

    /// Whether an argument must be supplied when there is no default
    #[serde(default)]
    pub required: bool,

    /// Default value in textual form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// Display format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatDefinition>,
}

definition_kind!(ParameterDefinition, Parameter, |this, pass| {
    pass.resolve_optional(&mut this.format)
});

/// Query executed against a data source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryDefinition {
    /// Shared header
    #[serde(flatten)]
    pub header: DefinitionHeader,

    /// Data source the query runs against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<DataSourceDefinition>,

    /// Provider-specific command text
    #[serde(default)]
    pub command: String,

    /// Declared parameters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterDefinition>,
}

definition_kind!(QueryDefinition, Query, |this, pass| {
    pass.resolve_optional(&mut this.data_source)?;
    pass.resolve_sequence(&mut this.parameters)
});

/// Indicator: a primary query plus named measures and stratifiers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorDefinition {
    /// Shared header
    #[serde(flatten)]
    pub header: DefinitionHeader,

    /// Data source used by member queries that declare none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<DataSourceDefinition>,

    /// Primary (whole-result) query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryDefinition>,

    /// Measure queries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub measures: Vec<QueryDefinition>,

    /// Stratifier queries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stratifiers: Vec<QueryDefinition>,

    /// Declared parameters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterDefinition>,
}

definition_kind!(IndicatorDefinition, Indicator, |this, pass| {
    pass.resolve_optional(&mut this.data_source)?;
    pass.resolve_optional(&mut this.query)?;
    pass.resolve_sequence(&mut this.measures)?;
    pass.resolve_sequence(&mut this.stratifiers)?;
    pass.resolve_sequence(&mut this.parameters)
});

/// Rendering template; consumed verbatim, never placeholder-resolved
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewDefinition {
    /// Shared header
    #[serde(flatten)]
    pub header: DefinitionHeader,

    /// View markup
    #[serde(default)]
    pub content: String,
}

definition_kind!(ViewDefinition, View, |_this, _pass| { Ok(()) });

/// Report: datasets, indicators and the views that render them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportDefinition {
    /// Shared header
    #[serde(flatten)]
    pub header: DefinitionHeader,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Report parameters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterDefinition>,

    /// Dataset queries, keyed in the view by name or identifier
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub datasets: Vec<QueryDefinition>,

    /// Indicators
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indicators: Vec<IndicatorDefinition>,

    /// Views, shared with the source definition rather than copied
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub views: Vec<Arc<ViewDefinition>>,
}

// Views are left as they are: the resolved report shares them with its source.
definition_kind!(ReportDefinition, Report, |this, pass| {
    pass.resolve_sequence(&mut this.parameters)?;
    pass.resolve_sequence(&mut this.datasets)?;
    pass.resolve_sequence(&mut this.indicators)
});

impl ReportDefinition {
    /// Find a view by name or identifier; the first view when `name` is `None`
    pub fn view(&self, name: Option<&str>) -> Option<&Arc<ViewDefinition>> {
        match name {
            None => self.views.first(),
            Some(name) => self
                .views
                .iter()
                .find(|v| v.header.id == name || v.header.name.as_deref() == Some(name)),
        }
    }
}
