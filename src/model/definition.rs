//! Common definition header, kinds and the typed resolution visitor

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::definitions::{
    DataSourceDefinition, FormatDefinition, IndicatorDefinition, ParameterDefinition,
    QueryDefinition, ReportDefinition, ViewDefinition,
};
use crate::error::BiError;
use crate::resolver::ResolutionPass;

/// Closed set of definition kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionKind {
    /// Query against a data source
    Query,
    /// Indicator with measures and stratifiers
    Indicator,
    /// Report aggregating datasets, indicators and views
    Report,
    /// Rendering template
    View,
    /// Data source connection description
    DataSource,
    /// Query or report parameter
    Parameter,
    /// Display format
    Format,
}

impl DefinitionKind {
    /// Every kind
    pub const ALL: [DefinitionKind; 7] = [
        Self::Query,
        Self::Indicator,
        Self::Report,
        Self::View,
        Self::DataSource,
        Self::Parameter,
        Self::Format,
    ];

    /// Lower-case name used in messages and serialized documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Indicator => "indicator",
            Self::Report => "report",
            Self::View => "view",
            Self::DataSource => "datasource",
            Self::Parameter => "parameter",
            Self::Format => "format",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DefinitionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown definition kind '{s}'"))
    }
}

/// Fields shared by every definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionHeader {
    /// Identifier, unique within a repository
    pub id: String,

    /// Optional display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// When set, this definition is a placeholder for the definition of the
    /// same kind with this identifier (optionally prefixed with `#`)
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl DefinitionHeader {
    /// Create a header with an identifier only
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            reference: None,
        }
    }

    /// Create a placeholder header pointing at another definition
    pub fn placeholder(id: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            reference: Some(reference.into()),
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The display name when present, otherwise the identifier
    pub fn name_or_id(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// The referenced identifier with any leading `#` stripped, or `None`
    /// when this is not a placeholder
    pub fn reference_target(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .filter(|r| !r.is_empty())
            .map(|r| r.strip_prefix('#').unwrap_or(r))
    }
}

/// Identity of a definition, carried by errors for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionRef {
    /// Kind of the definition
    pub kind: DefinitionKind,
    /// Identifier
    pub id: String,
    /// Display name, if any
    pub name: Option<String>,
}

impl DefinitionRef {
    /// Capture the identity of a definition
    pub fn of<T: BiDefinition>(definition: &T) -> Self {
        let header = definition.header();
        Self {
            kind: T::KIND,
            id: header.id.clone(),
            name: header.name.clone(),
        }
    }
}

impl fmt::Display for DefinitionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}'",
            self.kind,
            self.name.as_deref().unwrap_or(&self.id)
        )
    }
}

/// Typed visitor over the closed set of definition kinds
///
/// Each kind knows how to hand its Definition-valued fields and sequences to
/// a [`ResolutionPass`]; non-definition fields are never traversed.
pub trait BiDefinition: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Concrete kind of this definition
    const KIND: DefinitionKind;

    /// Shared header
    fn header(&self) -> &DefinitionHeader;

    /// Mutable shared header
    fn header_mut(&mut self) -> &mut DefinitionHeader;

    /// Replace every child definition with its resolved counterpart
    fn resolve_children(&mut self, pass: &mut ResolutionPass<'_>) -> Result<(), BiError>;

    /// Narrow a kind-erased definition to this kind
    fn from_definition(definition: Definition) -> Option<Self>;

    /// Erase the concrete kind
    fn into_definition(self) -> Definition;
}

/// A definition of any kind, as stored in a repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Definition {
    /// Query definition
    Query(QueryDefinition),
    /// Indicator definition
    Indicator(IndicatorDefinition),
    /// Report definition
    Report(ReportDefinition),
    /// View definition
    View(ViewDefinition),
    /// Data source definition
    #[serde(rename = "datasource")]
    DataSource(DataSourceDefinition),
    /// Parameter definition
    Parameter(ParameterDefinition),
    /// Format definition
    Format(FormatDefinition),
}

impl Definition {
    /// Kind of the wrapped definition
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Self::Query(_) => DefinitionKind::Query,
            Self::Indicator(_) => DefinitionKind::Indicator,
            Self::Report(_) => DefinitionKind::Report,
            Self::View(_) => DefinitionKind::View,
            Self::DataSource(_) => DefinitionKind::DataSource,
            Self::Parameter(_) => DefinitionKind::Parameter,
            Self::Format(_) => DefinitionKind::Format,
        }
    }

    /// Shared header of the wrapped definition
    pub fn header(&self) -> &DefinitionHeader {
        match self {
            Self::Query(d) => d.header(),
            Self::Indicator(d) => d.header(),
            Self::Report(d) => d.header(),
            Self::View(d) => d.header(),
            Self::DataSource(d) => d.header(),
            Self::Parameter(d) => d.header(),
            Self::Format(d) => d.header(),
        }
    }

    /// Identifier of the wrapped definition
    pub fn id(&self) -> &str {
        &self.header().id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_target_strips_hash() {
        let header = DefinitionHeader::placeholder("p", "#sales");
        assert_eq!(header.reference_target(), Some("sales"));

        let header = DefinitionHeader::placeholder("p", "sales");
        assert_eq!(header.reference_target(), Some("sales"));
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("DataSource".parse::<DefinitionKind>(), Ok(DefinitionKind::DataSource));
        assert_eq!("report".parse::<DefinitionKind>(), Ok(DefinitionKind::Report));
        assert!("widget".parse::<DefinitionKind>().is_err());
    }

    #[test]
    fn test_empty_reference_is_not_a_placeholder() {
        let header = DefinitionHeader::placeholder("p", "");
        assert_eq!(header.reference_target(), None);
        assert_eq!(DefinitionHeader::new("q").reference_target(), None);
    }

    #[test]
    fn test_definition_ref_display_prefers_name() {
        let r = DefinitionRef {
            kind: DefinitionKind::Query,
            id: "q1".to_string(),
            name: Some("Sales by region".to_string()),
        };
        assert_eq!(r.to_string(), "query 'Sales by region'");

        let r = DefinitionRef {
            name: None,
            ..r
        };
        assert_eq!(r.to_string(), "query 'q1'");
    }
}
