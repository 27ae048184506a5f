use indexmap::IndexMap;

use super::{DataSource, DataSourceProvider};
use crate::error::BoxError;
use crate::model::{DataSourceDefinition, QueryDefinition};
use crate::result::{Arguments, Row, RowStream};

/// Data source serving fixed rows keyed by query identifier
///
/// Also acts as a provider that serves every data source definition, which
/// is all tests and the command line need.
#[derive(Debug, Clone, Default)]
pub struct MemoryDataSource {
    rows: IndexMap<String, Vec<Row>>,
}

impl MemoryDataSource {
    /// Create a source without rows
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rows returned for a query identifier
    pub fn with_rows(mut self, query_id: impl Into<String>, rows: Vec<Row>) -> Self {
        self.rows.insert(query_id.into(), rows);
        self
    }

    /// Load `{"query-id": [{...row...}, ...], ...}`
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let rows: IndexMap<String, Vec<Row>> = serde_json::from_str(json)?;
        Ok(Self { rows })
    }
}

impl DataSource for MemoryDataSource {
    fn execute(&self, query: &QueryDefinition, _arguments: &Arguments) -> Result<RowStream, BoxError> {
        let rows = self
            .rows
            .get(&query.header.id)
            .ok_or_else(|| format!("no rows for query '{}'", query.header.id))?;
        Ok(Box::new(rows.clone().into_iter()))
    }
}

impl DataSourceProvider for MemoryDataSource {
    fn data_source(&self, _definition: &DataSourceDefinition) -> Result<&dyn DataSource, BoxError> {
        Ok(self as &dyn DataSource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DefinitionHeader, Value};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_json() {
        let source =
            MemoryDataSource::from_json_str(r#"{"q1": [{"region": "North", "total": 4}]}"#).unwrap();
        let query = QueryDefinition {
            header: DefinitionHeader::new("q1"),
            ..Default::default()
        };
        let rows: Vec<Row> = source.execute(&query, &Arguments::new()).unwrap().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("total"), Some(&Value::Integer(4)));

        let unknown = QueryDefinition {
            header: DefinitionHeader::new("q2"),
            ..Default::default()
        };
        assert!(source.execute(&unknown, &Arguments::new()).is_err());
    }
}
