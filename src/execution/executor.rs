use chrono::Utc;

use super::DataSourceProvider;
use super::binding::bind_arguments;
use crate::error::DataFlowError;
use crate::model::{DataSourceDefinition, IndicatorDefinition, QueryDefinition};
use crate::result::{Arguments, IndicatorResultContext, ResultContext, RowStream};

/// Runs resolved queries and indicators through a data source provider
#[derive(Clone, Copy)]
pub struct QueryExecutor<'p> {
    provider: &'p dyn DataSourceProvider,
    max_rows: Option<usize>,
}

impl<'p> QueryExecutor<'p> {
    /// Create an executor without a row cap
    pub fn new(provider: &'p dyn DataSourceProvider) -> Self {
        Self {
            provider,
            max_rows: None,
        }
    }

    /// Cap the rows read from each query
    pub fn with_max_rows(mut self, max_rows: Option<usize>) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Execute a query with its own data source
    pub fn execute_query(
        &self,
        query: &QueryDefinition,
        arguments: &Arguments,
    ) -> Result<ResultContext, DataFlowError> {
        self.execute_with_fallback(query, None, arguments)
    }

    /// Execute an indicator's primary query, then its measures and stratifiers
    ///
    /// Member queries without a data source use the indicator's. The primary
    /// result carries an empty measure name; the others carry the member
    /// query's name or identifier.
    pub fn execute_indicator(
        &self,
        indicator: &IndicatorDefinition,
        arguments: &Arguments,
    ) -> Result<Vec<IndicatorResultContext>, DataFlowError> {
        let fallback = indicator.data_source.as_ref();
        let primary = indicator.query.iter().map(|query| ("", query));
        let members = indicator
            .measures
            .iter()
            .chain(&indicator.stratifiers)
            .map(|query| (query.header.name_or_id(), query));

        let mut results = Vec::new();
        for (member, query) in primary.chain(members) {
            let result = self.execute_with_fallback(query, fallback, arguments)?;
            results.push(IndicatorResultContext::new(indicator.clone(), member, result));
        }
        log::debug!(
            "indicator '{}' produced {} results",
            indicator.header.name_or_id(),
            results.len()
        );
        Ok(results)
    }

    fn execute_with_fallback(
        &self,
        query: &QueryDefinition,
        fallback: Option<&DataSourceDefinition>,
        arguments: &Arguments,
    ) -> Result<ResultContext, DataFlowError> {
        let step = query.header.name_or_id();
        let start_time = Utc::now();

        let data_source = query
            .data_source
            .as_ref()
            .or(fallback)
            .ok_or_else(|| DataFlowError::message(step, "query has no data source"))?;
        let arguments = bind_arguments(&query.parameters, arguments)
            .map_err(|e| DataFlowError::failed(step, e))?;
        let source = self
            .provider
            .data_source(data_source)
            .map_err(|e| DataFlowError::failed(step, e))?;

        log::debug!("executing query '{step}' on '{}'", data_source.header.name_or_id());
        let rows = source.execute(query, &arguments).map_err(|e| {
            log::debug!("query '{step}' failed: {e}");
            DataFlowError::failed(step, e)
        })?;
        let rows: RowStream = match self.max_rows {
            Some(max) => {
                log::debug!("query '{step}' capped at {max} rows");
                Box::new(rows.take(max))
            }
            None => rows,
        };

        Ok(ResultContext::new(
            query.clone(),
            arguments,
            data_source.clone(),
            rows,
            start_time,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::execution::{DataSource, MemoryDataSource, ProviderRegistry};
    use crate::model::{DefinitionHeader, Value};
    use crate::result::Row;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    struct Failing;

    impl DataSource for Failing {
        fn execute(&self, _query: &QueryDefinition, _arguments: &Arguments) -> Result<RowStream, BoxError> {
            Err("connection refused".into())
        }
    }

    fn row(n: i64) -> Row {
        let mut row = Row::new();
        row.insert("n".to_string(), Value::Integer(n));
        row
    }

    fn query(id: &str, provider: Option<&str>) -> QueryDefinition {
        QueryDefinition {
            header: DefinitionHeader::new(id),
            data_source: provider.map(|p| DataSourceDefinition {
                header: DefinitionHeader::new(format!("{p}-ds")),
                provider: p.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn provider() -> ProviderRegistry {
        let memory = MemoryDataSource::new()
            .with_rows("q1", (1..=5).map(row).collect())
            .with_rows("m1", vec![row(10)])
            .with_rows("s1", vec![row(20)]);
        ProviderRegistry::new()
            .with("memory", Arc::new(memory))
            .with("failing", Arc::new(Failing))
    }

    #[test]
    fn test_row_cap_is_applied() {
        let provider = provider();
        let executor = QueryExecutor::new(&provider).with_max_rows(Some(3));
        let result = executor
            .execute_query(&query("q1", Some("memory")), &Arguments::new())
            .unwrap();
        let rows: Vec<Row> = result.take_rows().unwrap().collect();
        assert_eq!(rows, vec![row(1), row(2), row(3)]);
        assert!(result.stop_time() >= result.start_time());
    }

    #[test]
    fn test_failures_name_the_query() {
        let provider = provider();
        let executor = QueryExecutor::new(&provider);

        let mut failing = query("q2", Some("failing"));
        failing.header.name = Some("Monthly sales".to_string());
        let err = executor.execute_query(&failing, &Arguments::new()).unwrap_err();
        assert_eq!(err.to_string(), "step 'Monthly sales' failed: connection refused");

        let err = executor
            .execute_query(&query("q3", None), &Arguments::new())
            .unwrap_err();
        assert_eq!(err.step(), "q3");

        let err = executor
            .execute_query(&query("q4", Some("odbc")), &Arguments::new())
            .unwrap_err();
        assert_eq!(err.step(), "q4");
    }

    #[test]
    fn test_indicator_members_in_order() {
        let provider = provider();
        let executor = QueryExecutor::new(&provider);
        let indicator = IndicatorDefinition {
            header: DefinitionHeader::new("ind"),
            data_source: query("unused", Some("memory")).data_source,
            query: Some(query("q1", None)),
            measures: vec![query("m1", None)],
            stratifiers: vec![query("s1", Some("memory"))],
            ..Default::default()
        };

        let results = executor.execute_indicator(&indicator, &Arguments::new()).unwrap();
        let members: Vec<&str> = results.iter().map(|r| r.measure_or_stratifier()).collect();
        assert_eq!(members, vec!["", "m1", "s1"]);
        assert!(results[0].is_primary());
        let first: Vec<Row> = results[1].result().take_rows().unwrap().collect();
        assert_eq!(first, vec![row(10)]);
    }
}
