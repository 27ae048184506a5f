use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;

use super::arguments::Arguments;
use super::{ResultError, ResultResult, RowStream};
use crate::expression::ScopedObject;
use crate::model::{DataSourceDefinition, IndicatorDefinition, QueryDefinition, Value};

/// A completed query execution: definition, arguments, data source, rows and timing
///
/// The stop time is stamped when the context is constructed, before any row
/// is read, so [`elapsed`](Self::elapsed) measures start-to-materialization.
/// Rows are a single-pass stream handed out once by
/// [`take_rows`](Self::take_rows).
pub struct ResultContext {
    query: QueryDefinition,
    arguments: Arguments,
    data_source: DataSourceDefinition,
    rows: Mutex<Option<RowStream>>,
    start_time: DateTime<Utc>,
    stop_time: DateTime<Utc>,
}

impl fmt::Debug for ResultContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultContext")
            .field("query", &self.query.header.id)
            .field("data_source", &self.data_source.header.id)
            .field("arguments", &self.arguments)
            .field("consumed", &self.is_consumed())
            .field("start_time", &self.start_time)
            .field("stop_time", &self.stop_time)
            .finish()
    }
}

impl ResultContext {
    /// Wrap an execution; `start_time` is captured by the caller before executing
    pub fn new(
        query: QueryDefinition,
        arguments: Arguments,
        data_source: DataSourceDefinition,
        rows: RowStream,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            query,
            arguments,
            data_source,
            rows: Mutex::new(Some(rows)),
            start_time,
            stop_time: Utc::now(),
        }
    }

    /// The executed query
    pub fn query(&self) -> &QueryDefinition {
        &self.query
    }

    /// Arguments the query ran with
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Data source the query ran against
    pub fn data_source(&self) -> &DataSourceDefinition {
        &self.data_source
    }

    /// Time captured before execution
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Time the context was constructed
    pub fn stop_time(&self) -> DateTime<Utc> {
        self.stop_time
    }

    /// Stop time minus start time
    pub fn elapsed(&self) -> TimeDelta {
        self.stop_time - self.start_time
    }

    /// Take the row stream; fails on every call after the first
    pub fn take_rows(&self) -> ResultResult<RowStream> {
        self.rows
            .lock()
            .take()
            .ok_or_else(|| ResultError::AlreadyConsumed {
                query: self.query.header.name_or_id().to_string(),
            })
    }

    /// Check if the rows have been taken
    pub fn is_consumed(&self) -> bool {
        self.rows.lock().is_none()
    }
}

/// Metadata scope entered by components that iterate a result
impl ScopedObject for ResultContext {
    fn try_get(&self, key: &str) -> Option<Value> {
        match key {
            "query" => Some(Value::from(self.query.header.name_or_id())),
            "dataSource" => Some(Value::from(self.data_source.header.name_or_id())),
            "startTime" => Some(Value::Timestamp(self.start_time.fixed_offset())),
            "stopTime" => Some(Value::Timestamp(self.stop_time.fixed_offset())),
            "elapsed" => Some(Value::Duration(self.elapsed())),
            _ => None,
        }
    }
}

/// Result of one member query of an indicator execution
///
/// An empty measure-or-stratifier name denotes the indicator's primary result.
#[derive(Debug)]
pub struct IndicatorResultContext {
    indicator: IndicatorDefinition,
    measure_or_stratifier: String,
    result: ResultContext,
}

impl IndicatorResultContext {
    /// Wrap the result of one indicator member query
    pub fn new(
        indicator: IndicatorDefinition,
        measure_or_stratifier: impl Into<String>,
        result: ResultContext,
    ) -> Self {
        Self {
            indicator,
            measure_or_stratifier: measure_or_stratifier.into(),
            result,
        }
    }

    /// The owning indicator
    pub fn indicator(&self) -> &IndicatorDefinition {
        &self.indicator
    }

    /// Measure or stratifier name; empty for the primary result
    pub fn measure_or_stratifier(&self) -> &str {
        &self.measure_or_stratifier
    }

    /// Check if this is the primary (whole) result
    pub fn is_primary(&self) -> bool {
        self.measure_or_stratifier.is_empty()
    }

    /// The underlying query result
    pub fn result(&self) -> &ResultContext {
        &self.result
    }
}

impl ScopedObject for IndicatorResultContext {
    fn try_get(&self, key: &str) -> Option<Value> {
        match key {
            "indicator" => Some(Value::from(self.indicator.header.name_or_id())),
            "measure" => Some(Value::from(self.measure_or_stratifier.as_str())),
            _ => self.result.try_get(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DefinitionHeader, Record};
    use crate::result::Row;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn row(n: i64) -> Row {
        let mut r = Record::new();
        r.insert("n".to_string(), Value::Integer(n));
        r
    }

    fn context(rows: Vec<Row>, start_time: DateTime<Utc>) -> ResultContext {
        ResultContext::new(
            QueryDefinition {
                header: DefinitionHeader::new("q").with_name("Sales"),
                ..Default::default()
            },
            Arguments::new().with("year", Value::Integer(2024)),
            DataSourceDefinition {
                header: DefinitionHeader::new("warehouse"),
                ..Default::default()
            },
            Box::new(rows.into_iter()),
            start_time,
        )
    }

    #[test]
    fn test_stop_time_is_stamped_at_construction() {
        let start = Utc::now() - TimeDelta::seconds(5);
        let exhausted = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&exhausted);
        let rows = (0..3).map(row).chain(std::iter::from_fn(move || {
            flag.store(true, Ordering::SeqCst);
            None
        }));

        let before = Utc::now();
        let ctx = ResultContext::new(
            QueryDefinition::default(),
            Arguments::new(),
            DataSourceDefinition::default(),
            Box::new(rows),
            start,
        );
        let after = Utc::now();
        assert!(ctx.stop_time() >= before && ctx.stop_time() <= after);
        let stamped = ctx.stop_time();

        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(ctx.take_rows().unwrap().count(), 3);
        assert!(exhausted.load(Ordering::SeqCst));
        assert_eq!(ctx.stop_time(), stamped);
        assert!(ctx.elapsed() >= TimeDelta::seconds(5));
    }

    #[test]
    fn test_rows_are_single_pass() {
        let ctx = context(vec![row(1), row(2)], Utc::now());
        assert!(!ctx.is_consumed());
        let rows: Vec<Row> = ctx.take_rows().unwrap().collect();
        assert_eq!(rows, vec![row(1), row(2)]);
        assert!(ctx.is_consumed());
        assert!(matches!(
            ctx.take_rows(),
            Err(ResultError::AlreadyConsumed { ref query }) if query == "Sales"
        ));
    }

    #[test]
    fn test_metadata_scope() {
        let ctx = context(vec![], Utc::now());
        assert_eq!(ctx.try_get("query"), Some(Value::from("Sales")));
        assert_eq!(ctx.try_get("dataSource"), Some(Value::from("warehouse")));
        assert_eq!(ctx.try_get("n"), None);
        assert_eq!(ctx.arguments().get("year"), Some(&Value::Integer(2024)));
    }

    #[test]
    fn test_indicator_result_with_empty_name_is_primary() {
        let indicator = IndicatorDefinition {
            header: DefinitionHeader::new("coverage"),
            ..Default::default()
        };
        let primary = IndicatorResultContext::new(indicator.clone(), "", context(vec![], Utc::now()));
        assert!(primary.is_primary());
        assert_eq!(primary.measure_or_stratifier(), "");
        assert_eq!(primary.try_get("indicator"), Some(Value::from("coverage")));
        assert_eq!(primary.try_get("query"), Some(Value::from("Sales")));

        let measure = IndicatorResultContext::new(indicator, "byRegion", context(vec![], Utc::now()));
        assert!(!measure.is_primary());
        assert_eq!(measure.try_get("measure"), Some(Value::from("byRegion")));
    }
}
