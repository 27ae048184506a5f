//! Shared fixtures for integration tests

#![allow(dead_code)]

use bi_report::model::{Record, Value};
use bi_report::{InMemoryRepository, MemoryDataSource};
use serde_json::json;

pub const SUMMARY_VIEW: &str = concat!(
    r#"<html xmlns="http://www.w3.org/1999/xhtml" xmlns:v="urn:bi-report:view">"#,
    r#"<h1><v:label key="title"/>: <v:value expr="region"/></h1>"#,
    r#"<table><v:repeat source="sales"><tr>"#,
    r#"<td><v:value expr="region"/></td><td><v:value expr="total * 2"/></td>"#,
    r#"</tr></v:repeat></table>"#,
    r#"<p><v:repeat source="kpi.margin"><v:value expr="measure"/>=<v:value expr="value"/></v:repeat></p>"#,
    r#"</html>"#,
);

pub const BROKEN_VIEW: &str =
    r#"<view xmlns="urn:bi-report:view"><if/><value expr="'ok'"/></view>"#;

/// Definitions for a report with one dataset, one indicator and two views
pub fn repository() -> InMemoryRepository {
    let definitions = json!([
        {"kind": "datasource", "id": "warehouse", "provider": "memory"},
        {"kind": "parameter", "id": "region", "type": "string", "default_value": "North"},
        {
            "kind": "query",
            "id": "sales-base",
            "name": "sales",
            "command": "select region, total from sales",
            "data_source": {"id": "ds", "ref": "#warehouse"},
            "parameters": [{"id": "p", "ref": "region"}]
        },
        {
            "kind": "indicator",
            "id": "kpi",
            "data_source": {"id": "ds", "ref": "warehouse"},
            "query": {"id": "kpi-all"},
            "measures": [{"id": "kpi-m", "name": "margin"}]
        },
        {
            "kind": "report",
            "id": "monthly",
            "name": "Monthly",
            "parameters": [{"id": "p", "ref": "#region"}],
            "datasets": [{"id": "d1", "ref": "#sales-base"}],
            "indicators": [{"id": "i1", "ref": "#kpi"}],
            "views": [
                {"id": "summary", "content": SUMMARY_VIEW},
                {"id": "broken", "content": BROKEN_VIEW}
            ]
        }
    ]);
    InMemoryRepository::from_json_str(&definitions.to_string()).expect("fixture definitions load")
}

/// Rows for every query in [`repository`]
pub fn data() -> MemoryDataSource {
    let rows = json!({
        "sales-base": [
            {"region": "North", "total": 10},
            {"region": "South", "total": 32}
        ],
        "kpi-all": [{"value": 40}],
        "kpi-m": [{"value": 7}]
    });
    MemoryDataSource::from_json_str(&rows.to_string()).expect("fixture rows load")
}

pub fn record(entries: &[(&str, Value)]) -> Record {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
