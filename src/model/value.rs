//! Core value types produced by expressions and carried by result rows

use chrono::{DateTime, FixedOffset, TimeDelta};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

/// Ordered string-keyed record (a result row or an object value)
pub type Record = IndexMap<String, Value>;

/// Core value type for report data and expression results
///
/// `Empty` is the absent value: an identifier that resolves nowhere, a SQL
/// null in a row, or the result of an operation on an absent operand.
#[derive(Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(into = "JsonValue", from = "JsonValue")]
pub enum Value {
    /// Absent value
    #[default]
    Empty,

    /// Boolean value
    Boolean(bool),

    /// Integer value (64-bit signed)
    Integer(i64),

    /// Decimal value with arbitrary precision
    Decimal(Decimal),

    /// String value
    String(String),

    /// Unique identifier
    Uuid(Uuid),

    /// Point in time with its offset
    Timestamp(DateTime<FixedOffset>),

    /// Signed span of time
    Duration(TimeDelta),

    /// Ordered list of values
    List(Vec<Value>),

    /// Key-value object
    Object(Record),
}

impl Value {
    /// Create an object value from key/value pairs
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Check if the value is absent
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Truthiness used by conditional rendering: absent, false, zero and the
    /// empty string are false
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Empty => false,
            Self::Boolean(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::Decimal(d) => !d.is_zero(),
            Self::String(s) => !s.is_empty(),
            Self::List(items) => !items.is_empty(),
            Self::Object(_) | Self::Uuid(_) | Self::Timestamp(_) | Self::Duration(_) => true,
        }
    }

    /// Look up a key on an object value; any other shape has no keys
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Object(record) => record.get(key),
            _ => None,
        }
    }

    /// Get the type name for this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Boolean(_) => "Boolean",
            Self::Integer(_) => "Integer",
            Self::Decimal(_) => "Decimal",
            Self::String(_) => "String",
            Self::Uuid(_) => "Uuid",
            Self::Timestamp(_) => "Timestamp",
            Self::Duration(_) => "Duration",
            Self::List(_) => "List",
            Self::Object(_) => "Object",
        }
    }

    /// Try to convert to an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Decimal(d) if d.fract().is_zero() => d.to_i64(),
            _ => None,
        }
    }

    /// Try to read the value as a decimal, promoting integers
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Integer(i) => Some(Decimal::from(*i)),
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Try to convert to a string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to convert to a boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<TimeDelta> for Value {
    fn from(value: TimeDelta) -> Self {
        Self::Duration(value)
    }
}

/// Convert from serde_json::Value
///
/// Strings holding an RFC 3339 timestamp or a hyphenated UUID are lifted into
/// the typed variants so row data loaded from JSON compares naturally.
impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Empty,
            JsonValue::Bool(b) => Self::Boolean(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i)
                } else if let Ok(d) = n.to_string().parse::<Decimal>() {
                    Self::Decimal(d)
                } else {
                    Self::String(n.to_string())
                }
            }
            JsonValue::String(s) => {
                if let Ok(ts) = DateTime::parse_from_rfc3339(&s) {
                    Self::Timestamp(ts)
                } else if s.len() == 36 && s.contains('-') {
                    match Uuid::parse_str(&s) {
                        Ok(id) => Self::Uuid(id),
                        Err(_) => Self::String(s),
                    }
                } else {
                    Self::String(s)
                }
            }
            JsonValue::Array(items) => Self::List(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

/// Convert to serde_json::Value
impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Empty => JsonValue::Null,
            Value::Boolean(b) => JsonValue::Bool(b),
            Value::Integer(i) => JsonValue::Number(i.into()),
            Value::Decimal(d) => d
                .to_f64()
                .and_then(serde_json::Number::from_f64)
                .map(JsonValue::Number)
                .unwrap_or_else(|| JsonValue::String(d.to_string())),
            Value::String(s) => JsonValue::String(s),
            Value::Uuid(id) => JsonValue::String(id.to_string()),
            Value::Timestamp(ts) => JsonValue::String(ts.to_rfc3339()),
            Value::Duration(d) => JsonValue::String(d.to_string()),
            Value::List(items) => JsonValue::Array(items.into_iter().map(JsonValue::from).collect()),
            Value::Object(record) => JsonValue::Object(
                record
                    .into_iter()
                    .map(|(k, v)| (k, JsonValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Display is the text written into rendered output
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Uuid(id) => write!(f, "{id}"),
            Self::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
            Self::Duration(d) => write!(f, "{d}"),
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(|item| item.to_string()).collect();
                write!(f, "{}", parts.join(", "))
            }
            Self::Object(record) => {
                let parts: Vec<String> = record.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty"),
            Self::Boolean(b) => write!(f, "Boolean({b})"),
            Self::Integer(i) => write!(f, "Integer({i})"),
            Self::Decimal(d) => write!(f, "Decimal({d})"),
            Self::String(s) => write!(f, "String({s:?})"),
            Self::Uuid(id) => write!(f, "Uuid({id})"),
            Self::Timestamp(ts) => write!(f, "Timestamp({})", ts.to_rfc3339()),
            Self::Duration(d) => write!(f, "Duration({d})"),
            Self::List(items) => f.debug_list().entries(items).finish(),
            Self::Object(record) => f.debug_map().entries(record.iter()).finish(),
        }
    }
}
