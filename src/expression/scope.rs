//! Key-value capability of the objects expressions are evaluated against

use crate::model::{Record, Value};

/// Anything exposing string-keyed lookup
///
/// Identifier lookups walk a chain of scoped objects; a scope that does not
/// hold a key answers `None` and the search moves on to the enclosing one.
pub trait ScopedObject {
    /// Look up `key`; `None` when the scope has no such key
    fn try_get(&self, key: &str) -> Option<Value>;
}

impl ScopedObject for Record {
    fn try_get(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

/// Object values expose their fields; every other value has no keys
impl ScopedObject for Value {
    fn try_get(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

/// A scope holding nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyScope;

impl ScopedObject for EmptyScope {
    fn try_get(&self, _key: &str) -> Option<Value> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_objects_have_keys() {
        let object = Value::object([("a", Value::Integer(1))]);
        assert_eq!(object.try_get("a"), Some(Value::Integer(1)));
        assert_eq!(object.try_get("b"), None);
        assert_eq!(Value::from("a").try_get("a"), None);
        assert_eq!(EmptyScope.try_get("a"), None);
    }
}
