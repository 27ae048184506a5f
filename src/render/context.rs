//! Render contexts: the scope chain a view is rendered against

use std::any::Any;
use std::cell::RefCell;
use std::fmt;

use rustc_hash::FxHashMap;

use crate::expression::ScopedObject;
use crate::result::{ResultEntry, ResultSet};

/// One scope frame of a render operation
///
/// Contexts form a singly-linked chain through [`parent`](Self::parent); the
/// root has no parent. A component that enters a new data scope creates a
/// child context for its children and drops it when they are rendered. The
/// tag map is free-form per-context storage; the expression evaluator keeps
/// its compiled-expression table there.
pub struct RenderContext<'a> {
    scope: &'a dyn ScopedObject,
    parent: Option<&'a RenderContext<'a>>,
    datasets: Option<&'a ResultSet>,
    tags: RefCell<FxHashMap<&'static str, Box<dyn Any>>>,
}

impl fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("depth", &self.depth())
            .field("tags", &self.tags.borrow().keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl<'a> RenderContext<'a> {
    /// Create a root context over a scope object
    pub fn root(scope: &'a dyn ScopedObject) -> Self {
        Self {
            scope,
            parent: None,
            datasets: None,
            tags: RefCell::new(FxHashMap::default()),
        }
    }

    /// Attach the result set that dataset lookups resolve against
    pub fn with_datasets(mut self, datasets: &'a ResultSet) -> Self {
        self.datasets = Some(datasets);
        self
    }

    /// Create a nested context bound to `scope`; datasets are inherited
    pub fn child<'b>(&'b self, scope: &'b dyn ScopedObject) -> RenderContext<'b> {
        RenderContext {
            scope,
            parent: Some(self),
            datasets: self.datasets,
            tags: RefCell::new(FxHashMap::default()),
        }
    }

    /// The bound scope object
    pub fn scope(&self) -> &'a dyn ScopedObject {
        self.scope
    }

    /// The enclosing context, `None` at the root
    pub fn parent(&self) -> Option<&'a RenderContext<'a>> {
        self.parent
    }

    /// Number of enclosing contexts
    pub fn depth(&self) -> usize {
        std::iter::successors(self.parent, |c| c.parent).count()
    }

    /// Look up a dataset by name
    pub fn dataset(&self, name: &str) -> Option<&'a ResultEntry> {
        self.datasets.and_then(|d| d.get(name))
    }

    /// Run `f` on the tag stored under `key`, creating it with `Default` first
    ///
    /// A tag of a different type stored under the same key is replaced.
    pub fn with_tag<T, R>(&self, key: &'static str, f: impl FnOnce(&mut T) -> R) -> R
    where
        T: Any + Default,
    {
        let mut tags = self.tags.borrow_mut();
        let slot = tags.entry(key).or_insert_with(|| Box::new(T::default()));
        if !slot.is::<T>() {
            *slot = Box::new(T::default());
        }
        match slot.downcast_mut::<T>() {
            Some(tag) => f(tag),
            None => f(&mut T::default()),
        }
    }

    /// Check if a tag is stored under `key`
    pub fn has_tag(&self, key: &str) -> bool {
        self.tags.borrow().contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Record, Value};

    fn record(key: &str, value: i64) -> Record {
        let mut r = Record::new();
        r.insert(key.to_string(), Value::Integer(value));
        r
    }

    #[test]
    fn test_scope_chain() {
        let root_scope = record("a", 1);
        let child_scope = record("b", 2);
        let root = RenderContext::root(&root_scope);
        let child = root.child(&child_scope);
        let empty = Value::Empty;
        let grandchild = child.child(&empty);

        assert_eq!(root.depth(), 0);
        assert_eq!(grandchild.depth(), 2);
        assert!(root.parent().is_none());
        let parent = grandchild.parent().unwrap();
        assert_eq!(parent.scope().try_get("b"), Some(Value::Integer(2)));
        assert_eq!(
            parent.parent().unwrap().scope().try_get("a"),
            Some(Value::Integer(1))
        );
    }

    #[test]
    fn test_tags_are_per_context() {
        let scope = Record::new();
        let root = RenderContext::root(&scope);
        let child = root.child(&scope);

        root.with_tag("counter", |n: &mut usize| *n += 1);
        root.with_tag("counter", |n: &mut usize| *n += 1);
        assert_eq!(root.with_tag("counter", |n: &mut usize| *n), 2);
        assert!(!child.has_tag("counter"));

        // A different type under the same key starts fresh
        assert_eq!(root.with_tag("counter", |s: &mut String| s.len()), 0);
    }
}
