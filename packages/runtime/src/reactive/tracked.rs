use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::tag::{consume, Tag};
use crate::value::Value;

/// A string keyed object whose properties are tracked one by one: a cache
/// that read `user.name` is invalidated by writing `name`, not by writing
/// `user.age`.
#[derive(Clone, Default)]
pub struct TrackedObject {
    inner: Rc<TrackedInner>,
}

#[derive(Default)]
struct TrackedInner {
    values: RefCell<IndexMap<String, Value>>,
    tags: RefCell<HashMap<String, Tag>>,
}

impl TrackedObject {
    pub fn new() -> Self {
        Self::default()
    }

    fn tag_for(&self, key: &str) -> Tag {
        self.inner
            .tags
            .borrow_mut()
            .entry(key.to_string())
            .or_insert_with(Tag::dirtyable)
            .clone()
    }

    /// Reads `key`, `Undefined` when missing.
    pub fn get(&self, key: &str) -> Value {
        consume(&self.tag_for(key));
        self.inner.values.borrow().get(key).cloned().unwrap_or_default()
    }

    pub fn set(&self, key: &str, value: impl Into<Value>) {
        self.inner.values.borrow_mut().insert(key.to_string(), value.into());
        self.tag_for(key).dirty();
    }

    pub fn update(&self, key: &str, f: impl FnOnce(&Value) -> Value) {
        let next = {
            let values = self.inner.values.borrow();
            f(values.get(key).unwrap_or(&Value::Undefined))
        };
        self.set(key, next);
    }

    /// Property names in insertion order. Not tracked.
    pub fn keys(&self) -> Vec<String> {
        self.inner.values.borrow().keys().cloned().collect()
    }

    pub fn ptr_eq(&self, other: &TrackedObject) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for TrackedObject {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let object = TrackedObject::new();
        object
            .inner
            .values
            .borrow_mut()
            .extend(iter.into_iter().map(|(key, value)| (key.into(), value.into())));
        object
    }
}

impl fmt::Debug for TrackedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.inner.values.borrow().iter()).finish()
    }
}
