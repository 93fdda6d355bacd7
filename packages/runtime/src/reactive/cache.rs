use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::tag::{consume, current_revision, track, Revision, Tag};

/// A memoized computation, recomputed only when something it read changed.
pub struct Cache<T> {
    inner: Rc<CacheInner<T>>,
}

struct CacheInner<T> {
    compute: Box<dyn Fn() -> T>,
    state: RefCell<Option<Computed<T>>>,
}

struct Computed<T> {
    value: T,
    tag: Tag,
    snapshot: Revision,
}

impl<T> Clone for Cache<T> {
    fn clone(&self) -> Self {
        Cache {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Cache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        match state.as_ref() {
            Some(computed) => f
                .debug_struct("Cache")
                .field("value", &computed.value)
                .field("tag", &computed.tag)
                .finish(),
            None => f.write_str("Cache(<not computed>)"),
        }
    }
}

impl<T: Clone + 'static> Cache<T> {
    pub fn new(compute: impl Fn() -> T + 'static) -> Self {
        Cache {
            inner: Rc::new(CacheInner {
                compute: Box::new(compute),
                state: RefCell::new(None),
            }),
        }
    }

    /// The current value. Reading a cache inside another cache's computation
    /// makes the outer one depend on everything this one read.
    pub fn value(&self) -> T {
        let cached = self.inner.state.borrow().as_ref().and_then(|computed| {
            computed
                .tag
                .validate(computed.snapshot)
                .then(|| (computed.value.clone(), computed.tag.clone()))
        });
        if let Some((value, tag)) = cached {
            consume(&tag);
            return value;
        }

        let (value, tag) = track(|| (self.inner.compute)());
        consume(&tag);
        *self.inner.state.borrow_mut() = Some(Computed {
            value: value.clone(),
            tag,
            snapshot: current_revision(),
        });
        value
    }

    /// Whether the last computation read nothing that can change. A cache
    /// that has not been computed yet is not constant.
    pub fn is_const(&self) -> bool {
        self.inner
            .state
            .borrow()
            .as_ref()
            .is_some_and(|computed| computed.tag.is_const())
    }
}

pub fn create_cache<T: Clone + 'static>(compute: impl Fn() -> T + 'static) -> Cache<T> {
    Cache::new(compute)
}

pub fn get_value<T: Clone + 'static>(cache: &Cache<T>) -> T {
    cache.value()
}

pub fn is_const<T: Clone + 'static>(cache: &Cache<T>) -> bool {
    cache.is_const()
}
