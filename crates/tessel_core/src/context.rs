//! Context maps
//!
//! Every component carries an immutable map of context values. A child gets
//! its parent's map unless its mount options supply one; setting a value
//! during setup copies the map first, so siblings and ancestors never see
//! each other's writes.

use std::any::Any;
use std::rc::Rc;

use rustc_hash::FxHashMap;

/// Shared, copy-on-write map from keys to typed values
#[derive(Clone, Default)]
pub struct ContextMap {
    values: Rc<FxHashMap<String, Rc<dyn Any>>>,
}

impl ContextMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Look up `key`, returning `None` when it is missing or holds another type
    pub fn get<T: 'static>(&self, key: &str) -> Option<Rc<T>> {
        self.values.get(key)?.clone().downcast::<T>().ok()
    }

    /// Insert or replace `key`; other maps sharing the storage are unaffected
    pub fn insert<T: 'static>(&mut self, key: impl Into<String>, value: T) {
        Rc::make_mut(&mut self.values).insert(key.into(), Rc::new(value));
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with<T: 'static>(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert(key, value);
        self
    }
}

impl std::fmt::Debug for ContextMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}
