//! Shared namespace
//!
//! The ambient object used as dependency source and publication target when
//! no module system is present. Always available, even when a definer or a
//! package loader is active.

use crate::module::value::{Object, Value, WeakObject};

/// Process-wide shared namespace
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    root: Object,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing object as the namespace root
    pub fn from_object(root: Object) -> Self {
        Self { root }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.root.get(name)
    }

    /// Overwrite a slot, returning what was there
    pub fn set(&self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.root.set(name, value)
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.root.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.root.contains_key(name)
    }

    pub fn as_object(&self) -> &Object {
        &self.root
    }

    /// The namespace itself as a value (the module handle of standalone hosts)
    pub fn as_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    pub(crate) fn downgrade(&self) -> WeakObject {
        self.root.downgrade()
    }
}
