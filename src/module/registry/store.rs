//! Module registry
//!
//! Maps module names to published exports. Each name is registered at most
//! once; entries are never replaced or removed.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::module::traits::RegistrationError;
use crate::module::value::{Object, Value};

/// Registered modules, shared by every registrar of a runtime
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: Arc<RwLock<HashMap<String, Value>>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `exports` under `name`
    ///
    /// Falsy exports are stored as an empty record. Returns the stored value.
    pub fn insert(&self, name: &str, exports: Value) -> Result<Value, RegistrationError> {
        let stored = if exports.is_truthy() {
            exports
        } else {
            Value::Object(Object::new())
        };

        // Check and insert under one write lock
        let mut modules = self.modules.write();
        if modules.contains_key(name) {
            return Err(RegistrationError::DuplicateRegistration(name.to_string()));
        }
        modules.insert(name.to_string(), stored.clone());
        Ok(stored)
    }

    /// Exports registered under `name`
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.modules.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.read().contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.modules.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.modules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.read().is_empty()
    }
}
