//! Module system traits and interfaces
//!
//! Defines the host collaborators the runtime talks to, the factory and
//! definition types handed across that boundary, and the error type every
//! registration returns.

use std::fmt;
use thiserror::Error;

use crate::module::registry::dependencies::DependencyRef;
use crate::module::value::{Function, Object, Value};

/// A module factory.
///
/// Callable factories are invoked with the resolved dependencies. Anything
/// else is a constant module and is published verbatim.
#[derive(Clone)]
pub enum Factory {
    /// Invoked with one argument per resolved dependency
    Callable(Function),
    /// Already-resolved module value
    Value(Value),
}

impl Factory {
    /// Build a callable factory from a closure
    pub fn from_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, RegistrationError> + Send + Sync + 'static,
    {
        Factory::Callable(Function::new(name, f))
    }

    /// Whether this factory will be invoked
    pub fn is_callable(&self) -> bool {
        matches!(self, Factory::Callable(_))
    }

    /// The factory as a plain value (functions included)
    pub fn to_value(&self) -> Value {
        match self {
            Factory::Callable(f) => Value::Function(f.clone()),
            Factory::Value(v) => v.clone(),
        }
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Factory::Callable(func) => write!(f, "Factory::Callable({})", func.name()),
            Factory::Value(v) => write!(f, "Factory::Value({:?})", v),
        }
    }
}

impl From<Function> for Factory {
    fn from(f: Function) -> Self {
        Factory::Callable(f)
    }
}

impl From<Value> for Factory {
    fn from(value: Value) -> Self {
        match value {
            Value::Function(f) => Factory::Callable(f),
            other => Factory::Value(other),
        }
    }
}

impl From<Object> for Factory {
    fn from(object: Object) -> Self {
        Factory::Value(Value::Object(object))
    }
}

/// Parameters handed to an async definer
///
/// Mirrors the `define([id], [dependencies], factory)` call shape: `id` is
/// absent for anonymous definitions and `dependencies` is absent when the
/// module author declared none.
#[derive(Debug, Clone)]
pub struct Definition {
    /// Published module id (`amd_id` override or the module name)
    pub id: Option<String>,
    /// Dependencies, already disambiguated for the active host
    pub dependencies: Option<Vec<DependencyRef>>,
    /// Module factory
    pub factory: Factory,
}

/// Callback invoked by an async require once the requested modules resolve
pub type RequireCallback = Box<dyn FnOnce(Vec<Value>) + Send + 'static>;

/// Asynchronous module definer provided by the host
pub trait AsyncDefiner: Send + Sync {
    /// Whether the definer advertises async module definition support
    fn is_amd(&self) -> bool;

    /// Register a definition for later (host-scheduled) evaluation
    fn define(&self, definition: Definition) -> Result<(), RegistrationError>;
}

/// Asynchronous resolution function provided by the host
///
/// The host decides when `callback` runs. Hosts that evaluate eagerly call it
/// before returning; others may call it later or not at all.
pub trait AsyncRequire: Send + Sync {
    /// Request modules by name
    fn require(&self, names: Vec<String>, callback: RequireCallback)
        -> Result<(), RegistrationError>;
}

/// Synchronous package-style loader provided by the host
pub trait PackageHost: Send + Sync {
    /// Resolve a dependency by name, synchronously
    fn require(&self, id: &str) -> Result<Value, RegistrationError>;

    /// Export record accumulated for the module being defined
    fn exports(&self) -> Object;

    /// Replace the module's export value
    fn set_exports(&self, value: Value);

    /// Host handle for the module being defined
    fn module_handle(&self) -> Value;
}

/// Module system errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    #[error("Module already registered: {0}")]
    DuplicateRegistration(String),

    #[error("Async require not found while defining global module: {0}")]
    MissingAsyncResolver(String),

    #[error("Unresolved dependency: {0}")]
    UnresolvedDependency(String),

    #[error("Value is not callable: {0}")]
    NotCallable(String),

    #[error("Host error: {0}")]
    Host(String),

    #[error("Factory failed: {0}")]
    Factory(String),
}

impl From<serde_json::Error> for RegistrationError {
    fn from(e: serde_json::Error) -> Self {
        RegistrationError::Host(e.to_string())
    }
}

impl From<anyhow::Error> for RegistrationError {
    fn from(e: anyhow::Error) -> Self {
        RegistrationError::Factory(e.to_string())
    }
}
