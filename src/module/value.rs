//! Runtime values exchanged between modules
//!
//! Dependencies, exports and factory results are dynamically typed. Objects
//! and functions are shared handles: cloning a `Value` never copies the
//! underlying record, so an exports object looked up from the registry is the
//! same object the factory returned.

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::{Arc, Weak};

use crate::module::traits::RegistrationError;

type NativeFn = dyn Fn(&[Value]) -> Result<Value, RegistrationError> + Send + Sync;
type Fields = RwLock<BTreeMap<String, Value>>;

/// A callable value
///
/// Functions carry their own member record, so a module exporting a function
/// can still expose properties such as `no_conflict`.
#[derive(Clone)]
pub struct Function {
    name: Arc<str>,
    inner: Arc<NativeFn>,
    members: Object,
}

/// Non-owning handle to a [`Function`]
#[derive(Clone)]
pub struct WeakFunction {
    name: Arc<str>,
    inner: Weak<NativeFn>,
    members: WeakObject,
}

impl WeakFunction {
    pub fn upgrade(&self) -> Option<Function> {
        Some(Function {
            name: Arc::clone(&self.name),
            inner: self.inner.upgrade()?,
            members: self.members.upgrade()?,
        })
    }
}

impl Function {
    /// Wrap a closure as a callable value
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, RegistrationError> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            inner: Arc::new(f),
            members: Object::new(),
        }
    }

    /// Invoke the function
    pub fn call(&self, args: &[Value]) -> Result<Value, RegistrationError> {
        (self.inner)(args)
    }

    /// Function name, used in diagnostics only
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Properties attached to the function
    pub fn members(&self) -> &Object {
        &self.members
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn downgrade(&self) -> WeakFunction {
        WeakFunction {
            name: Arc::clone(&self.name),
            inner: Arc::downgrade(&self.inner),
            members: self.members.downgrade(),
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[function {}]", self.name)
    }
}

/// A shared, mutable record of named values
#[derive(Clone, Default)]
pub struct Object {
    fields: Arc<Fields>,
}

/// Non-owning handle to an [`Object`]
#[derive(Clone)]
pub struct WeakObject {
    fields: Weak<Fields>,
}

impl WeakObject {
    /// Recover the object if it is still alive
    pub fn upgrade(&self) -> Option<Object> {
        self.fields.upgrade().map(|fields| Object { fields })
    }
}

impl Object {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record from key/value pairs
    pub fn from_fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let map = fields.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self {
            fields: Arc::new(RwLock::new(map)),
        }
    }

    /// Read a field
    pub fn get(&self, key: &str) -> Option<Value> {
        self.fields.read().get(key).cloned()
    }

    /// Write a field, returning the previous value
    pub fn set(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.write().insert(key.into(), value)
    }

    /// Remove a field, returning its value
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.fields.write().remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.read().contains_key(key)
    }

    /// Field names, in sorted order
    pub fn keys(&self) -> Vec<String> {
        self.fields.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.fields.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.read().is_empty()
    }

    /// Call a function stored in a field
    pub fn call_method(&self, key: &str, args: &[Value]) -> Result<Value, RegistrationError> {
        // Clone out of the lock before calling: the method may touch this object.
        let method = self
            .get(key)
            .ok_or_else(|| RegistrationError::NotCallable(format!("missing member {}", key)))?;
        method.call(args)
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.fields, &other.fields)
    }

    pub fn downgrade(&self) -> WeakObject {
        WeakObject {
            fields: Arc::downgrade(&self.fields),
        }
    }

    fn addr(&self) -> usize {
        Arc::as_ptr(&self.fields) as usize
    }
}

impl fmt::Debug for Object {
    // Keys only: objects may reference themselves through their members.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object").field("keys", &self.keys()).finish()
    }
}

/// A dynamically typed module value
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Object(Object),
    Function(Function),
}

impl Value {
    /// Truthiness, as used for "empty result" checks
    ///
    /// Undefined, null, false, zero, NaN and the empty string are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Object(_) | Value::Function(_) => true,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Call this value as a function
    pub fn call(&self, args: &[Value]) -> Result<Value, RegistrationError> {
        match self {
            Value::Function(f) => f.call(args),
            other => Err(RegistrationError::NotCallable(other.type_name().to_string())),
        }
    }

    /// Member record of an object or function value
    pub fn members(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            Value::Function(f) => Some(f.members()),
            _ => None,
        }
    }

    /// Read a member of an object or function value
    pub fn get(&self, key: &str) -> Option<Value> {
        self.members().and_then(|o| o.get(key))
    }

    /// Call a function stored in a member
    pub fn call_method(&self, key: &str, args: &[Value]) -> Result<Value, RegistrationError> {
        match self.members() {
            Some(members) => members.call_method(key, args),
            None => Err(RegistrationError::NotCallable(format!(
                "{} has no member {}",
                self.type_name(),
                key
            ))),
        }
    }

    /// Short type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    /// Identity-preserving equality for objects and functions
    pub fn same_as(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => self == other,
        }
    }

    /// JSON rendering for diagnostics
    ///
    /// Functions render as `"[function name]"`, undefined as null and an
    /// object already being rendered further up as `"[circular]"`.
    pub fn to_json(&self) -> serde_json::Value {
        self.to_json_inner(&mut HashSet::new())
    }

    fn to_json_inner(&self, ancestors: &mut HashSet<usize>) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Function(f) => serde_json::Value::String(format!("{:?}", f)),
            Value::Object(o) => {
                if !ancestors.insert(o.addr()) {
                    return serde_json::Value::String("[circular]".to_string());
                }
                let map = o
                    .keys()
                    .into_iter()
                    .filter_map(|k| o.get(&k).map(|v| (k, v.to_json_inner(ancestors))))
                    .collect();
                ancestors.remove(&o.addr());
                serde_json::Value::Object(map)
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

/// Arrays become objects keyed by index with a `length` member.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                let len = items.len();
                let object = Object::from_fields(
                    items
                        .into_iter()
                        .enumerate()
                        .map(|(i, v)| (i.to_string(), Value::from(v))),
                );
                object.set("length", Value::Number(len as f64));
                Value::Object(object)
            }
            serde_json::Value::Object(map) => Value::Object(Object::from_fields(
                map.into_iter().map(|(k, v)| (k, Value::from(v))),
            )),
        }
    }
}
