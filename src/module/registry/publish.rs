//! Shared-namespace publication
//!
//! Exposes registered exports in the shared namespace and, on request, gives
//! them a `no_conflict` function that puts the previous slot value back.

use crate::module::namespace::Namespace;
use crate::module::options::Options;
use crate::module::value::{Function, Value, WeakFunction, WeakObject};

/// Member name of the restore function attached to published exports
pub const NO_CONFLICT_KEY: &str = "no_conflict";

/// What a publication did
#[derive(Debug, Clone)]
pub struct Publication {
    /// Namespace slot that was written
    pub slot: String,
    /// Slot value before publication
    pub previous: Option<Value>,
    /// Whether a restore function was attached to the exports
    pub restore_attached: bool,
}

/// Publish `exports` in the shared namespace when `options.global` asks for it
///
/// Returns `None` when nothing was published (publication disabled or falsy
/// exports). With `no_conflict`, object and function exports get a restore
/// member unless they already define one; other values cannot carry members
/// and are published without it.
pub fn publish_to_shared_namespace(
    namespace: &Namespace,
    name: &str,
    exports: &Value,
    options: &Options,
) -> Option<Publication> {
    let slot = options.global.publish_name(name)?.to_string();
    if !exports.is_truthy() {
        return None;
    }

    let previous = namespace.get(&slot);

    let mut restore_attached = false;
    if options.no_conflict {
        if let Some(members) = exports.members() {
            if !members.contains_key(NO_CONFLICT_KEY) {
                members.set(NO_CONFLICT_KEY, restore_function(namespace, &slot, previous.clone(), exports));
                restore_attached = true;
            }
        }
    }

    namespace.set(slot.clone(), exports.clone());

    Some(Publication {
        slot,
        previous,
        restore_attached,
    })
}

/// Zero-argument function restoring `slot` to `previous` and returning `exports`
///
/// Holds weak handles: the function lives inside `exports`, which lives in the
/// namespace.
fn restore_function(namespace: &Namespace, slot: &str, previous: Option<Value>, exports: &Value) -> Value {
    let namespace = namespace.downgrade();
    let exports = WeakExports::new(exports);
    let slot = slot.to_string();

    Value::Function(Function::new(NO_CONFLICT_KEY, move |_args| {
        if let Some(root) = namespace.upgrade() {
            match &previous {
                Some(value) => {
                    root.set(slot.clone(), value.clone());
                }
                None => {
                    root.remove(&slot);
                }
            }
        }
        Ok(exports.upgrade())
    }))
}

enum WeakExports {
    Object(WeakObject),
    Function(WeakFunction),
    None,
}

impl WeakExports {
    fn new(exports: &Value) -> Self {
        match exports {
            Value::Object(o) => WeakExports::Object(o.downgrade()),
            Value::Function(f) => WeakExports::Function(f.downgrade()),
            _ => WeakExports::None,
        }
    }

    fn upgrade(&self) -> Value {
        match self {
            WeakExports::Object(weak) => weak.upgrade().map(Value::Object),
            WeakExports::Function(weak) => weak.upgrade().map(Value::Function),
            WeakExports::None => None,
        }
        .unwrap_or_default()
    }
}
