//! Mode-specific resolution strategies
//!
//! A strategy turns a plain dependency name into a value. The package-loader
//! strategy delegates to the host; the shared-namespace strategy looks in the
//! registry first and the shared namespace second.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::module::diagnostics::DiagnosticSink;
use crate::module::namespace::Namespace;
use crate::module::registry::store::ModuleRegistry;
use crate::module::traits::{PackageHost, RegistrationError};
use crate::module::value::{Function, Value};

/// What shared-namespace resolution does with a name it cannot find
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionPolicy {
    /// Fail the registration with `UnresolvedDependency`
    #[default]
    Strict,
    /// Log and hand `Value::Undefined` to the factory
    Lax,
}

/// Resolution function of the active mode
#[derive(Clone)]
pub enum ResolutionStrategy {
    PackageLoader {
        host: Arc<dyn PackageHost>,
    },
    SharedNamespace {
        registry: ModuleRegistry,
        namespace: Namespace,
        policy: ResolutionPolicy,
        sink: DiagnosticSink,
    },
}

impl ResolutionStrategy {
    /// Resolve a plain dependency name
    pub fn resolve(&self, id: &str) -> Result<Value, RegistrationError> {
        match self {
            ResolutionStrategy::PackageLoader { host } => host.require(id),
            ResolutionStrategy::SharedNamespace {
                registry,
                namespace,
                policy,
                sink,
            } => {
                let name = final_segment(id);
                sink.log("require_global", format_args!("name: {}", name));

                let found = registry
                    .lookup(name)
                    .or_else(|| namespace.get(name).filter(Value::is_truthy));
                match (found, policy) {
                    (Some(value), _) => Ok(value),
                    (None, ResolutionPolicy::Strict) => {
                        Err(RegistrationError::UnresolvedDependency(name.to_string()))
                    }
                    (None, ResolutionPolicy::Lax) => {
                        sink.log(
                            "require_global",
                            format_args!("module not yet available, name: {}", name),
                        );
                        Ok(Value::Undefined)
                    }
                }
            }
        }
    }

    /// The strategy as a callable, handed to factories as the `require` special
    ///
    /// Non-string arguments are returned unchanged.
    pub fn require_function(&self) -> Function {
        let strategy = self.clone();
        Function::new("require", move |args| match args.first() {
            Some(Value::String(id)) => strategy.resolve(id),
            Some(other) => Ok(other.clone()),
            None => Ok(Value::Undefined),
        })
    }
}

impl fmt::Debug for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionStrategy::PackageLoader { .. } => f.write_str("ResolutionStrategy::PackageLoader"),
            ResolutionStrategy::SharedNamespace { policy, .. } => {
                write!(f, "ResolutionStrategy::SharedNamespace({:?})", policy)
            }
        }
    }
}

/// Last `/`-separated segment of a path-style identifier
pub fn final_segment(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}
