//! unidef - universal module definition runtime
//!
//! Module authors declare a name, optional dependencies and a factory. The
//! runtime resolves the dependencies, runs the factory and registers the
//! result so later modules can depend on it by name. The same registration
//! works under three hosts:
//!
//! 1. an asynchronous module definer (definitions are handed over)
//! 2. a synchronous package loader (results become the package exports)
//! 3. a bare shared namespace (results are registered, optionally published)
//!
//! ## Design Principles
//!
//! 1. **Injected Hosts**: Host capabilities are values, never ambient globals
//! 2. **Eager Resolution**: Missing dependencies fail the registration up front
//! 3. **Single Registration**: A module name is registered at most once
//!
//! ```rust
//! use unidef::{Factory, HostCapabilities, Options, Runtime, Value};
//!
//! let runtime = Runtime::new(HostCapabilities::new());
//! let define = runtime.configure(Options::new().global());
//!
//! define
//!     .define("answer", Factory::from_fn("answer", |_specials| Ok(Value::from(42.0))))
//!     .unwrap();
//!
//! assert_eq!(runtime.namespace().get("answer"), Some(Value::from(42.0)));
//! ```

pub mod config;
pub mod module;
pub mod utils;

// Re-export config module
pub use config::*;

pub use module::{
    DependencyRef, Factory, Function, HostCapabilities, Mode, ModuleRegistrar, ModuleRegistry,
    Namespace, Object, Options, RegistrationError, ResolutionPolicy, Runtime, Value,
};
