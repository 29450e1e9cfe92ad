//! Module system for unidef
//!
//! This module provides module registration with eager dependency resolution,
//! working unchanged under three kinds of host.
//!
//! ## Architecture
//!
//! - **Host Capabilities**: Hosts inject what they offer; the mode is detected once
//! - **Dependency Resolution**: Specials, literals and names, resolved per mode
//! - **Module Registry**: One registration per name, shared by all registrars
//! - **Shared Namespace**: Optional publication with a `no_conflict` restore
//! - **Diagnostics**: Every stage reports through one sink

pub mod diagnostics;
pub mod host;
pub mod namespace;
pub mod options;
pub mod registrar;
pub mod registry;
pub mod runtime;
pub mod traits;
pub mod value;

pub use diagnostics::DiagnosticSink;
pub use host::{detect, HostCapabilities, Mode};
pub use namespace::Namespace;
pub use options::{GlobalOption, Options};
pub use registrar::ModuleRegistrar;
pub use registry::{DependencyRef, ModuleRegistry, Publication, ResolutionPolicy, Specials};
pub use runtime::Runtime;
pub use traits::{
    AsyncDefiner, AsyncRequire, Definition, Factory, PackageHost, RegistrationError, RequireCallback,
};
pub use value::{Function, Object, Value};
