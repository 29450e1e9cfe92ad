//! Module registry and dependency resolution
//!
//! Handles the name -> exports registry, dependency resolution, and
//! publication into the shared namespace.

pub mod dependencies;
pub mod publish;
pub mod store;
pub mod strategy;

pub use dependencies::{default_dependencies, resolve, resolve_all, DependencyRef, Specials};
pub use publish::{publish_to_shared_namespace, Publication, NO_CONFLICT_KEY};
pub use store::ModuleRegistry;
pub use strategy::{final_segment, ResolutionPolicy, ResolutionStrategy};
