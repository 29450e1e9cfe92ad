//! Host capabilities and environment detection
//!
//! The runtime never inspects ambient globals. Whatever the embedding host
//! offers (an async definer, an async require, a package loader, the shared
//! namespace) is injected once through [`HostCapabilities`], and the active
//! [`Mode`] is derived from it when the runtime is built.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::module::namespace::Namespace;
use crate::module::traits::{AsyncDefiner, AsyncRequire, PackageHost};

/// Host collaborators available to the runtime
#[derive(Clone, Default)]
pub struct HostCapabilities {
    pub async_definer: Option<Arc<dyn AsyncDefiner>>,
    pub async_require: Option<Arc<dyn AsyncRequire>>,
    pub package: Option<Arc<dyn PackageHost>>,
    pub namespace: Namespace,
}

impl HostCapabilities {
    /// A bare host: shared namespace only
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_async_definer(mut self, definer: Arc<dyn AsyncDefiner>) -> Self {
        self.async_definer = Some(definer);
        self
    }

    pub fn with_async_require(mut self, require: Arc<dyn AsyncRequire>) -> Self {
        self.async_require = Some(require);
        self
    }

    pub fn with_package_host(mut self, package: Arc<dyn PackageHost>) -> Self {
        self.package = Some(package);
        self
    }

    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;
        self
    }
}

impl fmt::Debug for HostCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostCapabilities")
            .field("async_definer", &self.async_definer.is_some())
            .field("async_require", &self.async_require.is_some())
            .field("package", &self.package.is_some())
            .field("namespace", &self.namespace)
            .finish()
    }
}

/// Active host mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Definitions are handed to an asynchronous module definer
    AsyncDefiner,
    /// Factories run immediately against a synchronous package loader
    PackageLoader,
    /// Factories run immediately against the shared namespace
    SharedNamespace,
}

impl Mode {
    /// Position picked from a `[browser, package]` disambiguation pair
    pub fn disambiguation_index(self) -> usize {
        match self {
            Mode::PackageLoader => 1,
            Mode::AsyncDefiner | Mode::SharedNamespace => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::AsyncDefiner => "async_definer",
            Mode::PackageLoader => "package_loader",
            Mode::SharedNamespace => "shared_namespace",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the host mode, in priority order
///
/// 1. an async definer advertising async module definition
/// 2. a package loader
/// 3. the shared namespace
pub fn detect(host: &HostCapabilities) -> Mode {
    if host.async_definer.as_ref().is_some_and(|d| d.is_amd()) {
        return Mode::AsyncDefiner;
    }
    if host.package.is_some() {
        return Mode::PackageLoader;
    }
    Mode::SharedNamespace
}
