//! Registration options
//!
//! One `Options` value configures a registrar and applies to every module
//! registered through it.

use serde::{Deserialize, Serialize};

/// Whether, and under which name, a module is published in the shared namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GlobalOption {
    /// `true` publishes under the module name
    Flag(bool),
    /// Publish under this name
    Name(String),
}

impl Default for GlobalOption {
    fn default() -> Self {
        GlobalOption::Flag(false)
    }
}

impl GlobalOption {
    pub fn is_enabled(&self) -> bool {
        match self {
            GlobalOption::Flag(enabled) => *enabled,
            GlobalOption::Name(name) => !name.is_empty(),
        }
    }

    /// Namespace slot for `module_name`, if publication is enabled
    pub fn publish_name<'a>(&'a self, module_name: &'a str) -> Option<&'a str> {
        match self {
            GlobalOption::Flag(true) => Some(module_name),
            GlobalOption::Name(name) if !name.is_empty() => Some(name),
            _ => None,
        }
    }
}

/// Options for a configured registrar
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Publish results into the shared namespace
    pub global: GlobalOption,
    /// Attach a `no_conflict` restore function to published exports
    pub no_conflict: bool,
    /// Id handed to an async definer instead of the module name
    #[serde(alias = "amd_name")]
    pub amd_id: Option<String>,
    /// Do not pass an id to the async definer
    #[serde(alias = "annonymous")]
    pub anonymous: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish under the module name
    pub fn global(mut self) -> Self {
        self.global = GlobalOption::Flag(true);
        self
    }

    /// Publish under `name` instead of the module name
    pub fn global_as(mut self, name: impl Into<String>) -> Self {
        self.global = GlobalOption::Name(name.into());
        self
    }

    pub fn no_conflict(mut self) -> Self {
        self.no_conflict = true;
        self
    }

    pub fn amd_id(mut self, id: impl Into<String>) -> Self {
        self.amd_id = Some(id.into());
        self
    }

    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }
}
