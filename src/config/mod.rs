//! Configuration management for unidef
//!
//! Handles runtime configuration loading (JSON or TOML), logging settings and
//! the default registration options.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::module::options::Options;
use crate::module::registry::ResolutionPolicy;

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Emit registration diagnostics (overridable with `UNIDEF_DIAGNOSTICS`)
    #[serde(default = "default_true")]
    pub diagnostics: bool,

    /// Behaviour of shared-namespace resolution for missing names
    #[serde(default)]
    pub resolution: ResolutionPolicy,

    /// Options used by `Runtime::configure_default`
    #[serde(default)]
    pub defaults: Options,

    /// Constant modules registered when the runtime starts
    #[serde(default)]
    pub constants: BTreeMap<String, serde_json::Value>,

    /// Logging configuration
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

fn default_true() -> bool {
    true
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            diagnostics: true,
            resolution: ResolutionPolicy::Strict,
            defaults: Options::default(),
            constants: BTreeMap::new(),
            logging: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log filter (e.g. "info", "unidef=debug"); `RUST_LOG` takes precedence
    #[serde(default)]
    pub filter: Option<String>,

    /// Emit JSON lines (requires the `json-logging` feature)
    #[serde(default)]
    pub json_format: bool,
}

impl RuntimeConfig {
    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RuntimeConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load by extension: `.toml` as TOML, anything else as JSON
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            _ => Self::from_json_file(path),
        }
    }
}
