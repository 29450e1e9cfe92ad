//! Diagnostic sink
//!
//! Every registration stage reports through one sink. Enabled sinks forward to
//! `tracing` at debug level; disabled sinks drop messages. Logging never fails
//! and never blocks the caller beyond what the installed subscriber does.

use std::fmt;
use tracing::debug;

use crate::utils::env_flag;

/// Environment variable that overrides the configured diagnostics toggle
pub const DIAGNOSTICS_ENV: &str = "UNIDEF_DIAGNOSTICS";

/// Labeled diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticSink {
    enabled: bool,
}

impl DiagnosticSink {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Build a sink from the configured toggle, letting `UNIDEF_DIAGNOSTICS`
    /// override it when set
    pub fn from_env(configured: bool) -> Self {
        Self::new(env_flag(DIAGNOSTICS_ENV).unwrap_or(configured))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Emit a message for a registration stage
    pub fn log(&self, stage: &str, message: impl fmt::Display) {
        if self.enabled {
            debug!(target: "unidef", stage, "{}", message);
        }
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new(true)
    }
}
