//! Utility modules for logging and environment overrides

pub mod env;
pub mod logging;

// Re-export commonly used items
pub use env::{env_flag, env_opt};
pub use logging::{init_logging, init_logging_from_config};
#[cfg(feature = "json-logging")]
pub use logging::init_json_logging;
