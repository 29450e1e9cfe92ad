//! Environment variable utilities
//!
//! Provides helpers for reading environment overrides.

/// Get environment variable as Option
///
/// Returns `Some(value)` if set, `None` if not set.
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get environment variable as a tri-state flag
///
/// "true", "1", "yes", "on" are `Some(true)`; "false", "0", "no", "off" are
/// `Some(false)` (case-insensitive). Unset or unrecognised values are `None`.
pub fn env_flag(key: &str) -> Option<bool> {
    let value = env_opt(key)?.trim().to_lowercase();
    match value.as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
