//! Environment variable helpers
//!
//! Configuration in this workspace is read straight from the process
//! environment (after `dotenvy` has populated it). Unparseable values fall
//! back to the default instead of failing startup; `Config::validate` in the
//! server catches combinations that make no sense.

use std::str::FromStr;

/// Returns the first variable in `keys` that is set and non-empty.
pub fn first_of(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.trim().is_empty())
}

/// Reads a string variable, falling back to `default` when unset or empty.
pub fn string_or(key: &str, default: &str) -> String {
    first_of(&[key]).unwrap_or_else(|| default.to_string())
}

/// Reads and parses a variable, falling back to `default` on absence or parse failure.
pub fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    first_of(&[key])
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Reads a boolean flag. Accepts `true/false`, `1/0`, `yes/no`, `on/off`.
pub fn flag_or(key: &str, default: bool) -> bool {
    match first_of(&[key]).map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if matches!(v.as_str(), "true" | "1" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "false" | "0" | "no" | "off") => false,
        _ => default,
    }
}

/// Splits a comma separated variable into trimmed, non-empty entries.
pub fn list_or(key: &str, default: &[&str]) -> Vec<String> {
    match first_of(&[key]) {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        None => default.iter().map(|s| s.to_string()).collect(),
    }
}
