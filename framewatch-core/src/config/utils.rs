//! Configuration utility functions
//!
//! Helpers for layering `FRAMEWATCH_*` overrides onto configuration values.

use super::ENV_PREFIX;

use std::path::PathBuf;
use std::str::FromStr;

fn lookup_key<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(&format!("{ENV_PREFIX}{key}"))
}

/// Replace `target` with the parsed value of `key`, if present and valid.
pub(super) fn override_value<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(raw) = lookup_key(lookup, key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => *target = value,
        Err(_) => log::warn!("Ignoring {ENV_PREFIX}{key}={raw:?}: not a valid value"),
    }
}

/// Replace `target` with the value of `key` if it is present and non-empty.
pub(super) fn override_string<F>(lookup: &F, key: &str, target: &mut String)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup_key(lookup, key).filter(|v| !v.trim().is_empty()) {
        *target = raw.trim().to_string();
    }
}

/// Replace `target` with the path in `key` if it is present and non-empty.
pub(super) fn override_path<F>(lookup: &F, key: &str, target: &mut PathBuf)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup_key(lookup, key).filter(|v| !v.is_empty()) {
        *target = PathBuf::from(raw);
    }
}
