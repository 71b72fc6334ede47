use std::env::{self, VarError};

use super::types::ConfigError;

/// Raw lookup result for one variable, decoupled from `std::env` so parsing can be
/// exercised without touching the process environment.
pub(super) type Lookup = Result<String, VarError>;

pub(super) fn process_env(key: &str) -> Lookup {
    env::var(key)
}

pub(super) fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Lookup,
{
    match lookup(key) {
        Ok(value) => Ok(value),
        Err(VarError::NotPresent) => Err(ConfigError::MissingVar(key)),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(key)),
    }
}

pub(super) fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Lookup,
{
    lookup(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

pub(super) fn or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Lookup,
{
    optional(lookup, key).unwrap_or_else(|| default.to_string())
}

pub(super) fn parse_bool(value: &str) -> bool {
    matches!(value, "1" | "true" | "TRUE" | "yes" | "YES" | "on" | "ON")
}
