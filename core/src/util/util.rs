// src/util/util.rs

use crate::error::Error;

/// retrieve environment variable
/// Returns a configuration error if the variable is undefined or empty
pub fn getenv(key: &str) -> Result<String, Error> {
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::Config(format!("Undefined environment var: {}", key))),
    }
}

/// retrieve optional environment variable. Empty values are treated as undefined.
pub fn getenv_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
