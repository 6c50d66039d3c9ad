//! Environment-driven settings for the client.

use std::str::FromStr;

use chrono::{FixedOffset, Local, Offset};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://todoapitest.juansegaliz.com";

pub const BASE_URL_VAR: &str = "TODO_API_BASE_URL";
pub const UTC_OFFSET_VAR: &str = "TODO_UTC_OFFSET";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a UTC offset like +02:00, got {value:?}")]
    InvalidOffset { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    /// Zone used to display dates and to read datetime inputs.
    pub utc_offset: FixedOffset,
}

impl Config {
    pub fn new(base_url: impl Into<String>, utc_offset: FixedOffset) -> Self {
        Self {
            base_url: base_url.into(),
            utc_offset,
        }
    }

    /// Read `TODO_API_BASE_URL` and `TODO_UTC_OFFSET`, falling back to the
    /// public API and the host's current offset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(BASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let utc_offset = match lookup(UTC_OFFSET_VAR) {
            Some(value) => FixedOffset::from_str(value.trim()).map_err(|_| ConfigError::InvalidOffset {
                var: UTC_OFFSET_VAR,
                value,
            })?,
            None => Local::now().offset().fix(),
        };
        Ok(Self { base_url, utc_offset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_public_api() {
        let config = Config::from_lookup(|var| (var == UTC_OFFSET_VAR).then(|| "+00:00".to_string())).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.utc_offset, FixedOffset::east_opt(0).unwrap());
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(|var| match var {
            BASE_URL_VAR => Some("http://127.0.0.1:3000".to_string()),
            UTC_OFFSET_VAR => Some("-05:00".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.utc_offset, FixedOffset::west_opt(5 * 3600).unwrap());
    }

    #[test]
    fn rejects_malformed_offset() {
        let err = Config::from_lookup(|var| (var == UTC_OFFSET_VAR).then(|| "CET".to_string())).unwrap_err();
        assert!(err.to_string().contains("CET"));
    }
}
