//! Shared configuration types for the Last.fm services client
//!
//! Configuration is read from environment variables (optionally seeded from a
//! `.env` file) so the library and the CLI agree on the same knobs.

mod error;
mod lastfm;

pub use error::{ConfigError, ConfigResult};
pub use lastfm::{LastfmConfig, DEFAULT_API_URL};

use std::env;

/// Load variables from a `.env` file if one exists
///
/// Missing files are not an error; variables already present in the process
/// environment win over the file.
pub fn load_dotenv() -> bool {
    dotenvy::dotenv().is_ok()
}

/// Log level from `RUST_LOG` or `LOG_LEVEL`, defaulting to `info`
pub fn log_level() -> String {
    env::var("RUST_LOG")
        .or_else(|_| env::var("LOG_LEVEL"))
        .unwrap_or_else(|_| "info".to_string())
}

/// Helper function to get a required environment variable
pub fn get_required_env(name: &str) -> ConfigResult<String> {
    env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

/// Helper function to get an optional, non-empty environment variable
pub fn get_optional_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

/// Helper function to get an optional environment variable with a default
pub fn get_env_or_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Helper function to parse an environment variable into a specific type
pub fn parse_env<T>(name: &str, default: T) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val
            .parse()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("{}", e))),
        Err(_) => Ok(default),
    }
}
