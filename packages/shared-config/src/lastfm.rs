//! Last.fm API configuration types

use serde::Deserialize;

use crate::{get_optional_env, get_required_env, parse_env, ConfigError, ConfigResult};

/// Default Last.fm web service root
pub const DEFAULT_API_URL: &str = "https://ws.audioscrobbler.com/2.0/";

/// Last.fm API client configuration
#[derive(Clone, Deserialize)]
pub struct LastfmConfig {
    /// API key issued by Last.fm
    pub api_key: String,

    /// Shared secret used to sign requests (needed for authenticated calls)
    #[serde(default)]
    pub api_secret: Option<String>,

    /// Session key of an already authenticated user
    #[serde(default)]
    pub session_key: Option<String>,

    /// Web service root URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Retry attempts for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// ISO 639 code of the preferred site language (used for page URLs)
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_max_retries() -> u32 {
    3
}

fn default_user_agent() -> String {
    concat!("lastfm-services/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_language() -> String {
    "en".to_string()
}

impl LastfmConfig {
    /// Load Last.fm configuration from environment variables
    ///
    /// `LASTFM_API_KEY` is required; everything else falls back to defaults.
    pub fn from_env() -> ConfigResult<Self> {
        let api_key = get_required_env("LASTFM_API_KEY")?;
        if api_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "LASTFM_API_KEY".to_string(),
                "API key cannot be empty".to_string(),
            ));
        }

        let api_url = get_optional_env("LASTFM_API_URL").unwrap_or_else(default_api_url);
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl("LASTFM_API_URL".to_string(), api_url));
        }

        Ok(Self {
            api_key,
            api_secret: get_optional_env("LASTFM_API_SECRET"),
            session_key: get_optional_env("LASTFM_SESSION_KEY"),
            api_url,
            timeout_secs: parse_env("LASTFM_TIMEOUT", default_timeout_secs())?,
            connect_timeout_secs: parse_env(
                "LASTFM_CONNECT_TIMEOUT",
                default_connect_timeout_secs(),
            )?,
            max_retries: parse_env("LASTFM_MAX_RETRIES", default_max_retries())?,
            user_agent: get_optional_env("LASTFM_USER_AGENT").unwrap_or_else(default_user_agent),
            language: get_optional_env("LASTFM_LANGUAGE").unwrap_or_else(default_language),
        })
    }

    /// Create a configuration with just an API key (useful for testing)
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: None,
            session_key: None,
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_retries: default_max_retries(),
            user_agent: default_user_agent(),
            language: default_language(),
        }
    }

    /// Point the configuration at a different web service root
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Attach the shared secret used for signing
    pub fn with_api_secret(mut self, secret: impl Into<String>) -> Self {
        self.api_secret = Some(secret.into());
        self
    }

    /// Attach an existing session key
    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = Some(key.into());
        self
    }

    /// Check whether signed calls can be made
    pub fn can_sign(&self) -> bool {
        self.api_secret.is_some()
    }

    /// Check whether the configuration carries an authenticated session
    pub fn is_authenticated(&self) -> bool {
        self.can_sign() && self.session_key.is_some()
    }
}

impl std::fmt::Debug for LastfmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LastfmConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &self.api_secret.as_ref().map(|_| "[REDACTED]"))
            .field("session_key", &self.session_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("user_agent", &self.user_agent)
            .field("language", &self.language)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 9] = [
        "LASTFM_API_KEY",
        "LASTFM_API_SECRET",
        "LASTFM_SESSION_KEY",
        "LASTFM_API_URL",
        "LASTFM_TIMEOUT",
        "LASTFM_CONNECT_TIMEOUT",
        "LASTFM_MAX_RETRIES",
        "LASTFM_USER_AGENT",
        "LASTFM_LANGUAGE",
    ];

    fn cleared() -> Vec<(&'static str, Option<&'static str>)> {
        ALL_VARS.iter().map(|name| (*name, None)).collect()
    }

    #[test]
    fn test_new_config() {
        let config = LastfmConfig::new("key");
        assert_eq!(config.api_key, "key");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.max_retries, 3);
        assert!(!config.can_sign());
        assert!(!config.is_authenticated());
    }

    #[test]
    fn test_builder_methods() {
        let config = LastfmConfig::new("key")
            .with_api_secret("secret")
            .with_session_key("sk")
            .with_api_url("http://localhost:1234/");
        assert!(config.can_sign());
        assert!(config.is_authenticated());
        assert_eq!(config.api_url, "http://localhost:1234/");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = LastfmConfig::new("the-key")
            .with_api_secret("the-secret")
            .with_session_key("the-session");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("the-key"));
        assert!(!debug.contains("the-secret"));
        assert!(!debug.contains("the-session"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_from_env_requires_api_key() {
        temp_env::with_vars(cleared(), || {
            let result = LastfmConfig::from_env();
            assert!(matches!(result, Err(ConfigError::MissingEnvVar(name)) if name == "LASTFM_API_KEY"));
        });
    }

    #[test]
    fn test_from_env_rejects_blank_api_key() {
        let mut vars = cleared();
        vars[0] = ("LASTFM_API_KEY", Some("   "));
        temp_env::with_vars(vars, || {
            assert!(matches!(
                LastfmConfig::from_env(),
                Err(ConfigError::InvalidValue(_, _))
            ));
        });
    }

    #[test]
    fn test_from_env_reads_values() {
        let mut vars = cleared();
        vars[0] = ("LASTFM_API_KEY", Some("key"));
        vars[1] = ("LASTFM_API_SECRET", Some("secret"));
        vars[4] = ("LASTFM_TIMEOUT", Some("42"));
        vars[8] = ("LASTFM_LANGUAGE", Some("de"));
        temp_env::with_vars(vars, || {
            let config = LastfmConfig::from_env().unwrap();
            assert_eq!(config.api_key, "key");
            assert_eq!(config.api_secret.as_deref(), Some("secret"));
            assert!(config.session_key.is_none());
            assert_eq!(config.timeout_secs, 42);
            assert_eq!(config.language, "de");
        });
    }

    #[test]
    fn test_from_env_rejects_bad_timeout() {
        let mut vars = cleared();
        vars[0] = ("LASTFM_API_KEY", Some("key"));
        vars[4] = ("LASTFM_TIMEOUT", Some("soon"));
        temp_env::with_vars(vars, || {
            assert!(matches!(
                LastfmConfig::from_env(),
                Err(ConfigError::InvalidValue(name, _)) if name == "LASTFM_TIMEOUT"
            ));
        });
    }

    #[test]
    fn test_from_env_rejects_bad_url() {
        let mut vars = cleared();
        vars[0] = ("LASTFM_API_KEY", Some("key"));
        vars[3] = ("LASTFM_API_URL", Some("ftp://example.com"));
        temp_env::with_vars(vars, || {
            assert!(matches!(
                LastfmConfig::from_env(),
                Err(ConfigError::InvalidUrl(_, _))
            ));
        });
    }
}
