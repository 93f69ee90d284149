//! Last.fm API client implementation

use std::fmt;
use std::future::Future;
use std::time::Duration;

use lastfm_shared_config::{ConfigError, LastfmConfig};
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{codes, LastfmError, LastfmResult};
use crate::language::SiteLanguage;
use crate::models::Tag;
use crate::params::RequestParams;
use crate::session::Session;
use crate::xml::{parse_response, XmlNode};

/// Maximum length accepted for names and search terms
const MAX_NAME_LENGTH: usize = 256;

/// Base delay for exponential backoff (milliseconds)
const RETRY_BASE_DELAY_MS: u64 = 100;

/// HTTP verb used for a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Read-only methods
    Get,
    /// Methods that change state (tagging, authentication)
    Post,
}

/// One web service call: method name, parameters and how to send them
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: String,
    params: RequestParams,
    http_method: HttpMethod,
    signed: bool,
    authenticated: bool,
}

impl ApiRequest {
    /// Read call sent as a query string
    pub fn get(method: impl Into<String>) -> Self {
        Self::new(method, HttpMethod::Get)
    }

    /// Write call sent as a form body
    pub fn post(method: impl Into<String>) -> Self {
        Self::new(method, HttpMethod::Post)
    }

    fn new(method: impl Into<String>, http_method: HttpMethod) -> Self {
        Self {
            method: method.into(),
            params: RequestParams::new(),
            http_method,
            signed: false,
            authenticated: false,
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key, value);
        self
    }

    pub fn params(mut self, params: RequestParams) -> Self {
        self.params.extend(params.iter());
        self
    }

    /// Attach `api_sig`
    pub fn signed(mut self) -> Self {
        self.signed = true;
        self
    }

    /// Require a session; the session key is sent and the call is signed
    pub fn authenticated(mut self) -> Self {
        self.authenticated = true;
        self.signed = true;
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn http_method(&self) -> HttpMethod {
        self.http_method
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

/// Last.fm API client
#[derive(Clone)]
pub struct LastfmClient {
    http_client: Client,
    session: Session,
    base_url: String,
    language: SiteLanguage,
    max_retries: u32,
    retry_base_delay_ms: u64,
}

/// API key validation status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeyStatus {
    /// API key is valid
    Valid,
    /// API key is invalid
    Invalid,
    /// Could not determine validity (network error, etc.)
    Unknown(String),
}

impl fmt::Debug for LastfmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LastfmClient")
            .field("session", &self.session)
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl LastfmClient {
    /// Create a new Last.fm client with the given API key
    ///
    /// # Errors
    /// Returns `LastfmError::MissingApiKey` if the API key is empty
    pub fn new(api_key: impl Into<String>) -> LastfmResult<Self> {
        Self::from_config(&LastfmConfig::new(api_key))
    }

    /// Create a client from a loaded configuration
    ///
    /// # Errors
    /// - `LastfmError::MissingApiKey` if the API key is empty
    /// - `LastfmError::Http` if the HTTP client cannot be built
    pub fn from_config(config: &LastfmConfig) -> LastfmResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LastfmError::MissingApiKey);
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(config.user_agent.as_str())
            .build()?;

        let mut session = Session::new(config.api_key.clone());
        if let Some(secret) = &config.api_secret {
            session = session.with_api_secret(secret.clone());
        }
        if let Some(key) = &config.session_key {
            session = session.with_session_key(key.clone());
        }

        Ok(Self {
            http_client,
            session,
            base_url: config.api_url.clone(),
            language: SiteLanguage::from_code(&config.language).unwrap_or_default(),
            max_retries: config.max_retries,
            retry_base_delay_ms: RETRY_BASE_DELAY_MS,
        })
    }

    /// Create a Last.fm client from environment variables
    ///
    /// Reads `LASTFM_API_KEY` and the optional `LASTFM_*` settings.
    ///
    /// # Errors
    /// - `LastfmError::MissingApiKey` if the key is not set or is empty
    /// - `LastfmError::InvalidInput` if another setting cannot be parsed
    pub fn from_env() -> LastfmResult<Self> {
        match LastfmConfig::from_env() {
            Ok(config) => Self::from_config(&config),
            Err(ConfigError::MissingEnvVar(_)) => Err(LastfmError::MissingApiKey),
            Err(ConfigError::InvalidValue(name, _)) if name == "LASTFM_API_KEY" => {
                Err(LastfmError::MissingApiKey)
            }
            Err(e) => Err(LastfmError::InvalidInput(e.to_string())),
        }
    }

    /// Point the client at a different web service root
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Attach the shared secret used for signed calls
    pub fn with_api_secret(mut self, secret: impl Into<String>) -> Self {
        self.session = self.session.with_api_secret(secret);
        self
    }

    /// Attach a session key, making the client authenticated
    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session = self.session.with_session_key(key);
        self
    }

    /// Set the site language used for page URLs
    pub fn with_language(mut self, language: SiteLanguage) -> Self {
        self.language = language;
        self
    }

    /// Set retry configuration
    pub fn with_retry_config(mut self, max_retries: u32, base_delay_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.retry_base_delay_ms = base_delay_ms;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn site_language(&self) -> SiteLanguage {
        self.language
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Validate a name or search term
    pub(crate) fn validate_name<'a>(kind: &str, value: &'a str) -> LastfmResult<&'a str> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LastfmError::InvalidInput(format!("{} cannot be empty", kind)));
        }
        if trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(LastfmError::InvalidInput(format!(
                "{} too long (max {} characters)",
                kind, MAX_NAME_LENGTH
            )));
        }
        Ok(trimmed)
    }

    /// Execute an operation with retry logic for transient failures
    async fn with_retry<T, F, Fut>(&self, operation: F) -> LastfmResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = LastfmResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay_ms = backoff_delay_ms(self.retry_base_delay_ms, attempt);
                    warn!(
                        attempt = attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay_ms,
                        error = %e,
                        "Last.fm request failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Build the final parameter set: method, api key, session key and signature
    fn prepare(&self, request: &ApiRequest) -> LastfmResult<RequestParams> {
        if request.authenticated {
            self.session.require_authentication()?;
        }

        let mut params = request.params.clone();
        params.insert("method", request.method.as_str());
        params.insert("api_key", self.session.api_key());

        if request.authenticated {
            if let Some(key) = self.session.session_key() {
                params.insert("sk", key);
            }
        }
        if request.signed {
            params.sign(self.session.signing_secret()?);
        }

        Ok(params)
    }

    /// Make an HTTP request and handle transport-level error cases
    async fn send(&self, http_method: HttpMethod, params: &RequestParams) -> LastfmResult<String> {
        let pairs: Vec<(&str, &str)> = params.iter().collect();
        let builder = match http_method {
            HttpMethod::Get => self.http_client.get(&self.base_url).query(&pairs),
            HttpMethod::Post => self.http_client.post(&self.base_url).form(&pairs),
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                LastfmError::Timeout
            } else {
                LastfmError::from(e)
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Last.fm API rate limited");
            return Err(LastfmError::RateLimited);
        }
        // Client errors still carry an <lfm status="failed"> body worth parsing
        let response = if status.is_server_error() {
            response.error_for_status()?
        } else {
            response
        };

        Ok(response.text().await?)
    }

    /// Execute a web service call and return the `<lfm>` root of the response
    ///
    /// # Errors
    /// - `LastfmError::AuthenticationRequired` - If the call needs a session and none is set
    /// - `LastfmError::MissingApiSecret` - If the call must be signed and no secret is set
    /// - `LastfmError::Api` / `LastfmError::NotFound` - If Last.fm reports a failure
    /// - `LastfmError::Http` / `LastfmError::Timeout` - If the HTTP request fails
    pub async fn execute(&self, request: &ApiRequest) -> LastfmResult<XmlNode> {
        let params = self.prepare(request)?;

        debug!(
            method = %request.method,
            http_method = ?request.http_method,
            signed = request.signed,
            param_count = params.len(),
            "Calling Last.fm"
        );

        self.with_retry(|| async {
            let body = self.send(request.http_method, &params).await?;
            parse_response(&body)
        })
        .await
    }

    /// Check if the API key is valid by making a simple request
    ///
    /// Returns `ApiKeyStatus` indicating whether the key is valid, invalid,
    /// or if the check could not be completed due to network issues.
    pub async fn validate_api_key(&self) -> ApiKeyStatus {
        match self.tag_similar(&Tag::new("rock")).await {
            Ok(_) => ApiKeyStatus::Valid,
            Err(LastfmError::Api {
                code: codes::INVALID_API_KEY,
                ..
            }) => ApiKeyStatus::Invalid,
            Err(e) => ApiKeyStatus::Unknown(e.to_string()),
        }
    }
}

/// Exponential backoff `base * 2^attempt`, saturating instead of overflowing
fn backoff_delay_ms(base_ms: u64, attempt: u32) -> u64 {
    base_ms.saturating_mul(2u64.saturating_pow(attempt))
}
