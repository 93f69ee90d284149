//! Last.fm API error types

use thiserror::Error;

/// Error codes returned inside `<error code="..">` by the web service
pub mod codes {
    /// Authentication failed (bad username/password or token)
    pub const AUTHENTICATION_FAILED: i32 = 4;
    /// Invalid parameters; the service also uses it for "not found"
    pub const INVALID_PARAMETERS: i32 = 6;
    /// Operation failed on the backend
    pub const OPERATION_FAILED: i32 = 8;
    /// Session key is invalid or expired
    pub const INVALID_SESSION_KEY: i32 = 9;
    /// API key is invalid
    pub const INVALID_API_KEY: i32 = 10;
    /// Service temporarily offline
    pub const SERVICE_OFFLINE: i32 = 11;
    /// Method signature did not verify
    pub const INVALID_SIGNATURE: i32 = 13;
    /// Temporary error processing the request
    pub const TEMPORARY_ERROR: i32 = 16;
    /// Rate limit exceeded
    pub const RATE_LIMIT_EXCEEDED: i32 = 29;
}

/// Last.fm API client errors
#[derive(Error, Debug)]
pub enum LastfmError {
    /// API key is missing or invalid
    #[error("API key is required for Last.fm API access")]
    MissingApiKey,

    /// Signed call attempted without the shared secret
    #[error("API secret is required to sign Last.fm requests")]
    MissingApiSecret,

    /// Invalid input provided to API method
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Method needs an authenticated session
    #[error("This method requires an authenticated Last.fm session")]
    AuthenticationRequired,

    /// HTTP request failed
    ///
    /// The request URL is stripped, since GET query strings carry the
    /// api key, session key and signature.
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// XML could not be parsed
    #[error("Failed to parse Last.fm response: {0}")]
    Xml(#[from] quick_xml::Error),

    /// XML parsed but did not have the expected shape
    #[error("Malformed Last.fm response: {0}")]
    MalformedResponse(String),

    /// Last.fm API returned an error
    #[error("Last.fm API error {code}: {message}")]
    Api { code: i32, message: String },

    /// Requested resource (artist, album, tag, user...) does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Last.fm
    #[error("Rate limited by Last.fm API")]
    RateLimited,

    /// Request timeout
    #[error("Request to Last.fm timed out")]
    Timeout,
}

impl From<reqwest::Error> for LastfmError {
    fn from(error: reqwest::Error) -> Self {
        LastfmError::Http(error.without_url())
    }
}

impl LastfmError {
    /// Check if this error is retryable (transient failure)
    ///
    /// Retries on:
    /// - Timeouts
    /// - Rate limiting
    /// - Transport errors (connect, timeout)
    /// - Server errors (5xx)
    /// - Last.fm "operation failed", "service offline" and "temporary error"
    ///
    /// Does NOT retry on client errors (4xx except 429 rate limiting).
    pub fn is_retryable(&self) -> bool {
        match self {
            LastfmError::Timeout | LastfmError::RateLimited => true,
            LastfmError::Http(e) => {
                if e.is_timeout() || e.is_connect() {
                    return true;
                }
                matches!(e.status(), Some(status) if status.is_server_error())
            }
            LastfmError::Api { code, .. } => matches!(
                *code,
                codes::OPERATION_FAILED | codes::SERVICE_OFFLINE | codes::TEMPORARY_ERROR
            ),
            _ => false,
        }
    }

    /// Build the error for a `<lfm status="failed">` response
    pub(crate) fn from_api(code: i32, message: String) -> Self {
        match code {
            codes::INVALID_PARAMETERS => LastfmError::NotFound(message),
            codes::RATE_LIMIT_EXCEEDED => LastfmError::RateLimited,
            _ => LastfmError::Api { code, message },
        }
    }
}

/// Result type for Last.fm operations
pub type LastfmResult<T> = Result<T, LastfmError>;
