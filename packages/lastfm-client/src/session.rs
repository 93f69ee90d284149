//! Credentials and the authentication handshakes

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::client::{ApiRequest, LastfmClient};
use crate::error::{LastfmError, LastfmResult};
use crate::xml::XmlNode;

/// Page where a user grants access to a web authentication token
const WEB_AUTH_URL: &str = "https://www.last.fm/api/auth/";

/// Credentials used to talk to the web service
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    api_key: String,
    api_secret: Option<String>,
    session_key: Option<String>,
}

impl Session {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: None,
            session_key: None,
        }
    }

    pub fn with_api_secret(mut self, secret: impl Into<String>) -> Self {
        self.api_secret = Some(secret.into());
        self
    }

    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = Some(key.into());
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> Option<&str> {
        self.api_secret.as_deref()
    }

    pub fn session_key(&self) -> Option<&str> {
        self.session_key.as_deref()
    }

    /// True once a session key has been obtained or supplied
    pub fn is_authenticated(&self) -> bool {
        self.session_key.is_some()
    }

    /// Fail with [`LastfmError::AuthenticationRequired`] unless authenticated
    pub fn require_authentication(&self) -> LastfmResult<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(LastfmError::AuthenticationRequired)
        }
    }

    /// Secret used for signing, required for any signed call
    pub(crate) fn signing_secret(&self) -> LastfmResult<&str> {
        self.api_secret
            .as_deref()
            .ok_or(LastfmError::MissingApiSecret)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("api_key", &"[REDACTED]")
            .field("has_secret", &self.api_secret.is_some())
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

/// Result of a successful authentication handshake
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Name of the user who granted access
    pub name: String,
    /// Session key; does not expire unless the user revokes it
    pub key: String,
    pub subscriber: bool,
}

impl fmt::Debug for SessionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionInfo")
            .field("name", &self.name)
            .field("key", &"[REDACTED]")
            .field("subscriber", &self.subscriber)
            .finish()
    }
}

impl SessionInfo {
    fn from_response(doc: &XmlNode) -> LastfmResult<Self> {
        let session = doc.require("session")?;
        Ok(Self {
            name: session.require_child_text("name")?.to_string(),
            key: session.require_child_text("key")?.to_string(),
            subscriber: session.child_text("subscriber") == Some("1"),
        })
    }
}

impl LastfmClient {
    /// Obtain a session with a username and password (`auth.getMobileSession`)
    ///
    /// # Errors
    /// - `LastfmError::MissingApiSecret` - If the client has no API secret
    /// - `LastfmError::Api` - Code 4 when the credentials are rejected
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> LastfmResult<SessionInfo> {
        let username = Self::validate_name("username", username)?;
        if password.is_empty() {
            return Err(LastfmError::InvalidInput(
                "password cannot be empty".to_string(),
            ));
        }

        let request = ApiRequest::post("auth.getMobileSession")
            .param("username", username)
            .param("password", password)
            .signed();

        let doc = self.execute(&request).await?;
        let info = SessionInfo::from_response(&doc)?;
        info!(user = %info.name, "Authenticated with Last.fm");
        Ok(info)
    }

    /// Request an unauthorized token for the web authentication flow (`auth.getToken`)
    #[instrument(skip(self))]
    pub async fn request_auth_token(&self) -> LastfmResult<String> {
        let doc = self
            .execute(&ApiRequest::get("auth.getToken").signed())
            .await?;
        let token = doc.require("token")?.text();
        if token.is_empty() {
            return Err(LastfmError::MalformedResponse(
                "empty token in auth.getToken response".to_string(),
            ));
        }
        debug!("Received Last.fm auth token");
        Ok(token.to_string())
    }

    /// URL the user must visit to grant access to `token`
    pub fn web_auth_url(&self, token: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("api_key", self.session().api_key())
            .append_pair("token", token)
            .finish();
        format!("{}?{}", WEB_AUTH_URL, query)
    }

    /// Exchange a user-approved token for a session (`auth.getSession`)
    #[instrument(skip(self, token))]
    pub async fn session_from_token(&self, token: &str) -> LastfmResult<SessionInfo> {
        let token = Self::validate_name("token", token)?;
        let request = ApiRequest::get("auth.getSession")
            .param("token", token)
            .signed();

        let doc = self.execute(&request).await?;
        let info = SessionInfo::from_response(&doc)?;
        info!(user = %info.name, "Authenticated with Last.fm via web token");
        Ok(info)
    }
}
