//! Mock Last.fm web service for testing the client
//!
//! Provides a [`MockLastfmServer`] that answers `/2.0/` calls by their
//! `method` parameter, whether it arrives in the query string (GET) or the
//! form body (POST).

use wiremock::matchers::path;
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

use crate::fixtures;

const API_PATH: &str = "/2.0/";

/// Every parameter of a request, query string first, then form body
fn request_params(request: &Request) -> Vec<(String, String)> {
    request
        .url
        .query_pairs()
        .chain(url::form_urlencoded::parse(&request.body))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Matches a request carrying `key`, optionally with an exact value
struct ParamMatcher {
    key: String,
    value: Option<String>,
}

impl Match for ParamMatcher {
    fn matches(&self, request: &Request) -> bool {
        request_params(request).iter().any(|(k, v)| {
            *k == self.key && self.value.as_deref().map_or(true, |expected| expected == v)
        })
    }
}

fn param(key: &str, value: &str) -> ParamMatcher {
    ParamMatcher {
        key: key.to_string(),
        value: Some(value.to_string()),
    }
}

fn has_param(key: &str) -> ParamMatcher {
    ParamMatcher {
        key: key.to_string(),
        value: None,
    }
}

fn xml(status: u16, body: String) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body, "text/xml; charset=utf-8")
}

/// Mock Last.fm server for testing the web service client
///
/// This struct wraps a [`wiremock::MockServer`] and provides convenience methods
/// for mounting XML responses per API method, including error scenarios.
///
/// # Example
///
/// ```rust,ignore
/// use lastfm_test_utils::{fixtures, MockLastfmServer};
///
/// #[tokio::test]
/// async fn test_similar_tags() {
///     let server = MockLastfmServer::start().await;
///     server
///         .mock_method("tag.getSimilar", &fixtures::similar_tags("disco", &["funk"]))
///         .await;
///
///     // Configure your client with server.url() and server.api_key()
/// }
/// ```
pub struct MockLastfmServer {
    server: MockServer,
    api_key: String,
}

impl MockLastfmServer {
    /// Start a new mock server with the default API key
    pub async fn start() -> Self {
        Self::start_with_api_key("test-api-key").await
    }

    /// Start a new mock server with a custom API key
    pub async fn start_with_api_key(api_key: &str) -> Self {
        let server = MockServer::start().await;
        Self {
            server,
            api_key: api_key.to_string(),
        }
    }

    /// Web service endpoint, to be used as the client's base URL
    pub fn url(&self) -> String {
        format!("{}{}", self.server.uri(), API_PATH)
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    fn method_mock(&self, api_method: &str) -> wiremock::MockBuilder {
        Mock::given(path(API_PATH))
            .and(param("method", api_method))
            .and(param("api_key", &self.api_key))
    }

    /// Answer every call of `api_method` with `body`
    pub async fn mock_method(&self, api_method: &str, body: &str) {
        self.method_mock(api_method)
            .respond_with(xml(200, body.to_string()))
            .mount(&self.server)
            .await;
    }

    /// Answer calls of `api_method` whose `key` parameter equals `value`
    pub async fn mock_method_with_param(&self, api_method: &str, key: &str, value: &str, body: &str) {
        self.method_mock(api_method)
            .and(param(key, value))
            .respond_with(xml(200, body.to_string()))
            .mount(&self.server)
            .await;
    }

    /// Like [`mock_method`](Self::mock_method), verified on drop to be called exactly `times` times
    pub async fn expect_method(&self, api_method: &str, body: &str, times: u64) {
        self.method_mock(api_method)
            .respond_with(xml(200, body.to_string()))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Expect `times` signed calls of `api_method` carrying a session key
    ///
    /// Unsigned calls do not match and fall through to a 404.
    pub async fn expect_signed_method(&self, api_method: &str, body: &str, times: u64) {
        self.method_mock(api_method)
            .and(has_param("api_sig"))
            .and(has_param("sk"))
            .respond_with(xml(200, body.to_string()))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Answer `api_method` with a `status="failed"` body
    pub async fn mock_error(&self, api_method: &str, code: i32, message: &str) {
        self.method_mock(api_method)
            .respond_with(xml(400, fixtures::failed(code, message)))
            .mount(&self.server)
            .await;
    }

    /// Answer `api_method` with HTTP 429
    pub async fn mock_rate_limit(&self, api_method: &str) {
        self.method_mock(api_method)
            .respond_with(ResponseTemplate::new(429))
            .mount(&self.server)
            .await;
    }

    /// Answer `api_method` with HTTP 500
    pub async fn mock_server_error(&self, api_method: &str) {
        self.method_mock(api_method)
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&self.server)
            .await;
    }

    /// Fail the first `failures` calls with HTTP 500, then answer with `body`
    pub async fn mock_flaky(&self, api_method: &str, failures: u64, body: &str) {
        self.method_mock(api_method)
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(failures)
            .with_priority(1)
            .mount(&self.server)
            .await;
        self.mock_method(api_method, body).await;
    }

    /// Fail the first `failures` calls with an API error code, then answer with `body`
    pub async fn mock_api_error_then(&self, api_method: &str, code: i32, failures: u64, body: &str) {
        self.method_mock(api_method)
            .respond_with(xml(200, fixtures::failed(code, "Temporary failure")))
            .up_to_n_times(failures)
            .with_priority(1)
            .mount(&self.server)
            .await;
        self.mock_method(api_method, body).await;
    }

    /// Answer `api_method` after `delay`, for timeout tests
    pub async fn mock_slow(&self, api_method: &str, delay: std::time::Duration, body: &str) {
        self.method_mock(api_method)
            .respond_with(xml(200, body.to_string()).set_delay(delay))
            .mount(&self.server)
            .await;
    }

    /// `method` parameter of every request received so far, in order
    pub async fn received_methods(&self) -> Vec<String> {
        self.received_params()
            .await
            .into_iter()
            .filter_map(|params| {
                params
                    .into_iter()
                    .find(|(k, _)| k == "method")
                    .map(|(_, v)| v)
            })
            .collect()
    }

    /// Parameters of every request received so far, in order
    pub async fn received_params(&self) -> Vec<Vec<(String, String)>> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(request_params)
            .collect()
    }

    /// Parameters of every received call of `api_method`
    pub async fn received_calls(&self, api_method: &str) -> Vec<Vec<(String, String)>> {
        self.received_params()
            .await
            .into_iter()
            .filter(|params| params.iter().any(|(k, v)| k == "method" && v == api_method))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_matches_get_query() {
        let server = MockLastfmServer::start().await;
        server
            .mock_method("tag.getSimilar", &fixtures::similar_tags("disco", &["funk"]))
            .await;

        let body = reqwest::Client::new()
            .get(server.url())
            .query(&[("method", "tag.getSimilar"), ("api_key", "test-api-key")])
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.contains("<name>funk</name>"));
    }

    #[tokio::test]
    async fn test_mock_matches_post_form() {
        let server = MockLastfmServer::start().await;
        server
            .expect_signed_method("artist.addTags", &fixtures::ok_empty(), 1)
            .await;

        let response = reqwest::Client::new()
            .post(server.url())
            .form(&[
                ("method", "artist.addTags"),
                ("api_key", "test-api-key"),
                ("sk", "session"),
                ("api_sig", "0123"),
            ])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(server.received_methods().await, vec!["artist.addTags"]);
    }

    #[tokio::test]
    async fn test_wrong_api_key_is_not_matched() {
        let server = MockLastfmServer::start().await;
        server.mock_method("tag.getSimilar", &fixtures::ok_empty()).await;

        let response = reqwest::Client::new()
            .get(server.url())
            .query(&[("method", "tag.getSimilar"), ("api_key", "other")])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn test_flaky_recovers() {
        let server = MockLastfmServer::start().await;
        server
            .mock_flaky("tag.getSimilar", 1, &fixtures::ok_empty())
            .await;

        let client = reqwest::Client::new();
        let query = [("method", "tag.getSimilar"), ("api_key", "test-api-key")];
        let first = client.get(server.url()).query(&query).send().await.unwrap();
        let second = client.get(server.url()).query(&query).send().await.unwrap();
        assert_eq!(first.status(), 500);
        assert_eq!(second.status(), 200);
    }
}
