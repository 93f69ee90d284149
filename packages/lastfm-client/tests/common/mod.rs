//! Common helpers for client integration tests

#![allow(dead_code)]

use lastfm_services::{LastfmClient, RequestParams};

pub use lastfm_test_utils::{fixtures, MockLastfmServer};

pub const API_SECRET: &str = "test-secret";
pub const SESSION_KEY: &str = "test-session-key";

/// Anonymous client pointed at the mock server, with fast retries
pub fn client(server: &MockLastfmServer) -> LastfmClient {
    LastfmClient::new(server.api_key())
        .unwrap()
        .with_base_url(server.url())
        .with_retry_config(2, 1)
}

/// Client that can sign and holds a session
pub fn authenticated_client(server: &MockLastfmServer) -> LastfmClient {
    client(server)
        .with_api_secret(API_SECRET)
        .with_session_key(SESSION_KEY)
}

/// Value of `key` in a received call
pub fn param<'a>(call: &'a [(String, String)], key: &str) -> Option<&'a str> {
    call.iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Recompute the signature of a received call and compare it to its `api_sig`
pub fn has_valid_signature(call: &[(String, String)]) -> bool {
    let Some(sent) = param(call, "api_sig") else {
        return false;
    };
    let params: RequestParams = call
        .iter()
        .filter(|(k, _)| k != "api_sig")
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    params.signature(API_SECRET) == sent
}
