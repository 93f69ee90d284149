//! Shared test utilities for the Last.fm services workspace
//!
//! This crate provides a mock Last.fm web service for testing without
//! network access.
//!
//! # Mock Services
//!
//! - [`MockLastfmServer`] - Mock `ws.audioscrobbler.com/2.0/` endpoint
//! - [`fixtures`] - XML response bodies shaped like the real service's
//!
//! # Example
//!
//! ```rust,ignore
//! use lastfm_test_utils::{fixtures, MockLastfmServer};
//!
//! #[tokio::test]
//! async fn test_with_mocks() {
//!     let lastfm = MockLastfmServer::start().await;
//!     lastfm
//!         .mock_method("tag.getSimilar", &fixtures::similar_tags("disco", &["funk"]))
//!         .await;
//!
//!     // Point your client at lastfm.url()
//! }
//! ```

pub mod fixtures;
mod lastfm;

pub use lastfm::MockLastfmServer;
