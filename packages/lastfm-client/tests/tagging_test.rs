//! Integration tests for tagging artists, albums and tracks
//!
//! Exercises add/remove/set/clear against a mock web service, checking the
//! calls that reach the wire and their signatures.

mod common;

use assert_matches::assert_matches;
use common::{authenticated_client, client, fixtures, has_valid_signature, param, MockLastfmServer};
use lastfm_services::{codes, Album, Artist, LastfmError, Tag, TagDelta, Track};

fn tags(names: &[&str]) -> Vec<Tag> {
    names.iter().map(|n| Tag::new(*n)).collect()
}

// ============================================================================
// set_tags
// ============================================================================

/// Replacing a tag set adds the missing tags and removes the extra ones
#[tokio::test]
async fn test_set_tags_applies_delta() {
    let server = MockLastfmServer::start().await;
    server
        .expect_signed_method("artist.getTags", &fixtures::tags(&["rock", "80s"]), 1)
        .await;
    server
        .expect_signed_method("artist.addTags", &fixtures::ok_empty(), 1)
        .await;
    server
        .expect_signed_method("artist.removeTag", &fixtures::ok_empty(), 1)
        .await;

    let client = authenticated_client(&server);
    let delta = client
        .set_tags(&Artist::new("Cher"), &tags(&["rock", "synthpop"]))
        .await
        .unwrap();

    assert_eq!(
        delta,
        TagDelta {
            to_add: tags(&["synthpop"]),
            to_remove: tags(&["80s"]),
        }
    );
    assert_eq!(
        server.received_methods().await,
        vec!["artist.getTags", "artist.addTags", "artist.removeTag"]
    );

    let add = &server.received_calls("artist.addTags").await[0];
    assert_eq!(param(add, "artist"), Some("Cher"));
    assert_eq!(param(add, "tags"), Some("synthpop"));
    assert!(has_valid_signature(add));

    let remove = &server.received_calls("artist.removeTag").await[0];
    assert_eq!(param(remove, "tag"), Some("80s"));
    assert!(has_valid_signature(remove));
}

/// Identical tag sets make no write calls
#[tokio::test]
async fn test_set_tags_without_changes() {
    let server = MockLastfmServer::start().await;
    server
        .expect_signed_method("track.getTags", &fixtures::tags(&["a", "b"]), 1)
        .await;
    server
        .expect_signed_method("track.addTags", &fixtures::ok_empty(), 0)
        .await;
    server
        .expect_signed_method("track.removeTag", &fixtures::ok_empty(), 0)
        .await;

    let client = authenticated_client(&server);
    let delta = client
        .set_tags(&Track::new("Cher", "Believe"), &tags(&["b", "a"]))
        .await
        .unwrap();
    assert!(delta.is_empty());
}

/// Setting tags on an untagged album only adds
#[tokio::test]
async fn test_set_tags_on_untagged_album() {
    let server = MockLastfmServer::start().await;
    server
        .expect_signed_method("album.getTags", &fixtures::tags(&[]), 1)
        .await;
    server
        .expect_signed_method("album.addTags", &fixtures::ok_empty(), 1)
        .await;

    let client = authenticated_client(&server);
    let album = Album::new("Daft Punk", "Discovery");
    let delta = client
        .set_tags(&album, &tags(&["house", "french touch"]))
        .await
        .unwrap();
    assert!(delta.to_remove.is_empty());

    let add = &server.received_calls("album.addTags").await[0];
    assert_eq!(param(add, "artist"), Some("Daft Punk"));
    assert_eq!(param(add, "album"), Some("Discovery"));
    assert_eq!(param(add, "tags"), Some("house,french touch"));
}

// ============================================================================
// add_tags / remove_tags / clear_tags
// ============================================================================

/// More than ten tags are split over several addTags calls
#[tokio::test]
async fn test_add_tags_in_batches() {
    let server = MockLastfmServer::start().await;
    server
        .expect_signed_method("artist.addTags", &fixtures::ok_empty(), 2)
        .await;

    let names: Vec<String> = (1..=12).map(|i| format!("tag{}", i)).collect();
    let many: Vec<Tag> = names.iter().map(|n| Tag::new(n.as_str())).collect();

    let client = authenticated_client(&server);
    client.add_tags(&Artist::new("Cher"), &many).await.unwrap();

    let calls = server.received_calls("artist.addTags").await;
    assert_eq!(param(&calls[0], "tags").unwrap().split(',').count(), 10);
    assert_eq!(param(&calls[1], "tags"), Some("tag11,tag12"));
}

/// Adding an empty list sends nothing
#[tokio::test]
async fn test_add_no_tags() {
    let server = MockLastfmServer::start().await;
    server
        .expect_signed_method("artist.addTags", &fixtures::ok_empty(), 0)
        .await;

    let client = authenticated_client(&server);
    client.add_tags(&Artist::new("Cher"), &[]).await.unwrap();
}

/// Clearing removes every current tag, one call each
#[tokio::test]
async fn test_clear_tags() {
    let server = MockLastfmServer::start().await;
    server
        .mock_method("track.getTags", &fixtures::tags(&["x", "y", "z"]))
        .await;
    server
        .expect_signed_method("track.removeTag", &fixtures::ok_empty(), 3)
        .await;

    let client = authenticated_client(&server);
    let removed = client
        .clear_tags(&Track::new("Cher", "Believe"))
        .await
        .unwrap();
    assert_eq!(removed, 3);

    let removed_names: Vec<String> = server
        .received_calls("track.removeTag")
        .await
        .iter()
        .filter_map(|call| param(call, "tag").map(str::to_string))
        .collect();
    assert_eq!(removed_names, vec!["x", "y", "z"]);
}

/// An invalid session surfaces as an API error and is not retried
#[tokio::test]
async fn test_add_tags_with_invalid_session() {
    let server = MockLastfmServer::start().await;
    server
        .mock_error("artist.addTags", codes::INVALID_SESSION_KEY, "Invalid session key")
        .await;

    let client = authenticated_client(&server);
    let result = client.add_tags(&Artist::new("Cher"), &tags(&["pop"])).await;
    assert_matches!(
        result,
        Err(LastfmError::Api { code, .. }) if code == codes::INVALID_SESSION_KEY
    );
    assert_eq!(server.received_methods().await.len(), 1);
}

/// Without a session nothing reaches the wire
#[tokio::test]
async fn test_tagging_without_session_sends_nothing() {
    let server = MockLastfmServer::start().await;
    let client = client(&server).with_api_secret("secret");

    let result = client.set_tags(&Artist::new("Cher"), &tags(&["pop"])).await;
    assert_matches!(result, Err(LastfmError::AuthenticationRequired));
    assert!(server.received_methods().await.is_empty());
}

// ============================================================================
// top_tags
// ============================================================================

/// Top tags need no session and can be truncated
#[tokio::test]
async fn test_top_tags_limited() {
    let server = MockLastfmServer::start().await;
    server
        .mock_method_with_param(
            "track.getTopTags",
            "track",
            "Believe",
            &fixtures::top_tags(&["pop", "dance", "90s", "cher"]),
        )
        .await;

    let client = client(&server);
    let track = Track::new("Cher", "Believe");

    let all = client.top_tags(&track).await.unwrap();
    assert_eq!(all.len(), 4);

    let two = client.top_tags_limited(&track, 2).await.unwrap();
    assert_eq!(two, tags(&["pop", "dance"]));

    let more = client.top_tags_limited(&track, 10).await.unwrap();
    assert_eq!(more.len(), 4);

    let calls = server.received_calls("track.getTopTags").await;
    assert!(param(&calls[0], "api_sig").is_none());
    assert!(param(&calls[0], "sk").is_none());
}
