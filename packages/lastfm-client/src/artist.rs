//! Similar-artist discovery

use tracing::{debug, instrument};

use crate::client::{ApiRequest, LastfmClient};
use crate::error::LastfmResult;
use crate::models::{Artist, SimilarArtist};
use crate::resource::Resource;
use crate::xml::XmlNode;

/// Default number of similar artists to return
const DEFAULT_SIMILAR_LIMIT: u32 = 10;

fn parse_similar_artists(doc: &XmlNode) -> LastfmResult<Vec<SimilarArtist>> {
    doc.descendants("artist")
        .into_iter()
        .map(|node| {
            let name = node.require_child_text("name")?;
            Ok(SimilarArtist {
                artist: Artist::new(name),
                mbid: node.child_text("mbid").map(str::to_string),
                match_score: SimilarArtist::parse_match(name, node.child_text("match")),
                url: node.child_text("url").map(str::to_string),
            })
        })
        .collect()
}

impl LastfmClient {
    /// Artists similar to `artist` (`artist.getSimilar`)
    ///
    /// # Arguments
    /// * `artist` - The artist to find similar artists for
    /// * `limit` - Maximum number of similar artists to return (default: 10)
    ///
    /// # Errors
    /// - `LastfmError::InvalidInput` - If the artist name is empty or too long
    /// - `LastfmError::NotFound` - If the artist is not found
    /// - `LastfmError::Api` - If Last.fm returns an error
    /// - `LastfmError::Http` - If the HTTP request fails
    #[instrument(skip(self))]
    pub async fn artist_similar(
        &self,
        artist: &Artist,
        limit: Option<u32>,
    ) -> LastfmResult<Vec<SimilarArtist>> {
        let name = Self::validate_name("artist name", &artist.name)?;
        let limit = limit.unwrap_or(DEFAULT_SIMILAR_LIMIT);

        debug!(artist = %name, limit, "Fetching similar artists");

        let request = ApiRequest::get(artist.method("getSimilar"))
            .param("artist", name)
            .param("limit", limit.to_string());
        let doc = self.execute(&request).await?;
        let artists = parse_similar_artists(&doc)?;

        debug!(
            artist = %name,
            result_count = artists.len(),
            "Found similar artists"
        );
        Ok(artists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_response;

    #[test]
    fn test_parse_similar_artists() {
        let doc = parse_response(
            r#"<lfm status="ok"><similarartists artist="Cher">
                <artist><name>Sonny &amp; Cher</name><mbid>3d6e4b6d-2700-458c-9722-9021965a8164</mbid>
                    <match>1</match><url>https://www.last.fm/music/Sonny+&amp;+Cher</url></artist>
                <artist><name>Kim Wilde</name><mbid></mbid><match>0.42</match></artist>
            </similarartists></lfm>"#,
        )
        .unwrap();
        let artists = parse_similar_artists(&doc).unwrap();
        assert_eq!(artists.len(), 2);
        assert_eq!(artists[0].artist.name, "Sonny & Cher");
        assert_eq!(
            artists[0].mbid.as_deref(),
            Some("3d6e4b6d-2700-458c-9722-9021965a8164")
        );
        assert_eq!(artists[0].match_score, 1.0);
        assert!(artists[0].url.is_some());
        assert!(artists[1].mbid.is_none());
        assert!((artists[1].match_score - 0.42).abs() < f64::EPSILON);
        assert!(artists[1].url.is_none());
    }

    #[test]
    fn test_parse_similar_artists_bad_match() {
        let doc = parse_response(
            r#"<lfm status="ok"><similarartists><artist><name>X</name><match>lots</match></artist></similarartists></lfm>"#,
        )
        .unwrap();
        let artists = parse_similar_artists(&doc).unwrap();
        assert_eq!(artists[0].match_score, 0.0);
    }

    #[tokio::test]
    async fn test_similar_rejects_empty_name() {
        let client = LastfmClient::new("key").unwrap();
        assert!(client
            .artist_similar(&Artist::new("  "), None)
            .await
            .is_err());
    }
}
