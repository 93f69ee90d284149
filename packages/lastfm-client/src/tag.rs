//! Tag methods: similar tags and the top albums, artists and tracks of a tag

use tracing::{debug, instrument};

use crate::client::{ApiRequest, LastfmClient};
use crate::error::{LastfmError, LastfmResult};
use crate::models::{Album, Artist, Tag, TopAlbum, TopArtist, TopTrack, Track};
use crate::resource::Resource;
use crate::xml::XmlNode;

/// Name of the artist inside an `<album>` or `<track>` element
///
/// Charts nest `<artist><name>..</name></artist>`, search results give the
/// artist as plain text.
pub(crate) fn nested_artist_name(node: &XmlNode) -> LastfmResult<&str> {
    let artist = node.child("artist").ok_or_else(|| {
        LastfmError::MalformedResponse(format!("<{}> has no <artist>", node.name()))
    })?;
    match artist.child_text("name") {
        Some(name) => Ok(name),
        None if !artist.text().is_empty() => Ok(artist.text()),
        None => Err(LastfmError::MalformedResponse(format!(
            "<{}> has an empty <artist>",
            node.name()
        ))),
    }
}

pub(crate) fn parse_tag_names(doc: &XmlNode) -> LastfmResult<Vec<Tag>> {
    doc.descendants("tag")
        .into_iter()
        .map(|node| Ok(Tag::new(node.require_child_text("name")?)))
        .collect()
}

fn parse_top_albums(doc: &XmlNode) -> LastfmResult<Vec<TopAlbum>> {
    doc.descendants("album")
        .into_iter()
        .map(|node| {
            let album = Album::new(nested_artist_name(node)?, node.require_child_text("name")?);
            Ok(TopAlbum {
                album,
                weight: node.parse_child("tagcount"),
            })
        })
        .collect()
}

fn parse_top_artists(doc: &XmlNode) -> LastfmResult<Vec<TopArtist>> {
    doc.descendants("artist")
        .into_iter()
        .map(|node| {
            Ok(TopArtist {
                artist: Artist::new(node.require_child_text("name")?),
                weight: node.parse_child("tagcount"),
            })
        })
        .collect()
}

fn parse_top_tracks(doc: &XmlNode) -> LastfmResult<Vec<TopTrack>> {
    doc.descendants("track")
        .into_iter()
        .map(|node| {
            let track = Track::new(nested_artist_name(node)?, node.require_child_text("name")?);
            Ok(TopTrack {
                track,
                weight: node.parse_child("tagcount"),
            })
        })
        .collect()
}

impl LastfmClient {
    fn tag_request(tag: &Tag, method: &str) -> LastfmResult<ApiRequest> {
        Self::validate_name("tag name", &tag.name)?;
        Ok(ApiRequest::get(tag.method(method)).params(tag.identity_params()))
    }

    /// Tags similar to `tag` (`tag.getSimilar`)
    ///
    /// # Errors
    /// - `LastfmError::InvalidInput` - If the tag name is empty or too long
    /// - `LastfmError::NotFound` - If the tag is unknown
    /// - `LastfmError::Http` - If the HTTP request fails
    #[instrument(skip(self))]
    pub async fn tag_similar(&self, tag: &Tag) -> LastfmResult<Vec<Tag>> {
        let doc = self.execute(&Self::tag_request(tag, "getSimilar")?).await?;
        let similar = parse_tag_names(&doc)?;
        debug!(tag = %tag, result_count = similar.len(), "Found similar tags");
        Ok(similar)
    }

    /// Albums most often tagged with `tag` (`tag.getTopAlbums`)
    #[instrument(skip(self))]
    pub async fn tag_top_albums(&self, tag: &Tag) -> LastfmResult<Vec<TopAlbum>> {
        let doc = self.execute(&Self::tag_request(tag, "getTopAlbums")?).await?;
        let albums = parse_top_albums(&doc)?;
        debug!(tag = %tag, result_count = albums.len(), "Found top albums");
        Ok(albums)
    }

    /// Artists most often tagged with `tag` (`tag.getTopArtists`)
    #[instrument(skip(self))]
    pub async fn tag_top_artists(&self, tag: &Tag) -> LastfmResult<Vec<TopArtist>> {
        let doc = self.execute(&Self::tag_request(tag, "getTopArtists")?).await?;
        let artists = parse_top_artists(&doc)?;
        debug!(tag = %tag, result_count = artists.len(), "Found top artists");
        Ok(artists)
    }

    /// Tracks most often tagged with `tag` (`tag.getTopTracks`)
    #[instrument(skip(self))]
    pub async fn tag_top_tracks(&self, tag: &Tag) -> LastfmResult<Vec<TopTrack>> {
        let doc = self.execute(&Self::tag_request(tag, "getTopTracks")?).await?;
        let tracks = parse_top_tracks(&doc)?;
        debug!(tag = %tag, result_count = tracks.len(), "Found top tracks");
        Ok(tracks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_response;

    #[test]
    fn test_parse_similar_tags() {
        let doc = parse_response(
            r#"<lfm status="ok"><similartags tag="disco">
                <tag><name>funk</name><url>www.last.fm/tag/funk</url><streamable>1</streamable></tag>
                <tag><name>soul</name><url>www.last.fm/tag/soul</url></tag>
            </similartags></lfm>"#,
        )
        .unwrap();
        let tags = parse_tag_names(&doc).unwrap();
        assert_eq!(tags, vec![Tag::new("funk"), Tag::new("soul")]);
    }

    #[test]
    fn test_parse_top_albums_uses_nested_artist() {
        let doc = parse_response(
            r#"<lfm status="ok"><topalbums tag="disco">
                <album rank="1"><name>Discovery</name><tagcount>105</tagcount>
                    <artist><name>Daft Punk</name><mbid/></artist></album>
                <album rank="2"><name>Voulez-Vous</name>
                    <artist><name>ABBA</name></artist></album>
            </topalbums></lfm>"#,
        )
        .unwrap();
        let albums = parse_top_albums(&doc).unwrap();
        assert_eq!(albums.len(), 2);
        assert_eq!(albums[0].album, Album::new("Daft Punk", "Discovery"));
        assert_eq!(albums[0].weight, Some(105));
        assert_eq!(albums[1].album.artist, "ABBA");
        assert_eq!(albums[1].weight, None);
    }

    #[test]
    fn test_parse_top_artists() {
        let doc = parse_response(
            r#"<lfm status="ok"><topartists tag="disco">
                <artist rank="1"><name>Bee Gees</name><tagcount>323</tagcount></artist>
            </topartists></lfm>"#,
        )
        .unwrap();
        let artists = parse_top_artists(&doc).unwrap();
        assert_eq!(artists[0].artist.name, "Bee Gees");
        assert_eq!(artists[0].weight, Some(323));
    }

    #[test]
    fn test_parse_top_tracks() {
        let doc = parse_response(
            r#"<lfm status="ok"><toptracks tag="disco">
                <track rank="1"><name>Stayin' Alive</name><tagcount>251</tagcount>
                    <artist><name>Bee Gees</name></artist></track>
            </toptracks></lfm>"#,
        )
        .unwrap();
        let tracks = parse_top_tracks(&doc).unwrap();
        assert_eq!(tracks[0].track, Track::new("Bee Gees", "Stayin' Alive"));
        assert_eq!(tracks[0].weight, Some(251));
    }

    #[test]
    fn test_top_album_without_artist_is_malformed() {
        let doc = parse_response(
            r#"<lfm status="ok"><topalbums><album><name>Orphan</name></album></topalbums></lfm>"#,
        )
        .unwrap();
        assert!(parse_top_albums(&doc).is_err());
    }

    #[test]
    fn test_plain_text_artist() {
        let doc = parse_response(
            r#"<lfm status="ok"><album><name>Discovery</name><artist>Daft Punk</artist></album></lfm>"#,
        )
        .unwrap();
        let album = doc.require("album").unwrap();
        assert_eq!(nested_artist_name(album).unwrap(), "Daft Punk");
    }
}
