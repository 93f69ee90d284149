//! Album and artist wikis

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing::{debug, instrument};

use crate::client::{ApiRequest, LastfmClient};
use crate::error::LastfmResult;
use crate::models::{Album, Artist, Wiki};
use crate::resource::Resource;
use crate::xml::XmlNode;

/// Format of `<published>`, e.g. `27 Jul 2008, 15:44`
const PUBLISHED_FORMAT: &str = "%d %b %Y, %H:%M";

/// Parse a publication date, `None` if no known format matches
pub(crate) fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, PUBLISHED_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Read the wiki element `section` (`wiki` or `bio`), missing parts stay `None`
fn parse_wiki(doc: &XmlNode, section: &str) -> Wiki {
    let Some(node) = doc.find(section) else {
        return Wiki::default();
    };

    let published = node.child_text("published").and_then(|raw| {
        let parsed = parse_published(raw);
        if parsed.is_none() {
            debug!(raw = %raw, "Unrecognised wiki publication date");
        }
        parsed
    });

    Wiki {
        summary: node.child_text("summary").map(str::to_string),
        content: node.child_text("content").map(str::to_string),
        published,
    }
}

impl LastfmClient {
    /// Wiki of `album` (`album.getInfo`)
    #[instrument(skip(self))]
    pub async fn album_wiki(&self, album: &Album) -> LastfmResult<Wiki> {
        Self::validate_name("artist name", &album.artist)?;
        Self::validate_name("album title", &album.title)?;

        let request = ApiRequest::get(album.method("getInfo")).params(album.identity_params());
        let doc = self.execute(&request).await?;
        Ok(parse_wiki(&doc, "wiki"))
    }

    /// Biography of `artist` (`artist.getInfo`)
    #[instrument(skip(self))]
    pub async fn artist_wiki(&self, artist: &Artist) -> LastfmResult<Wiki> {
        Self::validate_name("artist name", &artist.name)?;

        let request = ApiRequest::get(artist.method("getInfo")).params(artist.identity_params());
        let doc = self.execute(&request).await?;
        Ok(parse_wiki(&doc, "bio"))
    }
}
