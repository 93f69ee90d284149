//! Identification of API resources

use crate::models::{Album, Artist, Tag, Track, User};
use crate::params::RequestParams;

/// Something the web service addresses by a method prefix plus identifying parameters
///
/// `artist.getTopTags` for [`Artist`] is `"artist"` + `getTopTags`, called with
/// `artist=<name>`.
pub trait Resource {
    /// Method namespace (`artist`, `album`, `track`, `tag`, `user`)
    fn method_prefix(&self) -> &'static str;

    /// Parameters naming this particular resource
    fn identity_params(&self) -> RequestParams;

    /// Fully qualified method name
    fn method(&self, name: &str) -> String {
        format!("{}.{}", self.method_prefix(), name)
    }
}

impl Resource for Tag {
    fn method_prefix(&self) -> &'static str {
        "tag"
    }

    fn identity_params(&self) -> RequestParams {
        RequestParams::new().with("tag", self.name.as_str())
    }
}

impl Resource for Artist {
    fn method_prefix(&self) -> &'static str {
        "artist"
    }

    fn identity_params(&self) -> RequestParams {
        RequestParams::new().with("artist", self.name.as_str())
    }
}

impl Resource for Album {
    fn method_prefix(&self) -> &'static str {
        "album"
    }

    fn identity_params(&self) -> RequestParams {
        RequestParams::new()
            .with("artist", self.artist.as_str())
            .with("album", self.title.as_str())
    }
}

impl Resource for Track {
    fn method_prefix(&self) -> &'static str {
        "track"
    }

    fn identity_params(&self) -> RequestParams {
        RequestParams::new()
            .with("artist", self.artist.as_str())
            .with("track", self.title.as_str())
    }
}

impl Resource for User {
    fn method_prefix(&self) -> &'static str {
        "user"
    }

    fn identity_params(&self) -> RequestParams {
        RequestParams::new().with("user", self.name.as_str())
    }
}
