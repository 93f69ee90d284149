//! Last.fm domain objects

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::language::SiteLanguage;

/// Encode one path segment the way Last.fm page URLs do (`hip hop` -> `hip+hop`)
pub(crate) fn url_safe(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes()).collect()
}

/// Objects that have a page on the Last.fm website
pub trait HasUrl {
    /// Path of the page below the site root, starting with `/`
    fn url_path(&self) -> String;

    /// Page URL on the site localized for `language`
    fn url_for(&self, language: SiteLanguage) -> String {
        format!("https://{}{}", language.domain(), self.url_path())
    }

    /// Page URL on the English site
    fn url(&self) -> String {
        self.url_for(SiteLanguage::English)
    }
}

/// A tag (genre/descriptor); two tags are the same when their names match exactly
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for Tag {
    fn from(name: &str) -> Self {
        Tag::new(name)
    }
}

impl From<String> for Tag {
    fn from(name: String) -> Self {
        Tag::new(name)
    }
}

impl HasUrl for Tag {
    fn url_path(&self) -> String {
        format!("/tag/{}", url_safe(&self.name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
}

impl Artist {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Artist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl HasUrl for Artist {
    fn url_path(&self) -> String {
        format!("/music/{}", url_safe(&self.name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Album {
    /// Name of the album artist
    pub artist: String,
    pub title: String,
}

impl Album {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }
}

impl fmt::Display for Album {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.artist, self.title)
    }
}

impl HasUrl for Album {
    fn url_path(&self) -> String {
        format!("/music/{}/{}", url_safe(&self.artist), url_safe(&self.title))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    pub artist: String,
    pub title: String,
}

impl Track {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.artist, self.title)
    }
}

impl HasUrl for Track {
    fn url_path(&self) -> String {
        format!(
            "/music/{}/_/{}",
            url_safe(&self.artist),
            url_safe(&self.title)
        )
    }
}

/// A Last.fm user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub name: String,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl HasUrl for User {
    fn url_path(&self) -> String {
        format!("/user/{}", url_safe(&self.name))
    }
}

/// The user owning the current session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user: User,
}

impl AuthenticatedUser {
    pub fn name(&self) -> &str {
        &self.user.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
}

/// An event recommended to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unspecified,
}

impl Gender {
    /// Map the single-letter code used by `user.getInfo`
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "m" => Gender::Male,
            "f" => Gender::Female,
            _ => Gender::Unspecified,
        }
    }
}

/// Profile details from `user.getInfo`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub name: String,
    /// Avatar URL (largest size available)
    pub image_url: Option<String>,
    /// ISO 639 alpha-2 language code
    pub language: Option<String>,
    pub country: Option<Country>,
    /// Age; `None` when the user hides it
    pub age: Option<u32>,
    pub gender: Gender,
    pub subscriber: bool,
    pub playcount: u64,
}

impl UserInfo {
    /// Site language matching the user's language code
    pub fn site_language(&self) -> Option<SiteLanguage> {
        self.language.as_deref().and_then(SiteLanguage::from_code)
    }
}

/// An album ranked under a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopAlbum {
    pub album: Album,
    /// How many times the album was tagged (not always reported)
    pub weight: Option<u64>,
}

/// An artist ranked under a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopArtist {
    pub artist: Artist,
    pub weight: Option<u64>,
}

/// A track ranked under a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopTrack {
    pub track: Track,
    pub weight: Option<u64>,
}

/// A similar artist from `artist.getSimilar`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarArtist {
    pub artist: Artist,
    /// MusicBrainz ID (if available)
    pub mbid: Option<String>,
    /// Similarity score (0.0 - 1.0)
    pub match_score: f64,
    /// URL to Last.fm artist page
    pub url: Option<String>,
}

impl SimilarArtist {
    /// Clamp a raw `match` value into `[0, 1]`, unparseable values become 0
    pub(crate) fn parse_match(artist: &str, raw: Option<&str>) -> f64 {
        let parsed: f64 = match raw.map(str::parse::<f64>) {
            Some(Ok(value)) => value,
            Some(Err(e)) => {
                tracing::warn!(
                    artist = %artist,
                    raw_score = ?raw,
                    error = %e,
                    "Failed to parse match score, defaulting to 0.0"
                );
                0.0
            }
            None => 0.0,
        };

        if parsed.is_finite() {
            parsed.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Wiki text attached to an album or artist
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wiki {
    pub summary: Option<String>,
    pub content: Option<String>,
    pub published: Option<DateTime<Utc>>,
}
