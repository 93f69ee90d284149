//! Last.fm web service client
//!
//! This crate provides a typed client for the Last.fm 2.0 web service:
//! - Tags: similar tags, top albums/artists/tracks, weekly charts
//! - Tagging artists, albums and tracks, including replacing a tag set
//! - Paged search for tags, artists, albums and tracks
//! - Users, the authenticated user and recommended events
//! - Album and artist wikis, similar artists
//! - Signed requests and session authentication
//!
//! # Example
//!
//! ```rust,no_run
//! use lastfm_services::{Artist, LastfmClient, Tag};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = LastfmClient::new("your_api_key")?;
//!
//! // Tags related to "disco"
//! for tag in client.tag_similar(&Tag::new("disco")).await? {
//!     println!("{}", tag);
//! }
//!
//! // Page through an artist search
//! let mut search = client.search_artists("Cher")?;
//! let first_page = search.page(1).await?;
//! println!("{} of {} results", first_page.len(), search.total_results().await?);
//!
//! // Tagging needs a secret and a session key
//! let client = client
//!     .with_api_secret("your_api_secret")
//!     .with_session_key("session_key");
//! client
//!     .set_tags(&Artist::new("Cher"), &[Tag::new("pop"), Tag::new("diva")])
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Environment Variables
//!
//! - `LASTFM_API_KEY`: API key for Last.fm (required)
//! - `LASTFM_API_SECRET`: Shared secret, needed for signed methods
//! - `LASTFM_SESSION_KEY`: Session key, needed for user-scoped methods

mod artist;
mod charts;
mod client;
mod error;
mod language;
mod models;
mod params;
mod resource;
mod search;
mod session;
mod tag;
mod taggable;
mod user;
mod wiki;
mod xml;

pub use charts::{
    datetime_to_timestamp, timestamp_to_datetime, WeeklyArtistChart, WeeklyArtistChartItem,
    WeeklyChartSource, WeeklyChartTimeSpan,
};
pub use client::{ApiKeyStatus, ApiRequest, HttpMethod, LastfmClient};
pub use error::{codes, LastfmError, LastfmResult};
pub use language::SiteLanguage;
pub use models::{
    Album, Artist, AuthenticatedUser, Country, Event, Gender, HasUrl, SimilarArtist, Tag,
    TopAlbum, TopArtist, TopTrack, Track, User, UserInfo, Wiki,
};
pub use params::RequestParams;
pub use resource::Resource;
pub use search::{
    AlbumQuery, AlbumSearch, ArtistQuery, ArtistSearch, Search, SearchKind, TagQuery, TagSearch,
    TrackQuery, TrackSearch, DEFAULT_ITEMS_PER_PAGE,
};
pub use session::{Session, SessionInfo};
pub use taggable::{TagDelta, Taggable};
pub use user::DEFAULT_EVENTS_LIMIT;
pub use xml::{parse_response, XmlNode};

pub use lastfm_shared_config::LastfmConfig;
