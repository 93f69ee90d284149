//! Paged searches for tags, artists, albums and tracks

use std::marker::PhantomData;

use tracing::{debug, instrument};

use crate::client::{ApiRequest, LastfmClient};
use crate::error::{LastfmError, LastfmResult};
use crate::models::{Album, Artist, Tag, Track};
use crate::params::RequestParams;
use crate::tag::nested_artist_name;
use crate::xml::XmlNode;

/// Default number of results per page
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 30;

/// What is searched for and how a result element is read
pub trait SearchKind {
    type Item;

    /// API method, e.g. `tag.search`
    const METHOD: &'static str;
    /// Parameter carrying the search term
    const TERM: &'static str;
    /// Element wrapping the results, e.g. `tagmatches`
    const MATCHES: &'static str;
    /// Element of a single result
    const ELEMENT: &'static str;

    fn parse_item(node: &XmlNode) -> LastfmResult<Self::Item>;
}

#[derive(Debug, Clone, Copy)]
pub struct TagQuery;

#[derive(Debug, Clone, Copy)]
pub struct ArtistQuery;

#[derive(Debug, Clone, Copy)]
pub struct AlbumQuery;

#[derive(Debug, Clone, Copy)]
pub struct TrackQuery;

impl SearchKind for TagQuery {
    type Item = Tag;
    const METHOD: &'static str = "tag.search";
    const TERM: &'static str = "tag";
    const MATCHES: &'static str = "tagmatches";
    const ELEMENT: &'static str = "tag";

    fn parse_item(node: &XmlNode) -> LastfmResult<Tag> {
        Ok(Tag::new(node.require_child_text("name")?))
    }
}

impl SearchKind for ArtistQuery {
    type Item = Artist;
    const METHOD: &'static str = "artist.search";
    const TERM: &'static str = "artist";
    const MATCHES: &'static str = "artistmatches";
    const ELEMENT: &'static str = "artist";

    fn parse_item(node: &XmlNode) -> LastfmResult<Artist> {
        Ok(Artist::new(node.require_child_text("name")?))
    }
}

impl SearchKind for AlbumQuery {
    type Item = Album;
    const METHOD: &'static str = "album.search";
    const TERM: &'static str = "album";
    const MATCHES: &'static str = "albummatches";
    const ELEMENT: &'static str = "album";

    fn parse_item(node: &XmlNode) -> LastfmResult<Album> {
        Ok(Album::new(
            nested_artist_name(node)?,
            node.require_child_text("name")?,
        ))
    }
}

impl SearchKind for TrackQuery {
    type Item = Track;
    const METHOD: &'static str = "track.search";
    const TERM: &'static str = "track";
    const MATCHES: &'static str = "trackmatches";
    const ELEMENT: &'static str = "track";

    fn parse_item(node: &XmlNode) -> LastfmResult<Track> {
        Ok(Track::new(
            nested_artist_name(node)?,
            node.require_child_text("name")?,
        ))
    }
}

pub type TagSearch<'a> = Search<'a, TagQuery>;
pub type ArtistSearch<'a> = Search<'a, ArtistQuery>;
pub type AlbumSearch<'a> = Search<'a, AlbumQuery>;
pub type TrackSearch<'a> = Search<'a, TrackQuery>;

/// One page of results plus the totals reported with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchPage<T> {
    pub items: Vec<T>,
    pub total_results: u64,
    pub items_per_page: Option<u32>,
}

pub(crate) fn parse_search_page<K: SearchKind>(doc: &XmlNode) -> LastfmResult<SearchPage<K::Item>> {
    let results = doc.require("results")?;
    let total_results = results
        .parse_child::<u64>("opensearch:totalResults")
        .unwrap_or_default();
    let items_per_page = results.parse_child::<u32>("opensearch:itemsPerPage");

    let items = match results.child(K::MATCHES) {
        Some(matches) => matches
            .children_named(K::ELEMENT)
            .map(K::parse_item)
            .collect::<LastfmResult<Vec<_>>>()?,
        None => Vec::new(),
    };

    Ok(SearchPage {
        items,
        total_results,
        items_per_page,
    })
}

/// A search that can be walked page by page
///
/// Totals are taken from the most recently fetched page.
#[derive(Debug)]
pub struct Search<'a, K: SearchKind> {
    client: &'a LastfmClient,
    terms: RequestParams,
    items_per_page: u32,
    total_results: Option<u64>,
    reported_items_per_page: Option<u32>,
    kind: PhantomData<K>,
}

impl<'a, K: SearchKind> Search<'a, K> {
    pub(crate) fn new(
        client: &'a LastfmClient,
        term: &str,
        items_per_page: u32,
    ) -> LastfmResult<Self> {
        let term = LastfmClient::validate_name("search term", term)?;
        if items_per_page == 0 {
            return Err(LastfmError::InvalidInput(
                "items per page must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            client,
            terms: RequestParams::new().with(K::TERM, term),
            items_per_page,
            total_results: None,
            reported_items_per_page: None,
            kind: PhantomData,
        })
    }

    /// Add a refining term, e.g. `artist` for a track search
    pub fn with_term(mut self, key: &str, value: &str) -> Self {
        self.terms.insert(key, value.trim());
        self
    }

    pub fn items_per_page(&self) -> u32 {
        self.items_per_page
    }

    /// Page size Last.fm reported with the last fetched page, if any
    pub fn reported_items_per_page(&self) -> Option<u32> {
        self.reported_items_per_page
    }

    /// Fetch page `page` (1-based)
    #[instrument(skip(self), fields(method = K::METHOD))]
    pub async fn page(&mut self, page: u32) -> LastfmResult<Vec<K::Item>> {
        if page == 0 {
            return Err(LastfmError::InvalidInput(
                "pages are numbered from 1".to_string(),
            ));
        }

        let request = ApiRequest::get(K::METHOD)
            .params(self.terms.clone())
            .param("limit", self.items_per_page.to_string())
            .param("page", page.to_string());

        let doc = self.client.execute(&request).await?;
        let result = parse_search_page::<K>(&doc)?;
        self.total_results = Some(result.total_results);
        self.reported_items_per_page = result.items_per_page;

        debug!(
            page,
            result_count = result.items.len(),
            total_results = result.total_results,
            "Fetched search page"
        );
        Ok(result.items)
    }

    /// Total number of matches, fetching the first page if none was fetched yet
    pub async fn total_results(&mut self) -> LastfmResult<u64> {
        if let Some(total) = self.total_results {
            return Ok(total);
        }
        self.page(1).await?;
        Ok(self.total_results.unwrap_or_default())
    }

    /// Number of pages available at the current page size
    pub async fn page_count(&mut self) -> LastfmResult<u64> {
        let total = self.total_results().await?;
        Ok(total.div_ceil(u64::from(self.items_per_page)))
    }
}

impl LastfmClient {
    /// Search tags by name, 30 results per page
    pub fn search_tags(&self, name: &str) -> LastfmResult<TagSearch<'_>> {
        Search::new(self, name, DEFAULT_ITEMS_PER_PAGE)
    }

    /// Search tags by name with a custom page size
    pub fn search_tags_with_page_size(
        &self,
        name: &str,
        items_per_page: u32,
    ) -> LastfmResult<TagSearch<'_>> {
        Search::new(self, name, items_per_page)
    }

    pub fn search_artists(&self, name: &str) -> LastfmResult<ArtistSearch<'_>> {
        Search::new(self, name, DEFAULT_ITEMS_PER_PAGE)
    }

    pub fn search_albums(&self, title: &str) -> LastfmResult<AlbumSearch<'_>> {
        Search::new(self, title, DEFAULT_ITEMS_PER_PAGE)
    }

    /// Search tracks by title, optionally narrowed to one artist
    pub fn search_tracks(
        &self,
        title: &str,
        artist: Option<&str>,
    ) -> LastfmResult<TrackSearch<'_>> {
        let search = Search::new(self, title, DEFAULT_ITEMS_PER_PAGE)?;
        Ok(match artist.map(str::trim).filter(|a| !a.is_empty()) {
            Some(artist) => search.with_term("artist", artist),
            None => search,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_response;

    const TAG_RESULTS: &str = r#"<lfm status="ok">
<results for="disco" xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">
  <opensearch:Query role="request" searchTerms="disco" startPage="1"/>
  <opensearch:totalResults>76</opensearch:totalResults>
  <opensearch:startIndex>0</opensearch:startIndex>
  <opensearch:itemsPerPage>30</opensearch:itemsPerPage>
  <tagmatches>
    <tag><name>disco</name><count>87042</count><url>www.last.fm/tag/disco</url></tag>
    <tag><name>italo disco</name><count>10000</count><url>www.last.fm/tag/italo%20disco</url></tag>
  </tagmatches>
</results></lfm>"#;

    #[test]
    fn test_parse_tag_page() {
        let doc = parse_response(TAG_RESULTS).unwrap();
        let page = parse_search_page::<TagQuery>(&doc).unwrap();
        assert_eq!(page.total_results, 76);
        assert_eq!(page.items_per_page, Some(30));
        assert_eq!(page.items, vec![Tag::new("disco"), Tag::new("italo disco")]);
    }

    #[test]
    fn test_parse_track_page_with_text_artist() {
        let doc = parse_response(
            r#"<lfm status="ok"><results><opensearch:totalResults>1</opensearch:totalResults>
            <trackmatches><track><name>Believe</name><artist>Cher</artist><listeners>1</listeners></track></trackmatches>
            </results></lfm>"#,
        )
        .unwrap();
        let page = parse_search_page::<TrackQuery>(&doc).unwrap();
        assert_eq!(page.items, vec![Track::new("Cher", "Believe")]);
        assert_eq!(page.items_per_page, None);
    }

    #[test]
    fn test_parse_page_without_matches() {
        let doc = parse_response(
            r#"<lfm status="ok"><results><opensearch:totalResults>0</opensearch:totalResults></results></lfm>"#,
        )
        .unwrap();
        let page = parse_search_page::<ArtistQuery>(&doc).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_results, 0);
    }

    #[test]
    fn test_search_rejects_bad_arguments() {
        let client = LastfmClient::new("key").unwrap();
        assert!(client.search_tags("   ").is_err());
        assert!(client.search_tags_with_page_size("disco", 0).is_err());
    }

    #[test]
    fn test_search_defaults() {
        let client = LastfmClient::new("key").unwrap();
        let search = client.search_tags("disco").unwrap();
        assert_eq!(search.items_per_page(), DEFAULT_ITEMS_PER_PAGE);
        assert_eq!(search.terms.get("tag"), Some("disco"));

        let search = client.search_tracks("Believe", Some(" Cher ")).unwrap();
        assert_eq!(search.terms.get("track"), Some("Believe"));
        assert_eq!(search.terms.get("artist"), Some("Cher"));
    }

    #[tokio::test]
    async fn test_page_zero_rejected() {
        let client = LastfmClient::new("key").unwrap();
        let mut search = client.search_albums("Discovery").unwrap();
        assert!(matches!(
            search.page(0).await,
            Err(LastfmError::InvalidInput(_))
        ));
    }
}
