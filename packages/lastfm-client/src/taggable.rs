//! Tagging of artists, albums and tracks

use std::collections::HashSet;

use tracing::{debug, info, instrument};

use crate::client::{ApiRequest, LastfmClient};
use crate::error::{LastfmError, LastfmResult};
use crate::models::{Album, Artist, Tag, Track};
use crate::resource::Resource;
use crate::tag::parse_tag_names;

/// Most tags `*.addTags` accepts in one call
const MAX_TAGS_PER_CALL: usize = 10;

/// Resources users can tag
pub trait Taggable: Resource + std::fmt::Debug {}

impl Taggable for Artist {}
impl Taggable for Album {}
impl Taggable for Track {}

/// Changes needed to turn one tag set into another
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDelta {
    pub to_add: Vec<Tag>,
    pub to_remove: Vec<Tag>,
}

impl TagDelta {
    /// Tags in `desired` but not `current` are added, tags in `current` but not
    /// `desired` are removed. Order follows the input lists.
    pub fn between(current: &[Tag], desired: &[Tag]) -> Self {
        let current_set: HashSet<&Tag> = current.iter().collect();
        let desired_set: HashSet<&Tag> = desired.iter().collect();

        let mut seen = HashSet::new();
        let to_add = desired
            .iter()
            .filter(|tag| !current_set.contains(tag) && seen.insert(*tag))
            .cloned()
            .collect();

        let mut seen = HashSet::new();
        let to_remove = current
            .iter()
            .filter(|tag| !desired_set.contains(tag) && seen.insert(*tag))
            .cloned()
            .collect();

        Self { to_add, to_remove }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Trim names, reject empty or comma-containing ones, drop duplicates
fn normalize_tags(tags: &[Tag]) -> LastfmResult<Vec<Tag>> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::with_capacity(tags.len());
    for tag in tags {
        let name = LastfmClient::validate_name("tag name", &tag.name)?;
        if name.contains(',') {
            return Err(LastfmError::InvalidInput(format!(
                "tag name cannot contain a comma: {:?}",
                name
            )));
        }
        if seen.insert(name.to_string()) {
            normalized.push(Tag::new(name));
        }
    }
    Ok(normalized)
}

impl LastfmClient {
    /// Tag `item` for the authenticated user (`*.addTags`)
    ///
    /// Tags are sent in batches of at most ten. An empty list sends nothing.
    ///
    /// # Errors
    /// - `LastfmError::AuthenticationRequired` - If the client has no session
    /// - `LastfmError::InvalidInput` - If a tag name is empty, too long or has a comma
    #[instrument(skip(self))]
    pub async fn add_tags<T: Taggable>(&self, item: &T, tags: &[Tag]) -> LastfmResult<()> {
        self.session().require_authentication()?;
        let tags = normalize_tags(tags)?;

        for batch in tags.chunks(MAX_TAGS_PER_CALL) {
            let names = batch
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(",");
            let request = ApiRequest::post(item.method("addTags"))
                .params(item.identity_params())
                .param("tags", names)
                .authenticated();
            self.execute(&request).await?;
        }

        debug!(tag_count = tags.len(), "Added tags");
        Ok(())
    }

    /// Remove the authenticated user's `tags` from `item` (`*.removeTag`, one call per tag)
    #[instrument(skip(self))]
    pub async fn remove_tags<T: Taggable>(&self, item: &T, tags: &[Tag]) -> LastfmResult<()> {
        self.session().require_authentication()?;
        let tags = normalize_tags(tags)?;

        for tag in &tags {
            let request = ApiRequest::post(item.method("removeTag"))
                .params(item.identity_params())
                .param("tag", tag.name.as_str())
                .authenticated();
            self.execute(&request).await?;
        }

        debug!(tag_count = tags.len(), "Removed tags");
        Ok(())
    }

    /// Tags the authenticated user applied to `item` (`*.getTags`)
    #[instrument(skip(self))]
    pub async fn tags<T: Taggable>(&self, item: &T) -> LastfmResult<Vec<Tag>> {
        let request = ApiRequest::get(item.method("getTags"))
            .params(item.identity_params())
            .authenticated();
        let doc = self.execute(&request).await?;
        parse_tag_names(&doc)
    }

    /// Most popular tags on `item` across all users (`*.getTopTags`)
    #[instrument(skip(self))]
    pub async fn top_tags<T: Taggable>(&self, item: &T) -> LastfmResult<Vec<Tag>> {
        let request =
            ApiRequest::get(item.method("getTopTags")).params(item.identity_params());
        let doc = self.execute(&request).await?;
        let tags = parse_tag_names(&doc)?;
        debug!(tag_count = tags.len(), "Found top tags");
        Ok(tags)
    }

    /// At most `limit` of the most popular tags on `item`
    pub async fn top_tags_limited<T: Taggable>(
        &self,
        item: &T,
        limit: usize,
    ) -> LastfmResult<Vec<Tag>> {
        let mut tags = self.top_tags(item).await?;
        tags.truncate(limit);
        Ok(tags)
    }

    /// Make the authenticated user's tags on `item` exactly `tags`
    ///
    /// Fetches the current tags, adds the missing ones, then removes the
    /// extra ones. Returns the applied delta.
    #[instrument(skip(self))]
    pub async fn set_tags<T: Taggable>(&self, item: &T, tags: &[Tag]) -> LastfmResult<TagDelta> {
        let desired = normalize_tags(tags)?;
        let current = self.tags(item).await?;
        let delta = TagDelta::between(&current, &desired);

        if !delta.to_add.is_empty() {
            self.add_tags(item, &delta.to_add).await?;
        }
        if !delta.to_remove.is_empty() {
            self.remove_tags(item, &delta.to_remove).await?;
        }

        info!(
            added = delta.to_add.len(),
            removed = delta.to_remove.len(),
            "Updated tags"
        );
        Ok(delta)
    }

    /// Remove every tag the authenticated user applied to `item`
    #[instrument(skip(self))]
    pub async fn clear_tags<T: Taggable>(&self, item: &T) -> LastfmResult<usize> {
        let current = self.tags(item).await?;
        if !current.is_empty() {
            self.remove_tags(item, &current).await?;
        }
        Ok(current.len())
    }
}
