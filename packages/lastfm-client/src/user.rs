//! Users, the authenticated user and their recommendations

use tracing::{debug, instrument};

use crate::client::{ApiRequest, LastfmClient};
use crate::error::{LastfmError, LastfmResult};
use crate::models::{AuthenticatedUser, Country, Event, Gender, User, UserInfo};
use crate::resource::Resource;
use crate::xml::XmlNode;

/// Default page size of `user.getRecommendedEvents`
pub const DEFAULT_EVENTS_LIMIT: u32 = 20;

fn parse_user_info(doc: &XmlNode) -> LastfmResult<UserInfo> {
    let user = doc.require("user")?;

    // Sizes are listed small to large
    let image_url = user
        .children_named("image")
        .filter(|n| !n.text().is_empty())
        .last()
        .map(|n| n.text().to_string());

    let country = user
        .child_text("country")
        .filter(|c| !c.eq_ignore_ascii_case("none"))
        .map(|c| Country {
            name: c.to_string(),
        });

    Ok(UserInfo {
        name: user.require_child_text("name")?.to_string(),
        image_url,
        language: user.child_text("lang").map(str::to_string),
        country,
        age: user.parse_child::<u32>("age").filter(|age| *age > 0),
        gender: Gender::from_code(user.child_text("gender").unwrap_or_default()),
        subscriber: user.child_text("subscriber") == Some("1"),
        playcount: user.require_parse_child("playcount")?,
    })
}

fn parse_events(doc: &XmlNode) -> LastfmResult<Vec<Event>> {
    doc.descendants("event")
        .into_iter()
        .map(|node| {
            Ok(Event {
                id: node.require_parse_child("id")?,
                title: node.child_text("title").map(str::to_string),
            })
        })
        .collect()
}

impl LastfmClient {
    /// The user owning the current session
    ///
    /// # Errors
    /// - `LastfmError::AuthenticationRequired` - If the client has no session
    #[instrument(skip(self))]
    pub async fn authenticated_user(&self) -> LastfmResult<AuthenticatedUser> {
        self.session().require_authentication()?;

        let doc = self
            .execute(&ApiRequest::get("user.getInfo").authenticated())
            .await?;
        let name = doc
            .extract("name")
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                LastfmError::MalformedResponse("user.getInfo response has no name".to_string())
            })?;

        debug!(user = %name, "Resolved authenticated user");
        Ok(AuthenticatedUser {
            user: User::new(name),
        })
    }

    /// Profile of the user owning the current session
    #[instrument(skip(self))]
    pub async fn authenticated_user_info(&self) -> LastfmResult<UserInfo> {
        let doc = self
            .execute(&ApiRequest::get("user.getInfo").authenticated())
            .await?;
        parse_user_info(&doc)
    }

    /// Public profile of `user`
    #[instrument(skip(self))]
    pub async fn user_info(&self, user: &User) -> LastfmResult<UserInfo> {
        Self::validate_name("username", &user.name)?;
        let request = ApiRequest::get(user.method("getInfo")).params(user.identity_params());
        let doc = self.execute(&request).await?;
        parse_user_info(&doc)
    }

    /// Events Last.fm recommends to the authenticated user
    #[instrument(skip(self))]
    pub async fn recommended_events(&self, limit: u32, page: u32) -> LastfmResult<Vec<Event>> {
        self.session().require_authentication()?;
        if limit == 0 || page == 0 {
            return Err(LastfmError::InvalidInput(
                "limit and page must be at least 1".to_string(),
            ));
        }

        let request = ApiRequest::get("user.getRecommendedEvents")
            .param("limit", limit.to_string())
            .param("page", page.to_string())
            .authenticated();
        let doc = self.execute(&request).await?;
        let events = parse_events(&doc)?;
        debug!(event_count = events.len(), "Found recommended events");
        Ok(events)
    }

    /// First page of recommended events at the default page size
    pub async fn recommended_events_first_page(&self) -> LastfmResult<Vec<Event>> {
        self.recommended_events(DEFAULT_EVENTS_LIMIT, 1).await
    }
}
