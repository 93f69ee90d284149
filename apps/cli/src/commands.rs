use anyhow::{bail, Context, Result};
use lastfm_services::{
    Album, ApiKeyStatus, Artist, HasUrl, LastfmClient, Tag, Taggable, Track, User, UserInfo,
    WeeklyArtistChart, Wiki,
};
use tracing::info;

use crate::cli::{
    ArtistAction, AuthAction, Command, SearchArgs, SearchTarget, TagAction, TagsAction,
    TargetArgs, UserAction,
};

/// The resource a `tags` subcommand acts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Artist(Artist),
    Album(Album),
    Track(Track),
}

impl From<TargetArgs> for Target {
    fn from(args: TargetArgs) -> Self {
        match (args.album, args.track) {
            (Some(title), _) => Target::Album(Album::new(args.artist, title)),
            (None, Some(title)) => Target::Track(Track::new(args.artist, title)),
            (None, None) => Target::Artist(Artist::new(args.artist)),
        }
    }
}

fn to_tags(names: Vec<String>) -> Vec<Tag> {
    names.into_iter().map(Tag::from).collect()
}

pub async fn run(client: &LastfmClient, command: Command) -> Result<()> {
    match command {
        Command::Tag { action } => run_tag(client, action).await,
        Command::Search(args) => run_search(client, args).await,
        Command::Tags { action } => {
            let (target, action) = split_tags_action(action);
            match target {
                Target::Artist(item) => run_tags(client, &item, action).await,
                Target::Album(item) => run_tags(client, &item, action).await,
                Target::Track(item) => run_tags(client, &item, action).await,
            }
        }
        Command::User { action } => run_user(client, action).await,
        Command::Artist { action } => run_artist(client, action).await,
        Command::Album { artist, title } => {
            let album = Album::new(artist, title);
            let wiki = client
                .album_wiki(&album)
                .await
                .with_context(|| format!("failed to fetch wiki of {}", album))?;
            println!("{}", album.url_for(client.site_language()));
            print_wiki(&wiki);
            Ok(())
        }
        Command::Auth { action } => run_auth(client, action).await,
        Command::Check => {
            match client.validate_api_key().await {
                ApiKeyStatus::Valid => println!("API key is valid"),
                ApiKeyStatus::Invalid => bail!("API key was rejected by Last.fm"),
                ApiKeyStatus::Unknown(reason) => bail!("could not check API key: {}", reason),
            }
            Ok(())
        }
    }
}

async fn run_tag(client: &LastfmClient, action: TagAction) -> Result<()> {
    match action {
        TagAction::Similar { name } => {
            for tag in client.tag_similar(&Tag::new(name)).await? {
                println!("{}", tag);
            }
        }
        TagAction::TopAlbums { name } => {
            for top in client.tag_top_albums(&Tag::new(name)).await? {
                println!("{}{}", top.album, weight_suffix(top.weight));
            }
        }
        TagAction::TopArtists { name } => {
            for top in client.tag_top_artists(&Tag::new(name)).await? {
                println!("{}{}", top.artist, weight_suffix(top.weight));
            }
        }
        TagAction::TopTracks { name } => {
            for top in client.tag_top_tracks(&Tag::new(name)).await? {
                println!("{}{}", top.track, weight_suffix(top.weight));
            }
        }
        TagAction::Chart { name, week, list } => {
            let tag = Tag::new(name);
            if list {
                for (i, span) in client.weekly_chart_spans(&tag).await?.iter().enumerate() {
                    println!("{:>4}  {} .. {}", i, span.from.date_naive(), span.to.date_naive());
                }
                return Ok(());
            }
            let chart = match week {
                Some(index) => {
                    let spans = client.weekly_chart_spans(&tag).await?;
                    let span = spans.get(index).with_context(|| {
                        format!("no chart week {} ({} available)", index, spans.len())
                    })?;
                    client.weekly_artist_chart_for(&tag, span).await?
                }
                None => client.weekly_artist_chart(&tag).await?,
            };
            print_chart(&chart);
        }
    }
    Ok(())
}

async fn run_search(client: &LastfmClient, args: SearchArgs) -> Result<()> {
    let lines: Vec<String> = match args.target {
        SearchTarget::Tag => {
            let mut search = match args.limit {
                Some(limit) => client.search_tags_with_page_size(&args.term, limit)?,
                None => client.search_tags(&args.term)?,
            };
            let items = search.page(args.page).await?;
            let total = search.total_results().await?;
            info!(total, page = args.page, "Tag search");
            items.iter().map(ToString::to_string).collect()
        }
        SearchTarget::Artist => {
            let mut search = client.search_artists(&args.term)?;
            search.page(args.page).await?.iter().map(ToString::to_string).collect()
        }
        SearchTarget::Album => {
            let mut search = client.search_albums(&args.term)?;
            search.page(args.page).await?.iter().map(ToString::to_string).collect()
        }
        SearchTarget::Track => {
            let mut search = client.search_tracks(&args.term, args.artist.as_deref())?;
            search.page(args.page).await?.iter().map(ToString::to_string).collect()
        }
    };

    if lines.is_empty() {
        println!("No results");
    }
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

/// Tag operations without their target, so they can run against any taggable type
#[derive(Debug)]
enum TagsOperation {
    Get,
    Top(Option<usize>),
    Add(Vec<Tag>),
    Remove(Vec<Tag>),
    Set(Vec<Tag>),
    Clear,
}

fn split_tags_action(action: TagsAction) -> (Target, TagsOperation) {
    match action {
        TagsAction::Get(target) => (target.into(), TagsOperation::Get),
        TagsAction::Top { target, limit } => (target.into(), TagsOperation::Top(limit)),
        TagsAction::Add { target, tags } => (target.into(), TagsOperation::Add(to_tags(tags))),
        TagsAction::Remove { target, tags } => {
            (target.into(), TagsOperation::Remove(to_tags(tags)))
        }
        TagsAction::Set { target, tags } => (target.into(), TagsOperation::Set(to_tags(tags))),
        TagsAction::Clear(target) => (target.into(), TagsOperation::Clear),
    }
}

async fn run_tags<T>(client: &LastfmClient, item: &T, operation: TagsOperation) -> Result<()>
where
    T: Taggable + std::fmt::Display,
{
    match operation {
        TagsOperation::Get => print_tags(&client.tags(item).await?),
        TagsOperation::Top(limit) => {
            let tags = match limit {
                Some(limit) => client.top_tags_limited(item, limit).await?,
                None => client.top_tags(item).await?,
            };
            print_tags(&tags);
        }
        TagsOperation::Add(tags) => {
            client.add_tags(item, &tags).await?;
            info!(item = %item, count = tags.len(), "Tags added");
        }
        TagsOperation::Remove(tags) => {
            client.remove_tags(item, &tags).await?;
            info!(item = %item, count = tags.len(), "Tags removed");
        }
        TagsOperation::Set(tags) => {
            let delta = client.set_tags(item, &tags).await?;
            for tag in &delta.to_add {
                println!("+ {}", tag);
            }
            for tag in &delta.to_remove {
                println!("- {}", tag);
            }
            if delta.is_empty() {
                println!("{} already has exactly these tags", item);
            }
        }
        TagsOperation::Clear => {
            let removed = client.clear_tags(item).await?;
            println!("Removed {} tags from {}", removed, item);
        }
    }
    Ok(())
}

async fn run_user(client: &LastfmClient, action: UserAction) -> Result<()> {
    match action {
        UserAction::Info { name: Some(name) } => {
            let info = client.user_info(&User::new(name)).await?;
            print_user(client, &info);
        }
        UserAction::Info { name: None } => {
            let info = client
                .authenticated_user_info()
                .await
                .context("showing your own profile needs LASTFM_SESSION_KEY")?;
            print_user(client, &info);
        }
        UserAction::Chart { name } => {
            print_chart(&client.weekly_artist_chart(&User::new(name)).await?);
        }
        UserAction::Events { limit, page } => {
            let events = client.recommended_events(limit, page).await?;
            if events.is_empty() {
                println!("No recommended events");
            }
            for event in events {
                println!(
                    "{:>10}  {}",
                    event.id,
                    event.title.as_deref().unwrap_or("(untitled)")
                );
            }
        }
    }
    Ok(())
}

async fn run_artist(client: &LastfmClient, action: ArtistAction) -> Result<()> {
    match action {
        ArtistAction::Similar { name, limit } => {
            for similar in client.artist_similar(&Artist::new(name), limit).await? {
                println!("{:.2}  {}", similar.match_score, similar.artist);
            }
        }
        ArtistAction::Wiki { name } => {
            let artist = Artist::new(name);
            let wiki = client.artist_wiki(&artist).await?;
            println!("{}", artist.url_for(client.site_language()));
            print_wiki(&wiki);
        }
    }
    Ok(())
}

async fn run_auth(client: &LastfmClient, action: AuthAction) -> Result<()> {
    let session = match action {
        AuthAction::Login { username, password } => client
            .authenticate(&username, &password)
            .await
            .context("login failed (is LASTFM_API_SECRET set?)")?,
        AuthAction::Token => {
            let token = client.request_auth_token().await?;
            println!("Token: {}", token);
            println!("Approve it at: {}", client.web_auth_url(&token));
            println!("Then run: lastfm auth session {}", token);
            return Ok(());
        }
        AuthAction::Session { token } => client.session_from_token(&token).await?,
    };

    println!("Logged in as {}", session.name);
    println!("LASTFM_SESSION_KEY={}", session.key);
    Ok(())
}

fn weight_suffix(weight: Option<u64>) -> String {
    weight.map(|w| format!(" ({})", w)).unwrap_or_default()
}

fn print_tags(tags: &[Tag]) {
    if tags.is_empty() {
        println!("No tags");
    }
    for tag in tags {
        println!("{}", tag);
    }
}

fn print_chart(chart: &WeeklyArtistChart) {
    println!(
        "Week {} .. {}",
        chart.span.from.date_naive(),
        chart.span.to.date_naive()
    );
    for item in chart.iter() {
        println!("{:>4}. {} ({})", item.rank, item.artist, item.playcount);
    }
}

fn print_user(client: &LastfmClient, info: &UserInfo) {
    let user = User::new(info.name.as_str());
    println!("{}", info.name);
    println!("  page:      {}", user.url_for(client.site_language()));
    println!("  playcount: {}", info.playcount);
    if let Some(country) = &info.country {
        println!("  country:   {}", country.name);
    }
    if let Some(age) = info.age {
        println!("  age:       {}", age);
    }
    if let Some(language) = info.site_language() {
        println!("  language:  {}", language);
    }
    if info.subscriber {
        println!("  subscriber");
    }
}

fn print_wiki(wiki: &Wiki) {
    if let Some(published) = wiki.published {
        println!("Published {}", published.date_naive());
    }
    match (&wiki.content, &wiki.summary) {
        (Some(text), _) | (None, Some(text)) => println!("{}", text),
        (None, None) => println!("No wiki available"),
    }
}
