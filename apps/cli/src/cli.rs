use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "lastfm", author, version, about = "Query and tag Last.fm from the command line", long_about = None)]
pub struct Args {
    /// Site language used for printed page URLs (en, de, fr, ...)
    #[arg(short, long, global = true)]
    pub language: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Similar tags, top items and weekly charts of a tag
    Tag {
        #[command(subcommand)]
        action: TagAction,
    },
    /// Search tags, artists, albums or tracks
    Search(SearchArgs),
    /// Read and change your tags on an artist, album or track
    Tags {
        #[command(subcommand)]
        action: TagsAction,
    },
    /// User profiles, charts and recommendations
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Similar artists and biographies
    Artist {
        #[command(subcommand)]
        action: ArtistAction,
    },
    /// Album wiki
    Album {
        #[arg(long)]
        artist: String,
        #[arg(long)]
        title: String,
    },
    /// Obtain a session key
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Check whether the configured API key is accepted
    Check,
}

#[derive(Subcommand, Debug)]
pub enum TagAction {
    Similar { name: String },
    TopAlbums { name: String },
    TopArtists { name: String },
    TopTracks { name: String },
    /// List chart weeks, or print the artist chart of one of them
    Chart {
        name: String,
        /// Index into the chart list, latest chart if omitted
        #[arg(long)]
        week: Option<usize>,
        /// Only list the available weeks
        #[arg(long, conflicts_with = "week")]
        list: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTarget {
    Tag,
    Artist,
    Album,
    Track,
}

#[derive(ClapArgs, Debug)]
pub struct SearchArgs {
    #[arg(value_enum)]
    pub target: SearchTarget,

    pub term: String,

    /// Narrow a track search to one artist
    #[arg(long)]
    pub artist: Option<String>,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Results per page (tag searches only)
    #[arg(long)]
    pub limit: Option<u32>,
}

/// What to tag: `--artist` alone, or with `--album` or `--track`
#[derive(ClapArgs, Debug, Clone)]
pub struct TargetArgs {
    #[arg(long)]
    pub artist: String,

    #[arg(long, conflicts_with = "track")]
    pub album: Option<String>,

    #[arg(long)]
    pub track: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum TagsAction {
    /// Your tags
    Get(TargetArgs),
    /// Most popular tags across all users
    Top {
        #[command(flatten)]
        target: TargetArgs,
        #[arg(long)]
        limit: Option<usize>,
    },
    Add {
        #[command(flatten)]
        target: TargetArgs,
        #[arg(required = true)]
        tags: Vec<String>,
    },
    Remove {
        #[command(flatten)]
        target: TargetArgs,
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Replace your tags with exactly the given ones
    Set {
        #[command(flatten)]
        target: TargetArgs,
        tags: Vec<String>,
    },
    Clear(TargetArgs),
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
    /// Profile of a user, yourself if no name is given
    Info { name: Option<String> },
    /// Latest weekly artist chart of a user
    Chart { name: String },
    /// Events recommended to you
    Events {
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

#[derive(Subcommand, Debug)]
pub enum ArtistAction {
    Similar {
        name: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    Wiki { name: String },
}

#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Log in with username and password and print the session key
    Login {
        username: String,
        #[arg(long, env = "LASTFM_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Start the web flow: print a token and the URL to approve it
    Token,
    /// Finish the web flow with an approved token
    Session { token: String },
}
