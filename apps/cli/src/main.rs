use anyhow::Context;
use clap::Parser;
use lastfm_services::{LastfmClient, SiteLanguage};
use lastfm_shared_config::LastfmConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    lastfm_shared_config::load_dotenv();

    // Initialize tracing; output goes to stderr so results can be piped
    let level = lastfm_shared_config::log_level();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("lastfm_cli={0},lastfm_services={0}", level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = cli::Args::parse();

    let config = LastfmConfig::from_env().context("failed to load Last.fm configuration")?;
    let mut client =
        LastfmClient::from_config(&config).context("failed to create Last.fm client")?;
    if let Some(code) = args.language.as_deref() {
        let language = SiteLanguage::from_code(code)
            .with_context(|| format!("unsupported site language: {}", code))?;
        client = client.with_language(language);
    }

    tracing::debug!(client = ?client, "Client ready");

    commands::run(&client, args.command).await
}
