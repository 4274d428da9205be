//! Command-line entry point.
//!
//! ```sh
//! hn_saved_stories alice
//! ```
//!
//! Prompts for the account password, logs in, and saves every page of the
//! account's saved stories into the SQLite database.

use clap::Parser;
use clap::error::ErrorKind;
use hn_saved_stories::cli::Cli;
use hn_saved_stories::config::Config;
use hn_saved_stories::crawler::{CrawlSummary, Crawler};
use hn_saved_stories::prompt::prompt_password;
use hn_saved_stories::session::Session;
use hn_saved_stories::store::Store;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

/// Merge the config file with the command-line overrides.
fn load_config(args: &Cli) -> hn_saved_stories::Result<Config> {
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(db) = &args.db {
        config.db_path = Some(db.clone());
    }
    Ok(config)
}

async fn archive(args: &Cli) -> hn_saved_stories::Result<CrawlSummary> {
    let config = &load_config(args)?;
    let password = prompt_password("Password: ")?;
    let session = Session::login(config, &args.username, &password).await?;
    drop(password);

    let store = Store::open(config.db_path())?;
    info!(path = %store.path().display(), "Opened stories database");

    let base_url = session.base_url().clone();
    let crawler = Crawler::new(session, base_url, config.crawl_delay())?;
    crawler.run(&args.username, &store).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };
    debug!(?args, "Parsed CLI arguments");

    let start_time = std::time::Instant::now();
    match archive(&args).await {
        Ok(summary) => {
            let elapsed = start_time.elapsed();
            info!(
                pages = summary.pages,
                saved = summary.stories_saved,
                secs = elapsed.as_secs(),
                "Execution complete"
            );
            Ok(())
        }
        Err(e) => {
            error!(user = %args.username, error = %e, "Archiving saved stories failed");
            Err(e.into())
        }
    }
}
