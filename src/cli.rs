//! Command-line interface definitions.
//!
//! The only required argument is the account whose saved stories are
//! archived. The password is always prompted for, never passed as a flag.

use clap::Parser;
use std::path::PathBuf;

/// Archive the saved stories of a Hacker News account into SQLite.
///
/// # Examples
///
/// ```sh
/// # Save into stories.db next to the executable
/// hn_saved_stories alice
///
/// # Explicit database and config file
/// hn_saved_stories alice --db ~/hn/stories.db --config ~/.config/hn.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Account whose saved stories are archived
    pub username: String,

    /// Database file (default: stories.db next to the executable)
    #[arg(short, long)]
    pub db: Option<PathBuf>,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Site origin to scrape
    #[arg(long, env = "HN_BASE_URL")]
    pub base_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["hn_saved_stories", "alice"]);
        assert_eq!(cli.username, "alice");
        assert_eq!(cli.db, None);
        assert_eq!(cli.config, None);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "hn_saved_stories",
            "-d",
            "/tmp/stories.db",
            "-c",
            "/tmp/hn.yaml",
            "bob",
        ]);

        assert_eq!(cli.username, "bob");
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/stories.db")));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/hn.yaml")));
    }

    #[test]
    fn test_cli_base_url_flag() {
        let cli = Cli::parse_from(["hn_saved_stories", "--base-url", "http://localhost:8080", "carol"]);
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:8080"));
    }

    #[test]
    fn test_cli_missing_username() {
        let err = Cli::try_parse_from(["hn_saved_stories"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }
}
