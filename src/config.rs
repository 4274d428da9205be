//! Runtime configuration.
//!
//! Every setting has a built-in default. An optional YAML file can override
//! them, and command-line flags override the file:
//!
//! ```yaml
//! base_url: https://news.ycombinator.com
//! db_path: /var/lib/hn/stories.db
//! crawl_delay_secs: 10
//! user_agent: hn_saved_stories/0.1
//! timeout_secs: 30
//! ```

use crate::error::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_BASE_URL: &str = "https://news.ycombinator.com";
pub const DEFAULT_DB_FILE: &str = "stories.db";

/// Lower bound on the pause between page requests (see the site's robots.txt).
pub const MIN_CRAWL_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site origin that all paths are resolved against.
    pub base_url: String,
    /// Database file. Defaults to `stories.db` next to the executable.
    pub db_path: Option<PathBuf>,
    /// Pause between page requests, clamped to [`MIN_CRAWL_DELAY`].
    pub crawl_delay_secs: u64,
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            db_path: None,
            crawl_delay_secs: MIN_CRAWL_DELAY.as_secs(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load the config file at `path`, or the defaults when no path is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the named file cannot be read or is not valid YAML.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&raw)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse a config document; keys that are absent keep their defaults.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Pause between page requests, never shorter than [`MIN_CRAWL_DELAY`].
    pub fn crawl_delay(&self) -> Duration {
        Duration::from_secs(self.crawl_delay_secs).max(MIN_CRAWL_DELAY)
    }

    /// Per-request HTTP timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The database path, falling back to `stories.db` in the executable's
    /// directory, or the working directory if that cannot be determined.
    pub fn db_path(&self) -> PathBuf {
        if let Some(path) = &self.db_path {
            return path.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_DB_FILE)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
    }
}
