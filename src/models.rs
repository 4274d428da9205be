//! Data models for scraped stories.
//!
//! - [`StoryRecord`]: one saved story, as extracted from a listing page and
//!   as persisted in the `stories` table
//! - [`PageResult`]: everything one listing page yields
//!
//! Both serialize to JSON so a page can be dumped to the debug log.

use chrono::NaiveDate;
use serde::Serialize;

/// A single story from a saved-stories listing.
///
/// Only `title` and `link` are guaranteed. The remaining fields come from the
/// metadata row beneath the title, which may be missing or incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StoryRecord {
    /// The site's item id. Unique across the store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The visible text of the title link.
    pub title: String,
    /// The `href` of the title link, as it appears on the page.
    pub link: String,
    /// The submitter's username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
    /// Approximate posting date in UTC, day granularity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted: Option<NaiveDate>,
}

impl StoryRecord {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            ..Self::default()
        }
    }
}

/// The stories found on one listing page, plus the relative link to the
/// next page when there is one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PageResult {
    pub items: Vec<StoryRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub more: Option<String>,
}
