//! Comment extraction from item pages.
//!
//! Comment threads would fill the `description` column of the store. They are
//! not scraped yet; callers get [`Error::Unsupported`] rather than an empty
//! result so the gap stays visible.

use crate::error::{Error, Result};
use scraper::Html;

/// A single comment on a story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub user: Option<String>,
    pub text: String,
}

/// Extract the comments from an item page.
pub fn extract_comments(_document: &Html) -> Result<Vec<Comment>> {
    Err(Error::Unsupported("comment scraping"))
}
