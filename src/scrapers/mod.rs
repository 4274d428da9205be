//! HTML scraping for the news site's listing pages.
//!
//! Scraping runs in two steps:
//!
//! 1. **Parsing**: [`parse_document`] turns raw page bytes into a queryable
//!    [`Html`] tree, tolerating malformed markup
//! 2. **Extraction**: [`stories::StoryExtractor`] walks the tree and yields a
//!    [`PageResult`](crate::models::PageResult)
//!
//! # Modules
//!
//! | Module | Produces | Notes |
//! |--------|----------|-------|
//! | [`stories`] | Story records plus the "More" link | Saved-stories and other listing pages |
//! | [`comments`] | Nothing yet | Always returns [`Error::Unsupported`](crate::Error::Unsupported) |

pub mod comments;
pub mod stories;

use scraper::Html;

/// Parse a page into a document tree.
///
/// The bytes are decoded as UTF-8, replacing invalid sequences, and handed to
/// the html5ever-based parser, which recovers from unclosed and misnested
/// tags the way a browser does. Parsing never fails.
pub fn parse_document(page: &[u8]) -> Html {
    Html::parse_document(&String::from_utf8_lossy(page))
}
