//! # HN Saved Stories
//!
//! Archives the "saved stories" of a Hacker News account into a local SQLite
//! database.
//!
//! ## Architecture
//!
//! 1. **Login**: [`session::Session::login`] posts the login form and keeps
//!    the session cookie
//! 2. **Crawl**: [`crawler::Crawler`] walks `saved?id=<user>` and every
//!    following "More" page, pausing between requests
//! 3. **Extract**: [`scrapers::stories::StoryExtractor`] turns each page into
//!    story records, converting "3 hours ago" into a date
//! 4. **Store**: [`store::Store`] upserts every record keyed by item id

pub mod cli;
pub mod config;
pub mod crawler;
pub mod error;
pub mod models;
pub mod prompt;
pub mod scrapers;
pub mod session;
pub mod store;
pub mod utils;

pub use error::{Error, Result};
