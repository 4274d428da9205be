//! Story extraction from listing pages.
//!
//! Listing pages are a table of row pairs. The first row of a pair holds a
//! `td.title` cell with the story link; the row right after it holds a
//! `td.subtext` cell with the metadata line:
//!
//! ```text
//! 4 points by user 3 hours ago | discuss
//! ```
//!
//! The last `td.title` cell on a page is usually the "More" link pointing at
//! the next page, which is reported separately instead of as a story.

use crate::error::{Error, Result};
use crate::models::{PageResult, StoryRecord};
use crate::scrapers::parse_document;
use crate::utils::{AgeUnit, approximate_posted_date};
use chrono::{DateTime, Utc};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, trace};

const TITLE_CELL: &str = "td.title";
const LINK: &str = "a";
const SPAN: &str = "span";
const SUBTEXT_CELL: &str = "td.subtext";

const MORE_TEXT: &str = "More";
const MORE_LINK_PATTERN: &str = r"^/x\?fnid=.*$";
const META_LINK_PATTERN: &str = r"^(user|item)\?id=(.*)$";
const POINTS_PATTERN: &str = r"^(\d+)\s+points?";
const AGE_PATTERN: &str = r"(\d+)\s+(minute|hour|day)s?\s+ago";

/// What a single `td.title` cell turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TitleRow {
    Story(StoryRecord),
    More(String),
}

/// Extracts [`StoryRecord`]s and the pagination link from a listing page.
///
/// Selectors and patterns are compiled once in [`StoryExtractor::new`] and
/// reused for every page.
#[derive(Debug, Clone)]
pub struct StoryExtractor {
    title_cell: Selector,
    link: Selector,
    span: Selector,
    subtext_cell: Selector,
    more_link: Regex,
    meta_link: Regex,
    points: Regex,
    age: Regex,
}

fn selector(css: &'static str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Selector {
        selector: css,
        reason: e.to_string(),
    })
}

impl StoryExtractor {
    /// Compile the row selectors and metadata patterns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Selector`] or [`Error::Regex`] if a built-in
    /// selector or pattern fails to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            title_cell: selector(TITLE_CELL)?,
            link: selector(LINK)?,
            span: selector(SPAN)?,
            subtext_cell: selector(SUBTEXT_CELL)?,
            more_link: Regex::new(MORE_LINK_PATTERN)?,
            meta_link: Regex::new(META_LINK_PATTERN)?,
            points: Regex::new(POINTS_PATTERN)?,
            age: Regex::new(AGE_PATTERN)?,
        })
    }

    /// Parse raw page bytes and extract the stories on it.
    #[instrument(level = "debug", skip_all, fields(bytes = page.len()))]
    pub fn extract_page(&self, page: &[u8]) -> PageResult {
        self.extract(&parse_document(page))
    }

    /// Extract the stories from an already parsed document.
    pub fn extract(&self, document: &Html) -> PageResult {
        self.extract_at(document, Utc::now())
    }

    /// Extract the stories, resolving relative ages against `now`.
    pub fn extract_at(&self, document: &Html, now: DateTime<Utc>) -> PageResult {
        let mut result = PageResult::default();

        for cell in document.select(&self.title_cell) {
            let Some(link) = cell.select(&self.link).next() else {
                trace!("Title cell without a link; skipping");
                continue;
            };
            match self.title_row(link, now) {
                Some(TitleRow::More(href)) => result.more = Some(href),
                Some(TitleRow::Story(story)) => result.items.push(story),
                None => {}
            }
        }

        debug!(
            items = result.items.len(),
            more = ?result.more,
            "Extracted page"
        );
        result
    }

    fn title_row(&self, link: ElementRef<'_>, now: DateTime<Utc>) -> Option<TitleRow> {
        let Some(href) = link.value().attr("href") else {
            trace!("Title link without href; skipping");
            return None;
        };
        let title = link.text().collect::<String>().trim().to_string();

        if title == MORE_TEXT && self.more_link.is_match(href) {
            return Some(TitleRow::More(href.to_string()));
        }

        let mut story = StoryRecord::new(title, href);
        if let Some(subtext) = self.metadata_cell(link) {
            self.apply_metadata(&mut story, subtext, now);
        }
        Some(TitleRow::Story(story))
    }

    /// The `td.subtext` cell in the first row after the one holding `link`.
    fn metadata_cell<'a>(&self, link: ElementRef<'a>) -> Option<ElementRef<'a>> {
        let row = link
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "tr")?;
        let next_row = row
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "tr")?;
        next_row.select(&self.subtext_cell).next()
    }

    fn apply_metadata(&self, story: &mut StoryRecord, subtext: ElementRef<'_>, now: DateTime<Utc>) {
        for link in subtext.select(&self.link) {
            let Some(caps) = link.value().attr("href").and_then(|h| self.meta_link.captures(h)) else {
                continue;
            };
            let value = caps[2].to_string();
            match &caps[1] {
                "user" => story.user = Some(value),
                "item" => story.id = Some(value),
                _ => {}
            }
        }

        // Only the first span that reads as a score counts.
        story.points = subtext.select(&self.span).find_map(|span| {
            let text = span.text().collect::<String>();
            self.points
                .captures(&text)
                .and_then(|caps| caps[1].parse::<u32>().ok())
        });

        let text = subtext.text().collect::<String>();
        if let Some(caps) = self.age.captures(&text) {
            let count = caps[1].parse::<u64>().ok();
            let unit = AgeUnit::from_word(&caps[2]);
            if let (Some(count), Some(unit)) = (count, unit) {
                story.posted = approximate_posted_date(count, unit, now);
            }
        }
    }
}
