//! Saved-stories pagination.
//!
//! # Loop
//!
//! 1. Fetch `saved?id=<user>` through a [`FetchPage`] source
//! 2. Extract the [`PageResult`] and upsert every story
//! 3. If the page links to a next page, wait the crawl delay and fetch it;
//!    otherwise stop
//!
//! Pages are processed strictly one at a time. There is no retry: the first
//! fetch or store failure ends the run, and rows saved before it stay saved.

use crate::config::MIN_CRAWL_DELAY;
use crate::error::{Error, Result};
use crate::models::PageResult;
use crate::scrapers::stories::StoryExtractor;
use crate::store::Store;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{Level, debug, enabled, info, instrument};
use url::Url;

/// Anything that can return the raw body of a page.
///
/// [`Session`](crate::session::Session) is the real implementation; tests
/// substitute canned pages.
///
/// The returned futures carry no `Send` bound; the crawler drives them on a
/// single-threaded runtime.
#[allow(async_fn_in_trait)]
pub trait FetchPage {
    async fn fetch_page(&self, url: &Url) -> Result<Vec<u8>>;
}

/// Totals for one completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CrawlSummary {
    pub pages: usize,
    pub stories_seen: usize,
    pub stories_saved: usize,
}

#[derive(Debug)]
pub struct Crawler<F> {
    source: F,
    extractor: StoryExtractor,
    base_url: Url,
    delay: Duration,
}

impl<F: FetchPage> Crawler<F> {
    /// `delay` is raised to [`MIN_CRAWL_DELAY`] if it is shorter.
    pub fn new(source: F, base_url: Url, delay: Duration) -> Result<Self> {
        Ok(Self {
            source,
            extractor: StoryExtractor::new()?,
            base_url,
            delay: delay.max(MIN_CRAWL_DELAY),
        })
    }

    /// First listing page for `user`, with the username URL-encoded.
    pub fn saved_stories_url(&self, user: &str) -> Result<Url> {
        let path = format!("saved?id={}", urlencoding::encode(user));
        Ok(self.base_url.join(&path)?)
    }

    /// Save every story on `user`'s saved-stories pages into `store`.
    #[instrument(level = "info", skip(self, store), fields(db = %store.path().display()))]
    pub async fn run(&self, user: &str, store: &Store) -> Result<CrawlSummary> {
        let mut summary = CrawlSummary::default();
        let mut url = self.saved_stories_url(user)?;

        loop {
            info!(%url, "Saving stories from");
            let page = self.source.fetch_page(&url).await?;
            let result = self.extractor.extract_page(&page);
            summary.pages += 1;
            summary.stories_seen += result.items.len();

            for story in &result.items {
                if store.upsert(story)? {
                    summary.stories_saved += 1;
                }
            }

            if enabled!(Level::DEBUG) {
                if let Ok(json) = serde_json::to_string_pretty(&result) {
                    debug!(page = summary.pages, "Page result:\n{json}");
                }
            }
            info!(
                page = summary.pages,
                items = result.items.len(),
                more = result.more.is_some(),
                "Processed page"
            );

            match result.more {
                Some(more) => {
                    url = self.base_url.join(&more)?;
                    debug!(delay = ?self.delay, "Waiting before next page");
                    sleep(self.delay).await;
                }
                None => break,
            }
        }

        info!(
            pages = summary.pages,
            seen = summary.stories_seen,
            saved = summary.stories_saved,
            "Finished saving stories"
        );
        Ok(summary)
    }

    /// Fetch and extract an arbitrary page.
    pub async fn fetch(&self, _url: &Url) -> Result<PageResult> {
        Err(Error::Unsupported("generic page fetch"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io;

    /// Serves canned pages keyed by full URL and records every request.
    #[derive(Debug, Default)]
    struct CannedPages {
        pages: HashMap<String, String>,
        requests: RefCell<Vec<String>>,
    }

    impl CannedPages {
        fn with(mut self, url: &str, body: String) -> Self {
            self.pages.insert(url.to_string(), body);
            self
        }
    }

    impl FetchPage for &CannedPages {
        async fn fetch_page(&self, url: &Url) -> Result<Vec<u8>> {
            self.requests.borrow_mut().push(url.to_string());
            self.pages
                .get(url.as_str())
                .map(|body| body.clone().into_bytes())
                .ok_or_else(|| {
                    Error::Io(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"))
                })
        }
    }

    fn listing(ids: &[u32], more: Option<&str>) -> String {
        let mut rows = String::new();
        for id in ids {
            rows.push_str(&format!(
                r#"<tr class="athing"><td class="title"><a href="http://example.com/{id}">Story {id}</a></td></tr>
                   <tr><td class="subtext"><span>{id} points</span> by <a href="user?id=u{id}">u{id}</a>
                       <a href="item?id={id}">2 hours ago</a></td></tr>"#
            ));
        }
        if let Some(more) = more {
            rows.push_str(&format!(r#"<tr><td class="title"><a href="{more}">More</a></td></tr>"#));
        }
        format!("<html><body><table>{rows}</table></body></html>")
    }

    fn base() -> Url {
        Url::parse("https://news.ycombinator.com").unwrap()
    }

    fn temp_store() -> (tempfile::TempDir, Store) {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::open(tmp.path().join("stories.db")).unwrap();
        (tmp, store)
    }

    #[test]
    fn test_saved_stories_url_encodes_user() {
        let pages = CannedPages::default();
        let crawler = Crawler::new(&pages, base(), MIN_CRAWL_DELAY).unwrap();
        assert_eq!(
            crawler.saved_stories_url("pg").unwrap().as_str(),
            "https://news.ycombinator.com/saved?id=pg"
        );
        assert_eq!(
            crawler.saved_stories_url("a b&c").unwrap().as_str(),
            "https://news.ycombinator.com/saved?id=a%20b%26c"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_follows_more_links_until_exhausted() {
        let pages = CannedPages::default()
            .with(
                "https://news.ycombinator.com/saved?id=alice",
                listing(&[1, 2], Some("/x?fnid=page2")),
            )
            .with(
                "https://news.ycombinator.com/x?fnid=page2",
                listing(&[3], Some("/x?fnid=page3")),
            )
            .with("https://news.ycombinator.com/x?fnid=page3", listing(&[4, 5], None));
        let (_tmp, store) = temp_store();
        let crawler = Crawler::new(&pages, base(), Duration::from_secs(5)).unwrap();

        let started = tokio::time::Instant::now();
        let summary = crawler.run("alice", &store).await.unwrap();

        assert_eq!(
            *pages.requests.borrow(),
            vec![
                "https://news.ycombinator.com/saved?id=alice",
                "https://news.ycombinator.com/x?fnid=page2",
                "https://news.ycombinator.com/x?fnid=page3",
            ]
        );
        assert_eq!(
            summary,
            CrawlSummary {
                pages: 3,
                stories_seen: 5,
                stories_saved: 5,
            }
        );
        assert_eq!(store.count().unwrap(), 5);
        assert_eq!(store.get("3").unwrap().unwrap().user.as_deref(), Some("u3"));
        // Two waits between three pages.
        assert!(started.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_page_without_more() {
        let pages = CannedPages::default()
            .with("https://news.ycombinator.com/saved?id=bob", listing(&[7], None));
        let (_tmp, store) = temp_store();
        let crawler = Crawler::new(&pages, base(), MIN_CRAWL_DELAY).unwrap();

        let summary = crawler.run("bob", &store).await.unwrap();
        assert_eq!(summary.pages, 1);
        assert_eq!(pages.requests.borrow().len(), 1);
        assert_eq!(store.get("7").unwrap().unwrap().points, Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_keeps_saved_rows() {
        let pages = CannedPages::default().with(
            "https://news.ycombinator.com/saved?id=carol",
            listing(&[10, 11], Some("/x?fnid=gone")),
        );
        let (_tmp, store) = temp_store();
        let crawler = Crawler::new(&pages, base(), MIN_CRAWL_DELAY).unwrap();

        let err = crawler.run("carol", &store).await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(pages.requests.borrow().len(), 2);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rerun_replaces_rows() {
        let pages = CannedPages::default()
            .with("https://news.ycombinator.com/saved?id=dan", listing(&[1, 2], None));
        let (_tmp, store) = temp_store();
        let crawler = Crawler::new(&pages, base(), MIN_CRAWL_DELAY).unwrap();

        crawler.run("dan", &store).await.unwrap();
        crawler.run("dan", &store).await.unwrap();
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_delay_is_clamped() {
        let pages = CannedPages::default();
        let crawler = Crawler::new(&pages, base(), Duration::ZERO).unwrap();
        assert_eq!(crawler.delay, MIN_CRAWL_DELAY);
    }

    #[tokio::test]
    async fn test_generic_fetch_is_unsupported() {
        let pages = CannedPages::default();
        let crawler = Crawler::new(&pages, base(), MIN_CRAWL_DELAY).unwrap();
        let url = base().join("item?id=1").unwrap();
        let err = crawler.fetch(&url).await.unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
        assert!(pages.requests.borrow().is_empty());
    }
}
