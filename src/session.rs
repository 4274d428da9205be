//! Authenticated HTTP session.
//!
//! Logging in is a two-step form exchange:
//!
//! 1. GET the login page and read the one-time `fnid` token from its hidden
//!    form field
//! 2. POST `u`, `p` and `fnid` to the login endpoint
//!
//! The site answers with a session cookie, which the client's cookie jar
//! replays on every later request.

use crate::config::Config;
use crate::crawler::FetchPage;
use crate::error::{Error, Result};
use crate::scrapers::parse_document;
use crate::utils::truncate_for_log;
use reqwest::Client;
use scraper::{Html, Selector};
use secrecy::{ExposeSecret, SecretString};
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

const LOGIN_PAGE: &str = "newslogin";
const LOGIN_SUBMIT: &str = "y";
const TOKEN_FIELD: &str = "fnid";

/// Find the login token among the hidden inputs of a login page.
///
/// The token is the `value` attribute of the hidden input named `fnid`.
pub fn find_login_token(document: &Html) -> Option<String> {
    let hidden = Selector::parse(r#"input[type="hidden"]"#).ok()?;
    document
        .select(&hidden)
        .find(|input| input.value().attr("name") == Some(TOKEN_FIELD))
        .and_then(|input| input.value().attr("value"))
        .map(str::to_string)
}

/// An HTTP client holding a logged-in cookie jar.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    base_url: Url,
}

impl Session {
    /// Build an unauthenticated session for the configured site.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: Url::parse(&config.base_url)?,
        })
    }

    /// Log in as `user` and return the authenticated session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Login`] when the form post does not succeed, or an
    /// HTTP error if either request cannot be made.
    #[instrument(level = "info", skip_all, fields(%user))]
    pub async fn login(config: &Config, user: &str, password: &SecretString) -> Result<Self> {
        let session = Self::new(config)?;
        let t0 = Instant::now();

        let login_url = session.base_url.join(LOGIN_PAGE)?;
        let page = session
            .client
            .get(login_url.clone())
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        let token = find_login_token(&parse_document(&page));

        let mut form = vec![("u", user), ("p", password.expose_secret())];
        match token.as_deref() {
            Some(token) => form.push((TOKEN_FIELD, token)),
            None => warn!(url = %login_url, "No login token found on login page; posting without it"),
        }

        let response = session
            .client
            .post(session.base_url.join(LOGIN_SUBMIT)?)
            .form(&form)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                %status,
                body_preview = %truncate_for_log(&body, 300),
                "Login rejected"
            );
            return Err(Error::Login { status });
        }

        info!(elapsed_ms = t0.elapsed().as_millis() as u64, "Logged in");
        Ok(session)
    }

    /// Site origin the session logged into; relative links resolve against it.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl FetchPage for Session {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch_page(&self, url: &Url) -> Result<Vec<u8>> {
        let body = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body.to_vec())
    }
}
