//! Remote text download.
//!
//! The shell-framework installer is fetched over HTTPS before it is executed.
//! Keeping the download behind [`Fetcher`] lets the post-install hooks run in
//! tests without network access.
use anyhow::{Context as _, Result};

/// Downloads a remote resource as text.
#[cfg_attr(test, mockall::automock)]
pub trait Fetcher: Send + Sync + std::fmt::Debug {
    /// Fetch `url` and return the response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server responds with an
    /// error status, or the body is not valid UTF-8.
    fn fetch_text(&self, url: &str) -> Result<String>;
}

/// [`Fetcher`] backed by a blocking `ureq` agent.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpFetcher;

impl Fetcher for HttpFetcher {
    fn fetch_text(&self, url: &str) -> Result<String> {
        ureq::get(url)
            .call()
            .with_context(|| format!("requesting {url}"))?
            .body_mut()
            .read_to_string()
            .with_context(|| format!("reading response body from {url}"))
    }
}
