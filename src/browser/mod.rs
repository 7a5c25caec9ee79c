//! Browser session abstraction.
//!
//! `BrowserSession` is the small set of page capabilities the fetcher needs.
//! The production backend is Chromium via chromiumoxide; tests drive the
//! fetcher with an in-memory session instead.

pub mod chromium;
#[cfg(test)]
pub(crate) mod fake;

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

pub use chromium::ChromiumSession;

/// A single open page in a running browser.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Load `url` in the page, giving up after `timeout`.
    async fn navigate(&mut self, url: &Url, timeout: Duration) -> Result<()>;
    /// Whether `selector` currently matches at least one element. May fail
    /// transiently while a new document is loading.
    async fn exists(&self, selector: &str) -> Result<bool>;
    /// Visible text of every `<option>` of the `<select>` matched by
    /// `selector`, in document order. `None` if nothing matches.
    async fn option_texts(&self, selector: &str) -> Result<Option<Vec<String>>>;
    /// Make option `index` the selected one and fire the change events.
    async fn select_option(&self, selector: &str, index: usize) -> Result<()>;
    /// Click the control matched by `selector` and return once the page it
    /// leads to has replaced the current document, or fail after `timeout`.
    async fn submit(&mut self, selector: &str, timeout: Duration) -> Result<()>;
    /// Serialised DOM of the current page.
    async fn html(&self) -> Result<String>;
    /// Shut the session down and release the browser process.
    async fn close(self: Box<Self>) -> Result<()>;
}
