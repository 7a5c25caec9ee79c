//! Chromium-backed session using chromiumoxide.

use super::BrowserSession;
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;
use url::Url;

/// Global set on a page before submitting, to tell it apart from the next one.
const PAGE_TAG: &str = "__tlrscraperSubmitted";
const NAVIGATION_POLL: Duration = Duration::from_millis(100);

/// A headless Chromium instance with one open page.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromiumSession {
    /// Launch Chromium and open a blank page.
    pub async fn launch() -> Result<Self> {
        let config = BrowserConfig::builder()
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .build()
            .map_err(|e| anyhow!("failed to build browser config: {e}"))?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        // the CDP connection only makes progress while this is polled
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                handler.abort();
                return Err(e).context("failed to open page");
            }
        };

        debug!("chromium session ready");
        Ok(Self {
            browser,
            page,
            handler,
        })
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> Result<T> {
        self.page
            .evaluate(script)
            .await
            .context("JS execution failed")?
            .into_value()
            .map_err(|e| anyhow!("failed to convert JS result: {e:?}"))
    }
}

/// Shape returned by the option-listing script. A bare `null` does not
/// survive `into_value`, so absence is flagged explicitly.
#[derive(Deserialize)]
struct SelectOptions {
    found: bool,
    texts: Vec<String>,
}

/// Quote a string as a JS literal.
fn js_str(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &Url, timeout: Duration) -> Result<()> {
        match tokio::time::timeout(timeout, self.page.goto(url.as_str())).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(e).with_context(|| format!("navigating to {url}")),
            Err(_) => bail!("navigation to {url} timed out after {timeout:?}"),
        }
    }

    async fn exists(&self, selector: &str) -> Result<bool> {
        self.eval(format!("document.querySelector({}) !== null", js_str(selector)))
            .await
    }

    async fn option_texts(&self, selector: &str) -> Result<Option<Vec<String>>> {
        let options: SelectOptions = self
            .eval(format!(
                "(() => {{ const el = document.querySelector({}); \
                 const found = !!(el && el.options); \
                 return {{ found, texts: found ? Array.from(el.options, o => o.text) : [] }}; }})()",
                js_str(selector)
            ))
            .await?;
        Ok(options.found.then_some(options.texts))
    }

    async fn select_option(&self, selector: &str, index: usize) -> Result<()> {
        let selected: bool = self
            .eval(format!(
                "(() => {{ const el = document.querySelector({}); \
                 if (!el || !el.options || {index} >= el.options.length) return false; \
                 el.selectedIndex = {index}; \
                 el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                 el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                 return true; }})()",
                js_str(selector)
            ))
            .await?;
        if !selected {
            bail!("could not select option {index} of {selector}");
        }
        Ok(())
    }

    async fn submit(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        // tag the current document; its replacement will not carry the tag
        let _: bool = self.eval(format!("window.{PAGE_TAG} = true")).await?;

        self.page
            .find_element(selector)
            .await
            .with_context(|| format!("finding {selector}"))?
            .click()
            .await
            .with_context(|| format!("clicking {selector}"))?;

        let replaced = async {
            loop {
                let _ = self.page.wait_for_navigation().await;
                // evaluation can fail while the old context is torn down
                match self.eval::<bool>(format!("window.{PAGE_TAG} === true")).await {
                    Ok(false) => break,
                    Ok(true) | Err(_) => sleep(NAVIGATION_POLL).await,
                }
            }
        };
        if tokio::time::timeout(timeout, replaced).await.is_err() {
            bail!("no new page after clicking {selector} within {timeout:?}");
        }
        debug!(selector, "submitted");
        Ok(())
    }

    async fn html(&self) -> Result<String> {
        self.page.content().await.context("failed to get HTML")
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let mut this = self;
        this.browser.close().await.context("closing browser")?;
        this.browser.wait().await.context("waiting for browser exit")?;
        debug!("chromium session closed");
        Ok(())
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
