// src/fetch/mod.rs

use crate::browser::{BrowserSession, ChromiumSession};
use crate::config::Target;
use crate::table::RatingsTable;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, instrument, warn};
use url::Url;

pub mod table;

pub use table::parse_first_table;

/// Why a fetch produced no table.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to launch browser: {0:#}")]
    Launch(anyhow::Error),
    #[error("invalid target URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("browser command failed: {0:#}")]
    Browser(anyhow::Error),
    #[error("timed out after {waited:?} waiting for `{selector}`")]
    Timeout { selector: String, waited: Duration },
    #[error("no element matches `{selector}`")]
    ElementNotFound { selector: String },
    #[error("no option with visible text {wanted:?} among {available} options")]
    OptionNotFound { wanted: String, available: usize },
    #[error("results table has no rows")]
    EmptyTable,
}

/// Launch Chromium and run `fetch_ratings` against it.
pub async fn scrape(target: &Target) -> Result<RatingsTable, FetchError> {
    let session = ChromiumSession::launch()
        .await
        .map_err(FetchError::Launch)?;
    fetch_ratings(Box::new(session), target).await
}

/// Drive `session` through the market form and parse the results table.
///
/// The session is closed before returning, whatever the outcome. A failure to
/// close is logged and does not override the fetch result.
#[instrument(skip_all, fields(market = %target.market))]
pub async fn fetch_ratings(
    mut session: Box<dyn BrowserSession>,
    target: &Target,
) -> Result<RatingsTable, FetchError> {
    let outcome = run(session.as_mut(), target).await;
    if let Err(e) = session.close().await {
        warn!("failed to close browser session: {e:#}");
    }
    outcome
}

async fn run(
    session: &mut dyn BrowserSession,
    target: &Target,
) -> Result<RatingsTable, FetchError> {
    // 1) load the market selection page
    let url = Url::parse(&target.url)?;
    info!(%url, "navigating");
    session
        .navigate(&url, target.wait_timeout)
        .await
        .map_err(FetchError::Browser)?;

    // 2) wait for the dropdown, then list what it offers
    wait_for(session, &target.select_selector, target).await?;
    let options = session
        .option_texts(&target.select_selector)
        .await
        .map_err(FetchError::Browser)?
        .ok_or_else(|| FetchError::ElementNotFound {
            selector: target.select_selector.clone(),
        })?;
    info!("Available markets in dropdown:");
    for (idx, text) in options.iter().enumerate() {
        info!("{idx}: '{text}'");
    }

    // 3) pick the market by exact visible text
    let index = options
        .iter()
        .position(|text| *text == target.market)
        .ok_or_else(|| FetchError::OptionNotFound {
            wanted: target.market.clone(),
            available: options.len(),
        })?;
    session
        .select_option(&target.select_selector, index)
        .await
        .map_err(FetchError::Browser)?;
    info!(index, "selected market");

    // 4) submit
    if !session
        .exists(&target.submit_selector)
        .await
        .map_err(FetchError::Browser)?
    {
        return Err(FetchError::ElementNotFound {
            selector: target.submit_selector.clone(),
        });
    }
    session
        .submit(&target.submit_selector, target.wait_timeout)
        .await
        .map_err(FetchError::Browser)?;

    // 5) wait for a table on the new page and parse the first one
    wait_for(session, table::TABLE_TAG, target).await?;
    let html = session.html().await.map_err(FetchError::Browser)?;
    let table = parse_first_table(&html)?;
    info!(
        columns = table.headers.len(),
        rows = table.rows.len(),
        "parsed results table"
    );
    Ok(table)
}

/// Poll until `selector` matches or the target's wait budget runs out.
///
/// Query errors count as "not yet": a page that is still loading can refuse
/// evaluation for a moment.
async fn wait_for(
    session: &dyn BrowserSession,
    selector: &str,
    target: &Target,
) -> Result<(), FetchError> {
    let start = Instant::now();
    loop {
        match session.exists(selector).await {
            Ok(true) => {
                debug!(selector, elapsed = ?start.elapsed(), "element present");
                return Ok(());
            }
            Ok(false) => {}
            Err(e) => debug!(selector, "query failed while waiting: {e:#}"),
        }
        if start.elapsed() >= target.wait_timeout {
            return Err(FetchError::Timeout {
                selector: selector.to_string(),
                waited: target.wait_timeout,
            });
        }
        sleep(target.poll_interval).await;
    }
}
