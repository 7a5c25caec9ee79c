// src/runner.rs

use crate::browser::BrowserSession;
use crate::config::{ExportSettings, Target};
use crate::export;
use crate::fetch::{self, FetchError};
use crate::table::RatingsTable;
use anyhow::Result;
use tracing::{error, warn};

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// All three files were written.
    Exported { rows: usize },
    /// The fetch failed or found nothing; no file was written.
    NoData,
}

/// Scrape with a fresh Chromium session, then export.
pub async fn run(target: &Target, settings: &ExportSettings) -> Result<Outcome> {
    finish(fetch::scrape(target).await, settings)
}

/// Scrape through an already open `session`, then export.
pub async fn run_with(
    session: Box<dyn BrowserSession>,
    target: &Target,
    settings: &ExportSettings,
) -> Result<Outcome> {
    finish(fetch::fetch_ratings(session, target).await, settings)
}

/// Fetch failures end the run quietly; export failures are returned.
fn finish(
    fetched: Result<RatingsTable, FetchError>,
    settings: &ExportSettings,
) -> Result<Outcome> {
    let table = fetched.unwrap_or_else(|err| {
        error!("Error encountered: {err}");
        RatingsTable::default()
    });

    if table.is_empty() {
        warn!("No data found or an error occurred.");
        return Ok(Outcome::NoData);
    }

    export::export_all(&table, settings)?;
    Ok(Outcome::Exported {
        rows: table.rows.len(),
    })
}
