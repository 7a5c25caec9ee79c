// src/config.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

static MARKET_PAGE_URL: &str = "https://tlr.nielsen.com/tlr/public/market.do?method=loadAllMarket";
static MARKET_SELECT: &str = "#marketSelect"; // adjust if the page renames it
static SUBMIT_BUTTON: &str = "#goButton"; // adjust if the page renames it
static MARKET_NAME: &str = "MIAMI-FT. LAUDERDALE-HOLLYWOOD";

static REPORT_TITLE: &str = "Nielsen Ratings - Miami/Ft. Lauderdale";
static PDF_FILE: &str = "miami_fort_lauderdale_ratings.pdf";
static XLSX_FILE: &str = "miami_fort_lauderdale_ratings.xlsx";
static JSON_FILE: &str = "miami_fort_lauderdale_ratings.json";

/// Where to point the browser and what to pick once there.
#[derive(Debug, Clone)]
pub struct Target {
    pub url: String,
    /// CSS selector of the market `<select>`.
    pub select_selector: String,
    /// Visible option text, matched exactly.
    pub market: String,
    /// CSS selector of the form's submit control.
    pub submit_selector: String,
    /// Budget for each bounded wait.
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            url: MARKET_PAGE_URL.to_string(),
            select_selector: MARKET_SELECT.to_string(),
            market: MARKET_NAME.to_string(),
            submit_selector: SUBMIT_BUTTON.to_string(),
            wait_timeout: Duration::from_secs(15),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// Output locations for the three export formats.
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub title: String,
    pub pdf_path: PathBuf,
    pub xlsx_path: PathBuf,
    pub json_path: PathBuf,
}

impl ExportSettings {
    /// Default file names, placed under `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            title: REPORT_TITLE.to_string(),
            pdf_path: dir.join(PDF_FILE),
            xlsx_path: dir.join(XLSX_FILE),
            json_path: dir.join(JSON_FILE),
        }
    }
}

impl Default for ExportSettings {
    /// Default file names in the working directory.
    fn default() -> Self {
        Self {
            title: REPORT_TITLE.to_string(),
            pdf_path: PathBuf::from(PDF_FILE),
            xlsx_path: PathBuf::from(XLSX_FILE),
            json_path: PathBuf::from(JSON_FILE),
        }
    }
}
