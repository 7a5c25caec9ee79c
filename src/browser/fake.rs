//! Scripted in-memory session for tests.

use super::BrowserSession;
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

pub const RESULTS: &str = "<table>\
    <tr><th>Rank</th><th>Station</th><th>Rating</th></tr>\
    <tr><td>1</td><td>WXYZ</td><td>5.2</td></tr>\
    <tr><td>2</td><td>WABC</td><td>4.9</td></tr>\
    </table>";

const MARKET_PAGE: &str = "<select id='marketSelect'></select>\
    <table><tr><th>Layout</th></tr><tr><td>nav</td></tr></table>\
    <button id='goButton'>Go</button>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Market,
    /// New document committed; its table shows up after this many polls.
    Loading(usize),
    Results,
}

pub struct FakeSession {
    pub options: Option<Vec<String>>,
    pub has_button: bool,
    pub results: &'static str,
    /// Polls of the select before it renders.
    pub select_delay: usize,
    /// Polls of the results page before its table renders.
    pub load_polls: usize,
    /// Whether polls during loading fail instead of returning false.
    pub load_errors: bool,
    pub fail_close: bool,
    /// Whether the page load never finishes.
    pub stall_navigation: bool,
    pub selected: Arc<Mutex<Option<usize>>>,
    pub closed: Arc<AtomicBool>,
    polls: AtomicUsize,
    stage: Mutex<Stage>,
}

impl FakeSession {
    pub fn new(options: &[&str]) -> Self {
        Self {
            options: Some(options.iter().map(|o| o.to_string()).collect()),
            has_button: true,
            results: RESULTS,
            select_delay: 0,
            load_polls: 0,
            load_errors: false,
            fail_close: false,
            stall_navigation: false,
            selected: Arc::new(Mutex::new(None)),
            closed: Arc::new(AtomicBool::new(false)),
            polls: AtomicUsize::new(0),
            stage: Mutex::new(Stage::Market),
        }
    }

    pub fn markets() -> Self {
        Self::new(&[
            "ALBANY-SCHENECTADY-TROY",
            "MIAMI-FT. LAUDERDALE-HOLLYWOOD",
            "MILWAUKEE-RACINE",
        ])
    }

    fn stage(&self) -> Stage {
        *self.stage.lock().unwrap()
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&mut self, url: &Url, timeout: Duration) -> Result<()> {
        if self.stall_navigation {
            let never = std::future::pending::<()>();
            if tokio::time::timeout(timeout, never).await.is_err() {
                bail!("navigation to {url} timed out after {timeout:?}");
            }
        }
        *self.stage.lock().unwrap() = Stage::Market;
        Ok(())
    }

    async fn exists(&self, selector: &str) -> Result<bool> {
        let mut stage = self.stage.lock().unwrap();
        Ok(match (*stage, selector) {
            (Stage::Market, "#marketSelect") => {
                let polls = self.polls.fetch_add(1, Ordering::SeqCst);
                self.options.is_some() && polls >= self.select_delay
            }
            (Stage::Market, "#goButton") => self.has_button,
            // the market page carries a layout table of its own
            (Stage::Market, "table") => true,
            (Stage::Loading(0), "table") => {
                *stage = Stage::Results;
                true
            }
            (Stage::Loading(left), _) if left > 0 => {
                *stage = Stage::Loading(left - 1);
                if self.load_errors {
                    bail!("Execution context was destroyed");
                }
                false
            }
            (Stage::Results, "table") => true,
            _ => false,
        })
    }

    async fn option_texts(&self, _selector: &str) -> Result<Option<Vec<String>>> {
        Ok(self.options.clone())
    }

    async fn select_option(&self, _selector: &str, index: usize) -> Result<()> {
        *self.selected.lock().unwrap() = Some(index);
        Ok(())
    }

    async fn submit(&mut self, _selector: &str, _timeout: Duration) -> Result<()> {
        *self.stage.lock().unwrap() = Stage::Loading(self.load_polls);
        Ok(())
    }

    async fn html(&self) -> Result<String> {
        Ok(match self.stage() {
            Stage::Market => MARKET_PAGE.to_string(),
            Stage::Loading(_) => "<html><body></body></html>".to_string(),
            Stage::Results => self.results.to_string(),
        })
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        if self.fail_close {
            bail!("browser already gone");
        }
        Ok(())
    }
}
