// src/fetch/table.rs

use super::FetchError;
use crate::table::RatingsTable;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};

/// Tag the results page is waited on and parsed from.
pub const TABLE_TAG: &str = "table";

static TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(TABLE_TAG).expect("table selector should parse"));
static TR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("tr selector should parse"));
static TH: Lazy<Selector> = Lazy::new(|| Selector::parse("th").expect("th selector should parse"));
static TD: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("td selector should parse"));

/// Parse the first `<table>` in `html`.
///
/// The first `tr` supplies the headers from its `th` cells; every later `tr`
/// becomes a row of its `td` cells. Rows without any `td` are dropped, all
/// others are kept as-is whatever their length.
pub fn parse_first_table(html: &str) -> Result<RatingsTable, FetchError> {
    let doc = Html::parse_document(html);
    let table = doc
        .select(&TABLE)
        .next()
        .ok_or_else(|| FetchError::ElementNotFound {
            selector: TABLE_TAG.to_string(),
        })?;

    let mut trs = table.select(&TR);
    let first = trs.next().ok_or(FetchError::EmptyTable)?;
    let headers = cells(first, &TH);
    let rows = trs
        .map(|tr| cells(tr, &TD))
        .filter(|row| !row.is_empty())
        .collect();

    Ok(RatingsTable::new(headers, rows))
}

fn cells(row: ElementRef<'_>, cell: &Selector) -> Vec<String> {
    row.select(cell).map(cell_text).collect()
}

/// Rendered text of a cell: `<br>` starts a new line, whitespace runs
/// within a line collapse to one space, and each line is trimmed.
fn cell_text(cell: ElementRef<'_>) -> String {
    let mut lines = Vec::new();
    let mut line = String::new();
    for node in cell.descendants() {
        match node.value() {
            Node::Text(text) => line.push_str(text),
            Node::Element(el) if el.name() == "br" => lines.push(std::mem::take(&mut line)),
            _ => {}
        }
    }
    lines.push(line);
    lines
        .iter()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
