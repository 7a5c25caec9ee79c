use crate::table::RatingsTable;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Map, Value};
use std::{
    fs,
    io::{BufWriter, Write},
    path::Path,
};
use tracing::warn;

/// Write `table` as an array of `{header: cell}` records, indented four
/// spaces, with a trailing newline.
///
/// Written atomically: to `.<name>.tmp` beside `path`, then renamed over it.
/// The temp file is removed if any step fails.
pub fn write(path: &Path, table: &RatingsTable) -> Result<()> {
    let frame = table.frame()?;
    frame.ensure_unique_columns()?;
    let records = frame.records();

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "records.json".to_string());
    let tmp_path = path.with_file_name(format!(".{file_name}.tmp"));

    let written = write_records(&tmp_path, &records).and_then(|()| {
        fs::rename(&tmp_path, path)
            .with_context(|| format!("renaming {} -> {}", tmp_path.display(), path.display()))
    });
    if written.is_err() && tmp_path.exists() {
        if let Err(e) = fs::remove_file(&tmp_path) {
            warn!("failed to remove {}: {e}", tmp_path.display());
        }
    }
    written
}

fn write_records(tmp_path: &Path, records: &[Map<String, Value>]) -> Result<()> {
    let file =
        fs::File::create(tmp_path).with_context(|| format!("creating {}", tmp_path.display()))?;
    let mut out = BufWriter::new(file);
    let mut ser =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    records
        .serialize(&mut ser)
        .context("serializing JSON records")?;
    out.write_all(b"\n")?;
    out.flush()
        .with_context(|| format!("flushing {}", tmp_path.display()))?;
    Ok(())
}
