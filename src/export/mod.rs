// src/export/mod.rs

use crate::config::ExportSettings;
use crate::table::RatingsTable;
use anyhow::Result;
use tracing::{info, instrument};

pub mod json;
pub mod pdf;
pub mod xlsx;

/// Write the PDF, XLSX and JSON outputs, in that order.
///
/// Each write is independent; the first failure is returned immediately and
/// any files already written are left in place.
#[instrument(skip_all, fields(rows = table.rows.len()))]
pub fn export_all(table: &RatingsTable, settings: &ExportSettings) -> Result<()> {
    pdf::write(&settings.pdf_path, &settings.title, table)?;
    info!("Data saved to {}", settings.pdf_path.display());

    xlsx::write(&settings.xlsx_path, table)?;
    info!("Data saved to {}", settings.xlsx_path.display());

    json::write(&settings.json_path, table)?;
    info!("Data saved to {}", settings.json_path.display());

    info!("Also saved Excel and JSON versions.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{sample_table, ShapeError};
    use tempfile::tempdir;

    #[test]
    fn writes_all_three_files() -> Result<()> {
        let dir = tempdir()?;
        let settings = ExportSettings::in_dir(dir.path());

        export_all(&sample_table(), &settings)?;

        assert!(settings.pdf_path.exists());
        assert!(settings.xlsx_path.exists());
        assert!(settings.json_path.exists());
        Ok(())
    }

    #[test]
    fn shape_error_stops_after_pdf() {
        let dir = tempdir().unwrap();
        let settings = ExportSettings::in_dir(dir.path());
        let mut table = sample_table();
        table.rows[0].push("extra".into());

        let err = export_all(&table, &settings).unwrap_err();

        assert!(err.downcast_ref::<ShapeError>().is_some());
        // the PDF has no column constraint and stays on disk
        assert!(settings.pdf_path.exists());
        assert!(!settings.xlsx_path.exists());
        assert!(!settings.json_path.exists());
    }
}
