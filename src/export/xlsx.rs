use crate::table::RatingsTable;
use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

/// Write `table` as a single-sheet workbook: bold header row, then one row
/// per record, every cell a string. Fails before touching `path` if any row's
/// length differs from the header count.
pub fn write(path: &Path, table: &RatingsTable) -> Result<()> {
    let frame = table.frame()?;

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();

    for (col, name) in frame.columns().iter().enumerate() {
        let col = u16::try_from(col).context("too many columns for a worksheet")?;
        sheet.write_string_with_format(0, col, name.as_str(), &header)?;
    }
    for (r, cells) in frame.rows().iter().enumerate() {
        let row = u32::try_from(r + 1).context("too many rows for a worksheet")?;
        for (col, cell) in cells.iter().enumerate() {
            sheet.write_string(row, col as u16, cell.as_str())?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{sample_table, ShapeError};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn writes_a_workbook() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("ratings.xlsx");
        write(&path, &sample_table())?;
        // xlsx is a zip container
        assert!(fs::read(&path)?.starts_with(b"PK"));
        Ok(())
    }

    #[test]
    fn ragged_rows_fail_without_writing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ratings.xlsx");
        let mut table = sample_table();
        table.rows[1].pop();

        let err = write(&path, &table).unwrap_err();

        assert_eq!(
            err.downcast_ref::<ShapeError>(),
            Some(&ShapeError::ColumnMismatch {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert!(!path.exists());
    }
}
