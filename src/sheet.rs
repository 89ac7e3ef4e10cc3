use std::path::Path;

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook;

/// Write a single-sheet workbook: header row first, then one row per record,
/// input order preserved. No computed columns, no styling.
pub fn write_rows(path: &Path, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in header.iter().enumerate() {
        worksheet.write_string(0, col as u16, *name)?;
    }
    for (i, row) in rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            worksheet.write_string(i as u32 + 1, col as u16, cell)?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Read the first sheet of a workbook as strings, one Vec per row. Empty
/// cells become empty strings.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("opening {}", path.display()))?;
    let Some(name) = workbook.sheet_names().first().cloned() else {
        bail!("{} has no sheets", path.display());
    };
    let range = workbook
        .worksheet_range(&name)
        .with_context(|| format!("reading sheet {:?}", name))?;

    let rows = range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect();
    Ok(rows)
}

// ── Tests ──
