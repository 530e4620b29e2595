//! Spreadsheet export of an approved summary.
//!
//! The summary is opaque prose: each line goes into column A of its own row,
//! blank lines included, with no formatting.

use std::path::Path;

use rust_xlsxwriter::{Workbook, XlsxError};
use thiserror::Error;
use tracing::info;

/// Name of the single worksheet.
pub const SHEET_NAME: &str = "Project Summary";

/// File name offered for the download.
pub const REPORT_FILE_NAME: &str = "project_summary.xlsx";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("workbook error: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Line *i* of the summary is row *i*. Handles `\n` and `\r\n`.
pub fn summary_rows(summary: &str) -> Vec<&str> {
    summary.lines().collect()
}

/// Render the summary into an in-memory xlsx file.
pub fn render_summary(summary: &str) -> Result<Vec<u8>, ReportError> {
    let rows = summary_rows(summary);
    let mut workbook = Workbook::new();
    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;
        for (row, line) in rows.iter().enumerate() {
            // Blank lines stay blank rows.
            if !line.is_empty() {
                worksheet.write_string(row as u32, 0, *line)?;
            }
        }
    }
    let buffer = workbook.save_to_buffer()?;
    info!(rows = rows.len(), bytes = buffer.len(), "Summary workbook rendered");
    Ok(buffer)
}

/// Render and write the workbook to `path`.
pub fn write_summary(summary: &str, path: &Path) -> Result<(), ReportError> {
    let buffer = render_summary(summary)?;
    std::fs::write(path, buffer)?;
    info!(path = %path.display(), "Summary workbook saved");
    Ok(())
}
