//! Exports of a (filtered) view
//!
//! Two shapes: delimited text with a status column for reading, and a
//! spreadsheet without status that the loader can read back as a register.

use chrono::NaiveDateTime;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::record::Record;
use crate::core::workbook::{self, Cell, FileKind, Sheet, WorkbookError};

/// Base name of generated export files
pub const EXPORT_BASENAME: &str = "trainings";

/// Export flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// UTF-8 comma-separated text with a status column
    Csv,
    /// Spreadsheet with date cells, no status column
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    fn file_kind(&self) -> FileKind {
        match self {
            ExportFormat::Csv => FileKind::Delimited,
            ExportFormat::Xlsx => FileKind::Spreadsheet,
        }
    }
}

/// Build the exported sheet for a set of records
pub fn export_sheet<'a, I>(records: I, format: ExportFormat) -> Sheet
where
    I: IntoIterator<Item = &'a Record>,
{
    let with_status = format == ExportFormat::Csv;

    let mut headers = vec![
        "employee".to_string(),
        "course".to_string(),
        "completion_date".to_string(),
    ];
    if with_status {
        headers.push("status".to_string());
    }

    let rows = records
        .into_iter()
        .map(|r| {
            let mut row = vec![
                Cell::Text(r.employee.clone()),
                Cell::Text(r.course.clone()),
                Cell::from(r.completion_date),
            ];
            if with_status {
                row.push(Cell::Text(r.status().to_string()));
            }
            row
        })
        .collect();

    Sheet { headers, rows }
}

/// Default export file name, stamped with the generation time
pub fn default_file_name(format: ExportFormat, generated_at: NaiveDateTime) -> String {
    format!(
        "{}_{}.{}",
        EXPORT_BASENAME,
        generated_at.format("%d%m%Y_%H%M"),
        format.extension()
    )
}

/// Write an export to a file and return its path
pub fn export_to_path<'a, I>(
    records: I,
    format: ExportFormat,
    path: &Path,
    date_pattern: &str,
) -> Result<PathBuf, WorkbookError>
where
    I: IntoIterator<Item = &'a Record>,
{
    let sheet = export_sheet(records, format);
    workbook::write_sheet_as(path, format.file_kind(), &sheet, date_pattern)?;
    info!(path = %path.display(), rows = sheet.rows.len(), "export written");
    Ok(path.to_path_buf())
}

/// Write a delimited export to any writer (e.g. stdout)
pub fn export_csv_to<'a, W, I>(writer: W, records: I, date_pattern: &str) -> Result<(), csv::Error>
where
    W: Write,
    I: IntoIterator<Item = &'a Record>,
{
    let sheet = export_sheet(records, ExportFormat::Csv);
    workbook::write_delimited(writer, &sheet, date_pattern)
}
