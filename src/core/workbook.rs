//! Reading and writing tabular files
//!
//! The register lives in a single tabular file. Spreadsheets (`.xlsx`,
//! `.xlsm`, `.xls`, `.ods`) are read with calamine and written with
//! rust_xlsxwriter; anything else is treated as delimited text.

use calamine::{open_workbook_auto, Data, DataType, Reader};
use chrono::{Duration, NaiveDate};
use csv::{ReaderBuilder, WriterBuilder};
use miette::Diagnostic;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::dates::{excel_number_format, format_date, parse_date, STORAGE_FORMAT};
use crate::core::identity::RecordId;
use crate::core::normalize::HeaderMap;
use crate::core::record::{Field, Record};

/// Header written to the register file
pub const STORE_HEADERS: [&str; 4] = ["id", "employee", "course", "completion_date"];

/// On-disk format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Delimited,
    Spreadsheet,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => FileKind::Spreadsheet,
            _ => FileKind::Delimited,
        }
    }
}

/// A single cell value, independent of the file format
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Cell {
    /// Trimmed text content; numbers are rendered without a trailing `.0`
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Date(d) => d.format(STORAGE_FORMAT).to_string(),
        }
    }

    /// Date content, or `None` if the cell does not hold a readable date
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => parse_date(s),
            Cell::Number(n) => serial_to_date(*n),
            Cell::Date(d) => Some(*d),
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<Option<NaiveDate>> for Cell {
    fn from(date: Option<NaiveDate>) -> Self {
        date.map(Cell::Date).unwrap_or(Cell::Empty)
    }
}

/// Only OOXML workbooks can be written back
/// Whether registers with this extension can be saved
pub fn is_writable(path: &Path) -> bool {
    match FileKind::from_path(path) {
        FileKind::Delimited => true,
        FileKind::Spreadsheet => is_writable_spreadsheet(path),
    }
}

fn is_writable_spreadsheet(path: &Path) -> bool {
    path.extension()
        .map(|e| {
            let ext = e.to_string_lossy().to_lowercase();
            ext == "xlsx" || ext == "xlsm"
        })
        .unwrap_or(false)
}

/// Convert a spreadsheet day serial (1900 date system) to a date
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !(1.0..2_958_466.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}

/// A header row plus data rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Errors from reading or writing tabular files
#[derive(Debug, Error, Diagnostic)]
pub enum WorkbookError {
    #[error("IO error on {path}: {source}")]
    #[diagnostic(code(trainreg::workbook::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    #[diagnostic(code(trainreg::workbook::csv))]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cannot read spreadsheet {path}: {message}")]
    #[diagnostic(
        code(trainreg::workbook::read),
        help("the file must be a valid .xlsx/.xls/.ods workbook")
    )]
    SpreadsheetRead { path: PathBuf, message: String },

    #[error("spreadsheet {path} has no worksheet")]
    #[diagnostic(code(trainreg::workbook::empty))]
    NoWorksheet { path: PathBuf },

    #[error("{path} can be read but not written")]
    #[diagnostic(
        code(trainreg::workbook::read_only),
        help("convert the register to .xlsx or .csv and point `data_file` at the new file")
    )]
    ReadOnlyFormat { path: PathBuf },

    #[error("cannot write spreadsheet {path}: {source}")]
    #[diagnostic(code(trainreg::workbook::write))]
    SpreadsheetWrite {
        path: PathBuf,
        #[source]
        source: XlsxError,
    },
}

/// Result of loading the register file
#[derive(Debug, Clone, Default)]
pub struct LoadedTable {
    pub records: Vec<Record>,
    /// Canonical fields absent from the source, back-filled with empty text
    pub missing: Vec<Field>,
    /// Source headers that were dropped
    pub ignored: Vec<String>,
    /// Rows that had no usable id and received a fresh one
    pub assigned_ids: usize,
}

// =========================================================================
// Reading
// =========================================================================

/// Read any supported tabular file into a sheet
pub fn read_sheet(path: &Path) -> Result<Sheet, WorkbookError> {
    match FileKind::from_path(path) {
        FileKind::Delimited => read_delimited(path),
        FileKind::Spreadsheet => read_spreadsheet(path),
    }
}

/// Pick the delimiter that occurs most often in the header line
fn sniff_delimiter(first_line: &str) -> u8 {
    [b',', b';', b'\t']
        .into_iter()
        .max_by_key(|d| first_line.bytes().filter(|b| b == d).count())
        .filter(|d| first_line.as_bytes().contains(d))
        .unwrap_or(b',')
}

fn read_delimited(path: &Path) -> Result<Sheet, WorkbookError> {
    let content = fs::read_to_string(path).map_err(|source| WorkbookError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content = content.trim_start_matches('\u{feff}');
    let delimiter = sniff_delimiter(content.lines().next().unwrap_or_default());

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    let csv_err = |source| WorkbookError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let headers = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(String::from)
        .collect();

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(csv_err)?;
        rows.push(
            record
                .iter()
                .map(|v| {
                    if v.trim().is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(v.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(Sheet { headers, rows })
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(_) | Data::DateTimeIso(_) => {
            data.as_date().map(Cell::Date).unwrap_or(Cell::Empty)
        }
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

fn read_spreadsheet(path: &Path) -> Result<Sheet, WorkbookError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| WorkbookError::SpreadsheetRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| WorkbookError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(|e| WorkbookError::SpreadsheetRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(row) => row.iter().map(|c| convert_cell(c).as_text()).collect(),
        None => Vec::new(),
    };
    let rows = rows.map(|row| row.iter().map(convert_cell).collect()).collect();

    Ok(Sheet { headers, rows })
}

// =========================================================================
// Writing
// =========================================================================

/// Write a sheet in the format implied by the path's extension
///
/// `date_pattern` is a chrono pattern: delimited files get the date as text
/// in this pattern, spreadsheets get real date cells displayed with it.
pub fn write_sheet(path: &Path, sheet: &Sheet, date_pattern: &str) -> Result<(), WorkbookError> {
    write_sheet_as(path, FileKind::from_path(path), sheet, date_pattern)
}

/// Write a sheet in an explicit format regardless of the extension
pub fn write_sheet_as(
    path: &Path,
    kind: FileKind,
    sheet: &Sheet,
    date_pattern: &str,
) -> Result<(), WorkbookError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| WorkbookError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    match kind {
        FileKind::Delimited => {
            let file = fs::File::create(path).map_err(|source| WorkbookError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            write_delimited(file, sheet, date_pattern).map_err(|source| WorkbookError::Csv {
                path: path.to_path_buf(),
                source,
            })
        }
        FileKind::Spreadsheet => {
            write_spreadsheet(path, sheet, date_pattern).map_err(|source| {
                WorkbookError::SpreadsheetWrite {
                    path: path.to_path_buf(),
                    source,
                }
            })
        }
    }
}

/// Write a sheet as comma-separated UTF-8 text to any writer
pub fn write_delimited<W: Write>(
    writer: W,
    sheet: &Sheet,
    date_pattern: &str,
) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(&sheet.headers)?;
    for row in &sheet.rows {
        let values: Vec<String> = row
            .iter()
            .map(|cell| match cell {
                Cell::Date(d) => d.format(date_pattern).to_string(),
                other => other.as_text(),
            })
            .collect();
        wtr.write_record(&values)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_spreadsheet(path: &Path, sheet: &Sheet, date_pattern: &str) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format(excel_number_format(date_pattern));

    for (col, header) in sheet.headers.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, header.as_str(), &header_format)?;
        worksheet.set_column_width(col, 24)?;
    }

    for (idx, row) in sheet.rows.iter().enumerate() {
        let row_num = idx as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Empty => {}
                Cell::Text(s) => {
                    worksheet.write_string(row_num, col, s.as_str())?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(row_num, col, *n)?;
                }
                Cell::Date(d) => {
                    worksheet.write_datetime_with_format(row_num, col, d, &date_format)?;
                }
            }
        }
    }

    workbook.save(path)
}

// =========================================================================
// Register file
// =========================================================================

/// Create an empty register file with only the header row
pub fn create_empty(path: &Path) -> Result<(), WorkbookError> {
    save_table(path, &[], STORAGE_FORMAT)
}

/// Load the register file, creating it first if it does not exist
pub fn load_table(path: &Path) -> Result<LoadedTable, WorkbookError> {
    if !path.exists() {
        debug!(path = %path.display(), "register file missing, creating it");
        create_empty(path)?;
    }

    let sheet = read_sheet(path)?;
    let loaded = normalize_sheet(&sheet);

    if !loaded.missing.is_empty() {
        let names: Vec<&str> = loaded.missing.iter().map(|f| f.as_str()).collect();
        warn!(
            path = %path.display(),
            missing = %names.join(", "),
            "columns missing from source; back-filled with empty values"
        );
    }
    if !loaded.ignored.is_empty() {
        debug!(ignored = %loaded.ignored.join(", "), "dropping unrecognized columns");
    }
    debug!(
        path = %path.display(),
        records = loaded.records.len(),
        assigned_ids = loaded.assigned_ids,
        "loaded register"
    );

    Ok(loaded)
}

static EMPTY_CELL: Cell = Cell::Empty;

/// Turn a raw sheet into records: map headers, back-fill missing fields,
/// coerce dates, and give every row a unique id
pub fn normalize_sheet(sheet: &Sheet) -> LoadedTable {
    let map = HeaderMap::from_headers(&sheet.headers);
    let mut seen: HashSet<RecordId> = HashSet::new();
    let mut records = Vec::with_capacity(sheet.rows.len());
    let mut assigned_ids = 0;

    for row in &sheet.rows {
        if row.iter().all(Cell::is_blank) {
            continue;
        }

        let cell = |pos: Option<usize>| pos.and_then(|p| row.get(p)).unwrap_or(&EMPTY_CELL);

        let id = match cell(map.id).as_text().parse::<RecordId>() {
            Ok(id) if seen.insert(id) => id,
            _ => {
                assigned_ids += 1;
                let id = RecordId::new();
                seen.insert(id);
                id
            }
        };

        records.push(Record {
            id,
            employee: cell(map.employee).as_text(),
            course: cell(map.course).as_text(),
            completion_date: cell(map.completion_date).as_date(),
        });
    }

    LoadedTable {
        records,
        missing: map.missing(),
        ignored: map.ignored.clone(),
        assigned_ids,
    }
}

/// Build the sheet written back to the register file
pub fn store_sheet(records: &[Record]) -> Sheet {
    Sheet {
        headers: STORE_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows: records
            .iter()
            .map(|r| {
                vec![
                    Cell::Text(r.id.to_string()),
                    Cell::Text(r.employee.clone()),
                    Cell::Text(r.course.clone()),
                    Cell::from(r.completion_date),
                ]
            })
            .collect(),
    }
}

/// Overwrite the register file with the given records
///
/// Spreadsheets get date cells shown with `display_pattern`; delimited
/// files always store ISO dates.
pub fn save_table(
    path: &Path,
    records: &[Record],
    display_pattern: &str,
) -> Result<(), WorkbookError> {
    let sheet = store_sheet(records);
    let pattern = match FileKind::from_path(path) {
        FileKind::Spreadsheet if !is_writable_spreadsheet(path) => {
            return Err(WorkbookError::ReadOnlyFormat {
                path: path.to_path_buf(),
            });
        }
        FileKind::Spreadsheet => display_pattern,
        FileKind::Delimited => STORAGE_FORMAT,
    };
    write_sheet(path, &sheet, pattern)?;
    debug!(path = %path.display(), records = records.len(), "saved register");
    Ok(())
}

/// Render an optional date the way delimited register files store it
pub fn storage_date(date: Option<NaiveDate>) -> String {
    format_date(date, STORAGE_FORMAT)
}
