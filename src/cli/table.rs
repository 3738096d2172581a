//! Table formatting for record listings
//!
//! # Text Wrapping
//!
//! - Use `TableConfig::with_wrap(width)` to enable word-wrapped multi-line rows
//! - CSV and ID formats remain single-line for pipability

use console::style;

use crate::cli::helpers::{escape_csv, truncate_str};
use crate::cli::OutputFormat;
use crate::core::record::Status;

/// Configuration for table output
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Maximum width for text columns before wrapping (None = truncate instead)
    pub wrap_width: Option<usize>,
    /// Show summary line after table (e.g., "5 record(s) found")
    pub show_summary: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            wrap_width: None,
            show_summary: true,
        }
    }
}

impl TableConfig {
    /// Create config with text wrapping enabled at the specified width
    pub fn with_wrap(width: usize) -> Self {
        Self {
            wrap_width: Some(width),
            show_summary: true,
        }
    }

    /// Create config optimized for piping (no wrapping, no summary)
    pub fn for_pipe() -> Self {
        Self {
            wrap_width: None,
            show_summary: false,
        }
    }
}

/// Wrap text to fit within a maximum width, breaking at word boundaries
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if text.chars().count() <= max_width || max_width < 5 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();

        if !current.is_empty() && current_len + 1 + word_len <= max_width {
            current.push(' ');
            current.push_str(word);
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        // Force-break words longer than a line
        let chars: Vec<char> = word.chars().collect();
        let mut chunks = chars.chunks(max_width).peekable();
        while let Some(chunk) = chunks.next() {
            let piece: String = chunk.iter().collect();
            if chunks.peek().is_some() {
                lines.push(piece);
            } else {
                current = piece;
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Record ID (truncated in tables, cyan colored)
    Id(String),
    /// Plain text, optionally truncated
    Text(String),
    /// Completion status with color coding
    Status(Status),
    /// Date already rendered in the display pattern; `None` shows as "-"
    Date(Option<String>),
}

impl CellValue {
    /// Format for TSV output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => {
                let display = if id.len() > 16 {
                    format!("{}...", &id[..13])
                } else {
                    id.clone()
                };
                format!("{:<width$}", style(&display).cyan(), width = width)
            }
            CellValue::Text(s) => {
                let truncated = truncate_str(s, width.saturating_sub(2));
                format!("{:<width$}", truncated, width = width)
            }
            CellValue::Status(status) => {
                let s = status.to_string();
                let styled = match status {
                    Status::Completed => style(&s).green(),
                    Status::Pending => style(&s).yellow(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Date(Some(d)) => format!("{:<width$}", d, width = width),
            CellValue::Date(None) => format!("{:<width$}", style("-").dim(), width = width),
        }
    }

    /// Format for CSV output (RFC 4180, no colors)
    pub fn format_csv(&self) -> String {
        match self {
            CellValue::Id(id) => escape_csv(id),
            CellValue::Text(s) => escape_csv(s),
            CellValue::Status(status) => status.to_string(),
            CellValue::Date(d) => d.as_deref().map(escape_csv).unwrap_or_default(),
        }
    }

    /// Format for Markdown output (no colors, escaped pipes)
    pub fn format_md(&self) -> String {
        let raw = match self {
            CellValue::Date(None) => "-".to_string(),
            other => other.raw(),
        };
        raw.replace('|', "\\|")
    }

    /// Get raw string value (no formatting)
    pub fn raw(&self) -> String {
        match self {
            CellValue::Id(id) => id.clone(),
            CellValue::Text(s) => s.clone(),
            CellValue::Status(status) => status.to_string(),
            CellValue::Date(d) => d.clone().unwrap_or_default(),
        }
    }

    /// Get the display width of this cell's content (for dynamic column sizing)
    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Id(id) => id.len().min(16),
            CellValue::Text(s) => s.chars().count(),
            CellValue::Status(status) => status.to_string().len(),
            CellValue::Date(d) => d.as_ref().map_or(1, |s| s.chars().count()),
        }
    }
}

/// Column definition with header label and width
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// A row of cell values for table output
pub struct TableRow {
    pub short_id: String,
    pub full_id: String,
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new(full_id: String, short_id: String) -> Self {
        Self {
            short_id,
            full_id,
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Table formatter that outputs rows in various formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    noun: &'static str,
    config: TableConfig,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], noun: &'static str) -> Self {
        Self {
            columns,
            noun,
            config: TableConfig::default(),
        }
    }

    /// Configure the formatter with custom settings
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Output rows in the specified format
    pub fn output<I>(&self, rows: I, format: OutputFormat, visible_columns: &[&str])
    where
        I: IntoIterator<Item = TableRow>,
    {
        let rows: Vec<TableRow> = rows.into_iter().collect();

        match format {
            OutputFormat::Csv => self.output_csv(&rows, visible_columns),
            OutputFormat::Md => self.output_md(&rows, visible_columns),
            OutputFormat::Id => self.output_ids(&rows),
            _ => self.output_tsv(&rows, visible_columns),
        }
    }

    fn visible<'c>(&'c self, visible_columns: &'c [&'c str]) -> impl Iterator<Item = &'c ColumnDef> {
        self.columns
            .iter()
            .filter(move |col| visible_columns.contains(&col.key))
    }

    /// Calculate dynamic column widths based on actual content
    fn calculate_widths(&self, rows: &[TableRow], visible_columns: &[&str]) -> Vec<usize> {
        let mut widths = Vec::new();

        // SHORT column
        let short_width = rows
            .iter()
            .map(|r| r.short_id.len())
            .max()
            .unwrap_or(5)
            .max(5);
        widths.push(short_width);

        for col in self.visible(visible_columns) {
            let max_content = rows
                .iter()
                .filter_map(|r| r.get(col.key))
                .map(|v| v.display_width())
                .max()
                .unwrap_or(0);

            // +2 leaves room for truncate_str's ellipsis
            let natural_width = col.header.len().max(max_content.saturating_add(2));
            widths.push(natural_width.min(col.width));
        }

        widths
    }

    fn output_tsv(&self, rows: &[TableRow], visible_columns: &[&str]) {
        let widths = self.calculate_widths(rows, visible_columns);

        let mut header_parts = vec![format!(
            "{:<width$}",
            style("SHORT").bold().dim(),
            width = widths[0]
        )];
        for (col, width) in self.visible(visible_columns).zip(&widths[1..]) {
            header_parts.push(format!("{:<width$}", style(col.header).bold(), width = width));
        }
        println!("{}", header_parts.join(" "));

        let total_width: usize = widths.iter().sum::<usize>() + widths.len() - 1;
        println!("{}", "-".repeat(total_width));

        for row in rows {
            match self.config.wrap_width {
                Some(wrap_width) => self.output_tsv_row_wrapped(row, visible_columns, &widths, wrap_width),
                None => self.output_tsv_row_truncated(row, visible_columns, &widths),
            }
        }

        if self.config.show_summary {
            println!();
            println!(
                "{} {}(s) found. Use {} to reference by short ID.",
                style(rows.len()).cyan(),
                self.noun,
                style("@N").cyan()
            );
        }
    }

    fn output_tsv_row_truncated(&self, row: &TableRow, visible_columns: &[&str], widths: &[usize]) {
        let mut row_parts = vec![format!("{:<width$}", style(&row.short_id).cyan(), width = widths[0])];

        for (col, &w) in self.visible(visible_columns).zip(&widths[1..]) {
            match row.get(col.key) {
                Some(value) => row_parts.push(value.format_tsv(w)),
                None => row_parts.push(format!("{:<width$}", "-", width = w)),
            }
        }
        println!("{}", row_parts.join(" "));
    }

    fn output_tsv_row_wrapped(
        &self,
        row: &TableRow,
        visible_columns: &[&str],
        widths: &[usize],
        wrap_width: usize,
    ) {
        let mut wrapped_cells: Vec<Vec<String>> = vec![vec![row.short_id.clone()]];

        for col in self.visible(visible_columns) {
            let lines = match row.get(col.key) {
                Some(value @ CellValue::Text(_)) => wrap_text(&value.raw(), wrap_width),
                Some(value) => vec![value.raw()],
                None => vec!["-".to_string()],
            };
            wrapped_cells.push(lines);
        }

        let max_lines = wrapped_cells.iter().map(|c| c.len()).max().unwrap_or(1);

        for line_idx in 0..max_lines {
            let mut row_parts = Vec::new();

            for (col_idx, cell_lines) in wrapped_cells.iter().enumerate() {
                let width = *widths.get(col_idx).unwrap_or(&10);
                let content = cell_lines.get(line_idx).map(|s| s.as_str()).unwrap_or("");

                if col_idx == 0 {
                    let shown = if line_idx == 0 { content } else { "" };
                    row_parts.push(format!("{:<width$}", style(shown).cyan(), width = width));
                } else {
                    row_parts.push(format!("{:<width$}", content, width = width));
                }
            }
            println!("{}", row_parts.join(" "));
        }

        if max_lines > 1 {
            println!();
        }
    }

    fn output_csv(&self, rows: &[TableRow], visible_columns: &[&str]) {
        let mut headers = vec!["short_id".to_string(), "id".to_string()];
        headers.extend(self.visible(visible_columns).map(|c| c.key.to_string()));
        println!("{}", headers.join(","));

        for row in rows {
            let mut values = vec![escape_csv(&row.short_id), escape_csv(&row.full_id)];
            for col in self.visible(visible_columns) {
                values.push(row.get(col.key).map(|v| v.format_csv()).unwrap_or_default());
            }
            println!("{}", values.join(","));
        }
    }

    fn output_md(&self, rows: &[TableRow], visible_columns: &[&str]) {
        let mut headers = vec!["Short".to_string(), "ID".to_string()];
        headers.extend(self.visible(visible_columns).map(|c| c.header.to_string()));
        println!("| {} |", headers.join(" | "));

        let separators: Vec<&str> = headers.iter().map(|_| "---").collect();
        println!("|{}|", separators.join("|"));

        for row in rows {
            let mut values = vec![row.short_id.clone(), row.full_id.clone()];
            for col in self.visible(visible_columns) {
                values.push(
                    row.get(col.key)
                        .map(|v| v.format_md())
                        .unwrap_or_else(|| "-".to_string()),
                );
            }
            println!("| {} |", values.join(" | "));
        }
    }

    fn output_ids(&self, rows: &[TableRow]) {
        for row in rows {
            println!("{}", row.full_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_text_format() {
        let cell = CellValue::Text("Hello World".to_string());
        assert!(cell.format_tsv(20).contains("Hello World"));
        assert_eq!(cell.format_csv(), "Hello World");
        assert_eq!(cell.format_md(), "Hello World");
    }

    #[test]
    fn test_cell_value_status_format() {
        let cell = CellValue::Status(Status::Completed);
        assert_eq!(cell.format_csv(), "completed");
        assert_eq!(cell.format_md(), "completed");
    }

    #[test]
    fn test_cell_value_missing_date() {
        let cell = CellValue::Date(None);
        assert_eq!(cell.format_csv(), "");
        assert_eq!(cell.format_md(), "-");
        assert_eq!(cell.display_width(), 1);

        let cell = CellValue::Date(Some("05/03/2024".to_string()));
        assert_eq!(cell.format_csv(), "05/03/2024");
    }

    #[test]
    fn test_cell_value_md_escapes_pipes() {
        let cell = CellValue::Text("a|b|c".to_string());
        assert_eq!(cell.format_md(), "a\\|b\\|c");
    }

    #[test]
    fn test_display_width_counts_chars() {
        let cell = CellValue::Text("Conceição".to_string());
        assert_eq!(cell.display_width(), 9);
    }

    #[test]
    fn test_table_row_builder() {
        let row = TableRow::new("TRN-123".to_string(), "@1".to_string())
            .cell("employee", CellValue::Text("Ana".to_string()))
            .cell("status", CellValue::Status(Status::Pending));

        assert_eq!(row.full_id, "TRN-123");
        assert!(row.get("employee").is_some());
        assert!(row.get("status").is_some());
        assert!(row.get("missing").is_none());
    }

    #[test]
    fn test_wrap_text_short() {
        assert_eq!(wrap_text("hello", 20), vec!["hello"]);
    }

    #[test]
    fn test_wrap_text_word_boundary() {
        assert_eq!(
            wrap_text("hello world foo bar", 11),
            vec!["hello world", "foo bar"]
        );
    }

    #[test]
    fn test_wrap_text_long_word() {
        let result = wrap_text("supercalifragilisticexpialidocious", 10);
        assert_eq!(
            result,
            vec!["supercalif", "ragilistic", "expialidoc", "ious"]
        );
    }

    #[test]
    fn test_wrap_text_multiple_lines() {
        let result = wrap_text("The quick brown fox jumps over the lazy dog", 15);
        assert_eq!(
            result,
            vec!["The quick brown", "fox jumps over", "the lazy dog"]
        );
    }

    #[test]
    fn test_table_config_for_pipe() {
        let config = TableConfig::for_pipe();
        assert!(config.wrap_width.is_none());
        assert!(!config.show_summary);
        assert_eq!(TableConfig::with_wrap(40).wrap_width, Some(40));
    }
}
