//! `trainreg list` command - Filtered record table

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::utils::{save_short_ids, FilterArgs, RecordView, Workspace};
use crate::cli::helpers::format_ref;
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::dates::format_date;
use crate::core::record::Record;
use crate::core::shortid::ShortIdIndex;

/// Columns available for display
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListColumn {
    Id,
    Employee,
    Course,
    Date,
    Status,
}

impl ListColumn {
    fn key(&self) -> &'static str {
        match self {
            ListColumn::Id => "id",
            ListColumn::Employee => "employee",
            ListColumn::Course => "course",
            ListColumn::Date => "date",
            ListColumn::Status => "status",
        }
    }
}

impl std::fmt::Display for ListColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

const RECORD_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 17),
    ColumnDef::new("employee", "EMPLOYEE", 30),
    ColumnDef::new("course", "COURSE", 34),
    ColumnDef::new("date", "COMPLETED", 12),
    ColumnDef::new("status", "STATUS", 10),
];

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Columns to display
    #[arg(long, value_delimiter = ',', default_values_t = vec![
        ListColumn::Employee,
        ListColumn::Course,
        ListColumn::Date,
        ListColumn::Status,
    ])]
    pub columns: Vec<ListColumn>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,

    /// Wrap text in columns (mobile-friendly output with specified width)
    #[arg(long, short = 'w')]
    pub wrap: Option<usize>,
}

pub fn run(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let filter = args.filter.to_filter();

    let mut records: Vec<&Record> = filter.apply(ws.store.records());
    if let Some(limit) = args.limit {
        records.truncate(limit);
    }

    if args.count {
        println!("{}", records.len());
        return Ok(());
    }

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    if records.is_empty() {
        match format {
            OutputFormat::Json | OutputFormat::Yaml => println!("[]"),
            OutputFormat::Id | OutputFormat::Csv => {}
            _ => {
                println!("No records found.");
                if ws.store.is_empty() {
                    println!();
                    println!("Add one with: {}", style("trainreg add").yellow());
                }
            }
        }
        return Ok(());
    }

    // Numbering follows this listing
    let mut short_ids = ShortIdIndex::load(&ws.project);
    short_ids.rebuild(records.iter().map(|r| &r.id));
    save_short_ids(&short_ids, &ws.project);

    let date_format = ws.date_format();
    match format {
        OutputFormat::Json => {
            let views = views(&records, &short_ids, date_format);
            let json = serde_json::to_string_pretty(&views).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let views = views(&records, &short_ids, date_format);
            let yaml = serde_yml::to_string(&views).into_diagnostic()?;
            print!("{}", yaml);
        }
        _ => {
            let columns: Vec<&str> = args.columns.iter().map(|c| c.key()).collect();
            let rows = records
                .iter()
                .map(|r| record_to_row(r, &short_ids, date_format));

            let config = if global.quiet {
                TableConfig::for_pipe()
            } else {
                args.wrap.map(TableConfig::with_wrap).unwrap_or_default()
            };
            TableFormatter::new(RECORD_COLUMNS, "record")
                .with_config(config)
                .output(rows, format, &columns);
        }
    }

    Ok(())
}

fn views(records: &[&Record], short_ids: &ShortIdIndex, date_format: &str) -> Vec<RecordView> {
    records
        .iter()
        .map(|r| RecordView::new(r, short_ids.get_short_id(&r.id), date_format))
        .collect()
}

fn record_to_row(record: &Record, short_ids: &ShortIdIndex, date_format: &str) -> TableRow {
    TableRow::new(
        record.id.to_string(),
        format_ref(short_ids.get_short_id(&record.id)),
    )
    .cell("id", CellValue::Id(record.id.to_string()))
    .cell("employee", CellValue::Text(record.employee.clone()))
    .cell("course", CellValue::Text(record.course.clone()))
    .cell(
        "date",
        CellValue::Date(
            record
                .completion_date
                .map(|d| format_date(Some(d), date_format)),
        ),
    )
    .cell("status", CellValue::Status(record.status()))
}
