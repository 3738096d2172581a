//! `trainreg export` command - Write the filtered register to CSV or XLSX

use chrono::Local;
use clap::ValueEnum;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::commands::utils::{FilterArgs, Workspace};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::export::{default_file_name, export_csv_to, export_to_path, ExportFormat};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportKind {
    /// Comma-separated text with a status column
    Csv,
    /// Excel workbook with date cells
    Xlsx,
}

impl From<ExportKind> for ExportFormat {
    fn from(kind: ExportKind) -> Self {
        match kind {
            ExportKind::Csv => ExportFormat::Csv,
            ExportKind::Xlsx => ExportFormat::Xlsx,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Export file type
    #[arg(value_enum)]
    pub kind: ExportKind,

    /// Output file ("-" writes CSV to stdout; default: timestamped name in export_dir)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub filter: FilterArgs,
}

pub fn run(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let filter = args.filter.to_filter();
    let records = filter.apply(ws.store.records());
    let format: ExportFormat = args.kind.into();

    if args.output.as_deref().is_some_and(|p| p.as_os_str() == "-") {
        if format != ExportFormat::Csv {
            return Err(miette::miette!(
                help = "give --output a file name ending in .xlsx",
                "spreadsheet exports cannot be written to stdout"
            ));
        }
        let stdout = std::io::stdout();
        export_csv_to(stdout.lock(), records.iter().copied(), ws.date_format()).into_diagnostic()?;
        return Ok(());
    }

    let path = match args.output {
        Some(path) => path,
        None => ws
            .config
            .export_dir(&ws.project)
            .join(default_file_name(format, Local::now().naive_local())),
    };

    let written = export_to_path(records.iter().copied(), format, &path, ws.date_format())?;

    match global.format {
        OutputFormat::Id => println!("{}", written.display()),
        _ if global.quiet => {}
        _ => println!(
            "{} Exported {} record(s) to {}",
            style("✓").green(),
            style(records.len()).cyan(),
            style(written.display()).cyan()
        ),
    }
    Ok(())
}
