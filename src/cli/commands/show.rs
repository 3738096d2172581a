//! `trainreg show` command - Display one record

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::utils::{RecordView, Workspace};
use crate::cli::helpers::escape_csv;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::record::Status;
use crate::core::store::StoreError;

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Record reference: @N, full id, or unique id prefix
    pub reference: String,
}

pub fn run(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let id = ws.resolve_ref(&args.reference)?;
    let record = ws
        .store
        .get(id)
        .ok_or_else(|| StoreError::NotFound(args.reference.clone()))?;
    let view = RecordView::new(record, ws.short_ref(&id), ws.date_format());

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&view).into_diagnostic()?);
        }
        OutputFormat::Yaml | OutputFormat::Auto => {
            print!("{}", serde_yml::to_string(&view).into_diagnostic()?);
        }
        OutputFormat::Id => println!("{}", view.id),
        OutputFormat::Csv => {
            println!("id,employee,course,completion_date,status");
            println!(
                "{},{},{},{},{}",
                view.id,
                escape_csv(&view.employee),
                escape_csv(&view.course),
                escape_csv(view.completion_date.as_deref().unwrap_or("")),
                view.status
            );
        }
        OutputFormat::Tsv | OutputFormat::Md => {
            let status = match view.status {
                Status::Completed => style(view.status.to_string()).green(),
                Status::Pending => style(view.status.to_string()).yellow(),
            };
            println!("{}", style("─".repeat(60)).dim());
            println!(
                "{}: {} {}",
                style("ID").bold(),
                style(&view.id).cyan(),
                style(view.short_id.as_deref().unwrap_or("")).dim()
            );
            println!("{}: {}", style("Employee").bold(), view.employee);
            println!("{}: {}", style("Course").bold(), view.course);
            println!(
                "{}: {}",
                style("Completed").bold(),
                view.completion_date.as_deref().unwrap_or("-")
            );
            println!("{}: {}", style("Status").bold(), status);
            println!("{}", style("─".repeat(60)).dim());
        }
    }

    Ok(())
}
