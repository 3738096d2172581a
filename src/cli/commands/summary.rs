//! `trainreg summary` command - Total / completed / pending counts

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::utils::{FilterArgs, Workspace};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::aggregate::Summary;

#[derive(clap::Args, Debug)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
}

pub fn run(args: SummaryArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let filter = args.filter.to_filter();
    let summary = Summary::of(filter.apply(ws.store.records()));

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary).into_diagnostic()?);
        }
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&summary).into_diagnostic()?),
        OutputFormat::Csv => {
            println!("total,completed,pending");
            println!("{},{},{}", summary.total, summary.completed, summary.pending);
        }
        OutputFormat::Md => {
            println!("| Metric | Count |");
            println!("|---|---|");
            println!("| Total | {} |", summary.total);
            println!("| Completed | {} |", summary.completed);
            println!("| Pending | {} |", summary.pending);
        }
        OutputFormat::Id => println!("{}", summary.total),
        OutputFormat::Auto | OutputFormat::Tsv => {
            println!("{:<12} {}", style("Total").bold(), summary.total);
            println!(
                "{:<12} {}",
                style("Completed").bold(),
                style(summary.completed).green()
            );
            println!(
                "{:<12} {}",
                style("Pending").bold(),
                style(summary.pending).yellow()
            );
            if let Some(rate) = summary.completion_rate() {
                if !global.quiet {
                    println!();
                    println!("{:.1}% completed", rate);
                }
            }
        }
    }

    Ok(())
}
