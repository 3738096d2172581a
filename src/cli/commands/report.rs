//! `trainreg report` command - Printable markdown summary

use chrono::{Local, NaiveDateTime};
use miette::Result;
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style};
use tracing::warn;

use crate::cli::commands::utils::{write_output, FilterArgs, Workspace};
use crate::cli::helpers::truncate_str;
use crate::cli::GlobalOpts;
use crate::core::aggregate::{summaries_by, Summary};
use crate::core::dates::format_date;
use crate::core::filter::{Filter, StatusFilter};
use crate::core::record::{Field, Record};

/// Pending rows listed before the report cuts off
const MAX_PENDING_ROWS: usize = 50;

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub filter: FilterArgs,
}

pub fn run(args: ReportArgs, global: &GlobalOpts) -> Result<()> {
    let ws = Workspace::open(global)?;
    let filter = args.filter.to_filter();
    let records = filter.apply(ws.store.records());

    let logo = ws.config.logo_path(&ws.project).filter(|path| {
        let found = path.exists();
        if !found {
            warn!(path = %path.display(), "logo not found; report rendered without it");
        }
        found
    });

    let report = render_report(
        &records,
        &filter,
        ws.date_format(),
        logo.as_deref(),
        Local::now().naive_local(),
    );
    write_output(&report, args.output.as_deref())
}

fn percent(summary: &Summary) -> String {
    summary
        .completion_rate()
        .map(|r| format!("{:.1}%", r))
        .unwrap_or_else(|| "-".to_string())
}

/// Build the markdown report for a filtered view
fn render_report(
    records: &[&Record],
    filter: &Filter,
    date_format: &str,
    logo: Option<&Path>,
    generated_at: NaiveDateTime,
) -> String {
    let mut output = String::new();

    if let Some(logo) = logo {
        output.push_str(&format!("![logo]({})\n\n", logo.display()));
    }
    output.push_str("# Training Completion Report\n\n");
    output.push_str(&format!(
        "Generated {}\n\n",
        generated_at.format(&format!("{} %H:%M", date_format))
    ));

    if !filter.is_unconstrained() {
        let mut criteria = Vec::new();
        if let Some(e) = filter.employee.as_deref().filter(|e| !e.trim().is_empty()) {
            criteria.push(format!("employee contains \"{}\"", e.trim()));
        }
        if let Some(c) = filter.course.as_deref().filter(|c| !c.trim().is_empty()) {
            criteria.push(format!("course contains \"{}\"", c.trim()));
        }
        if filter.status != StatusFilter::All {
            criteria.push(format!("status: {:?}", filter.status).to_lowercase());
        }
        output.push_str(&format!("Filter: {}\n\n", criteria.join(", ")));
    }

    let summary = Summary::of(records.iter().copied());
    output.push_str("## Summary\n\n");
    let mut table = Builder::default();
    table.push_record(["Metric", "Count"]);
    table.push_record(["Total Records", &summary.total.to_string()]);
    table.push_record(["Completed", &summary.completed.to_string()]);
    table.push_record(["Pending", &summary.pending.to_string()]);
    table.push_record(["Completion Rate", &percent(&summary)]);
    output.push_str(&table.build().with(Style::markdown()).to_string());
    output.push('\n');

    let by_course = summaries_by(records.iter().copied(), Field::Course);
    if !by_course.is_empty() {
        output.push_str("\n## By Course\n\n");
        let mut table = Builder::default();
        table.push_record(["Course", "Total", "Completed", "Pending", "Rate"]);
        for (course, s) in &by_course {
            table.push_record([
                truncate_str(course, 40),
                s.total.to_string(),
                s.completed.to_string(),
                s.pending.to_string(),
                percent(s),
            ]);
        }
        output.push_str(&table.build().with(Style::markdown()).to_string());
        output.push('\n');
    }

    let pending: Vec<&&Record> = records.iter().filter(|r| r.completion_date.is_none()).collect();
    if !pending.is_empty() {
        output.push_str("\n## Pending Trainings\n\n");
        let mut table = Builder::default();
        table.push_record(["Employee", "Course"]);
        for r in pending.iter().take(MAX_PENDING_ROWS) {
            table.push_record([truncate_str(&r.employee, 40), truncate_str(&r.course, 40)]);
        }
        output.push_str(&table.build().with(Style::markdown()).to_string());
        output.push('\n');
        if pending.len() > MAX_PENDING_ROWS {
            output.push_str(&format!(
                "\n_{} more pending record(s) not shown._\n",
                pending.len() - MAX_PENDING_ROWS
            ));
        }
    }

    let latest = records.iter().filter_map(|r| r.completion_date).max();
    if let Some(latest) = latest {
        output.push_str(&format!(
            "\nMost recent completion: {}\n",
            format_date(Some(latest), date_format)
        ));
    }

    output
}
