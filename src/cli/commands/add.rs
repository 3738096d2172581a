//! `trainreg add` command - Record a training

use chrono::NaiveDate;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::utils::{parse_date_arg, Workspace};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::dates::{format_date, parse_date};
use crate::core::record::RecordDraft;

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Employee name
    #[arg(long, short = 'e')]
    pub employee: Option<String>,

    /// Course or training name
    #[arg(long, short = 'c')]
    pub course: Option<String>,

    /// Completion date; omit for a pending training
    #[arg(long, short = 'd', value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,

    /// Prompt for any value not given on the command line
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

pub fn run(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let mut ws = Workspace::open(global)?;

    let draft = if args.interactive {
        prompt_draft(&args, ws.date_format())?
    } else {
        RecordDraft::new(
            args.employee.unwrap_or_default(),
            args.course.unwrap_or_default(),
            args.date,
        )
    };

    let record = ws.store.add(draft)?.clone();
    let short = ws.remember(&record.id);

    match global.format {
        OutputFormat::Id => println!("{}", record.id),
        _ if global.quiet => {}
        _ => {
            let when = match record.completion_date {
                Some(d) => format!("completed {}", format_date(Some(d), ws.date_format())),
                None => "pending".to_string(),
            };
            println!(
                "{} Added {} {} ({} / {}, {})",
                style("✓").green(),
                style(format!("@{}", short)).cyan(),
                style(&record.id).dim(),
                record.employee,
                record.course,
                when
            );
        }
    }
    Ok(())
}

fn prompt_draft(args: &AddArgs, date_format: &str) -> Result<RecordDraft> {
    let theme = ColorfulTheme::default();

    let employee = match &args.employee {
        Some(e) => e.clone(),
        None => Input::<String>::with_theme(&theme)
            .with_prompt("Employee")
            .interact_text()
            .into_diagnostic()?,
    };

    let course = match &args.course {
        Some(c) => c.clone(),
        None => Input::<String>::with_theme(&theme)
            .with_prompt("Course")
            .interact_text()
            .into_diagnostic()?,
    };

    let completion_date = match args.date {
        Some(d) => Some(d),
        None => {
            let raw: String = Input::with_theme(&theme)
                .with_prompt(format!(
                    "Completion date ({}, empty if pending)",
                    format_date(NaiveDate::from_ymd_opt(2024, 12, 31), date_format)
                ))
                .allow_empty(true)
                .validate_with(|input: &String| -> std::result::Result<(), String> {
                    if input.trim().is_empty() || parse_date(input).is_some() {
                        Ok(())
                    } else {
                        Err(format!("unrecognized date '{}'", input.trim()))
                    }
                })
                .interact_text()
                .into_diagnostic()?;
            parse_date(&raw)
        }
    };

    Ok(RecordDraft::new(employee, course, completion_date))
}
