//! `trainreg edit` command - Change a record

use chrono::NaiveDate;
use console::style;
use miette::Result;

use crate::cli::commands::utils::{parse_date_arg, MatchArgs, Workspace};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::dates::format_date;
use crate::core::record::RecordPatch;

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Record reference: @N, full id, or unique id prefix
    #[arg(
        conflicts_with = "match_employee",
        required_unless_present = "match_employee"
    )]
    pub reference: Option<String>,

    #[command(flatten)]
    pub select: MatchArgs,

    /// New employee name
    #[arg(long)]
    pub employee: Option<String>,

    /// New course name
    #[arg(long)]
    pub course: Option<String>,

    /// New completion date
    #[arg(long, value_parser = parse_date_arg, conflicts_with = "clear_date")]
    pub date: Option<NaiveDate>,

    /// Remove the completion date (record becomes pending)
    #[arg(long)]
    pub clear_date: bool,
}

impl EditArgs {
    fn patch(&self) -> RecordPatch {
        RecordPatch {
            employee: self.employee.clone(),
            course: self.course.clone(),
            completion_date: if self.clear_date {
                Some(None)
            } else {
                self.date.map(Some)
            },
        }
    }
}

pub fn run(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let patch = args.patch();
    if patch.is_empty() {
        return Err(miette::miette!(
            help = "pass --employee, --course, --date or --clear-date",
            "nothing to change"
        ));
    }

    let mut ws = Workspace::open(global)?;
    let updated = match (&args.reference, args.select.key()) {
        (Some(reference), _) => {
            let id = ws.resolve_ref(reference)?;
            ws.store.update(id, &patch)?.clone()
        }
        (None, Some(key)) => ws.store.update_matching(&key, &patch)?.clone(),
        (None, None) => return Err(miette::miette!("no record selected")),
    };

    match global.format {
        OutputFormat::Id => println!("{}", updated.id),
        _ if global.quiet => {}
        _ => {
            let date = updated
                .completion_date
                .map(|d| format_date(Some(d), ws.date_format()))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{} Updated {} ({} / {} / {}, {})",
                style("✓").green(),
                style(&updated.id).cyan(),
                updated.employee,
                updated.course,
                date,
                updated.status()
            );
        }
    }
    Ok(())
}
