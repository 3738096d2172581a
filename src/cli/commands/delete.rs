//! `trainreg delete` command - Remove a record

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::utils::{MatchArgs, Workspace};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::store::StoreError;

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Record reference: @N, full id, or unique id prefix
    #[arg(
        conflicts_with = "match_employee",
        required_unless_present = "match_employee"
    )]
    pub reference: Option<String>,

    #[command(flatten)]
    pub select: MatchArgs,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let mut ws = Workspace::open(global)?;

    let id = match (&args.reference, args.select.key()) {
        (Some(reference), _) => ws.resolve_ref(reference)?,
        (None, Some(key)) => ws.store.find_by_key(&key)?,
        (None, None) => return Err(miette::miette!("no record selected")),
    };
    let record = ws
        .store
        .get(id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

    if !args.yes {
        let prompt = format!("Delete {} / {}?", record.employee, record.course);
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let removed = ws.store.delete(id)?;

    match global.format {
        OutputFormat::Id => println!("{}", removed.id),
        _ if global.quiet => {}
        _ => println!(
            "{} Deleted {} ({} / {})",
            style("✓").green(),
            style(&removed.id).cyan(),
            removed.employee,
            removed.course
        ),
    }
    Ok(())
}
