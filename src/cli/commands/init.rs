//! `trainreg init` command - Initialize a register project

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::utils::data_path;
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::project::{Project, ProjectError};
use crate::core::workbook;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Rewrite the configuration even if .trainreg/ already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        if !global.quiet {
            println!(
                "{} Created directory {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
    }

    let project = if args.force {
        Project::init_force(&path)
    } else {
        Project::init(&path)
    };

    let project = match project {
        Ok(project) => project,
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} Register project already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!(
                "Use {} to reinitialize",
                style("trainreg init --force").yellow()
            );
            return Ok(());
        }
        Err(e) => return Err(miette::miette!("{}", e)),
    };

    let config = Config::load(&project);
    let data_file = data_path(global, &config, &project);
    let created = !data_file.exists();
    if created {
        workbook::create_empty(&data_file)?;
    }

    if global.quiet {
        return Ok(());
    }

    println!(
        "{} Initialized register project at {}",
        style("✓").green(),
        style(project.root().display()).cyan()
    );
    println!();
    println!("  {}", style(project.config_path().display()).dim());
    if created {
        println!("  {} (empty register)", style(data_file.display()).dim());
    } else {
        println!("  {} (existing register kept)", style(data_file.display()).dim());
    }
    println!();
    println!("Next steps:");
    println!(
        "  {} Record a completed training",
        style("trainreg add -e \"Name\" -c \"Course\" -d 05/03/2024").yellow()
    );
    println!("  {} List all records", style("trainreg list").yellow());
    println!("  {} Completion summary", style("trainreg summary").yellow());
    Ok(())
}
