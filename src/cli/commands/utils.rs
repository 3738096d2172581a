//! Shared plumbing for register commands

use chrono::NaiveDate;
use clap::ValueEnum;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::helpers::format_ref;
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::dates::{format_date, parse_date};
use crate::core::filter::{Filter, StatusFilter};
use crate::core::identity::RecordId;
use crate::core::project::Project;
use crate::core::record::{Record, RecordKey, Status};
use crate::core::shortid::ShortIdIndex;
use crate::core::store::{RecordStore, StoreError};

/// Project, configuration and loaded register for one command
pub struct Workspace {
    pub project: Project,
    pub config: Config,
    pub store: RecordStore,
}

impl Workspace {
    /// Resolve the project and config, then load the register
    pub fn open(global: &GlobalOpts) -> Result<Self> {
        let project = open_project(global)?;
        let config = Config::load(&project);
        let path = data_path(global, &config, &project);
        debug!(root = %project.root().display(), file = %path.display(), "opening register");

        let store = RecordStore::open_with_format(path, config.date_format())?;
        Ok(Self {
            project,
            config,
            store,
        })
    }

    /// Display pattern for dates
    pub fn date_format(&self) -> &str {
        self.config.date_format()
    }

    /// Resolve `@N`, a full id or a unique id prefix to a record id
    pub fn resolve_ref(&self, reference: &str) -> Result<RecordId> {
        let short_ids = ShortIdIndex::load(&self.project);
        let resolved = short_ids
            .resolve(reference)
            .ok_or_else(|| StoreError::NotFound(reference.to_string()))?;
        Ok(self.store.find_by_id_prefix(&resolved)?)
    }

    /// Short reference currently assigned to a record, if any
    pub fn short_ref(&self, id: &RecordId) -> Option<u32> {
        ShortIdIndex::load(&self.project).get_short_id(id)
    }

    /// Assign a short reference to a record and persist the index
    pub fn remember(&self, id: &RecordId) -> u32 {
        let mut short_ids = ShortIdIndex::load(&self.project);
        let short = short_ids.add(id);
        save_short_ids(&short_ids, &self.project);
        short
    }
}

/// Project from `--project`, discovery, or the current directory
pub fn open_project(global: &GlobalOpts) -> Result<Project> {
    match &global.project {
        Some(root) => Ok(Project::at(root)),
        None => Project::discover_or_cwd().map_err(|e| miette::miette!("{}", e)),
    }
}

/// Register file: `--file` beats the configured location
pub fn data_path(global: &GlobalOpts, config: &Config, project: &Project) -> PathBuf {
    match &global.file {
        Some(file) => file.clone(),
        None => config.data_path(project),
    }
}

/// Persist the short ID index, logging instead of failing
pub fn save_short_ids(short_ids: &ShortIdIndex, project: &Project) {
    if let Err(e) = short_ids.save(project) {
        tracing::warn!(error = %e, "could not save short references");
    }
}

/// clap value parser for user-entered dates
pub fn parse_date_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| {
        format!(
            "unrecognized date '{}' (use DD/MM/YYYY or YYYY-MM-DD)",
            s.trim()
        )
    })
}

/// Write report-style output to a file or stdout
pub fn write_output(content: &str, output_path: Option<&Path>) -> Result<()> {
    match output_path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).into_diagnostic()?;
            }
            let file = File::create(path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            writer.flush().into_diagnostic()?;
            println!("Report written to: {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

// =========================================================================
// Filters
// =========================================================================

/// Status filter values accepted on the command line
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum StatusFilterArg {
    #[default]
    All,
    Completed,
    Pending,
}

impl From<StatusFilterArg> for StatusFilter {
    fn from(arg: StatusFilterArg) -> Self {
        match arg {
            StatusFilterArg::All => StatusFilter::All,
            StatusFilterArg::Completed => StatusFilter::Completed,
            StatusFilterArg::Pending => StatusFilter::Pending,
        }
    }
}

/// Filter options shared by list, summary, chart, export and report
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Employee name contains (case-insensitive)
    #[arg(long, short = 'e')]
    pub employee: Option<String>,

    /// Course name contains (case-insensitive)
    #[arg(long, short = 'c')]
    pub course: Option<String>,

    /// Completion status
    #[arg(long, short = 's', default_value = "all")]
    pub status: StatusFilterArg,
}

impl FilterArgs {
    pub fn to_filter(&self) -> Filter {
        Filter {
            employee: self.employee.clone(),
            course: self.course.clone(),
            status: self.status.into(),
        }
    }
}

/// Key-based selection (`--match-*`) shared by edit and delete
#[derive(clap::Args, Debug, Clone, Default)]
pub struct MatchArgs {
    /// Select the record whose employee is exactly this
    #[arg(long, requires = "match_course")]
    pub match_employee: Option<String>,

    /// Select the record whose course is exactly this
    #[arg(long, requires = "match_employee")]
    pub match_course: Option<String>,

    /// Completion date of the record to select (omit to match records without a date)
    #[arg(long, value_parser = parse_date_arg, requires = "match_employee")]
    pub match_date: Option<NaiveDate>,
}

impl MatchArgs {
    /// The lookup key, when the key form was used
    pub fn key(&self) -> Option<RecordKey> {
        match (&self.match_employee, &self.match_course) {
            (Some(employee), Some(course)) => Some(RecordKey::new(
                employee.trim(),
                course.trim(),
                self.match_date,
            )),
            _ => None,
        }
    }
}

// =========================================================================
// Serializable record view
// =========================================================================

/// Record as emitted in JSON/YAML output
#[derive(Debug, Serialize)]
pub struct RecordView {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_id: Option<String>,
    pub employee: String,
    pub course: String,
    pub completion_date: Option<String>,
    pub status: Status,
}

impl RecordView {
    pub fn new(record: &Record, short: Option<u32>, date_format: &str) -> Self {
        Self {
            id: record.id.to_string(),
            short_id: short.map(|n| format_ref(Some(n))),
            employee: record.employee.clone(),
            course: record.course.clone(),
            completion_date: record
                .completion_date
                .map(|d| format_date(Some(d), date_format)),
            status: record.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_arg() {
        assert_eq!(
            parse_date_arg("05/03/2024"),
            Ok(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())
        );
        assert!(parse_date_arg("next tuesday").is_err());
    }

    #[test]
    fn test_filter_args_to_filter() {
        let args = FilterArgs {
            employee: Some("ana".to_string()),
            course: None,
            status: StatusFilterArg::Pending,
        };
        let filter = args.to_filter();
        assert_eq!(filter.employee.as_deref(), Some("ana"));
        assert_eq!(filter.status, StatusFilter::Pending);
    }

    #[test]
    fn test_match_args_key() {
        let args = MatchArgs {
            match_employee: Some(" Ana ".to_string()),
            match_course: Some("NR-10".to_string()),
            match_date: None,
        };
        let key = args.key().unwrap();
        assert_eq!(key.employee, "Ana");
        assert_eq!(key.completion_date, None);
        assert!(MatchArgs::default().key().is_none());
    }

    #[test]
    fn test_record_view_formats_date() {
        let record = Record::new("Ana", "NR-10", NaiveDate::from_ymd_opt(2024, 3, 5));
        let view = RecordView::new(&record, Some(2), "%d/%m/%Y");
        assert_eq!(view.completion_date.as_deref(), Some("05/03/2024"));
        assert_eq!(view.short_id.as_deref(), Some("@2"));
        assert_eq!(view.status, Status::Completed);
    }
}
