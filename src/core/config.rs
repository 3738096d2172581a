//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::dates::{is_valid_pattern, DEFAULT_DISPLAY_FORMAT};
use crate::core::project::Project;

/// Register file used when nothing else is configured
pub const DEFAULT_DATA_FILE: &str = "trainings.xlsx";

/// Environment overrides
pub const ENV_DATA_FILE: &str = "TRAINREG_FILE";
pub const ENV_DATE_FORMAT: &str = "TRAINREG_DATE_FORMAT";

/// Register configuration with layered hierarchy
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Register file, relative paths resolve against the project root
    pub data_file: Option<PathBuf>,

    /// chrono pattern for displayed and exported dates
    pub date_format: Option<String>,

    /// Directory for exports written without `--output`
    pub export_dir: Option<PathBuf>,

    /// Image embedded at the top of printed reports
    pub logo: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(project: &Project) -> Self {
        let mut config = Config::default();

        // Global user config (~/.config/trainreg/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // Project config (.trainreg/config.yaml)
        if let Some(project_config) = Self::read_file(&project.config_path()) {
            config.merge(project_config);
        }

        if let Ok(file) = std::env::var(ENV_DATA_FILE) {
            if !file.trim().is_empty() {
                config.data_file = Some(PathBuf::from(file));
            }
        }
        if let Ok(format) = std::env::var(ENV_DATE_FORMAT) {
            if !format.trim().is_empty() {
                config.date_format = Some(format);
            }
        }

        if let Some(pattern) = config.date_format.as_deref() {
            if !is_valid_pattern(pattern) {
                warn!(pattern, "invalid date_format; using {}", DEFAULT_DISPLAY_FORMAT);
            }
        }

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "trainreg")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => {
                debug!(path = %path.display(), "loaded config");
                Some(config)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                None
            }
        }
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.data_file.is_some() {
            self.data_file = other.data_file;
        }
        if other.date_format.is_some() {
            self.date_format = other.date_format;
        }
        if other.export_dir.is_some() {
            self.export_dir = other.export_dir;
        }
        if other.logo.is_some() {
            self.logo = other.logo;
        }
    }

    /// Register file location for a project
    pub fn data_path(&self, project: &Project) -> PathBuf {
        let file = self
            .data_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));
        project.resolve(&file)
    }

    /// Display pattern for dates, falling back to the default when unusable
    pub fn date_format(&self) -> &str {
        self.date_format
            .as_deref()
            .filter(|f| is_valid_pattern(f))
            .unwrap_or(DEFAULT_DISPLAY_FORMAT)
    }

    /// Directory for generated files
    pub fn export_dir(&self, project: &Project) -> PathBuf {
        match &self.export_dir {
            Some(dir) => project.resolve(dir),
            None => project.root().to_path_buf(),
        }
    }

    /// Configured logo, resolved against the project root
    pub fn logo_path(&self, project: &Project) -> Option<PathBuf> {
        self.logo.as_ref().map(|logo| project.resolve(logo))
    }
}
