//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::config::DEFAULT_DATA_FILE;

/// Name of the project marker directory
pub const PROJECT_DIR: &str = ".trainreg";

/// Represents a register project
#[derive(Debug, Clone)]
pub struct Project {
    /// Root directory of the project (parent of .trainreg/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Discovered project, or the current directory when there is none
    pub fn discover_or_cwd() -> Result<Self, ProjectError> {
        match Self::discover() {
            Ok(project) => Ok(project),
            Err(ProjectError::NotFound { searched_from }) => Ok(Self::at(&searched_from)),
            Err(e) => Err(e),
        }
    }

    /// Use `path` as the root, whether or not it has been initialized
    pub fn at(path: &Path) -> Self {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self { root }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let project = Self::at(path);
        if project.project_dir().exists() {
            return Err(ProjectError::AlreadyExists(project.root.clone()));
        }
        project.write_skeleton()?;
        Ok(project)
    }

    /// Force initialization even if .trainreg/ exists
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let project = Self::at(path);
        project.write_skeleton()?;
        Ok(project)
    }

    fn write_skeleton(&self) -> Result<(), ProjectError> {
        std::fs::create_dir_all(self.project_dir())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        std::fs::write(self.config_path(), Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))
    }

    fn default_config() -> String {
        format!(
            r#"# Training register configuration

# Register file (.xlsx or .csv; .xls/.ods are read-only)
data_file: {DEFAULT_DATA_FILE}

# Date display and export pattern (chrono syntax)
date_format: "%d/%m/%Y"

# Where exports go when --output is not given
# export_dir: exports

# Logo shown at the top of printed reports
# logo: logo.png
"#
        )
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .trainreg configuration directory
    pub fn project_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Project configuration file
    pub fn config_path(&self) -> PathBuf {
        self.project_dir().join("config.yaml")
    }

    /// Resolve a possibly relative path against the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a register project (searched from {searched_from:?}). Run 'trainreg init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("register project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}
