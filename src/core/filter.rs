//! Record filtering

use serde::{Deserialize, Serialize};

use crate::core::record::{Record, Status};

/// Status criterion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

impl StatusFilter {
    pub fn matches(&self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => status == Status::Completed,
            StatusFilter::Pending => status == Status::Pending,
        }
    }
}

/// Filter criteria; every criterion left empty imposes no constraint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub employee: Option<String>,
    pub course: Option<String>,
    pub status: StatusFilter,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn employee(mut self, needle: impl Into<String>) -> Self {
        self.employee = Some(needle.into());
        self
    }

    pub fn course(mut self, needle: impl Into<String>) -> Self {
        self.course = Some(needle.into());
        self
    }

    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// True if no criterion is set
    pub fn is_unconstrained(&self) -> bool {
        needle(&self.employee).is_none()
            && needle(&self.course).is_none()
            && self.status == StatusFilter::All
    }

    /// Check one record against all criteria
    pub fn matches(&self, record: &Record) -> bool {
        contains_ci(&record.employee, &self.employee)
            && contains_ci(&record.course, &self.course)
            && self.status.matches(record.status())
    }

    /// Matching records, in table order
    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

fn needle(criterion: &Option<String>) -> Option<&str> {
    criterion.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn contains_ci(haystack: &str, criterion: &Option<String>) -> bool {
    match needle(criterion) {
        None => true,
        Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
    }
}
