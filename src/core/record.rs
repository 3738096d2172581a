//! Training-completion records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::identity::RecordId;

/// Completion status, derived from the presence of a completion date
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Completed,
    Pending,
}

impl Status {
    /// Status for an optional completion date
    pub fn from_date(date: Option<NaiveDate>) -> Self {
        if date.is_some() {
            Status::Completed
        } else {
            Status::Pending
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Completed => write!(f, "completed"),
            Status::Pending => write!(f, "pending"),
        }
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "completed" | "done" => Ok(Status::Completed),
            "pending" => Ok(Status::Pending),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// The three canonical fields of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Employee,
    Course,
    CompletionDate,
}

impl Field {
    /// Canonical column name
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Employee => "employee",
            Field::Course => "course",
            Field::CompletionDate => "completion_date",
        }
    }

    /// All canonical fields in column order
    pub fn all() -> &'static [Field] {
        &[Field::Employee, Field::Course, Field::CompletionDate]
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One training-completion entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Stable identifier
    pub id: RecordId,

    /// Employee name
    pub employee: String,

    /// Course or training name
    pub course: String,

    /// Completion date, `None` when missing or unreadable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<NaiveDate>,
}

impl Record {
    /// Build a record from already-trimmed values with a fresh id
    pub fn new(
        employee: impl Into<String>,
        course: impl Into<String>,
        completion_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: RecordId::new(),
            employee: employee.into(),
            course: course.into(),
            completion_date,
        }
    }

    /// Derived status; never stored
    pub fn status(&self) -> Status {
        Status::from_date(self.completion_date)
    }

    /// The content key of this record (everything but the id)
    pub fn key(&self) -> RecordKey {
        RecordKey {
            employee: self.employee.clone(),
            course: self.course.clone(),
            completion_date: self.completion_date,
        }
    }

    /// Null-aware content match against a lookup key
    ///
    /// A key without a date matches only records without a date.
    pub fn matches_key(&self, key: &RecordKey) -> bool {
        self.employee == key.employee
            && self.course == key.course
            && self.completion_date == key.completion_date
    }
}

/// Content of a previously displayed record, used to look it up again
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordKey {
    pub employee: String,
    pub course: String,
    pub completion_date: Option<NaiveDate>,
}

impl RecordKey {
    pub fn new(
        employee: impl Into<String>,
        course: impl Into<String>,
        completion_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            employee: employee.into(),
            course: course.into(),
            completion_date,
        }
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.completion_date {
            Some(d) => write!(f, "{} / {} / {}", self.employee, self.course, d),
            None => write!(f, "{} / {} / (no date)", self.employee, self.course),
        }
    }
}

/// Caller-supplied values for a create or a full update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    pub employee: String,
    pub course: String,
    pub completion_date: Option<NaiveDate>,
}

impl RecordDraft {
    pub fn new(
        employee: impl Into<String>,
        course: impl Into<String>,
        completion_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            employee: employee.into(),
            course: course.into(),
            completion_date,
        }
    }
}

/// Partial update; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub employee: Option<String>,
    pub course: Option<String>,
    /// `Some(None)` clears the date
    pub completion_date: Option<Option<NaiveDate>>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        self.employee.is_none() && self.course.is_none() && self.completion_date.is_none()
    }

    /// Merge the patch over a record's current values
    pub fn apply_to(&self, record: &Record) -> RecordDraft {
        RecordDraft {
            employee: self
                .employee
                .clone()
                .unwrap_or_else(|| record.employee.clone()),
            course: self.course.clone().unwrap_or_else(|| record.course.clone()),
            completion_date: self.completion_date.unwrap_or(record.completion_date),
        }
    }
}

impl From<RecordDraft> for RecordPatch {
    fn from(draft: RecordDraft) -> Self {
        Self {
            employee: Some(draft.employee),
            course: Some(draft.course),
            completion_date: Some(draft.completion_date),
        }
    }
}
