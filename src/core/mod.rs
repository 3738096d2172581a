//! Core module - fundamental types and utilities

pub mod aggregate;
pub mod config;
pub mod dates;
pub mod export;
pub mod filter;
pub mod identity;
pub mod normalize;
pub mod project;
pub mod record;
pub mod shortid;
pub mod store;
pub mod workbook;

pub use aggregate::{group_counts, GroupCount, Summary};
pub use config::Config;
pub use export::ExportFormat;
pub use filter::{Filter, StatusFilter};
pub use identity::{IdParseError, RecordId};
pub use project::{Project, ProjectError};
pub use record::{Field, Record, RecordDraft, RecordKey, RecordPatch, Status};
pub use shortid::ShortIdIndex;
pub use store::{RecordStore, StoreError};
pub use workbook::WorkbookError;
