//! CLI command implementations

pub mod utils;

pub mod add;
pub mod chart;
pub mod completions;
pub mod delete;
pub mod edit;
pub mod export;
pub mod init;
pub mod list;
pub mod report;
pub mod show;
pub mod summary;
