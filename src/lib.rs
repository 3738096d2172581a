//! trainreg: training completion register
//!
//! Loads a spreadsheet or CSV register of who completed which training,
//! normalizes its headers, and offers filtering, strict add/edit/delete,
//! summary counts and exports.

pub mod cli;
pub mod core;
