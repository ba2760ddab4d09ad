//! Display formatting for terminal output
//!
//! Formatting helpers and table renderers. The analytics core returns raw
//! numbers; everything user-facing is shaped here.

pub mod report;
pub mod tables;

pub use report::{format_amount, format_change, format_percentage, section_header};
