//! CLI command handlers
//!
//! Bridges clap argument parsing with the report layer.

pub mod report;

pub use report::{handle_report_command, render_section, ReportArgs};
