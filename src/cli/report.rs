//! CLI handlers for the analysis commands
//!
//! Every analysis command loads an input document, builds the dashboard
//! report and renders one section of it.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

use crate::config::{OutputFormat, Settings};
use crate::error::{FinsightError, FinsightResult};
use crate::reports::{DashboardReport, ReportSection};
use crate::storage::{load_input, write_atomic};

/// Arguments shared by every analysis command
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Analysis input (JSON, or YAML for .yaml/.yml)
    pub input: PathBuf,

    /// Evaluate as of this date (YYYY-MM-DD, midnight UTC)
    #[arg(long, value_parser = parse_date)]
    pub now: Option<NaiveDate>,

    /// Output format (defaults to the configured one)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ReportArgs {
    /// The instant the analysis is evaluated at
    pub fn evaluation_time(&self) -> DateTime<Utc> {
        match self.now {
            Some(date) => date.and_time(NaiveTime::MIN).and_utc(),
            None => Utc::now(),
        }
    }
}

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date: {}. Use YYYY-MM-DD", value))
}

/// Render a section in the requested format
pub fn render_section(
    report: &DashboardReport,
    section: ReportSection,
    format: OutputFormat,
) -> FinsightResult<Vec<u8>> {
    let rendered = match format {
        OutputFormat::Terminal => report.format_section(section).into_bytes(),
        OutputFormat::Json => {
            let mut json = report.to_json(section)?;
            json.push('\n');
            json.into_bytes()
        }
        OutputFormat::Csv => {
            let mut buffer = Vec::new();
            report.export_section_csv(section, &mut buffer)?;
            buffer
        }
    };
    Ok(rendered)
}

/// Handle an analysis command
pub fn handle_report_command(
    section: ReportSection,
    args: &ReportArgs,
    settings: &Settings,
) -> FinsightResult<()> {
    let input = load_input(&args.input)?;
    let report = DashboardReport::generate(&input, args.evaluation_time(), settings);

    let format = args.format.unwrap_or(settings.default_output);
    let rendered = render_section(&report, section, format)?;

    match &args.output {
        Some(path) => {
            write_atomic(path, &rendered)?;
            println!("{} report written to: {}", section.name(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&rendered)
                .and_then(|_| stdout.flush())
                .map_err(|e| FinsightError::Io(format!("Failed to write output: {}", e)))?;
        }
    }

    Ok(())
}
