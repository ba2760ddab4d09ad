use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use finsight::cli::{handle_report_command, ReportArgs};
use finsight::config::{paths::FinsightPaths, settings::Settings};
use finsight::reports::ReportSection;

#[derive(Parser)]
#[command(
    name = "finsight",
    version,
    about = "Financial analytics for period snapshots, budgets and goals",
    long_about = "Finsight turns period snapshots, budgets, goals and commitments \
                  into trends, period comparisons, forecasts, goal progress and a \
                  financial health score."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Full dashboard with every section
    Dashboard(ReportArgs),

    /// Income, expense and net trends of the current period
    Trend(ReportArgs),

    /// Current period against the previous one
    #[command(alias = "comparison")]
    Compare(ReportArgs),

    /// Next period, next quarter and year-end projections
    Forecast(ReportArgs),

    /// Goal progress and budget usage
    #[command(alias = "budgets")]
    Goals(ReportArgs),

    /// Financial health score
    Health(ReportArgs),

    /// Spending patterns and efficiency score
    Patterns(ReportArgs),

    /// Write default settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let paths = FinsightPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let (section, args) = match cli.command {
        Some(Commands::Dashboard(args)) => (ReportSection::Dashboard, args),
        Some(Commands::Trend(args)) => (ReportSection::Trend, args),
        Some(Commands::Compare(args)) => (ReportSection::Compare, args),
        Some(Commands::Forecast(args)) => (ReportSection::Forecast, args),
        Some(Commands::Goals(args)) => (ReportSection::Goals, args),
        Some(Commands::Health(args)) => (ReportSection::Health, args),
        Some(Commands::Patterns(args)) => (ReportSection::Patterns, args),
        Some(Commands::Init) => {
            println!("Initializing Finsight at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            println!("Settings written to: {}", paths.settings_file().display());
            println!();
            println!("Run 'finsight dashboard <INPUT>' to analyze a snapshot file.");
            return Ok(());
        }
        Some(Commands::Config) => {
            println!("Finsight Configuration");
            println!("======================");
            println!("Base directory:    {}", paths.base_dir().display());
            println!("Settings file:     {}", paths.settings_file().display());
            println!("Reports directory: {}", paths.reports_dir().display());
            println!("Initialized:       {}", paths.is_initialized());
            println!();
            println!("Settings:");
            println!("{}", serde_json::to_string_pretty(&settings)?);
            return Ok(());
        }
        None => {
            println!("Finsight - financial analytics from the command line");
            println!();
            println!("Run 'finsight --help' for usage information.");
            println!("Run 'finsight dashboard <INPUT>' for the full report.");
            return Ok(());
        }
    };

    tracing::info!(section = section.name(), input = %args.input.display(), "running analysis");
    handle_report_command(section, &args, &settings)?;

    Ok(())
}
