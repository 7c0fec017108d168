mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::lease::{LeaseArgs, PortfolioArgs, ScheduleArgs};
use ifrs16_core::Ifrs16Error;

/// IFRS 16 lease calculations
#[derive(Parser)]
#[command(
    name = "ifrs16",
    version,
    about = "IFRS 16 lease calculations",
    long_about = "Computes the initial lease liability and right-of-use asset, the \
                  liability amortization and ROU depreciation schedules, journal \
                  entries and maturity disclosures for a lease record, with \
                  decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full calculation for one lease record
    Calculate(LeaseArgs),
    /// Normalize a lease record and report every invalid field
    Validate(LeaseArgs),
    /// Print the amortization or depreciation schedule
    Schedule(ScheduleArgs),
    /// Print the journal entries
    Journals(LeaseArgs),
    /// Print the current / non-current disclosure and maturity analysis
    Disclosure(LeaseArgs),
    /// Aggregate disclosures over a JSON array of lease records
    Portfolio(PortfolioArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::lease::run_calculate(args),
        Commands::Validate(args) => commands::lease::run_validate(args),
        Commands::Schedule(args) => commands::lease::run_schedule(args),
        Commands::Journals(args) => commands::lease::run_journals(args),
        Commands::Disclosure(args) => commands::lease::run_disclosure(args),
        Commands::Portfolio(args) => commands::lease::run_portfolio(args),
        Commands::Version => {
            println!("ifrs16 {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            match e.downcast_ref::<Ifrs16Error>() {
                Some(Ifrs16Error::Validation(v)) => {
                    eprintln!("{}: {} invalid field(s)", "error".red().bold(), v.len());
                    for issue in &v.issues {
                        eprintln!(
                            "  {} {} ({:?}): {}",
                            "-".red(),
                            issue.field.bold(),
                            issue.kind,
                            issue.detail
                        );
                    }
                }
                _ => eprintln!("{}: {}", "error".red().bold(), e),
            }
            process::exit(1);
        }
    }
}
