use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use ifrs16_core::lease_accounting::{
    aggregate_portfolio, calculate_lease, calculate_lease_with_metadata,
    normalize_lease_record, CalculationOptions, CalculationResult, LeaseTerms, RawLeaseRecord,
};
use ifrs16_core::time_value::RateConvention;

use crate::input;

/// Calculation options shared by every lease command
#[derive(Args)]
pub struct OptionArgs {
    /// JSON or YAML file with calculation options
    #[arg(long)]
    pub config: Option<String>,

    /// Disclosure date (YYYY-MM-DD); defaults to commencement
    #[arg(long)]
    pub reporting_date: Option<NaiveDate>,

    /// How the annual IBR converts to a per-period rate
    #[arg(long, value_enum)]
    pub rate_convention: Option<RateConventionArg>,

    /// Largest final-period rounding correction accepted
    #[arg(long)]
    pub materiality: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RateConventionArg {
    Nominal,
    Effective,
}

impl From<RateConventionArg> for RateConvention {
    fn from(arg: RateConventionArg) -> Self {
        match arg {
            RateConventionArg::Nominal => RateConvention::Nominal,
            RateConventionArg::Effective => RateConvention::Effective,
        }
    }
}

/// Arguments for single-lease commands
#[derive(Args)]
pub struct LeaseArgs {
    /// Path to JSON lease record (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub options: OptionArgs,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ScheduleKind {
    Amortization,
    Depreciation,
}

/// Arguments for the schedule command
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub lease: LeaseArgs,

    /// Which schedule to print
    #[arg(long, value_enum, default_value = "amortization")]
    pub kind: ScheduleKind,
}

/// Arguments for portfolio disclosure
#[derive(Args)]
pub struct PortfolioArgs {
    /// Path to a JSON array of lease records (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub options: OptionArgs,
}

// ---------------------------------------------------------------------------
// Input resolution
// ---------------------------------------------------------------------------

fn resolve_options(args: &OptionArgs) -> Result<CalculationOptions, Box<dyn std::error::Error>> {
    let mut options = match args.config {
        Some(ref path) => input::config::read_options(path)?,
        None => CalculationOptions::default(),
    };
    if let Some(date) = args.reporting_date {
        options.reporting_date = Some(date);
    }
    if let Some(convention) = args.rate_convention {
        options.rate_convention = convention.into();
    }
    if let Some(threshold) = args.materiality {
        options.materiality_threshold = threshold;
    }
    Ok(options)
}

fn read_record(path: &Option<String>) -> Result<RawLeaseRecord, Box<dyn std::error::Error>> {
    if let Some(ref path) = path {
        input::file::read_json(path)
    } else if let Some(record) = input::stdin::read_stdin()? {
        Ok(record)
    } else {
        Err("--input <lease.json> or stdin required".into())
    }
}

fn read_terms(args: &LeaseArgs) -> Result<LeaseTerms, Box<dyn std::error::Error>> {
    let raw = read_record(&args.input)?;
    Ok(normalize_lease_record(&raw)?)
}

fn calculate(args: &LeaseArgs) -> Result<CalculationResult, Box<dyn std::error::Error>> {
    let terms = read_terms(args)?;
    let options = resolve_options(&args.options)?;
    Ok(calculate_lease(&terms, &options)?)
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

pub fn run_calculate(args: LeaseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = read_terms(&args)?;
    let options = resolve_options(&args.options)?;
    let result = calculate_lease_with_metadata(&terms, &options)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_validate(args: LeaseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = read_terms(&args)?;
    log::info!("{}: record is valid", terms.contract_id);
    Ok(serde_json::to_value(terms)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let result = calculate(&args.lease)?;
    let rows = match args.kind {
        ScheduleKind::Amortization => serde_json::to_value(result.cashflow_schedule)?,
        ScheduleKind::Depreciation => serde_json::to_value(result.depreciation_schedule)?,
    };
    Ok(rows)
}

pub fn run_journals(args: LeaseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let result = calculate(&args)?;
    Ok(serde_json::to_value(result.journal_entries)?)
}

pub fn run_disclosure(args: LeaseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let result = calculate(&args)?;
    Ok(serde_json::to_value(result.disclosure)?)
}

pub fn run_portfolio(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let records: Vec<RawLeaseRecord> = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(records) = input::stdin::read_stdin()? {
        records
    } else {
        return Err("--input <leases.json> or stdin required for portfolio disclosure".into());
    };
    let terms = records
        .iter()
        .map(normalize_lease_record)
        .collect::<Result<Vec<_>, _>>()?;

    let mut options = resolve_options(&args.options)?;
    if options.reporting_date.is_none() {
        // Latest commencement, so every lease in the portfolio is active
        options.reporting_date = terms.iter().map(|t| t.commencement_date).max();
        if let Some(date) = options.reporting_date {
            log::info!("portfolio reporting date defaulted to {date}");
        }
    }

    let mut results = Vec::with_capacity(terms.len());
    for t in &terms {
        results.push(calculate_lease(t, &options)?);
    }
    let portfolio = aggregate_portfolio(&results)?;
    Ok(serde_json::to_value(portfolio)?)
}
