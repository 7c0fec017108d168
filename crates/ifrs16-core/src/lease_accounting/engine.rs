//! The lease calculation pipeline.
//!
//! normalize -> payment schedule -> initial measurement -> amortization ->
//! depreciation -> journals -> disclosure. Each stage is a pure function of
//! the previous stages' outputs; a run shares no state with any other run.

use std::time::Instant;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::amortization::{generate_amortization, total_interest, CashflowRow};
use super::depreciation::{
    depreciation_periods, generate_depreciation, total_depreciation, DepreciationRow,
};
use super::disclosure::{disclose, LeaseDisclosure};
use super::journal::{generate_journal_entries, JournalEntry};
use super::measurement::{measure_initial, InitialMeasurement};
use super::normalize::{normalize_lease_record, RawLeaseRecord};
use super::payments::build_payment_schedule;
use super::summary::{annual_summary, AnnualSummary};
use super::terms::LeaseTerms;
use crate::time_value::RateConvention;
use crate::types::{with_metadata, ComputationOutput, Currency, Money, Rate};
use crate::Ifrs16Result;

pub const DEFAULT_MATERIALITY_THRESHOLD: Money = rust_decimal::Decimal::ONE;
pub const DEFAULT_CURRENT_HORIZON_MONTHS: u32 = 12;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Knobs that are not part of the contract itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationOptions {
    pub rate_convention: RateConvention,
    /// Largest final-period rounding correction accepted before a schedule
    /// is treated as divergent
    pub materiality_threshold: Money,
    /// Disclosure date; commencement when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporting_date: Option<NaiveDate>,
    pub current_horizon_months: u32,
}

impl Default for CalculationOptions {
    fn default() -> Self {
        CalculationOptions {
            rate_convention: RateConvention::default(),
            materiality_threshold: DEFAULT_MATERIALITY_THRESHOLD,
            reporting_date: None,
            current_horizon_months: DEFAULT_CURRENT_HORIZON_MONTHS,
        }
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub contract_id: String,
    pub currency: Currency,
    pub per_period_rate: Rate,
    pub periods_per_year: u32,
    pub total_periods: u32,
    pub non_cancellable_periods: u32,
    pub initial_lease_liability: Money,
    pub initial_rou_asset: Money,
    pub measurement: InitialMeasurement,
    pub cashflow_schedule: Vec<CashflowRow>,
    pub depreciation_schedule: Vec<DepreciationRow>,
    pub journal_entries: Vec<JournalEntry>,
    pub total_interest: Money,
    pub total_depreciation: Money,
    /// Undiscounted lease payments over the lease term
    pub total_payments: Money,
    pub disclosure: LeaseDisclosure,
    pub annual_summary: Vec<AnnualSummary>,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Run the full pipeline for typed lease terms.
pub fn calculate_lease(
    terms: &LeaseTerms,
    options: &CalculationOptions,
) -> Ifrs16Result<CalculationResult> {
    terms.escalation.validate()?;
    for w in input_warnings(terms) {
        log::warn!("{}: {w}", terms.contract_id);
    }

    let schedule = build_payment_schedule(terms)?;
    let measurement = measure_initial(terms, &schedule, options.rate_convention)?;
    log::debug!(
        "{}: {} periods at {} per period, liability {}, ROU {}",
        terms.contract_id,
        schedule.len(),
        measurement.per_period_rate,
        measurement.initial_lease_liability,
        measurement.initial_rou_asset
    );

    let cashflows = generate_amortization(
        &schedule,
        measurement.exact_liability,
        measurement.per_period_rate,
        options.materiality_threshold,
    )?;
    let depreciation = generate_depreciation(
        &schedule,
        measurement.initial_rou_asset,
        terms.retained_residual(),
        depreciation_periods(terms, &schedule),
    )?;
    let journal_entries = generate_journal_entries(
        &terms.contract_id,
        terms.commencement_date,
        &measurement,
        &cashflows,
        &depreciation,
    )?;
    log::debug!(
        "{}: {} cashflow rows, {} depreciation rows, {} journal lines",
        terms.contract_id,
        cashflows.len(),
        depreciation.len(),
        journal_entries.len()
    );

    let reporting_date = options.reporting_date.unwrap_or(terms.commencement_date);
    let disclosure = disclose(
        terms,
        &measurement,
        &cashflows,
        &depreciation,
        reporting_date,
        options.current_horizon_months,
    )?;
    let annual_summary = annual_summary(
        &cashflows,
        &depreciation,
        schedule.periods_per_year,
        measurement.initial_rou_asset,
    );

    Ok(CalculationResult {
        contract_id: terms.contract_id.clone(),
        currency: terms.currency.clone(),
        per_period_rate: measurement.per_period_rate,
        periods_per_year: schedule.periods_per_year,
        total_periods: schedule.len() as u32,
        non_cancellable_periods: schedule.non_cancellable_periods,
        initial_lease_liability: measurement.initial_lease_liability,
        initial_rou_asset: measurement.initial_rou_asset,
        total_interest: total_interest(&cashflows),
        total_depreciation: total_depreciation(&depreciation),
        total_payments: schedule.total(),
        measurement,
        cashflow_schedule: cashflows,
        depreciation_schedule: depreciation,
        journal_entries,
        disclosure,
        annual_summary,
    })
}

/// Normalize a raw record, then run the pipeline.
pub fn calculate_lease_record(
    raw: &RawLeaseRecord,
    options: &CalculationOptions,
) -> Ifrs16Result<CalculationResult> {
    let terms = normalize_lease_record(raw)?;
    calculate_lease(&terms, options)
}

/// Run the pipeline and wrap the result in the standard output envelope.
pub fn calculate_lease_with_metadata(
    terms: &LeaseTerms,
    options: &CalculationOptions,
) -> Ifrs16Result<ComputationOutput<CalculationResult>> {
    let start = Instant::now();
    let warnings = input_warnings(terms);

    let result = calculate_lease(terms, options)?;

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "IFRS 16 lessee model: PV of lease payments at the IBR, effective interest amortization, straight-line ROU depreciation",
        &serde_json::json!({
            "terms": terms,
            "options": options,
        }),
        warnings,
        elapsed,
        result,
    ))
}

/// Inputs that were accepted but have no effect on the numbers.
fn input_warnings(terms: &LeaseTerms) -> Vec<String> {
    let mut warnings = Vec::new();
    if !terms.extension_reasonably_certain {
        let has_years = terms.extension_years.is_some_and(|y| !y.is_zero());
        if has_years || terms.extension_likelihood.is_some() {
            warnings.push(
                "Extension option supplied without reasonable certainty; excluded from the lease term"
                    .to_string(),
            );
        }
        if terms.extension_payment_growth.is_some() {
            warnings.push(
                "Extension payment growth ignored: no extension in the lease term".to_string(),
            );
        }
    }
    if terms.purchase_option_price.is_some() && !terms.purchase_option_reasonably_certain {
        warnings.push(
            "Purchase option not reasonably certain; ROU depreciated without retained residual"
                .to_string(),
        );
    }
    warnings
}
