use napi::Result as NapiResult;
use napi_derive::napi;

use ifrs16_core::lease_accounting::{
    aggregate_portfolio, calculate_lease, calculate_lease_with_metadata, normalize_lease_record,
    CalculationOptions, RawLeaseRecord,
};
use ifrs16_core::Ifrs16Error;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Validation failures carry the full issue list as JSON so a form can mark
/// every offending field.
fn engine_error(e: Ifrs16Error) -> napi::Error {
    match e {
        Ifrs16Error::Validation(ref issues) => match serde_json::to_string(issues) {
            Ok(json) => napi::Error::from_reason(json),
            Err(_) => to_napi_error(&e),
        },
        other => to_napi_error(other),
    }
}

fn parse_options(options_json: Option<String>) -> NapiResult<CalculationOptions> {
    match options_json {
        Some(json) if !json.trim().is_empty() => {
            serde_json::from_str(&json).map_err(to_napi_error)
        }
        _ => Ok(CalculationOptions::default()),
    }
}

// ---------------------------------------------------------------------------
// Lease calculation
// ---------------------------------------------------------------------------

#[napi]
pub fn normalize_lease(record_json: String) -> NapiResult<String> {
    let raw: RawLeaseRecord = serde_json::from_str(&record_json).map_err(to_napi_error)?;
    let terms = normalize_lease_record(&raw).map_err(engine_error)?;
    serde_json::to_string(&terms).map_err(to_napi_error)
}

#[napi]
pub fn calculate_ifrs16_lease(record_json: String, options_json: Option<String>) -> NapiResult<String> {
    let raw: RawLeaseRecord = serde_json::from_str(&record_json).map_err(to_napi_error)?;
    let options = parse_options(options_json)?;
    let terms = normalize_lease_record(&raw).map_err(engine_error)?;
    let output = calculate_lease_with_metadata(&terms, &options).map_err(engine_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn portfolio_disclosure(records_json: String, options_json: Option<String>) -> NapiResult<String> {
    let records: Vec<RawLeaseRecord> = serde_json::from_str(&records_json).map_err(to_napi_error)?;
    let options = parse_options(options_json)?;
    let mut results = Vec::with_capacity(records.len());
    for raw in &records {
        let terms = normalize_lease_record(raw).map_err(engine_error)?;
        results.push(calculate_lease(&terms, &options).map_err(engine_error)?);
    }
    let output = aggregate_portfolio(&results).map_err(engine_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
