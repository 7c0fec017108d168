//! Raw lease record intake.
//!
//! A `RawLeaseRecord` is what a form or a CSV row produces: every field is
//! optional and may arrive as text, a number or a flag. Normalization turns it
//! into typed `LeaseTerms`, collecting every offending field before failing so
//! a form can be corrected in one pass.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::escalation::EscalationPolicy;
use super::terms::{LeaseTerms, PaymentFrequency, PaymentTiming};
use crate::error::{IssueKind, ValidationErrors};
use crate::types::{round_money, Currency, Money, Rate, Years};
use crate::Ifrs16Result;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d.%m.%Y"];

/// A scalar as supplied by the intake layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Flag(bool),
    Number(serde_json::Number),
    Text(String),
}

impl RawValue {
    /// Text form, trimmed; `None` for blank text.
    fn text(&self) -> Option<String> {
        let s = match self {
            RawValue::Flag(b) => b.to_string(),
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.trim().to_string(),
        };
        if s.is_empty() {
            None
        } else {
            Some(s)
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Flag(b)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Number(n.into())
    }
}

/// Untyped lease record. Field names accept both snake_case and the intake
/// spreadsheet's column names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLeaseRecord {
    #[serde(alias = "ContractID", alias = "contractId")]
    pub contract_id: Option<RawValue>,
    #[serde(alias = "LesseeEntity")]
    pub lessee_entity: Option<RawValue>,
    #[serde(alias = "LessorName")]
    pub lessor_name: Option<RawValue>,
    #[serde(alias = "AssetDescription")]
    pub asset_description: Option<RawValue>,
    #[serde(alias = "AssetClass")]
    pub asset_class: Option<RawValue>,
    #[serde(alias = "CommencementDate")]
    pub commencement_date: Option<RawValue>,
    #[serde(alias = "NonCancellableYears")]
    pub non_cancellable_years: Option<RawValue>,
    #[serde(alias = "FixedPaymentPerPeriod", alias = "fixed_payment_per_period")]
    pub fixed_payment: Option<RawValue>,
    #[serde(alias = "PaymentFrequency")]
    pub payment_frequency: Option<RawValue>,
    #[serde(alias = "PaymentTiming")]
    pub payment_timing: Option<RawValue>,
    #[serde(alias = "Currency")]
    pub currency: Option<RawValue>,
    #[serde(alias = "IBR_Annual", alias = "ibr_annual", alias = "ibr")]
    pub incremental_borrowing_rate: Option<RawValue>,
    #[serde(alias = "UsefulLifeYears")]
    pub useful_life_years: Option<RawValue>,
    #[serde(alias = "ExtensionYears")]
    pub extension_years: Option<RawValue>,
    #[serde(alias = "ExtensionLikelihood")]
    pub extension_likelihood: Option<RawValue>,
    #[serde(alias = "ExtensionReasonablyCertain")]
    pub extension_reasonably_certain: Option<RawValue>,
    #[serde(alias = "ExtensionPaymentGrowth")]
    pub extension_payment_growth: Option<RawValue>,
    #[serde(alias = "EscalationType")]
    pub escalation_type: Option<RawValue>,
    #[serde(alias = "EscalationRate")]
    pub escalation_rate: Option<RawValue>,
    #[serde(alias = "EscalationStartPeriod")]
    pub escalation_start_period: Option<RawValue>,
    #[serde(alias = "EscalationStepPeriods")]
    pub escalation_step_periods: Option<RawValue>,
    #[serde(alias = "BaseIndex")]
    pub base_index: Option<RawValue>,
    #[serde(alias = "CurrentIndex")]
    pub current_index: Option<RawValue>,
    #[serde(alias = "Prepayments")]
    pub prepayments: Option<RawValue>,
    #[serde(alias = "InitialDirectCosts")]
    pub initial_direct_costs: Option<RawValue>,
    #[serde(alias = "LeaseIncentives")]
    pub lease_incentives: Option<RawValue>,
    #[serde(alias = "PurchaseOptionPrice")]
    pub purchase_option_price: Option<RawValue>,
    #[serde(alias = "PurchaseOptionReasonablyCertain")]
    pub purchase_option_reasonably_certain: Option<RawValue>,
    #[serde(alias = "ResidualValueGuarantee")]
    pub residual_value_guarantee: Option<RawValue>,
}

// ---------------------------------------------------------------------------
// Field readers
// ---------------------------------------------------------------------------

/// Accumulates issues while fields are read; every reader returns `None` on
/// a bad or absent value so parsing continues past the first failure.
struct FieldReader {
    issues: ValidationErrors,
}

impl FieldReader {
    /// Record a missing required field; a supplied but unparseable value is
    /// reported by its reader instead.
    fn require(&mut self, field: &str, value: &Option<RawValue>) {
        if self.text(value).is_none() {
            self.issues.push(field, IssueKind::MissingField, "required field is missing");
        }
    }

    fn text(&self, value: &Option<RawValue>) -> Option<String> {
        value.as_ref().and_then(RawValue::text)
    }

    fn decimal(&mut self, field: &str, value: &Option<RawValue>) -> Option<Decimal> {
        let text = self.text(value)?;
        let parsed = strip_grouping(&text).and_then(|cleaned| {
            Decimal::from_str(&cleaned)
                .or_else(|_| Decimal::from_scientific(&cleaned))
                .ok()
        });
        match parsed {
            Some(d) => Some(d),
            None => {
                self.issues
                    .push(field, IssueKind::InvalidNumber, format!("'{text}' is not a number"));
                None
            }
        }
    }

    fn money(&mut self, field: &str, value: &Option<RawValue>) -> Option<Money> {
        let amount = round_money(self.decimal(field, value)?);
        if amount < Decimal::ZERO {
            self.issues
                .push(field, IssueKind::OutOfRange, format!("{amount} must not be negative"));
            return None;
        }
        Some(amount)
    }

    fn years(&mut self, field: &str, value: &Option<RawValue>, allow_zero: bool) -> Option<Years> {
        let years = self.decimal(field, value)?;
        if years < Decimal::ZERO || (!allow_zero && years.is_zero()) {
            let bound = if allow_zero { "not be negative" } else { "be positive" };
            self.issues
                .push(field, IssueKind::OutOfRange, format!("{years} years must {bound}"));
            return None;
        }
        Some(years)
    }

    /// Percentage-like field: a trailing '%' or a value above 1 is a whole
    /// percentage. The coerced rate must lie in `[0, 1]`.
    fn rate(&mut self, field: &str, value: &Option<RawValue>) -> Option<Rate> {
        let text = self.text(value)?;
        let stripped = text.trim_end_matches('%').trim();
        let explicit_percent = stripped.len() != text.len();
        let raw = match Decimal::from_str(stripped) {
            Ok(d) => d,
            Err(_) => {
                self.issues
                    .push(field, IssueKind::InvalidNumber, format!("'{text}' is not a rate"));
                return None;
            }
        };
        let rate = if explicit_percent || raw > Decimal::ONE {
            raw / Decimal::ONE_HUNDRED
        } else {
            raw
        };
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            self.issues.push(
                field,
                IssueKind::OutOfRangeRate,
                format!("'{text}' resolves to {rate}, outside 0% to 100%"),
            );
            return None;
        }
        Some(rate)
    }

    fn date(&mut self, field: &str, value: &Option<RawValue>) -> Option<NaiveDate> {
        let text = self.text(value)?;
        let date_part = text.split(['T', ' ']).next().unwrap_or(&text);
        let parsed = DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok());
        if parsed.is_none() {
            self.issues.push(
                field,
                IssueKind::InvalidDate,
                format!("'{text}' is not a date (expected YYYY-MM-DD or DD/MM/YYYY)"),
            );
        }
        parsed
    }

    fn flag(&mut self, field: &str, value: &Option<RawValue>) -> Option<bool> {
        let text = self.text(value)?;
        match text.to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => {
                self.issues
                    .push(field, IssueKind::InvalidChoice, format!("'{text}' is not yes/no"));
                None
            }
        }
    }

    fn period(&mut self, field: &str, value: &Option<RawValue>) -> Option<u32> {
        let n = self.decimal(field, value)?;
        match n.to_u32() {
            Some(p) if p >= 1 && n.fract().is_zero() => Some(p),
            _ => {
                self.issues.push(
                    field,
                    IssueKind::OutOfRange,
                    format!("{n} is not a period number (whole, at least 1)"),
                );
                None
            }
        }
    }

    fn choice<T: FromStr<Err = String>>(
        &mut self,
        field: &str,
        value: &Option<RawValue>,
    ) -> Option<T> {
        let text = self.text(value)?;
        match text.parse::<T>() {
            Ok(v) => Some(v),
            Err(e) => {
                self.issues.push(field, IssueKind::InvalidChoice, e);
                None
            }
        }
    }

    /// A term must cover a whole number of payment periods.
    fn check_whole_periods(&mut self, field: &str, years: Option<Years>, ppy: u32) {
        if let Some(years) = years {
            if !(years * Decimal::from(ppy)).fract().is_zero() {
                self.issues.push(
                    field,
                    IssueKind::OutOfRange,
                    format!("{years} years is not a whole number of periods at {ppy} per year"),
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Drop thousands separators. Commas are only accepted between groups of
/// exactly three integer digits, so a decimal comma ("1,5") is rejected
/// rather than read as 15.
fn strip_grouping(text: &str) -> Option<String> {
    let text = text.replace('_', "");
    if !text.contains(',') {
        return Some(text);
    }
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    if frac_part.contains(',') {
        return None;
    }
    let digits = int_part.trim_start_matches(['-', '+']);
    let mut groups = digits.split(',');
    let lead = groups.next().unwrap_or("");
    let lead_ok = (1..=3).contains(&lead.len()) && lead.chars().all(|c| c.is_ascii_digit());
    if !lead_ok || !groups.all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit())) {
        return None;
    }
    Some(text.replace(',', ""))
}

/// Turn a raw record into typed lease terms, or report every bad field.
pub fn normalize_lease_record(raw: &RawLeaseRecord) -> Ifrs16Result<LeaseTerms> {
    let mut r = FieldReader {
        issues: ValidationErrors::default(),
    };

    r.require("contract_id", &raw.contract_id);
    r.require("commencement_date", &raw.commencement_date);
    r.require("non_cancellable_years", &raw.non_cancellable_years);
    r.require("fixed_payment", &raw.fixed_payment);
    r.require("incremental_borrowing_rate", &raw.incremental_borrowing_rate);

    let contract_id = r.text(&raw.contract_id);
    let commencement_date = r.date("commencement_date", &raw.commencement_date);
    let non_cancellable_years = r.years("non_cancellable_years", &raw.non_cancellable_years, false);
    let fixed_payment = r.money("fixed_payment", &raw.fixed_payment);
    let ibr = r.rate("incremental_borrowing_rate", &raw.incremental_borrowing_rate);

    let payment_frequency: Option<PaymentFrequency> =
        r.choice("payment_frequency", &raw.payment_frequency);
    let payment_timing: Option<PaymentTiming> = r.choice("payment_timing", &raw.payment_timing);
    let currency: Option<Currency> = r.choice("currency", &raw.currency);

    let useful_life_years = r.years("useful_life_years", &raw.useful_life_years, false);
    let extension_years = r.years("extension_years", &raw.extension_years, true);
    let extension_likelihood = r.rate("extension_likelihood", &raw.extension_likelihood);
    let extension_reasonably_certain =
        r.flag("extension_reasonably_certain", &raw.extension_reasonably_certain);
    let extension_payment_growth = r.rate("extension_payment_growth", &raw.extension_payment_growth);
    let prepayments = r.money("prepayments", &raw.prepayments);
    let initial_direct_costs = r.money("initial_direct_costs", &raw.initial_direct_costs);
    let lease_incentives = r.money("lease_incentives", &raw.lease_incentives);
    let purchase_option_price = r.money("purchase_option_price", &raw.purchase_option_price);
    let purchase_option_reasonably_certain = r.flag(
        "purchase_option_reasonably_certain",
        &raw.purchase_option_reasonably_certain,
    );
    let residual_value_guarantee = r.money("residual_value_guarantee", &raw.residual_value_guarantee);

    let frequency = payment_frequency.unwrap_or_default();
    let ppy = frequency.periods_per_year();
    r.check_whole_periods("non_cancellable_years", non_cancellable_years, ppy);
    if extension_reasonably_certain == Some(true) {
        r.check_whole_periods("extension_years", extension_years, ppy);
    }

    let escalation = normalize_escalation(&mut r, raw, ppy);

    if !r.issues.is_empty() {
        log::debug!("lease record rejected: {}", r.issues);
        return Err(r.issues.into());
    }

    // Every required field is Some once no issues were recorded.
    match (
        contract_id,
        commencement_date,
        non_cancellable_years,
        fixed_payment,
        ibr,
        escalation,
    ) {
        (Some(id), Some(date), Some(years), Some(payment), Some(ibr), Some(escalation)) => {
            Ok(LeaseTerms {
                contract_id: id,
                lessee_entity: r.text(&raw.lessee_entity),
                lessor_name: r.text(&raw.lessor_name),
                asset_description: r.text(&raw.asset_description),
                asset_class: r.text(&raw.asset_class),
                commencement_date: date,
                non_cancellable_years: years,
                fixed_payment: payment,
                payment_frequency: frequency,
                payment_timing: payment_timing.unwrap_or_default(),
                currency: currency.unwrap_or_default(),
                incremental_borrowing_rate: ibr,
                useful_life_years,
                extension_years,
                extension_likelihood,
                extension_reasonably_certain: extension_reasonably_certain.unwrap_or(false),
                extension_payment_growth,
                escalation,
                prepayments,
                initial_direct_costs,
                lease_incentives,
                purchase_option_price,
                purchase_option_reasonably_certain: purchase_option_reasonably_certain
                    .unwrap_or(false),
                residual_value_guarantee,
            })
        }
        _ => {
            let mut issues = ValidationErrors::default();
            issues.push("record", IssueKind::MissingField, "incomplete lease record");
            Err(issues.into())
        }
    }
}

fn normalize_escalation(
    r: &mut FieldReader,
    raw: &RawLeaseRecord,
    periods_per_year: u32,
) -> Option<EscalationPolicy> {
    let kind = r
        .text(&raw.escalation_type)
        .map(|k| k.to_ascii_lowercase().replace(['-', ' '], "_"));
    let start = match r.text(&raw.escalation_start_period) {
        Some(_) => r.period("escalation_start_period", &raw.escalation_start_period),
        // First anniversary of commencement
        None => Some(periods_per_year + 1),
    };

    match kind.as_deref() {
        None | Some("none") => Some(EscalationPolicy::None),
        Some("fixed") | Some("fixed_percentage") | Some("percentage") => {
            r.require("escalation_rate", &raw.escalation_rate);
            let rate = r.rate("escalation_rate", &raw.escalation_rate);
            let step_periods = match r.text(&raw.escalation_step_periods) {
                Some(_) => r.period("escalation_step_periods", &raw.escalation_step_periods),
                None => None,
            };
            Some(EscalationPolicy::FixedPercentage {
                rate: rate?,
                effective_period: start?,
                step_periods,
            })
        }
        Some("index") | Some("index_linked") | Some("cpi") => {
            r.require("base_index", &raw.base_index);
            r.require("current_index", &raw.current_index);
            let base = r.decimal("base_index", &raw.base_index);
            let current = r.decimal("current_index", &raw.current_index);
            let mut positive = true;
            for (field, index) in [("base_index", base), ("current_index", current)] {
                if matches!(index, Some(i) if i <= Decimal::ZERO) {
                    r.issues
                        .push(field, IssueKind::OutOfRange, "index value must be positive");
                    positive = false;
                }
            }
            if !positive {
                return None;
            }
            Some(EscalationPolicy::IndexLinked {
                base_index: base?,
                current_index: current?,
                effective_period: start?,
            })
        }
        Some(other) => {
            r.issues.push(
                "escalation_type",
                IssueKind::InvalidChoice,
                format!("'{other}' is not an escalation type (none, fixed_percentage, index_linked)"),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn text(s: &str) -> Option<RawValue> {
        Some(RawValue::from(s))
    }

    fn minimal_record() -> RawLeaseRecord {
        RawLeaseRecord {
            contract_id: text("LSE-001"),
            commencement_date: text("2024-01-01"),
            non_cancellable_years: text("5"),
            fixed_payment: text("100,000"),
            incremental_borrowing_rate: text("15"),
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_record_gets_defaults() {
        let terms = normalize_lease_record(&minimal_record()).unwrap();
        assert_eq!(terms.contract_id, "LSE-001");
        assert_eq!(terms.fixed_payment, dec!(100000));
        assert_eq!(terms.incremental_borrowing_rate, dec!(0.15));
        assert_eq!(terms.payment_frequency, PaymentFrequency::Monthly);
        assert_eq!(terms.payment_timing, PaymentTiming::Advance);
        assert_eq!(terms.currency, Currency::NGN);
        assert!(terms.escalation.is_none());
        assert!(!terms.extension_reasonably_certain);
    }

    #[test]
    fn test_percentage_coercion() {
        let mut raw = minimal_record();
        raw.incremental_borrowing_rate = text("0.12");
        assert_eq!(normalize_lease_record(&raw).unwrap().incremental_borrowing_rate, dec!(0.12));
        raw.incremental_borrowing_rate = Some(RawValue::from(12));
        assert_eq!(normalize_lease_record(&raw).unwrap().incremental_borrowing_rate, dec!(0.12));
        raw.incremental_borrowing_rate = text("0.5%");
        assert_eq!(normalize_lease_record(&raw).unwrap().incremental_borrowing_rate, dec!(0.005));
    }

    #[test]
    fn test_zero_rate_passes_normalization() {
        let mut raw = minimal_record();
        raw.incremental_borrowing_rate = text("0");
        assert_eq!(normalize_lease_record(&raw).unwrap().incremental_borrowing_rate, dec!(0));
    }

    #[test]
    fn test_reports_every_bad_field() {
        let raw = RawLeaseRecord {
            commencement_date: text("31/02/2024"),
            non_cancellable_years: text("five"),
            incremental_borrowing_rate: text("250"),
            payment_frequency: text("fortnightly"),
            ..Default::default()
        };
        let err = match normalize_lease_record(&raw) {
            Err(crate::error::Ifrs16Error::Validation(e)) => e,
            other => panic!("expected validation failure, got {other:?}"),
        };
        let kind = |f: &str| err.for_field(f).map(|i| i.kind).collect::<Vec<_>>();
        assert_eq!(kind("contract_id"), vec![IssueKind::MissingField]);
        assert_eq!(kind("commencement_date"), vec![IssueKind::InvalidDate]);
        assert_eq!(kind("non_cancellable_years"), vec![IssueKind::InvalidNumber]);
        assert_eq!(kind("fixed_payment"), vec![IssueKind::MissingField]);
        assert_eq!(kind("incremental_borrowing_rate"), vec![IssueKind::OutOfRangeRate]);
        assert_eq!(kind("payment_frequency"), vec![IssueKind::InvalidChoice]);
        assert_eq!(err.len(), 6);
    }

    #[test]
    fn test_negative_rate_and_payment_out_of_range() {
        let mut raw = minimal_record();
        raw.incremental_borrowing_rate = text("-0.05");
        raw.fixed_payment = text("-10");
        let err = match normalize_lease_record(&raw) {
            Err(crate::error::Ifrs16Error::Validation(e)) => e,
            other => panic!("expected validation failure, got {other:?}"),
        };
        assert_eq!(err.issues[0].kind, IssueKind::OutOfRange);
        assert_eq!(
            err.for_field("incremental_borrowing_rate").next().map(|i| i.kind),
            Some(IssueKind::OutOfRangeRate)
        );
    }

    #[test]
    fn test_zero_term_is_out_of_range() {
        let mut raw = minimal_record();
        raw.non_cancellable_years = text("0");
        let err = match normalize_lease_record(&raw) {
            Err(crate::error::Ifrs16Error::Validation(e)) => e,
            other => panic!("expected validation failure, got {other:?}"),
        };
        assert_eq!(err.issues[0].field, "non_cancellable_years");
        assert_eq!(err.issues[0].kind, IssueKind::OutOfRange);
    }

    #[test]
    fn test_fractional_term_must_fit_frequency() {
        let mut raw = minimal_record();
        raw.non_cancellable_years = text("2.5");
        raw.payment_frequency = text("Annual");
        assert!(normalize_lease_record(&raw).is_err());
        raw.payment_frequency = text("Quarterly");
        assert_eq!(normalize_lease_record(&raw).unwrap().non_cancellable_periods().unwrap(), 10);
    }

    #[test]
    fn test_date_formats() {
        let mut raw = minimal_record();
        for s in ["2024-03-15", "2024/03/15", "15/03/2024", "15.03.2024", "2024-03-15T00:00:00Z"] {
            raw.commencement_date = text(s);
            assert_eq!(
                normalize_lease_record(&raw).unwrap().commencement_date,
                NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
                "format {s}"
            );
        }
    }

    #[test]
    fn test_csv_column_names() {
        let json = r#"{
            "ContractID": "BR-LAG-017",
            "LesseeEntity": "Head Office",
            "CommencementDate": "01/07/2023",
            "NonCancellableYears": 10,
            "FixedPaymentPerPeriod": "2500000",
            "PaymentFrequency": "Annual",
            "PaymentTiming": "Advance",
            "Currency": "NGN",
            "IBR_Annual": 18.5,
            "UsefulLifeYears": "20"
        }"#;
        let raw: RawLeaseRecord = serde_json::from_str(json).unwrap();
        let terms = normalize_lease_record(&raw).unwrap();
        assert_eq!(terms.contract_id, "BR-LAG-017");
        assert_eq!(terms.lessee_entity.as_deref(), Some("Head Office"));
        assert_eq!(terms.payment_frequency, PaymentFrequency::Annual);
        assert_eq!(terms.incremental_borrowing_rate, dec!(0.185));
        assert_eq!(terms.useful_life_years, Some(dec!(20)));
        assert_eq!(terms.commencement_date, NaiveDate::from_ymd_opt(2023, 7, 1).unwrap());
    }

    #[test]
    fn test_fixed_escalation_defaults_to_first_anniversary() {
        let mut raw = minimal_record();
        raw.escalation_type = text("Fixed Percentage");
        raw.escalation_rate = text("5");
        let terms = normalize_lease_record(&raw).unwrap();
        assert_eq!(
            terms.escalation,
            EscalationPolicy::FixedPercentage {
                rate: dec!(0.05),
                effective_period: 13,
                step_periods: None
            }
        );
    }

    #[test]
    fn test_index_escalation_requires_indices() {
        let mut raw = minimal_record();
        raw.escalation_type = text("index_linked");
        raw.current_index = text("112.4");
        let err = match normalize_lease_record(&raw) {
            Err(crate::error::Ifrs16Error::Validation(e)) => e,
            other => panic!("expected validation failure, got {other:?}"),
        };
        assert_eq!(err.issues[0].field, "base_index");
        assert_eq!(err.issues[0].kind, IssueKind::MissingField);
    }

    #[test]
    fn test_both_non_positive_indices_reported() {
        let mut raw = minimal_record();
        raw.escalation_type = text("cpi");
        raw.base_index = text("0");
        raw.current_index = text("-3");
        let err = match normalize_lease_record(&raw) {
            Err(crate::error::Ifrs16Error::Validation(e)) => e,
            other => panic!("expected validation failure, got {other:?}"),
        };
        let fields: Vec<_> = err.issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["base_index", "current_index"]);
        assert!(err.issues.iter().all(|i| i.kind == IssueKind::OutOfRange));
    }

    #[test]
    fn test_thousands_separators_only() {
        let mut raw = minimal_record();
        raw.fixed_payment = text("1,000,000.50");
        assert_eq!(normalize_lease_record(&raw).unwrap().fixed_payment, dec!(1000000.50));
        raw.fixed_payment = text("250_000");
        assert_eq!(normalize_lease_record(&raw).unwrap().fixed_payment, dec!(250000));

        for decimal_comma in ["1,5", "100,50", ",500", "1,000.5,0", "12,3456"] {
            raw.fixed_payment = text(decimal_comma);
            let err = match normalize_lease_record(&raw) {
                Err(crate::error::Ifrs16Error::Validation(e)) => e,
                other => panic!("{decimal_comma}: expected validation failure, got {other:?}"),
            };
            let kinds: Vec<_> = err.for_field("fixed_payment").map(|i| i.kind).collect();
            assert_eq!(kinds, vec![IssueKind::InvalidNumber], "{decimal_comma}");
        }
    }

    #[test]
    fn test_flags_and_extension() {
        let mut raw = minimal_record();
        raw.extension_years = text("2");
        raw.extension_reasonably_certain = text("Yes");
        raw.extension_payment_growth = text("10%");
        let terms = normalize_lease_record(&raw).unwrap();
        assert!(terms.extension_reasonably_certain);
        assert_eq!(terms.extension_payment_growth, Some(dec!(0.10)));
        assert_eq!(terms.total_periods().unwrap(), 84);

        raw.extension_reasonably_certain = text("perhaps");
        assert!(normalize_lease_record(&raw).is_err());
    }

    #[test]
    fn test_unknown_currency() {
        let mut raw = minimal_record();
        raw.currency = text("naira");
        assert!(normalize_lease_record(&raw).is_err());
        raw.currency = text("usd");
        assert_eq!(normalize_lease_record(&raw).unwrap().currency, Currency::USD);
    }
}
