//! Lease liability disclosures at a reporting date.
//!
//! Splits the remaining cashflows into the tranche due within the current
//! horizon (12 months by default) and the non-current remainder, with
//! undiscounted and discounted amounts, plus a maturity analysis and the
//! weighted-average figures IFRS 16 asks for.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amortization::CashflowRow;
use super::depreciation::DepreciationRow;
use super::measurement::InitialMeasurement;
use super::payments::add_months;
use super::terms::LeaseTerms;
use crate::types::{round_money, Money, Rate, Years};
use crate::Ifrs16Result;

pub(crate) const TERM_DP: u32 = 4;
pub(crate) const RATE_DP: u32 = 6;

const MATURITY_BUCKETS: [(&str, Option<u32>); 4] = [
    ("Within 1 year", Some(12)),
    ("1-2 years", Some(24)),
    ("2-5 years", Some(60)),
    ("Over 5 years", None),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tranche {
    pub label: String,
    pub payments: u32,
    pub undiscounted: Money,
    pub present_value: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseDisclosure {
    pub reporting_date: NaiveDate,
    pub current: Tranche,
    pub non_current: Tranche,
    pub total: Tranche,
    /// Within 1 year, 1-2 years, 2-5 years, over 5 years
    pub maturity_analysis: Vec<Tranche>,
    /// Lease liability carried at the reporting date
    pub carrying_liability: Money,
    /// ROU asset net carrying amount at the reporting date
    pub rou_carrying_amount: Money,
    pub weighted_average_remaining_term_years: Years,
    pub weighted_average_discount_rate: Rate,
}

/// Build the single-lease disclosure at `reporting_date`.
///
/// Rows due before the reporting date are settled. Each remaining payment is
/// discounted back to the last settled payment (or to commencement), so the
/// tranche present values add up to the carrying amount of the liability.
pub fn disclose(
    terms: &LeaseTerms,
    measurement: &InitialMeasurement,
    cashflows: &[CashflowRow],
    depreciation: &[DepreciationRow],
    reporting_date: NaiveDate,
    current_horizon_months: u32,
) -> Ifrs16Result<LeaseDisclosure> {
    let settled = cashflows
        .iter()
        .take_while(|r| r.due_date < reporting_date)
        .count();
    let remaining = &cashflows[settled..];

    let carrying_liability = if settled == 0 {
        measurement.initial_lease_liability
    } else {
        cashflows[settled - 1].closing_balance
    };

    let first_exponent = if settled == 0 {
        terms.payment_timing.first_payment_offset()
    } else {
        1
    };
    let pvs = discounted(remaining, measurement.per_period_rate, first_exponent);

    let cutoff = add_months(reporting_date, current_horizon_months)?;
    let split = remaining.iter().position(|r| r.due_date >= cutoff).unwrap_or(remaining.len());
    let split_pvs = allocate(&[sum(&pvs[..split]), sum(&pvs[split..])], carrying_liability);
    let current = tranche("Current", &remaining[..split], split_pvs[0]);
    let non_current = tranche("Non-current", &remaining[split..], split_pvs[1]);
    let total = tranche("Total", remaining, carrying_liability);

    let mut bounds = Vec::with_capacity(MATURITY_BUCKETS.len());
    for (_, months) in MATURITY_BUCKETS {
        bounds.push(match months {
            Some(m) => Some(add_months(reporting_date, m)?),
            None => None,
        });
    }
    let mut ranges = Vec::with_capacity(bounds.len());
    let mut start = 0;
    for bound in &bounds {
        let end = match bound {
            Some(limit) => start + remaining[start..].iter().take_while(|r| r.due_date < *limit).count(),
            None => remaining.len(),
        };
        ranges.push((start, end));
        start = end;
    }
    let bucket_exact: Vec<Decimal> = ranges.iter().map(|(s, e)| sum(&pvs[*s..*e])).collect();
    let bucket_pvs = allocate(&bucket_exact, carrying_liability);
    let maturity_analysis = MATURITY_BUCKETS
        .iter()
        .zip(ranges.iter().zip(bucket_pvs))
        .map(|((label, _), ((s, e), pv))| tranche(label, &remaining[*s..*e], pv))
        .collect();

    let rou_carrying_amount = depreciation
        .iter()
        .take_while(|r| r.date < reporting_date)
        .last()
        .map(|r| r.net_carrying_amount)
        .unwrap_or(measurement.initial_rou_asset);

    let remaining_years = (Decimal::from(remaining.len() as u32)
        / Decimal::from(terms.periods_per_year()))
    .round_dp(TERM_DP);

    log::debug!(
        "{}: disclosure at {}: {} settled, current {} / non-current {}",
        terms.contract_id,
        reporting_date,
        settled,
        current.present_value,
        non_current.present_value
    );

    Ok(LeaseDisclosure {
        reporting_date,
        current,
        non_current,
        total,
        maturity_analysis,
        carrying_liability,
        rou_carrying_amount,
        weighted_average_remaining_term_years: remaining_years,
        weighted_average_discount_rate: terms.incremental_borrowing_rate.round_dp(RATE_DP),
    })
}

fn discounted(rows: &[CashflowRow], rate: Rate, first_exponent: u32) -> Vec<Decimal> {
    let v = Decimal::ONE / (Decimal::ONE + rate);
    let mut factor = Decimal::ONE;
    for _ in 0..first_exponent {
        factor *= v;
    }
    rows.iter()
        .map(|r| {
            let pv = r.rent * factor;
            factor *= v;
            pv
        })
        .collect()
}

fn sum(values: &[Decimal]) -> Decimal {
    values.iter().copied().sum()
}

/// Round group amounts cumulatively so the parts add up to `total` exactly.
pub(crate) fn allocate(exact: &[Decimal], total: Money) -> Vec<Money> {
    let mut out = Vec::with_capacity(exact.len());
    let mut running_exact = Decimal::ZERO;
    let mut allocated = Decimal::ZERO;
    for (i, part) in exact.iter().enumerate() {
        let next = if i + 1 == exact.len() {
            total
        } else {
            running_exact += part;
            round_money(running_exact)
        };
        out.push(next - allocated);
        allocated = next;
    }
    out
}

fn tranche(label: &str, rows: &[CashflowRow], present_value: Money) -> Tranche {
    Tranche {
        label: label.to_string(),
        payments: rows.len() as u32,
        undiscounted: rows.iter().map(|r| r.rent).sum(),
        present_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lease_accounting::amortization::generate_amortization;
    use crate::lease_accounting::depreciation::{depreciation_periods, generate_depreciation};
    use crate::lease_accounting::measurement::measure_initial;
    use crate::lease_accounting::payments::build_payment_schedule;
    use crate::lease_accounting::terms::PaymentTiming;
    use crate::time_value::RateConvention;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn run(
        terms: &LeaseTerms,
        reporting: NaiveDate,
    ) -> (InitialMeasurement, Vec<CashflowRow>, Vec<DepreciationRow>, LeaseDisclosure) {
        let s = build_payment_schedule(terms).unwrap();
        let m = measure_initial(terms, &s, RateConvention::Nominal).unwrap();
        let rows = generate_amortization(&s, m.exact_liability, m.per_period_rate, dec!(1)).unwrap();
        let dep = generate_depreciation(
            &s,
            m.initial_rou_asset,
            terms.retained_residual(),
            depreciation_periods(terms, &s),
        )
        .unwrap();
        let d = disclose(terms, &m, &rows, &dep, reporting, 12).unwrap();
        (m, rows, dep, d)
    }

    fn lease() -> LeaseTerms {
        LeaseTerms::minimal("LSE-600", date(2024, 1, 1), dec!(5), dec!(100000), dec!(0.15))
    }

    #[test]
    fn test_tranches_sum_to_initial_liability() {
        let (m, _, _, d) = run(&lease(), date(2024, 1, 1));
        assert_eq!(d.current.payments, 12);
        assert_eq!(d.non_current.payments, 48);
        assert_eq!(d.current.undiscounted, dec!(1200000));
        assert_eq!(
            d.current.present_value + d.non_current.present_value,
            m.initial_lease_liability
        );
        assert_eq!(d.total.present_value, m.initial_lease_liability);
        assert_eq!(d.total.undiscounted, dec!(6000000));
    }

    #[test]
    fn test_current_pv_is_discounted_first_year() {
        let (_, _, _, d) = run(&lease(), date(2024, 1, 1));
        // 12 payments in advance at 1.25% per month
        let mut expected = Decimal::ZERO;
        let mut v = Decimal::ONE;
        for _ in 0..12 {
            expected += dec!(100000) * v;
            v /= dec!(1.0125);
        }
        assert!((d.current.present_value - expected).abs() <= dec!(0.01));
        // Not a fixed 30/70 ratio
        assert!(d.current.present_value > d.total.present_value * dec!(0.25));
        assert!(d.current.present_value != round_money(d.total.present_value * dec!(0.3)));
    }

    #[test]
    fn test_later_reporting_date_uses_carrying_amount() {
        let (_, rows, dep, d) = run(&lease(), date(2025, 1, 15));
        // 13 payments (Jan 2024 - Jan 2025) are settled
        assert_eq!(d.carrying_liability, rows[12].closing_balance);
        assert_eq!(d.total.payments, 47);
        assert_eq!(
            d.current.present_value + d.non_current.present_value,
            d.carrying_liability
        );
        assert_eq!(d.weighted_average_remaining_term_years, dec!(3.9167));
        // December 2024 is the last period ended before the reporting date
        assert_eq!(d.rou_carrying_amount, dep[11].net_carrying_amount);
    }

    #[test]
    fn test_maturity_buckets_cover_everything() {
        let mut t = lease();
        t.non_cancellable_years = dec!(7);
        t.payment_timing = PaymentTiming::Arrears;
        let (m, _, _, d) = run(&t, date(2024, 1, 1));
        assert_eq!(d.maturity_analysis.len(), 4);
        let counts: Vec<u32> = d.maturity_analysis.iter().map(|b| b.payments).collect();
        assert_eq!(counts, vec![12, 12, 36, 24]);
        let pv: Money = d.maturity_analysis.iter().map(|b| b.present_value).sum();
        assert_eq!(pv, m.initial_lease_liability);
        let undiscounted: Money = d.maturity_analysis.iter().map(|b| b.undiscounted).sum();
        assert_eq!(undiscounted, d.total.undiscounted);
    }

    #[test]
    fn test_single_lease_weighted_figures_are_own_term_and_rate() {
        let (_, _, _, d) = run(&lease(), date(2024, 1, 1));
        assert_eq!(d.weighted_average_remaining_term_years, dec!(5));
        assert_eq!(d.weighted_average_discount_rate, dec!(0.15));
    }

    #[test]
    fn test_allocate_preserves_total() {
        let parts = allocate(&[dec!(1.004), dec!(1.004), dec!(1.004)], dec!(3.01));
        assert_eq!(parts.iter().copied().sum::<Decimal>(), dec!(3.01));
        assert_eq!(parts[0], dec!(1.00));
    }
}
