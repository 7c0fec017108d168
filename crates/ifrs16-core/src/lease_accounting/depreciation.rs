//! Straight-line depreciation of the right-of-use asset.
//!
//! The asset is depreciated from commencement to the earlier of the end of
//! its useful life and the end of the lease term (including a reasonably
//! certain extension), down to any residual the lessee is expected to retain.
//! Rows share the amortization schedule's period boundaries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::payments::PaymentSchedule;
use super::terms::LeaseTerms;
use crate::types::{round_money, Money};
use crate::Ifrs16Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationRow {
    /// Period number (1-indexed)
    pub period: u32,
    /// Period end date
    pub date: NaiveDate,
    pub opening_carrying_amount: Money,
    pub depreciation: Money,
    pub accumulated_depreciation: Money,
    pub net_carrying_amount: Money,
}

/// Number of depreciation periods: lease periods, cut short by a shorter
/// useful life.
pub fn depreciation_periods(terms: &LeaseTerms, schedule: &PaymentSchedule) -> u32 {
    let lease_periods = schedule.len() as u32;
    match terms.useful_life_periods() {
        Some(useful) => lease_periods.min(useful.max(1)),
        None => lease_periods,
    }
}

/// Produce the depreciation schedule.
///
/// Accumulated depreciation after period k is `round(k * charge)`, and the
/// final period lands exactly on `initial_rou - retained_residual`, so the
/// last row absorbs the rounding remainder.
pub fn generate_depreciation(
    schedule: &PaymentSchedule,
    initial_rou: Money,
    retained_residual: Money,
    periods: u32,
) -> Ifrs16Result<Vec<DepreciationRow>> {
    let periods = periods.min(schedule.len() as u32);
    let residual = retained_residual.max(Decimal::ZERO).min(initial_rou);
    let depreciable = initial_rou - residual;

    if periods == 0 {
        return Ok(Vec::new());
    }

    let charge = depreciable / Decimal::from(periods);
    let mut rows = Vec::with_capacity(periods as usize);
    let mut accumulated = Decimal::ZERO;

    for payment in schedule.payments.iter().take(periods as usize) {
        let k = payment.period;
        let next_accumulated = if k == periods {
            depreciable
        } else {
            round_money(charge * Decimal::from(k))
        };
        rows.push(DepreciationRow {
            period: k,
            date: payment.period_end,
            opening_carrying_amount: initial_rou - accumulated,
            depreciation: next_accumulated - accumulated,
            accumulated_depreciation: next_accumulated,
            net_carrying_amount: initial_rou - next_accumulated,
        });
        accumulated = next_accumulated;
    }

    log::debug!(
        "depreciation: {} periods of ~{}, residual {}",
        periods,
        round_money(charge),
        residual
    );

    Ok(rows)
}

pub fn total_depreciation(rows: &[DepreciationRow]) -> Money {
    rows.iter().map(|r| r.depreciation).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lease_accounting::payments::build_payment_schedule;
    use rust_decimal_macros::dec;

    fn lease() -> LeaseTerms {
        LeaseTerms::minimal(
            "LSE-400",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            dec!(3),
            dec!(10000),
            dec!(0.10),
        )
    }

    #[test]
    fn test_straight_line_to_zero() {
        let t = lease();
        let s = build_payment_schedule(&t).unwrap();
        let rows = generate_depreciation(&s, dec!(100000), Decimal::ZERO, 36).unwrap();
        assert_eq!(rows.len(), 36);
        assert_eq!(rows[0].depreciation, dec!(2777.78));
        assert_eq!(rows[35].net_carrying_amount, Decimal::ZERO);
        assert_eq!(total_depreciation(&rows), dec!(100000));
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    }

    #[test]
    fn test_charges_never_drift_more_than_a_cent() {
        let t = lease();
        let s = build_payment_schedule(&t).unwrap();
        let rows = generate_depreciation(&s, dec!(100000), Decimal::ZERO, 36).unwrap();
        for r in &rows {
            assert!((r.depreciation - dec!(2777.78)).abs() <= dec!(0.01));
            assert!(r.net_carrying_amount >= Decimal::ZERO);
            assert_eq!(
                r.opening_carrying_amount - r.depreciation,
                r.net_carrying_amount
            );
        }
    }

    #[test]
    fn test_residual_survives_term() {
        let t = lease();
        let s = build_payment_schedule(&t).unwrap();
        let rows = generate_depreciation(&s, dec!(100000), dec!(10000), 36).unwrap();
        assert_eq!(rows[35].net_carrying_amount, dec!(10000));
        assert_eq!(total_depreciation(&rows), dec!(90000));
    }

    #[test]
    fn test_residual_capped_at_rou() {
        let t = lease();
        let s = build_payment_schedule(&t).unwrap();
        let rows = generate_depreciation(&s, dec!(1000), dec!(5000), 36).unwrap();
        assert!(rows.iter().all(|r| r.depreciation.is_zero()));
        assert_eq!(rows[35].net_carrying_amount, dec!(1000));
    }

    #[test]
    fn test_short_useful_life_cuts_periods() {
        let mut t = lease();
        t.useful_life_years = Some(dec!(2));
        let s = build_payment_schedule(&t).unwrap();
        assert_eq!(depreciation_periods(&t, &s), 24);
        t.useful_life_years = Some(dec!(10));
        assert_eq!(depreciation_periods(&t, &s), 36);
    }
}
