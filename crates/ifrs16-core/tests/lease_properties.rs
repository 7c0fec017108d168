//! Property-based tests for the lease pipeline.
//!
//! Invariants verified for arbitrary valid leases:
//! - the liability equals the PV of the emitted rents at the per-period rate
//! - the last cashflow row closes at exactly zero
//! - interest + principal = rent, and closing = opening - principal, on every row
//! - every journal entry set balances
//! - current + non-current PV equals the carrying liability
//! - total depreciation equals ROU less the retained residual
//! - running the pipeline twice gives identical results

use chrono::NaiveDate;
use ifrs16_core::lease_accounting::journal::entry_sets;
use ifrs16_core::lease_accounting::{
    calculate_lease, CalculationOptions, CalculationResult, EscalationPolicy, LeaseTerms,
    PaymentFrequency, PaymentTiming,
};
use proptest::{prelude::*, test_runner::TestCaseError};
use rust_decimal::Decimal;

// ── Helpers
// ───────────────────────────────────────────────────────────────────

fn fail(e: impl std::fmt::Display) -> TestCaseError {
    TestCaseError::fail(e.to_string())
}

fn frequency_strat() -> impl Strategy<Value = PaymentFrequency> {
    prop_oneof![
        Just(PaymentFrequency::Monthly),
        Just(PaymentFrequency::Quarterly),
        Just(PaymentFrequency::SemiAnnual),
        Just(PaymentFrequency::Annual),
    ]
}

fn timing_strat() -> impl Strategy<Value = PaymentTiming> {
    prop_oneof![Just(PaymentTiming::Advance), Just(PaymentTiming::Arrears)]
}

/// Fixed-percentage escalation in whole basis points, starting at the first
/// anniversary, optionally compounding yearly.
fn escalation_strat() -> impl Strategy<Value = Option<(u32, bool)>> {
    prop::option::of((0u32..=1_000, any::<bool>()))
}

/// Whole-year terms, integer payments, IBR between 0.5% and 30%.
fn lease_strat() -> impl Strategy<Value = LeaseTerms> {
    (
        1u32..=10,
        frequency_strat(),
        timing_strat(),
        1_000u64..=500_000,
        50u32..=3_000,
        escalation_strat(),
        prop::option::of(1u32..=15),
        0u64..=50_000,
    )
        .prop_map(
            |(years, frequency, timing, payment, ibr_bps, escalation, useful_life, prepaid)| {
                let mut t = LeaseTerms::minimal(
                    "PROP-001",
                    NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
                    Decimal::from(years),
                    Decimal::from(payment),
                    Decimal::new(ibr_bps as i64, 4),
                );
                t.payment_frequency = frequency;
                t.payment_timing = timing;
                t.useful_life_years = useful_life.map(Decimal::from);
                t.prepayments = Some(Decimal::from(prepaid));
                if let Some((bps, compounding)) = escalation {
                    let ppy = frequency.periods_per_year();
                    t.escalation = EscalationPolicy::FixedPercentage {
                        rate: Decimal::new(bps as i64, 4),
                        effective_period: ppy + 1,
                        step_periods: compounding.then_some(ppy),
                    };
                }
                t
            },
        )
}

fn run(terms: &LeaseTerms) -> Result<CalculationResult, TestCaseError> {
    calculate_lease(terms, &CalculationOptions::default()).map_err(fail)
}

// ── Properties
// ────────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn liability_is_pv_of_rents(terms in lease_strat()) {
        let r = run(&terms)?;
        let v = Decimal::ONE / (Decimal::ONE + r.per_period_rate);
        let mut factor = Decimal::ONE;
        if terms.payment_timing == PaymentTiming::Arrears {
            factor = v;
        }
        let mut pv = Decimal::ZERO;
        for row in &r.cashflow_schedule {
            pv += row.rent * factor;
            factor *= v;
        }
        prop_assert!(
            (pv - r.initial_lease_liability).abs() <= Decimal::new(1, 2),
            "pv {} vs liability {}", pv, r.initial_lease_liability
        );
    }

    #[test]
    fn schedule_closes_at_zero(terms in lease_strat()) {
        let r = run(&terms)?;
        let last = r.cashflow_schedule.last().ok_or_else(|| fail("empty schedule"))?;
        prop_assert_eq!(last.closing_balance, Decimal::ZERO);
        prop_assert_eq!(r.cashflow_schedule[0].opening_balance, r.initial_lease_liability);
    }

    #[test]
    fn row_identities_hold(terms in lease_strat()) {
        let r = run(&terms)?;
        for row in &r.cashflow_schedule {
            prop_assert_eq!(row.interest + row.principal, row.rent);
            prop_assert_eq!(row.opening_balance - row.principal, row.closing_balance);
        }
        for w in r.cashflow_schedule.windows(2) {
            prop_assert_eq!(w[0].closing_balance, w[1].opening_balance);
        }
    }

    #[test]
    fn journal_sets_balance(terms in lease_strat()) {
        let r = run(&terms)?;
        for (_, lines) in entry_sets(&r.journal_entries) {
            let dr: Decimal = lines.iter().map(|l| l.debit).sum();
            let cr: Decimal = lines.iter().map(|l| l.credit).sum();
            prop_assert_eq!(dr, cr);
        }
    }

    #[test]
    fn tranches_sum_to_liability(terms in lease_strat()) {
        let r = run(&terms)?;
        let d = &r.disclosure;
        prop_assert_eq!(d.current.present_value + d.non_current.present_value, r.initial_lease_liability);
        let buckets: Decimal = d.maturity_analysis.iter().map(|t| t.present_value).sum();
        prop_assert_eq!(buckets, r.initial_lease_liability);
        prop_assert_eq!(d.total.undiscounted, r.total_payments);
    }

    #[test]
    fn depreciation_totals_depreciable_amount(terms in lease_strat()) {
        let r = run(&terms)?;
        prop_assert_eq!(r.total_depreciation, r.initial_rou_asset - terms.retained_residual());
        let last = r.depreciation_schedule.last().ok_or_else(|| fail("no depreciation"))?;
        prop_assert_eq!(last.net_carrying_amount, Decimal::ZERO);
    }

    #[test]
    fn pipeline_is_idempotent(terms in lease_strat()) {
        let a = run(&terms)?;
        let b = run(&terms)?;
        let ja = serde_json::to_string(&a).map_err(fail)?;
        let jb = serde_json::to_string(&b).map_err(fail)?;
        prop_assert_eq!(ja, jb);
    }
}
