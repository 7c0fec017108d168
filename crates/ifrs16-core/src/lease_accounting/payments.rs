//! Dated payment schedule: one payment per period over the lease term,
//! escalation and extension uplift already applied.

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::escalation::overflow;
use super::terms::{LeaseTerms, PaymentTiming};
use crate::error::Ifrs16Error;
use crate::types::{round_money, Money};
use crate::Ifrs16Result;

/// One contractual payment and the calendar period it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledPayment {
    /// Period number (1-indexed)
    pub period: u32,
    pub period_start: NaiveDate,
    /// Last day of the period
    pub period_end: NaiveDate,
    pub due_date: NaiveDate,
    pub amount: Money,
    pub is_extension: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSchedule {
    pub payments: Vec<ScheduledPayment>,
    pub non_cancellable_periods: u32,
    pub periods_per_year: u32,
    pub timing: PaymentTiming,
}

impl PaymentSchedule {
    pub fn len(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    pub fn amounts(&self) -> Vec<Money> {
        self.payments.iter().map(|p| p.amount).collect()
    }

    pub fn non_cancellable(&self) -> &[ScheduledPayment] {
        let n = (self.non_cancellable_periods as usize).min(self.payments.len());
        &self.payments[..n]
    }

    pub fn extension(&self) -> &[ScheduledPayment] {
        let n = (self.non_cancellable_periods as usize).min(self.payments.len());
        &self.payments[n..]
    }

    pub fn is_level(&self) -> bool {
        match self.payments.first() {
            Some(first) => self.payments.iter().all(|p| p.amount == first.amount),
            None => true,
        }
    }

    pub fn total(&self) -> Money {
        self.payments.iter().map(|p| p.amount).sum()
    }
}

/// Build the payment schedule for the full lease term.
pub fn build_payment_schedule(terms: &LeaseTerms) -> Ifrs16Result<PaymentSchedule> {
    terms.escalation.validate()?;
    if terms.fixed_payment < Decimal::ZERO {
        return Err(Ifrs16Error::InvalidInput {
            field: "fixed_payment".into(),
            reason: format!("Fixed payment {} must not be negative", terms.fixed_payment),
        });
    }

    let non_cancellable = terms.non_cancellable_periods()?;
    let total = non_cancellable + terms.extension_periods()?;
    let months = terms.payment_frequency.months_per_period();
    let extension_uplift = Decimal::ONE + terms.extension_payment_growth.unwrap_or(Decimal::ZERO);

    let mut payments = Vec::with_capacity(total as usize);
    let mut running_total = Decimal::ZERO;
    for period in 1..=total {
        let period_start = add_months(terms.commencement_date, (period - 1) * months)?;
        let next_start = add_months(terms.commencement_date, period * months)?;
        let period_end = next_start
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| Ifrs16Error::DateError(format!("period {period} end underflows")))?;
        let due_date = match terms.payment_timing {
            PaymentTiming::Advance => period_start,
            PaymentTiming::Arrears => period_end,
        };

        let is_extension = period > non_cancellable;
        let factor = terms.escalation.factor_for_period(period)?;
        let mut amount = terms
            .fixed_payment
            .checked_mul(factor)
            .ok_or_else(|| overflow(period))?;
        if is_extension {
            amount = amount
                .checked_mul(extension_uplift)
                .ok_or_else(|| overflow(period))?;
        }
        running_total = running_total
            .checked_add(amount)
            .ok_or_else(|| overflow(period))?;

        payments.push(ScheduledPayment {
            period,
            period_start,
            period_end,
            due_date,
            amount: round_money(amount),
            is_extension,
        });
    }

    log::debug!(
        "{}: {} payment periods ({} non-cancellable), total {}",
        terms.contract_id,
        total,
        non_cancellable,
        running_total
    );

    Ok(PaymentSchedule {
        payments,
        non_cancellable_periods: non_cancellable,
        periods_per_year: terms.periods_per_year(),
        timing: terms.payment_timing,
    })
}

pub(crate) fn add_months(date: NaiveDate, months: u32) -> Ifrs16Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| Ifrs16Error::DateError(format!("{date} + {months} months overflows")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lease_accounting::escalation::EscalationPolicy;
    use crate::lease_accounting::terms::PaymentFrequency;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn office_lease() -> LeaseTerms {
        LeaseTerms::minimal("LSE-100", date(2024, 1, 1), dec!(2), dec!(50000), dec!(0.12))
    }

    #[test]
    fn test_monthly_advance_dates() {
        let s = build_payment_schedule(&office_lease()).unwrap();
        assert_eq!(s.len(), 24);
        assert_eq!(s.payments[0].due_date, date(2024, 1, 1));
        assert_eq!(s.payments[0].period_end, date(2024, 1, 31));
        assert_eq!(s.payments[1].due_date, date(2024, 2, 1));
        assert_eq!(s.payments[23].period_end, date(2025, 12, 31));
        assert!(s.is_level());
        assert_eq!(s.total(), dec!(1200000));
    }

    #[test]
    fn test_quarterly_arrears_due_on_period_end() {
        let mut t = office_lease();
        t.payment_frequency = PaymentFrequency::Quarterly;
        t.payment_timing = PaymentTiming::Arrears;
        let s = build_payment_schedule(&t).unwrap();
        assert_eq!(s.len(), 8);
        assert_eq!(s.payments[0].due_date, date(2024, 3, 31));
        assert_eq!(s.payments[1].due_date, date(2024, 6, 30));
    }

    #[test]
    fn test_month_end_commencement_clamps() {
        let mut t = office_lease();
        t.commencement_date = date(2024, 1, 31);
        let s = build_payment_schedule(&t).unwrap();
        assert_eq!(s.payments[1].due_date, date(2024, 2, 29));
        assert_eq!(s.payments[0].period_end, date(2024, 2, 28));
    }

    #[test]
    fn test_escalation_from_period_13() {
        let mut t = office_lease();
        t.escalation = EscalationPolicy::FixedPercentage {
            rate: dec!(0.05),
            effective_period: 13,
            step_periods: None,
        };
        let s = build_payment_schedule(&t).unwrap();
        assert_eq!(s.payments[11].amount, dec!(50000));
        assert_eq!(s.payments[12].amount, dec!(52500));
        assert!(!s.is_level());
    }

    #[test]
    fn test_certain_extension_appends_uplifted_periods() {
        let mut t = office_lease();
        t.extension_years = Some(dec!(1));
        t.extension_reasonably_certain = true;
        t.extension_payment_growth = Some(dec!(0.10));
        let s = build_payment_schedule(&t).unwrap();
        assert_eq!(s.len(), 36);
        assert_eq!(s.non_cancellable().len(), 24);
        assert_eq!(s.extension().len(), 12);
        assert!(s.extension().iter().all(|p| p.is_extension));
        assert_eq!(s.payments[24].amount, dec!(55000));
    }
}
