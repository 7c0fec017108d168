//! Lease liability amortization (effective interest method).
//!
//! The running balance is carried unrounded; each row is finalized by
//! rounding its closing balance to cents and deriving the principal and
//! interest components from the rounded balances, so
//! `closing = opening - principal` and `interest + principal = rent` hold
//! exactly on every row without rounding drift building up.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::payments::PaymentSchedule;
use super::terms::PaymentTiming;
use crate::error::Ifrs16Error;
use crate::types::{round_money, Money, Rate};
use crate::Ifrs16Result;

/// One payment period of the liability schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashflowRow {
    /// Period number (1-indexed)
    pub period: u32,
    pub due_date: NaiveDate,
    pub opening_balance: Money,
    /// Gross rent due this period
    pub rent: Money,
    pub interest: Money,
    /// Liability reduction
    pub principal: Money,
    pub closing_balance: Money,
    pub is_extension: bool,
}

/// Produce the liability schedule for `schedule`, starting from the
/// unrounded initial liability.
///
/// Under payments in advance the first payment carries no interest: nothing
/// has accrued at commencement. The final row's principal is forced to clear
/// the remaining balance; if the unrounded residual being cleared exceeds
/// `materiality_threshold` the schedule is inconsistent with the liability
/// and `ScheduleDivergence` is returned.
pub fn generate_amortization(
    schedule: &PaymentSchedule,
    exact_liability: Decimal,
    per_period_rate: Rate,
    materiality_threshold: Money,
) -> Ifrs16Result<Vec<CashflowRow>> {
    let n = schedule.payments.len();
    let mut rows = Vec::with_capacity(n);
    let growth = Decimal::ONE + per_period_rate;

    let mut balance = exact_liability;
    let mut opening = round_money(exact_liability);

    for (i, payment) in schedule.payments.iter().enumerate() {
        let accrues = !(i == 0 && schedule.timing == PaymentTiming::Advance);
        if accrues {
            balance *= growth;
        }
        balance -= payment.amount;

        let closing = if i + 1 == n {
            if balance.abs() > materiality_threshold {
                return Err(Ifrs16Error::ScheduleDivergence {
                    schedule: "lease liability".into(),
                    period: payment.period,
                    residual: balance,
                    threshold: materiality_threshold,
                });
            }
            Decimal::ZERO
        } else {
            round_money(balance)
        };

        let principal = opening - closing;
        rows.push(CashflowRow {
            period: payment.period,
            due_date: payment.due_date,
            opening_balance: opening,
            rent: payment.amount,
            interest: payment.amount - principal,
            principal,
            closing_balance: closing,
            is_extension: payment.is_extension,
        });
        opening = closing;
    }

    log::debug!(
        "amortization: {} rows, residual cleared in final period {}",
        rows.len(),
        balance
    );

    Ok(rows)
}

/// Sum of the interest column.
pub fn total_interest(rows: &[CashflowRow]) -> Money {
    rows.iter().map(|r| r.interest).sum()
}
