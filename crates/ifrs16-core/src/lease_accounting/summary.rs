//! Per lease-year roll-up of the liability and depreciation schedules.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amortization::CashflowRow;
use super::depreciation::DepreciationRow;
use crate::types::Money;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualSummary {
    /// Lease year (1-indexed)
    pub year: u32,
    pub rent_paid: Money,
    pub interest_expense: Money,
    pub principal_repaid: Money,
    pub depreciation: Money,
    /// Interest + depreciation charged to profit or loss
    pub total_expense: Money,
    pub closing_liability: Money,
    pub closing_rou_carrying_amount: Money,
}

pub fn annual_summary(
    cashflows: &[CashflowRow],
    depreciation: &[DepreciationRow],
    periods_per_year: u32,
    initial_rou: Money,
) -> Vec<AnnualSummary> {
    let ppy = periods_per_year.max(1);
    let periods = cashflows.len().max(depreciation.len()) as u32;
    let years = periods.div_ceil(ppy);

    let mut out = Vec::with_capacity(years as usize);
    let mut liability = cashflows.first().map(|r| r.opening_balance).unwrap_or(Decimal::ZERO);
    let mut rou = initial_rou;

    for year in 1..=years {
        let in_year = |period: u32| (period - 1) / ppy + 1 == year;

        let mut summary = AnnualSummary {
            year,
            rent_paid: Decimal::ZERO,
            interest_expense: Decimal::ZERO,
            principal_repaid: Decimal::ZERO,
            depreciation: Decimal::ZERO,
            total_expense: Decimal::ZERO,
            closing_liability: liability,
            closing_rou_carrying_amount: rou,
        };
        for row in cashflows.iter().filter(|r| in_year(r.period)) {
            summary.rent_paid += row.rent;
            summary.interest_expense += row.interest;
            summary.principal_repaid += row.principal;
            liability = row.closing_balance;
        }
        for row in depreciation.iter().filter(|r| in_year(r.period)) {
            summary.depreciation += row.depreciation;
            rou = row.net_carrying_amount;
        }
        summary.total_expense = summary.interest_expense + summary.depreciation;
        summary.closing_liability = liability;
        summary.closing_rou_carrying_amount = rou;
        out.push(summary);
    }
    out
}
