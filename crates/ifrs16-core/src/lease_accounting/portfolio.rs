//! Disclosure across several concurrently active leases.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::disclosure::{Tranche, RATE_DP, TERM_DP};
use super::engine::CalculationResult;
use crate::error::Ifrs16Error;
use crate::types::{Currency, Money, Rate, Years};
use crate::Ifrs16Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioDisclosure {
    pub reporting_date: NaiveDate,
    pub currency: Currency,
    pub lease_count: usize,
    pub current: Tranche,
    pub non_current: Tranche,
    pub total: Tranche,
    pub maturity_analysis: Vec<Tranche>,
    pub carrying_liability: Money,
    pub rou_carrying_amount: Money,
    /// Weighted by carrying liability
    pub weighted_average_remaining_term_years: Years,
    /// Weighted by carrying liability
    pub weighted_average_discount_rate: Rate,
}

/// Sum the per-lease disclosures of `results` into one portfolio view.
///
/// All leases must share a currency and a reporting date. Averages are
/// weighted by each lease's carrying liability, or equally when every
/// carrying amount is zero.
pub fn aggregate_portfolio(results: &[CalculationResult]) -> Ifrs16Result<PortfolioDisclosure> {
    let first = results.first().ok_or_else(|| Ifrs16Error::InvalidInput {
        field: "leases".into(),
        reason: "Portfolio needs at least one lease".into(),
    })?;
    let reporting_date = first.disclosure.reporting_date;
    let currency = first.currency.clone();

    for r in &results[1..] {
        if r.currency != currency {
            return Err(Ifrs16Error::InvalidInput {
                field: "currency".into(),
                reason: format!(
                    "{} is in {}, portfolio is in {}",
                    r.contract_id, r.currency, currency
                ),
            });
        }
        if r.disclosure.reporting_date != reporting_date {
            return Err(Ifrs16Error::InvalidInput {
                field: "reporting_date".into(),
                reason: format!(
                    "{} is disclosed at {}, portfolio at {}",
                    r.contract_id, r.disclosure.reporting_date, reporting_date
                ),
            });
        }
    }

    let disclosures: Vec<_> = results.iter().map(|r| &r.disclosure).collect();
    let current = sum_tranches("Current", disclosures.iter().map(|d| &d.current));
    let non_current = sum_tranches("Non-current", disclosures.iter().map(|d| &d.non_current));
    let total = sum_tranches("Total", disclosures.iter().map(|d| &d.total));

    let maturity_analysis = first
        .disclosure
        .maturity_analysis
        .iter()
        .enumerate()
        .map(|(i, bucket)| {
            sum_tranches(
                &bucket.label,
                disclosures.iter().filter_map(|d| d.maturity_analysis.get(i)),
            )
        })
        .collect();

    let carrying_liability: Money = disclosures.iter().map(|d| d.carrying_liability).sum();
    let rou_carrying_amount: Money = disclosures.iter().map(|d| d.rou_carrying_amount).sum();

    let weights: Vec<Decimal> = if carrying_liability.is_zero() {
        vec![Decimal::ONE; disclosures.len()]
    } else {
        disclosures.iter().map(|d| d.carrying_liability).collect()
    };
    let weight_total: Decimal = weights.iter().copied().sum();
    let weighted = |value: &dyn Fn(usize) -> Decimal| -> Decimal {
        weights
            .iter()
            .enumerate()
            .map(|(i, w)| *w * value(i))
            .sum::<Decimal>()
            / weight_total
    };
    let term = weighted(&|i| disclosures[i].weighted_average_remaining_term_years);
    let rate = weighted(&|i| disclosures[i].weighted_average_discount_rate);

    log::debug!(
        "portfolio of {} leases at {}: liability {}",
        results.len(),
        reporting_date,
        carrying_liability
    );

    Ok(PortfolioDisclosure {
        reporting_date,
        currency,
        lease_count: results.len(),
        current,
        non_current,
        total,
        maturity_analysis,
        carrying_liability,
        rou_carrying_amount,
        weighted_average_remaining_term_years: term.round_dp(TERM_DP),
        weighted_average_discount_rate: rate.round_dp(RATE_DP),
    })
}

fn sum_tranches<'a>(label: &str, tranches: impl Iterator<Item = &'a Tranche>) -> Tranche {
    let mut out = Tranche {
        label: label.to_string(),
        payments: 0,
        undiscounted: Decimal::ZERO,
        present_value: Decimal::ZERO,
    };
    for t in tranches {
        out.payments += t.payments;
        out.undiscounted += t.undiscounted;
        out.present_value += t.present_value;
    }
    out
}
