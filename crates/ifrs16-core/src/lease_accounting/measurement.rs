//! Initial measurement of the lease liability and right-of-use asset.
//!
//! Liability = PV of the payments over the non-cancellable term, plus the PV
//! of payments over the extension when the extension is reasonably certain,
//! discounted at the incremental borrowing rate converted to a per-period
//! rate. Payments in advance are an annuity-due (first payment undiscounted),
//! payments in arrears an ordinary annuity.
//!
//! ROU asset = liability + prepayments + initial direct costs - incentives.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::payments::PaymentSchedule;
use super::terms::LeaseTerms;
use crate::error::Ifrs16Error;
use crate::time_value::{annuity_factor, periodic_rate, pv_of_stream, AnnuityType, RateConvention};
use crate::types::{round_money, Money, Rate};
use crate::Ifrs16Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialMeasurement {
    pub per_period_rate: Rate,
    pub annuity_type: AnnuityType,
    /// PV of the non-cancellable payments
    pub non_cancellable_pv: Money,
    /// PV of the reasonably certain extension payments
    pub extension_pv: Money,
    pub initial_lease_liability: Money,
    pub prepayments: Money,
    pub initial_direct_costs: Money,
    pub lease_incentives: Money,
    pub initial_rou_asset: Money,
    /// Unrounded liability the schedules run from
    #[serde(skip)]
    pub exact_liability: Decimal,
}

/// Measure the liability and ROU asset at commencement.
pub fn measure_initial(
    terms: &LeaseTerms,
    schedule: &PaymentSchedule,
    convention: RateConvention,
) -> Ifrs16Result<InitialMeasurement> {
    let rate = periodic_rate(
        terms.incremental_borrowing_rate,
        schedule.periods_per_year,
        convention,
    );
    let kind = schedule.timing.annuity_type();
    let offset = schedule.timing.first_payment_offset();

    if rate <= Decimal::ZERO || schedule.non_cancellable_periods == 0 {
        return Err(Ifrs16Error::DegenerateRate {
            context: format!(
                "{}: IBR {} over {} periods gives no positive discount rate",
                terms.contract_id, terms.incremental_borrowing_rate, schedule.non_cancellable_periods
            ),
            per_period_rate: rate,
            periods: schedule.non_cancellable_periods,
        });
    }

    let non_cancellable = schedule.non_cancellable();
    let extension = schedule.extension();

    let exact_nc = if schedule.is_level() {
        let level = non_cancellable[0].amount;
        level * annuity_factor(rate, non_cancellable.len() as u32, kind)?
    } else {
        let amounts: Vec<Money> = non_cancellable.iter().map(|p| p.amount).collect();
        pv_of_stream(rate, &amounts, offset)?
    };

    let exact_ext = if extension.is_empty() {
        Decimal::ZERO
    } else {
        let amounts: Vec<Money> = extension.iter().map(|p| p.amount).collect();
        pv_of_stream(rate, &amounts, offset + non_cancellable.len() as u32)?
    };

    let exact_liability = exact_nc + exact_ext;
    let initial_lease_liability = round_money(exact_liability);
    let non_cancellable_pv = round_money(exact_nc);
    let extension_pv = initial_lease_liability - non_cancellable_pv;

    let prepayments = terms.prepayments_amount();
    let initial_direct_costs = terms.initial_direct_costs_amount();
    let lease_incentives = terms.lease_incentives_amount();
    let initial_rou_asset =
        initial_lease_liability + prepayments + initial_direct_costs - lease_incentives;

    if initial_rou_asset < Decimal::ZERO {
        return Err(Ifrs16Error::InvalidInput {
            field: "lease_incentives".into(),
            reason: format!(
                "Incentives of {lease_incentives} exceed liability plus capitalised costs; ROU asset would be {initial_rou_asset}"
            ),
        });
    }

    log::debug!(
        "{}: per-period rate {}, liability {} (extension {}), ROU {}",
        terms.contract_id,
        rate,
        initial_lease_liability,
        extension_pv,
        initial_rou_asset
    );

    Ok(InitialMeasurement {
        per_period_rate: rate,
        annuity_type: kind,
        non_cancellable_pv,
        extension_pv,
        initial_lease_liability,
        prepayments,
        initial_direct_costs,
        lease_incentives,
        initial_rou_asset,
        exact_liability,
    })
}
