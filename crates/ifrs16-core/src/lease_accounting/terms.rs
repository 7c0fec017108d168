//! Typed lease contract terms.
//!
//! `LeaseTerms` is the single record shape for both the minimal and the full
//! intake parameter sets: full-mode fields are optional and resolve to the
//! IFRS-neutral defaults below when absent.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::escalation::EscalationPolicy;
use crate::error::Ifrs16Error;
use crate::time_value::AnnuityType;
use crate::types::{Currency, Money, Rate, Years};
use crate::Ifrs16Result;

// ---------------------------------------------------------------------------
// Defaults for absent full-mode fields
// ---------------------------------------------------------------------------

pub const DEFAULT_PAYMENT_FREQUENCY: PaymentFrequency = PaymentFrequency::Monthly;
pub const DEFAULT_PAYMENT_TIMING: PaymentTiming = PaymentTiming::Advance;
pub const NO_EXTENSION_YEARS: Years = Decimal::ZERO;
pub const NO_PREPAYMENTS: Money = Decimal::ZERO;
pub const NO_INITIAL_DIRECT_COSTS: Money = Decimal::ZERO;
pub const NO_LEASE_INCENTIVES: Money = Decimal::ZERO;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    #[default]
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl PaymentFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::SemiAnnual => 2,
            PaymentFrequency::Annual => 1,
        }
    }

    pub fn months_per_period(self) -> u32 {
        12 / self.periods_per_year()
    }
}

impl FromStr for PaymentFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match key.as_str() {
            "monthly" | "month" | "m" | "12" => Ok(PaymentFrequency::Monthly),
            "quarterly" | "quarter" | "q" | "4" => Ok(PaymentFrequency::Quarterly),
            "semiannual" | "semiannually" | "halfyearly" | "biannual" | "2" => {
                Ok(PaymentFrequency::SemiAnnual)
            }
            "annual" | "annually" | "yearly" | "year" | "1" => Ok(PaymentFrequency::Annual),
            _ => Err(format!(
                "'{s}' is not a payment frequency (monthly, quarterly, semi-annual, annual)"
            )),
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentFrequency::Monthly => "Monthly",
            PaymentFrequency::Quarterly => "Quarterly",
            PaymentFrequency::SemiAnnual => "Semi-annual",
            PaymentFrequency::Annual => "Annual",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentTiming {
    #[default]
    Advance,
    Arrears,
}

impl PaymentTiming {
    pub fn annuity_type(self) -> AnnuityType {
        match self {
            PaymentTiming::Advance => AnnuityType::Due,
            PaymentTiming::Arrears => AnnuityType::Ordinary,
        }
    }

    /// Periods between commencement and the first payment.
    pub fn first_payment_offset(self) -> u32 {
        match self {
            PaymentTiming::Advance => 0,
            PaymentTiming::Arrears => 1,
        }
    }
}

impl FromStr for PaymentTiming {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        match key.trim_start_matches("in ") {
            "advance" | "beginning" | "start" | "due" => Ok(PaymentTiming::Advance),
            "arrears" | "arrear" | "end" | "ordinary" => Ok(PaymentTiming::Arrears),
            _ => Err(format!("'{s}' is not a payment timing (advance, arrears)")),
        }
    }
}

// ---------------------------------------------------------------------------
// Lease terms
// ---------------------------------------------------------------------------

/// Commercial terms of one lease, ready for calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseTerms {
    pub contract_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lessee_entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lessor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_class: Option<String>,
    pub commencement_date: NaiveDate,
    /// Non-cancellable term in years
    pub non_cancellable_years: Years,
    /// Fixed payment per payment period
    pub fixed_payment: Money,
    #[serde(default)]
    pub payment_frequency: PaymentFrequency,
    #[serde(default)]
    pub payment_timing: PaymentTiming,
    #[serde(default)]
    pub currency: Currency,
    /// Annual incremental borrowing rate as a decimal fraction
    pub incremental_borrowing_rate: Rate,
    /// Useful life of the underlying asset in years
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub useful_life_years: Option<Years>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_years: Option<Years>,
    /// Informational only; the extension gate is `extension_reasonably_certain`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_likelihood: Option<Rate>,
    #[serde(default)]
    pub extension_reasonably_certain: bool,
    /// Uplift on payments falling in the extension period
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_payment_growth: Option<Rate>,
    #[serde(default, skip_serializing_if = "EscalationPolicy::is_none")]
    pub escalation: EscalationPolicy,
    /// Lease payments made at or before commencement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepayments: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_direct_costs: Option<Money>,
    /// Lease incentives received from the lessor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease_incentives: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_option_price: Option<Money>,
    #[serde(default)]
    pub purchase_option_reasonably_certain: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residual_value_guarantee: Option<Money>,
}

impl LeaseTerms {
    /// Minimal-mode terms with every full-mode field at its default.
    pub fn minimal(
        contract_id: impl Into<String>,
        commencement_date: NaiveDate,
        non_cancellable_years: Years,
        fixed_payment: Money,
        incremental_borrowing_rate: Rate,
    ) -> Self {
        LeaseTerms {
            contract_id: contract_id.into(),
            lessee_entity: None,
            lessor_name: None,
            asset_description: None,
            asset_class: None,
            commencement_date,
            non_cancellable_years,
            fixed_payment,
            payment_frequency: DEFAULT_PAYMENT_FREQUENCY,
            payment_timing: DEFAULT_PAYMENT_TIMING,
            currency: Currency::default(),
            incremental_borrowing_rate,
            useful_life_years: None,
            extension_years: None,
            extension_likelihood: None,
            extension_reasonably_certain: false,
            extension_payment_growth: None,
            escalation: EscalationPolicy::None,
            prepayments: None,
            initial_direct_costs: None,
            lease_incentives: None,
            purchase_option_price: None,
            purchase_option_reasonably_certain: false,
            residual_value_guarantee: None,
        }
    }

    pub fn periods_per_year(&self) -> u32 {
        self.payment_frequency.periods_per_year()
    }

    pub fn non_cancellable_periods(&self) -> Ifrs16Result<u32> {
        whole_periods(
            self.non_cancellable_years,
            self.periods_per_year(),
            "non_cancellable_years",
        )
    }

    /// Extension periods counted in the lease term; zero unless the
    /// extension is reasonably certain.
    pub fn extension_periods(&self) -> Ifrs16Result<u32> {
        if !self.extension_reasonably_certain {
            return Ok(0);
        }
        whole_periods(
            self.extension_years.unwrap_or(NO_EXTENSION_YEARS),
            self.periods_per_year(),
            "extension_years",
        )
    }

    pub fn total_periods(&self) -> Ifrs16Result<u32> {
        Ok(self.non_cancellable_periods()? + self.extension_periods()?)
    }

    /// Useful life in whole payment periods (part periods dropped).
    pub fn useful_life_periods(&self) -> Option<u32> {
        self.useful_life_years.map(|years| {
            (years * Decimal::from(self.periods_per_year()))
                .floor()
                .to_u32()
                .unwrap_or(0)
        })
    }

    pub fn prepayments_amount(&self) -> Money {
        self.prepayments.unwrap_or(NO_PREPAYMENTS)
    }

    pub fn initial_direct_costs_amount(&self) -> Money {
        self.initial_direct_costs.unwrap_or(NO_INITIAL_DIRECT_COSTS)
    }

    pub fn lease_incentives_amount(&self) -> Money {
        self.lease_incentives.unwrap_or(NO_LEASE_INCENTIVES)
    }

    /// Residual expected to survive the term in the lessee's hands.
    pub fn retained_residual(&self) -> Money {
        if self.purchase_option_reasonably_certain {
            if let Some(price) = self.purchase_option_price {
                return price;
            }
        }
        self.residual_value_guarantee.unwrap_or(Decimal::ZERO)
    }
}

fn whole_periods(years: Years, periods_per_year: u32, field: &str) -> Ifrs16Result<u32> {
    let periods = years * Decimal::from(periods_per_year);
    if periods < Decimal::ZERO || !periods.fract().is_zero() {
        return Err(Ifrs16Error::InvalidInput {
            field: field.into(),
            reason: format!(
                "{years} years is not a whole number of payment periods at {periods_per_year} per year"
            ),
        });
    }
    periods.to_u32().ok_or_else(|| Ifrs16Error::InvalidInput {
        field: field.into(),
        reason: format!("{periods} periods is out of range"),
    })
}
