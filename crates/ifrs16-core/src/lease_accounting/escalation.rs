//! Rent escalation policies.
//!
//! Escalation is a prospective change to the contractual payment: periods
//! before the effective period keep the base payment, later periods use the
//! base payment scaled by the policy's factor. `factor_for_period` is the one
//! place each policy kind is interpreted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Ifrs16Error;
use crate::types::Rate;
use crate::Ifrs16Result;

/// Closed set of escalation policies a lease can carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EscalationPolicy {
    #[default]
    None,
    /// Payment rises by `rate` from `effective_period` (1-based). With
    /// `step_periods` set the uplift compounds again every `step_periods`
    /// periods; without it the rise is a single step.
    FixedPercentage {
        rate: Rate,
        effective_period: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step_periods: Option<u32>,
    },
    /// Payment is rebased by `current_index / base_index` from
    /// `effective_period` (1-based).
    IndexLinked {
        base_index: Decimal,
        current_index: Decimal,
        effective_period: u32,
    },
}

impl EscalationPolicy {
    pub fn is_none(&self) -> bool {
        matches!(self, EscalationPolicy::None)
    }

    /// Check the policy parameters can be applied.
    pub fn validate(&self) -> Ifrs16Result<()> {
        match self {
            EscalationPolicy::None => Ok(()),
            EscalationPolicy::FixedPercentage {
                rate,
                effective_period,
                step_periods,
            } => {
                if *rate <= Decimal::NEGATIVE_ONE {
                    return Err(Ifrs16Error::InvalidInput {
                        field: "escalation.rate".into(),
                        reason: "Escalation rate must be greater than -100%".into(),
                    });
                }
                if *effective_period == 0 {
                    return Err(Ifrs16Error::InvalidInput {
                        field: "escalation.effective_period".into(),
                        reason: "Effective period is 1-based and must be at least 1".into(),
                    });
                }
                if *step_periods == Some(0) {
                    return Err(Ifrs16Error::InvalidInput {
                        field: "escalation.step_periods".into(),
                        reason: "Step interval must be at least one period".into(),
                    });
                }
                Ok(())
            }
            EscalationPolicy::IndexLinked {
                base_index,
                current_index,
                effective_period,
            } => {
                if *base_index <= Decimal::ZERO {
                    return Err(Ifrs16Error::InvalidInput {
                        field: "escalation.base_index".into(),
                        reason: "Base index must be positive".into(),
                    });
                }
                if *current_index <= Decimal::ZERO {
                    return Err(Ifrs16Error::InvalidInput {
                        field: "escalation.current_index".into(),
                        reason: "Current index must be positive".into(),
                    });
                }
                if *effective_period == 0 {
                    return Err(Ifrs16Error::InvalidInput {
                        field: "escalation.effective_period".into(),
                        reason: "Effective period is 1-based and must be at least 1".into(),
                    });
                }
                Ok(())
            }
        }
    }

    /// Multiplier applied to the base payment in `period` (1-based).
    ///
    /// Fails when compounding outgrows the decimal range.
    pub fn factor_for_period(&self, period: u32) -> Ifrs16Result<Decimal> {
        match self {
            EscalationPolicy::None => Ok(Decimal::ONE),
            EscalationPolicy::FixedPercentage {
                rate,
                effective_period,
                step_periods,
            } => {
                if period < *effective_period {
                    return Ok(Decimal::ONE);
                }
                let steps = match step_periods {
                    Some(every) if *every > 0 => 1 + (period - effective_period) / every,
                    _ => 1,
                };
                let mut factor = Decimal::ONE;
                for _ in 0..steps {
                    factor = factor
                        .checked_mul(Decimal::ONE + rate)
                        .ok_or_else(|| overflow(period))?;
                }
                Ok(factor)
            }
            EscalationPolicy::IndexLinked {
                base_index,
                current_index,
                effective_period,
            } => {
                if period < *effective_period || base_index.is_zero() {
                    Ok(Decimal::ONE)
                } else {
                    current_index
                        .checked_div(*base_index)
                        .ok_or_else(|| overflow(period))
                }
            }
        }
    }
}

pub(crate) fn overflow(period: u32) -> Ifrs16Error {
    Ifrs16Error::InvalidInput {
        field: "escalation".into(),
        reason: format!("Escalated payment for period {period} is out of range"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_none_is_flat() {
        let p = EscalationPolicy::None;
        assert_eq!(p.factor_for_period(1).unwrap(), Decimal::ONE);
        assert_eq!(p.factor_for_period(120).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_fixed_single_step() {
        let p = EscalationPolicy::FixedPercentage {
            rate: dec!(0.05),
            effective_period: 13,
            step_periods: None,
        };
        assert_eq!(p.factor_for_period(12).unwrap(), Decimal::ONE);
        assert_eq!(p.factor_for_period(13).unwrap(), dec!(1.05));
        assert_eq!(p.factor_for_period(60).unwrap(), dec!(1.05));
    }

    #[test]
    fn test_fixed_compounding_every_year() {
        let p = EscalationPolicy::FixedPercentage {
            rate: dec!(0.10),
            effective_period: 13,
            step_periods: Some(12),
        };
        assert_eq!(p.factor_for_period(24).unwrap(), dec!(1.10));
        assert_eq!(p.factor_for_period(25).unwrap(), dec!(1.21));
        assert_eq!(p.factor_for_period(37).unwrap(), dec!(1.331));
    }

    #[test]
    fn test_index_linked_rebases() {
        let p = EscalationPolicy::IndexLinked {
            base_index: dec!(200),
            current_index: dec!(230),
            effective_period: 7,
        };
        assert_eq!(p.factor_for_period(6).unwrap(), Decimal::ONE);
        assert_eq!(p.factor_for_period(7).unwrap(), dec!(1.15));
    }

    #[test]
    fn test_runaway_compounding_is_an_error() {
        let p = EscalationPolicy::FixedPercentage {
            rate: dec!(1),
            effective_period: 1,
            step_periods: Some(1),
        };
        assert_eq!(p.factor_for_period(10).unwrap(), dec!(1024));
        assert!(matches!(
            p.factor_for_period(120),
            Err(Ifrs16Error::InvalidInput { ref field, .. }) if field == "escalation"
        ));
    }

    #[test]
    fn test_validate_rejects_zero_base_index() {
        let p = EscalationPolicy::IndexLinked {
            base_index: Decimal::ZERO,
            current_index: dec!(100),
            effective_period: 1,
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_serde_tagged_shape() {
        let json = r#"{"type":"fixed_percentage","rate":"0.05","effective_period":13}"#;
        let p: EscalationPolicy = serde_json::from_str(json).unwrap();
        assert_eq!(
            p,
            EscalationPolicy::FixedPercentage {
                rate: dec!(0.05),
                effective_period: 13,
                step_periods: None,
            }
        );
    }
}
