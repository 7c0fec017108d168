use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Decimal places kept on every finalized monetary figure.
pub const MONEY_DP: u32 = 2;

/// Round a monetary amount to cents, midpoint away from zero.
pub fn round_money(amount: Money) -> Money {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Currency code
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    NGN,
    USD,
    GBP,
    EUR,
    ZAR,
    KES,
    GHS,
    Other(String),
}

impl Currency {
    pub fn code(&self) -> &str {
        match self {
            Currency::NGN => "NGN",
            Currency::USD => "USD",
            Currency::GBP => "GBP",
            Currency::EUR => "EUR",
            Currency::ZAR => "ZAR",
            Currency::KES => "KES",
            Currency::GHS => "GHS",
            Currency::Other(code) => code,
        }
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(format!("'{s}' is not a three-letter currency code"));
        }
        Ok(match code.as_str() {
            "NGN" => Currency::NGN,
            "USD" => Currency::USD,
            "GBP" => Currency::GBP,
            "EUR" => Currency::EUR,
            "ZAR" => Currency::ZAR,
            "KES" => Currency::KES,
            "GHS" => Currency::GHS,
            _ => Currency::Other(code),
        })
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_midpoint_away_from_zero() {
        assert_eq!(round_money(dec!(10.005)), dec!(10.01));
        assert_eq!(round_money(dec!(-10.005)), dec!(-10.01));
        assert_eq!(round_money(dec!(10.0049)), dec!(10.00));
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!("ngn".parse::<Currency>().unwrap(), Currency::NGN);
        assert_eq!(" usd ".parse::<Currency>().unwrap(), Currency::USD);
        assert_eq!(
            "chf".parse::<Currency>().unwrap(),
            Currency::Other("CHF".into())
        );
        assert!("naira".parse::<Currency>().is_err());
        assert_eq!(Currency::Other("CHF".into()).to_string(), "CHF");
    }
}
