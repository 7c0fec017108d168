use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::Ifrs16Error;
use crate::types::{Money, Rate};
use crate::Ifrs16Result;

const NEWTON_ITERATIONS: u32 = 30;
const ROOT_TOLERANCE: Decimal = dec!(0.0000000000001);

/// How an annual rate is turned into a rate per payment period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateConvention {
    /// annual / periods_per_year
    #[default]
    Nominal,
    /// (1 + annual)^(1 / periods_per_year) - 1
    Effective,
}

/// Ordinary annuity (payments at period end) or annuity-due (period start).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnuityType {
    Ordinary,
    Due,
}

/// Convert an annual rate into the rate for one of `periods_per_year` periods.
pub fn periodic_rate(annual_rate: Rate, periods_per_year: u32, convention: RateConvention) -> Rate {
    if periods_per_year <= 1 {
        return annual_rate;
    }
    match convention {
        RateConvention::Nominal => annual_rate / Decimal::from(periods_per_year),
        RateConvention::Effective => {
            nth_root(Decimal::ONE + annual_rate, periods_per_year) - Decimal::ONE
        }
    }
}

/// Newton's method for the nth root of A.
/// x_{k+1} = ((n-1)*x_k + A / x_k^(n-1)) / n
fn nth_root(a: Decimal, n: u32) -> Decimal {
    if a <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if a == Decimal::ONE || n <= 1 {
        return a;
    }
    let n_dec = Decimal::from(n);
    let n_minus_1 = n_dec - Decimal::ONE;

    let mut x = a;
    if a > dec!(0.5) && a < dec!(2.0) {
        x = Decimal::ONE + (a - Decimal::ONE) / n_dec;
    }

    for _ in 0..NEWTON_ITERATIONS {
        let mut x_pow = Decimal::ONE;
        for _ in 0..(n - 1) {
            x_pow *= x;
        }
        if x_pow.is_zero() {
            break;
        }
        let x_new = (n_minus_1 * x + a / x_pow) / n_dec;
        if (x_new - x).abs() < ROOT_TOLERANCE {
            return x_new;
        }
        x = x_new;
    }
    x
}

fn check_rate(rate: Rate, periods: u32, context: &str) -> Ifrs16Result<()> {
    if rate.is_zero() || rate <= dec!(-1) || periods == 0 {
        return Err(Ifrs16Error::DegenerateRate {
            context: context.to_string(),
            per_period_rate: rate,
            periods,
        });
    }
    Ok(())
}

/// 1 / (1 + rate)^periods
pub fn discount_factor(rate: Rate, periods: u32) -> Ifrs16Result<Decimal> {
    if rate <= dec!(-1) {
        return Err(Ifrs16Error::DegenerateRate {
            context: "discount factor".into(),
            per_period_rate: rate,
            periods,
        });
    }
    let v = Decimal::ONE / (Decimal::ONE + rate);
    let mut factor = Decimal::ONE;
    for _ in 0..periods {
        factor *= v;
    }
    Ok(factor)
}

/// Present value of one unit paid every period for `periods` periods.
///
/// Ordinary: (1 - v^n) / r. Due: the ordinary factor times (1 + r).
pub fn annuity_factor(rate: Rate, periods: u32, kind: AnnuityType) -> Ifrs16Result<Decimal> {
    check_rate(rate, periods, "annuity factor")?;
    let vn = discount_factor(rate, periods)?;
    let ordinary = (Decimal::ONE - vn) / rate;
    Ok(match kind {
        AnnuityType::Ordinary => ordinary,
        AnnuityType::Due => ordinary * (Decimal::ONE + rate),
    })
}

/// Present value of a payment stream, one payment per period.
///
/// The first payment is discounted `first_offset` periods; each later payment
/// one period further.
pub fn pv_of_stream(rate: Rate, payments: &[Money], first_offset: u32) -> Ifrs16Result<Money> {
    check_rate(rate, payments.len() as u32, "payment stream present value")?;
    let v = Decimal::ONE / (Decimal::ONE + rate);
    let mut discount = discount_factor(rate, first_offset)?;
    let mut pv = Decimal::ZERO;
    for payment in payments {
        pv += *payment * discount;
        discount *= v;
    }
    Ok(pv)
}
