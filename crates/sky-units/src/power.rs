//! Exact and real exponents attached to unit bases.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg};

use serde::{Deserialize, Serialize};
use sky_core::errors::{ErrorInfo, SkyError};

/// Largest denominator recovered by [`Power::from_f64`].
pub const MAX_SIMPLE_DENOMINATOR: i64 = 100;

fn power_error(code: &str, message: impl Into<String>) -> SkyError {
    SkyError::Units(ErrorInfo::new(code, message))
}

fn gcd(a: i64, b: i64) -> u64 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Exponent of a unit base.
///
/// Rational powers are kept exact and always normalised (positive
/// denominator, lowest terms). Powers that have no simple fractional form are
/// stored as reals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Power {
    /// Exact rational power `num / den`.
    Ratio {
        /// Numerator (carries the sign).
        num: i64,
        /// Denominator, always positive.
        den: i64,
    },
    /// Real-valued power.
    Real {
        /// Raw exponent value.
        value: f64,
    },
}

impl Power {
    /// Power of exactly one.
    pub const ONE: Power = Power::Ratio { num: 1, den: 1 };

    /// Integral power.
    pub fn int(value: i64) -> Self {
        Power::Ratio { num: value, den: 1 }
    }

    /// Rational power, reduced to lowest terms.
    ///
    /// Fails with `power-overflow` when the normalised fraction does not fit
    /// in `i64`, e.g. `1 / i64::MIN`.
    pub fn ratio(num: i64, den: i64) -> Result<Self, SkyError> {
        if den == 0 {
            return Err(power_error(
                "zero-denominator",
                format!("power {num}/0 has a zero denominator"),
            ));
        }
        let divisor = i128::from(gcd(num, den).max(1));
        let (mut wide_num, mut wide_den) = (i128::from(num) / divisor, i128::from(den) / divisor);
        if wide_den < 0 {
            wide_num = -wide_num;
            wide_den = -wide_den;
        }
        match (i64::try_from(wide_num), i64::try_from(wide_den)) {
            (Ok(num), Ok(den)) => Ok(Power::Ratio { num, den }),
            _ => Err(SkyError::Units(
                ErrorInfo::new("power-overflow", "power does not fit in a 64-bit fraction")
                    .with_context("num", num.to_string())
                    .with_context("den", den.to_string()),
            )),
        }
    }

    /// Converts a float into a power, recovering simple fractions such as
    /// `0.5` or `1/3` when the float is exactly representable that way.
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            for den in 1..=MAX_SIMPLE_DENOMINATOR {
                let num = (value * den as f64).round();
                if num.abs() < i64::MAX as f64 && num / den as f64 == value {
                    if let Ok(power) = Power::ratio(num as i64, den) {
                        return power;
                    }
                }
            }
        }
        Power::Real { value }
    }

    /// Returns the power as a float.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Power::Ratio { num, den } => num as f64 / den as f64,
            Power::Real { value } => value,
        }
    }

    /// True for a power of exactly one.
    pub fn is_one(&self) -> bool {
        match *self {
            Power::Ratio { num, den } => num == 1 && den == 1,
            Power::Real { value } => value == 1.0,
        }
    }

    /// True for a zero power.
    pub fn is_zero(&self) -> bool {
        match *self {
            Power::Ratio { num, .. } => num == 0,
            Power::Real { value } => value == 0.0,
        }
    }

    /// True for a strictly negative power.
    pub fn is_negative(&self) -> bool {
        self.as_f64() < 0.0
    }
}

impl Neg for Power {
    type Output = Power;

    fn neg(self) -> Power {
        match self {
            Power::Ratio { num, den } => match num.checked_neg() {
                Some(num) => Power::Ratio { num, den },
                None => Power::Real {
                    value: -(num as f64 / den as f64),
                },
            },
            Power::Real { value } => Power::Real { value: -value },
        }
    }
}

/// Exact when both operands are rational and nothing overflows.
impl Add for Power {
    type Output = Power;

    fn add(self, other: Power) -> Power {
        if let (Power::Ratio { num: a, den: b }, Power::Ratio { num: c, den: d }) = (self, other) {
            let exact = a
                .checked_mul(d)
                .zip(c.checked_mul(b))
                .and_then(|(left, right)| left.checked_add(right))
                .zip(b.checked_mul(d));
            if let Some((num, den)) = exact {
                if let Ok(power) = Power::ratio(num, den) {
                    return power;
                }
            }
        }
        Power::from_f64(self.as_f64() + other.as_f64())
    }
}

impl Mul for Power {
    type Output = Power;

    fn mul(self, other: Power) -> Power {
        if let (Power::Ratio { num: a, den: b }, Power::Ratio { num: c, den: d }) = (self, other) {
            if let Some((num, den)) = a.checked_mul(c).zip(b.checked_mul(d)) {
                if let Ok(power) = Power::ratio(num, den) {
                    return power;
                }
            }
        }
        Power::from_f64(self.as_f64() * other.as_f64())
    }
}

impl From<i64> for Power {
    fn from(value: i64) -> Self {
        Power::int(value)
    }
}

impl From<i32> for Power {
    fn from(value: i32) -> Self {
        Power::int(value as i64)
    }
}

impl PartialOrd for Power {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_f64().partial_cmp(&other.as_f64())
    }
}

/// Renders integral powers as integers and other rationals as `n/d`.
impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Power::Ratio { num, den: 1 } => write!(f, "{num}"),
            Power::Ratio { num, den } => write!(f, "{num}/{den}"),
            Power::Real { value } => write!(f, "{value}"),
        }
    }
}
