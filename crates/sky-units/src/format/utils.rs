//! Number and power helpers shared by the unit formatters.

use std::sync::Arc;

use sky_core::errors::{ErrorInfo, SkyError};

use crate::power::Power;
use crate::unit::NamedUnit;

/// Significant digits used when splitting a scale into mantissa and exponent.
pub const DEFAULT_PRECISION: usize = 8;

/// Formats `value` like C's `%.{precision}g`: scientific notation when the
/// decimal exponent is below -4 or at least `precision`, fixed otherwise, and
/// trailing zeros removed in both cases.
pub fn format_general(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "nan".to_string()
        } else if value > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }
    let precision = precision.max(1);
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Rounding to `precision` digits first decides which notation applies.
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .map(|(m, e)| (m.to_string(), e.parse::<i32>().unwrap_or(0)))
        .unwrap_or((scientific.clone(), 0));

    if exponent < -4 || exponent >= precision as i32 {
        let mantissa = strip_trailing_zeros(&mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, value))
    }
}

fn strip_trailing_zeros(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text.to_string()
    }
}

/// Splits a number into the mantissa and exponent strings used for
/// `m × 10^e` rendering.
///
/// The exponent loses its `+` sign and leading zeros and is empty when the
/// general format did not need one. The mantissa is empty only when it is a
/// bare `1.` followed by zeros.
pub fn split_mantissa_exponent(value: f64, precision: usize) -> (String, String) {
    let formatted = format_general(value, precision);
    let (mantissa, exponent) = match formatted.split_once('e') {
        Some((m, e)) => {
            let trimmed = e.trim_start_matches(['0', '+']);
            let exponent = match trimmed.strip_prefix('-') {
                Some(rest) => format!("-{}", rest.trim_start_matches('0')),
                None => trimmed.to_string(),
            };
            (m.to_string(), exponent)
        }
        None => (formatted, String::new()),
    };

    let unit_mantissa = mantissa.len() >= 2
        && mantissa.starts_with("1.")
        && mantissa[2..].chars().all(|c| c == '0');
    if unit_mantissa {
        (String::new(), exponent)
    } else {
        (mantissa, exponent)
    }
}

/// Base list borrowed from a composite unit.
pub type UnitList = Vec<(Arc<NamedUnit>, Power)>;

/// Splits bases into positive and negative powers. Negative powers are
/// returned negated so both lists carry positive exponents.
pub fn group_by_powers(bases: &[(Arc<NamedUnit>, Power)]) -> Result<(UnitList, UnitList), SkyError> {
    let mut positive = Vec::new();
    let mut negative = Vec::new();
    for (base, power) in bases {
        if power.is_zero() {
            return Err(SkyError::Units(
                ErrorInfo::new("zero-power", "Unit with 0 power")
                    .with_context("unit", base.name()),
            ));
        }
        if power.is_negative() {
            negative.push((Arc::clone(base), -*power));
        } else {
            positive.push((Arc::clone(base), *power));
        }
    }
    Ok((positive, negative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_format_switches_notation() {
        assert_eq!(format_general(100000.0, 8), "100000");
        assert_eq!(format_general(1.0e10, 8), "1e+10");
        assert_eq!(format_general(1.0e-5, 8), "1e-05");
        assert_eq!(format_general(0.0001, 8), "0.0001");
        assert_eq!(format_general(1.5e-7, 8), "1.5e-07");
        assert_eq!(format_general(123456789.0, 8), "1.2345679e+08");
        assert_eq!(format_general(-2.5, 8), "-2.5");
        assert_eq!(format_general(1.0e100, 8), "1e+100");
    }

    #[test]
    fn mantissa_and_exponent_split() {
        assert_eq!(split_mantissa_exponent(1.0e10, 8), ("1".into(), "10".into()));
        assert_eq!(split_mantissa_exponent(2.5e-7, 8), ("2.5".into(), "-7".into()));
        assert_eq!(split_mantissa_exponent(1000.0, 8), ("1000".into(), String::new()));
        assert_eq!(split_mantissa_exponent(-3.0e12, 8), ("-3".into(), "12".into()));
    }

    #[test]
    fn zero_powers_are_rejected() {
        let m = Arc::new(NamedUnit::new("m"));
        let err = group_by_powers(&[(m, Power::int(0))]).unwrap_err();
        assert_eq!(err.code(), "zero-power");
    }

    #[test]
    fn negative_powers_are_negated() {
        let m = Arc::new(NamedUnit::new("m"));
        let s = Arc::new(NamedUnit::new("s"));
        let (pos, neg) = group_by_powers(&[(m, Power::ONE), (s, Power::int(-2))]).unwrap();
        assert_eq!(pos.len(), 1);
        assert_eq!(neg[0].1, Power::int(2));
    }
}
