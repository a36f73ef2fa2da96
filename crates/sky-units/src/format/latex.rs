//! LaTeX rendering of composite units following IAU style.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sky_core::errors::{ErrorInfo, SkyError};

use super::utils::{group_by_powers, split_mantissa_exponent, DEFAULT_PRECISION};
use crate::power::Power;
use crate::unit::{CompositeUnit, NamedUnit};

/// Format key under which units register their LaTeX display name.
pub const LATEX_FORMAT_NAME: &str = "latex";

static TRAILING_SUPERSCRIPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.*\^\{[^}]*\}$").expect("superscript pattern"));

/// How negative powers are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatexMode {
    /// Negative powers go into the denominator of a `\frac`.
    #[default]
    Display,
    /// Every base stays in a flat product with signed exponents.
    Inline,
}

impl LatexMode {
    /// Name of the format as accepted by [`LatexMode::from_str`].
    pub fn format_name(&self) -> &'static str {
        match self {
            LatexMode::Display => "latex",
            LatexMode::Inline => "latex_inline",
        }
    }
}

impl fmt::Display for LatexMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.format_name())
    }
}

impl FromStr for LatexMode {
    type Err = SkyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "latex" => Ok(LatexMode::Display),
            "latex_inline" => Ok(LatexMode::Inline),
            other => Err(SkyError::Units(
                ErrorInfo::new("unknown-format", format!("unknown unit format '{other}'"))
                    .with_hint("expected 'latex' or 'latex_inline'"),
            )),
        }
    }
}

/// Escapes underscores. Unit names are alphanumeric plus `_`, so nothing
/// else needs escaping.
pub fn latex_escape(name: &str) -> String {
    name.replace('_', r"\_")
}

/// LaTeX name of a base: the registered display name when it differs from
/// the canonical name, the escaped canonical name otherwise.
pub fn unit_latex_name(unit: &NamedUnit) -> String {
    let name = unit.get_format_name(LATEX_FORMAT_NAME);
    if name == unit.name() {
        latex_escape(name)
    } else {
        name.to_string()
    }
}

/// True when `text` ends in a `^{...}` group.
pub fn ends_with_superscript(text: &str) -> bool {
    TRAILING_SUPERSCRIPT.is_match(text)
}

/// Renders a scale as `m \times 10^{e}`, with dedicated tokens for NaN and
/// the infinities.
pub fn format_exponential_notation(value: f64) -> String {
    if value.is_finite() {
        let (mantissa, exponent) = split_mantissa_exponent(value, DEFAULT_PRECISION);
        let mut parts = Vec::with_capacity(2);
        if !mantissa.is_empty() {
            parts.push(mantissa);
        }
        if !exponent.is_empty() {
            parts.push(format!("10^{{{exponent}}}"));
        }
        parts.join(r" \times ")
    } else if value.is_nan() {
        r"{\rm NaN}".to_string()
    } else if value > 0.0 {
        r"\infty".to_string()
    } else {
        r"-\infty".to_string()
    }
}

fn format_unit_list(units: &[(Arc<NamedUnit>, Power)]) -> Result<String, SkyError> {
    let mut out = Vec::with_capacity(units.len());
    for (base, power) in units {
        let mut base_latex = unit_latex_name(base);
        if power.is_one() {
            out.push(base_latex);
            continue;
        }
        // `deg` squared must read `deg^{2}`, not `{}^{\circ}^{2}`.
        if ends_with_superscript(&base_latex) {
            base_latex = base.short_names().first().cloned().ok_or_else(|| {
                SkyError::Units(
                    ErrorInfo::new(
                        "missing-short-name",
                        "unit display name ends in a superscript and no short name is available",
                    )
                    .with_context("unit", base.name()),
                )
            })?;
        }
        out.push(format!("{base_latex}^{{{power}}}"));
    }
    Ok(out.join(r"\,"))
}

/// Renders `unit` as `$\mathrm{...}$`.
pub fn to_latex(unit: &CompositeUnit, mode: LatexMode) -> Result<String, SkyError> {
    let mut s = if unit.scale() == 1.0 {
        String::new()
    } else {
        format_exponential_notation(unit.scale())
    };

    if !unit.bases().is_empty() {
        if !s.is_empty() {
            s.push_str(r"\,");
        }
        let (numerator, denominator) = match mode {
            LatexMode::Inline => (unit.bases().to_vec(), Vec::new()),
            LatexMode::Display => group_by_powers(unit.bases())?,
        };
        if denominator.is_empty() {
            s.push_str(&format_unit_list(&numerator)?);
        } else {
            let numerator = if numerator.is_empty() {
                "1".to_string()
            } else {
                format_unit_list(&numerator)?
            };
            let denominator = format_unit_list(&denominator)?;
            s.push_str(&format!(r"\frac{{{numerator}}}{{{denominator}}}"));
        }
    }

    tracing::trace!(mode = %mode, rendered = %s, "formatted unit as latex");
    Ok(format!(r"$\mathrm{{{s}}}$"))
}
