//! Named and composite units.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Div, Mul};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::power::Power;

/// An irreducible unit with a canonical name and optional aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedUnit {
    name: String,
    short_names: Vec<String>,
    long_names: Vec<String>,
    #[serde(default)]
    format_names: BTreeMap<String, String>,
}

impl NamedUnit {
    /// Creates a unit whose only short name is its canonical name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            short_names: vec![name.clone()],
            long_names: Vec::new(),
            format_names: BTreeMap::new(),
            name,
        }
    }

    /// Replaces the short names. The canonical name becomes the first entry.
    pub fn with_short_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.short_names = names.into_iter().map(Into::into).collect();
        if let Some(first) = self.short_names.first() {
            self.name = first.clone();
        }
        self
    }

    /// Replaces the long (spelled out) names.
    pub fn with_long_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.long_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Registers the name used by a specific output format.
    pub fn with_format_name(mut self, format: impl Into<String>, name: impl Into<String>) -> Self {
        self.format_names.insert(format.into(), name.into());
        self
    }

    /// Canonical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Short names, canonical first.
    pub fn short_names(&self) -> &[String] {
        &self.short_names
    }

    /// Long names.
    pub fn long_names(&self) -> &[String] {
        &self.long_names
    }

    /// Every alias the unit answers to.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.short_names.iter().map(String::as_str))
            .chain(self.long_names.iter().map(String::as_str))
    }

    /// Name registered for `format`, falling back to the canonical name.
    pub fn get_format_name(&self, format: &str) -> &str {
        self.format_names
            .get(format)
            .map(String::as_str)
            .unwrap_or(&self.name)
    }
}

/// A product of named units raised to powers, times a numeric scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeUnit {
    scale: f64,
    bases: Vec<(Arc<NamedUnit>, Power)>,
}

impl CompositeUnit {
    /// Builds a composite unit keeping `bases` in the given order.
    pub fn new(scale: f64, bases: Vec<(Arc<NamedUnit>, Power)>) -> Self {
        Self { scale, bases }
    }

    /// A unit with scale one and a single base raised to the first power.
    pub fn from_named(unit: Arc<NamedUnit>) -> Self {
        Self::new(1.0, vec![(unit, Power::ONE)])
    }

    /// A unit without bases.
    pub fn dimensionless(scale: f64) -> Self {
        Self::new(scale, Vec::new())
    }

    /// Overall numeric scale.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Ordered `(base, power)` pairs.
    pub fn bases(&self) -> &[(Arc<NamedUnit>, Power)] {
        &self.bases
    }

    /// Powers in base order.
    pub fn powers(&self) -> Vec<Power> {
        self.bases.iter().map(|(_, power)| *power).collect()
    }

    /// True when the unit has no bases.
    pub fn is_dimensionless(&self) -> bool {
        self.bases.is_empty()
    }

    /// Returns a copy with a different scale.
    pub fn with_scale(&self, scale: f64) -> Self {
        Self::new(scale, self.bases.clone())
    }

    /// Raises the unit to an arbitrary power.
    pub fn pow(&self, power: Power) -> Self {
        let bases = self
            .bases
            .iter()
            .map(|(base, own)| (Arc::clone(base), *own * power))
            .collect();
        gather(self.scale.powf(power.as_f64()), bases)
    }

    /// Raises the unit to an integral power.
    pub fn powi(&self, power: i32) -> Self {
        let bases = self
            .bases
            .iter()
            .map(|(base, own)| (Arc::clone(base), *own * Power::from(power)))
            .collect();
        gather(self.scale.powi(power), bases)
    }

    /// Product of two units.
    pub fn multiply(&self, other: &CompositeUnit) -> Self {
        let bases = self.bases.iter().chain(other.bases.iter()).cloned().collect();
        gather(self.scale * other.scale, bases)
    }

    /// Quotient of two units.
    pub fn divide(&self, other: &CompositeUnit) -> Self {
        let bases = self
            .bases
            .iter()
            .cloned()
            .chain(
                other
                    .bases
                    .iter()
                    .map(|(base, power)| (Arc::clone(base), -*power)),
            )
            .collect();
        gather(self.scale / other.scale, bases)
    }
}

/// Merges repeated bases, drops cancelled ones and orders the result by
/// descending power, then name.
fn gather(scale: f64, bases: Vec<(Arc<NamedUnit>, Power)>) -> CompositeUnit {
    let mut merged: Vec<(Arc<NamedUnit>, Power)> = Vec::with_capacity(bases.len());
    for (base, power) in bases {
        match merged.iter_mut().find(|(seen, _)| seen.name() == base.name()) {
            Some((_, total)) => *total = *total + power,
            None => merged.push((base, power)),
        }
    }
    merged.retain(|(_, power)| !power.is_zero());
    merged.sort_by(|(a_base, a_power), (b_base, b_power)| {
        b_power
            .as_f64()
            .total_cmp(&a_power.as_f64())
            .then_with(|| a_base.name().cmp(b_base.name()))
    });
    CompositeUnit::new(scale, merged)
}

impl From<Arc<NamedUnit>> for CompositeUnit {
    fn from(unit: Arc<NamedUnit>) -> Self {
        CompositeUnit::from_named(unit)
    }
}

impl Mul for &CompositeUnit {
    type Output = CompositeUnit;

    fn mul(self, rhs: &CompositeUnit) -> CompositeUnit {
        self.multiply(rhs)
    }
}

impl Div for &CompositeUnit {
    type Output = CompositeUnit;

    fn div(self, rhs: &CompositeUnit) -> CompositeUnit {
        self.divide(rhs)
    }
}

/// Plain-text rendering, e.g. `1000 m s^-1`.
impl fmt::Display for CompositeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        if self.scale != 1.0 || self.bases.is_empty() {
            write!(f, "{}", self.scale)?;
            first = false;
        }
        for (base, power) in &self.bases {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            if power.is_one() {
                write!(f, "{}", base.name())?;
            } else {
                write!(f, "{}^{}", base.name(), power)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(name: &str) -> Arc<NamedUnit> {
        Arc::new(NamedUnit::new(name))
    }

    #[test]
    fn format_names_fall_back_to_canonical() {
        let deg = NamedUnit::new("deg").with_format_name("latex", r"{}^{\circ}");
        assert_eq!(deg.get_format_name("latex"), r"{}^{\circ}");
        assert_eq!(deg.get_format_name("console"), "deg");
    }

    #[test]
    fn short_names_set_canonical_name() {
        let aa = NamedUnit::new("x").with_short_names(["Angstrom", "AA"]);
        assert_eq!(aa.name(), "Angstrom");
        assert_eq!(aa.aliases().collect::<Vec<_>>(), vec!["Angstrom", "Angstrom", "AA"]);
    }

    #[test]
    fn products_gather_and_sort() {
        let m = CompositeUnit::from_named(unit("m"));
        let s = CompositeUnit::from_named(unit("s"));
        let speed = &m / &s;
        let accel = &speed / &s;
        assert_eq!(accel.to_string(), "m s^-2");
        let area = &m * &m;
        assert_eq!(area.powers(), vec![Power::int(2)]);
        assert!((&area / &area).is_dimensionless());
    }

    #[test]
    fn powers_scale_the_prefactor() {
        let km = CompositeUnit::from_named(unit("m")).with_scale(1000.0);
        let squared = km.powi(2);
        assert_eq!(squared.scale(), 1.0e6);
        let root = CompositeUnit::from_named(unit("Hz")).pow(Power::ratio(1, 2).unwrap());
        assert_eq!(root.to_string(), "Hz^1/2");
    }
}
