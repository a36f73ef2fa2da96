//! Built-in astronomy units keyed by every alias.

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use sky_core::errors::{ErrorInfo, SkyError};

use crate::unit::{CompositeUnit, NamedUnit};

/// Lookup table from alias to unit.
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    units: BTreeMap<String, Arc<NamedUnit>>,
}

impl UnitRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared registry holding the built-in units.
    pub fn builtin() -> &'static UnitRegistry {
        static BUILTIN: Lazy<UnitRegistry> = Lazy::new(|| {
            let mut registry = UnitRegistry::new();
            for unit in builtin_units() {
                registry.register(unit);
            }
            registry
        });
        &BUILTIN
    }

    /// Adds a unit under all of its aliases, replacing earlier entries.
    pub fn register(&mut self, unit: NamedUnit) -> Arc<NamedUnit> {
        let unit = Arc::new(unit);
        for alias in unit.aliases() {
            self.units.insert(alias.to_string(), Arc::clone(&unit));
        }
        unit
    }

    /// Finds a unit by alias.
    pub fn get(&self, alias: &str) -> Option<Arc<NamedUnit>> {
        self.units.get(alias).cloned()
    }

    /// Finds a unit by alias, reporting unknown names as errors.
    pub fn lookup(&self, alias: &str) -> Result<Arc<NamedUnit>, SkyError> {
        self.get(alias).ok_or_else(|| {
            SkyError::Units(
                ErrorInfo::new("unknown-unit", format!("'{alias}' is not a known unit"))
                    .with_context("unit", alias),
            )
        })
    }

    /// Finds a unit by alias and lifts it into a composite unit.
    pub fn unit(&self, alias: &str) -> Result<CompositeUnit, SkyError> {
        self.lookup(alias).map(CompositeUnit::from_named)
    }

    /// Number of aliases known to the registry.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// True when no unit is registered.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

fn plain(short: &[&str], long: &[&str]) -> NamedUnit {
    NamedUnit::new(short[0])
        .with_short_names(short.iter().copied())
        .with_long_names(long.iter().copied())
}

fn latex(short: &[&str], long: &[&str], latex: &str) -> NamedUnit {
    plain(short, long).with_format_name("latex", latex)
}

fn builtin_units() -> Vec<NamedUnit> {
    vec![
        // SI and CGS
        plain(&["m"], &["meter"]),
        plain(&["cm"], &["centimeter"]),
        plain(&["mm"], &["millimeter"]),
        latex(&["um"], &["micron", "micrometer"], r"\mu m"),
        plain(&["nm"], &["nanometer"]),
        plain(&["km"], &["kilometer"]),
        plain(&["s"], &["second"]),
        plain(&["ms"], &["millisecond"]),
        plain(&["min"], &["minute"]),
        plain(&["h"], &["hour", "hr"]),
        plain(&["d"], &["day"]),
        plain(&["yr", "a"], &["year"]),
        plain(&["g"], &["gram"]),
        plain(&["kg"], &["kilogram"]),
        plain(&["K"], &["Kelvin"]),
        plain(&["mol"], &["mole"]),
        plain(&["A"], &["ampere", "amp"]),
        plain(&["rad"], &["radian"]),
        plain(&["sr"], &["steradian"]),
        plain(&["Hz"], &["Hertz", "hertz"]),
        plain(&["N"], &["Newton", "newton"]),
        plain(&["J"], &["Joule", "joule"]),
        plain(&["W"], &["Watt", "watt"]),
        plain(&["erg"], &[]),
        plain(&["dyn"], &["dyne"]),
        plain(&["eV"], &["electronvolt"]),
        plain(&["keV"], &["kiloelectronvolt"]),
        latex(&["percent", "pct"], &[], r"\%"),
        // Angles
        latex(&["deg"], &["degree"], r"{}^{\circ}"),
        latex(&["arcmin"], &["arcminute"], r"{}^{\prime}"),
        latex(&["arcsec"], &["arcsecond"], r"{}^{\prime\prime}"),
        latex(&["mas"], &["milliarcsecond"], r"\mathrm{mas}"),
        latex(&["hourangle"], &[], r"{}^{h}"),
        // Astrophysical
        plain(&["AU", "au"], &["astronomical_unit"]),
        plain(&["pc"], &["parsec"]),
        plain(&["kpc"], &["kiloparsec"]),
        plain(&["Mpc"], &["megaparsec"]),
        plain(&["Gpc"], &["gigaparsec"]),
        plain(&["lyr", "lightyear"], &[]),
        latex(&["Angstrom", "AA", "angstrom"], &[], r"\mathring{A}"),
        latex(&["solMass", "M_sun", "Msun"], &[], r"M_{\odot}"),
        latex(&["solLum", "L_sun", "Lsun"], &[], r"L_{\odot}"),
        latex(&["solRad", "R_sun", "Rsun"], &[], r"R_{\odot}"),
        latex(&["earthMass", "M_earth", "Mearth"], &[], r"M_{\oplus}"),
        latex(&["jupiterMass", "M_jup", "Mjup"], &[], r"M_{\rm J}"),
        plain(&["Jy"], &["Jansky", "jansky"]),
        plain(&["mJy"], &["millijansky"]),
        plain(&["Ry"], &["rydberg"]),
        latex(&["m_e"], &["electron_mass"], r"m_{e}"),
        latex(&["m_p"], &["proton_mass"], r"m_{p}"),
        // Instrumental
        plain(&["ph"], &["photon"]),
        plain(&["ct"], &["count"]),
        plain(&["pix", "pixel"], &[]),
        plain(&["adu"], &[]),
        plain(&["beam"], &[]),
        plain(&["bit", "b"], &[]),
        plain(&["byte", "B"], &["octet"]),
        plain(&["chan"], &[]),
        plain(&["vox", "voxel"], &[]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_aliases_resolve_to_one_unit() {
        let registry = UnitRegistry::builtin();
        let a = registry.lookup("Angstrom").unwrap();
        let b = registry.lookup("AA").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.get_format_name("latex"), r"\mathring{A}");
    }

    #[test]
    fn unknown_units_are_reported() {
        let err = UnitRegistry::builtin().lookup("furlong").unwrap_err();
        assert_eq!(err.code(), "unknown-unit");
        assert_eq!(err.info().context.get("unit").map(String::as_str), Some("furlong"));
    }

    #[test]
    fn register_overrides_existing_alias() {
        let mut registry = UnitRegistry::new();
        registry.register(NamedUnit::new("foo"));
        let replaced = registry.register(NamedUnit::new("foo").with_format_name("latex", "F"));
        assert_eq!(registry.lookup("foo").unwrap(), replaced);
        assert_eq!(registry.len(), 1);
    }
}
