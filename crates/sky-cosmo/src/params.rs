//! FLRW cosmology parameter sets.

use std::fmt;

use serde::{Deserialize, Serialize};
use sky_core::errors::{ErrorInfo, SkyError};

/// Effective number of neutrino species assumed when none is given.
pub const DEFAULT_NEFF: f64 = 3.04;

fn params_error(code: &str, message: impl Into<String>) -> SkyError {
    SkyError::Cosmology(ErrorInfo::new(code, message))
}

fn range_error(code: &str, message: impl Into<String>, key: &str, value: f64) -> SkyError {
    SkyError::Cosmology(ErrorInfo::new(code, message).with_context(key, value.to_string()))
}

fn default_neff() -> f64 {
    DEFAULT_NEFF
}

/// Dark-energy equation of state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum DarkEnergy {
    /// Cosmological constant, `w = -1`.
    #[default]
    Lambda,
    /// Constant `w = w0`.
    W {
        /// Equation-of-state parameter.
        w0: f64,
    },
    /// `w(a) = w0 + wa (1 - a)`.
    W0Wa {
        /// Present-day value.
        w0: f64,
        /// Derivative with respect to the scale factor.
        wa: f64,
    },
    /// `w(a) = wp + wa (ap - a)` around a pivot redshift `zp`.
    WpWa {
        /// Value at the pivot.
        wp: f64,
        /// Pivot redshift.
        zp: f64,
        /// Derivative with respect to the scale factor.
        wa: f64,
    },
    /// `w(z) = w0 + wz z`.
    W0Wz {
        /// Present-day value.
        w0: f64,
        /// Derivative with respect to redshift.
        wz: f64,
    },
}

impl DarkEnergy {
    /// Equation-of-state parameter at redshift `z`.
    pub fn w(&self, z: f64) -> f64 {
        match *self {
            DarkEnergy::Lambda => -1.0,
            DarkEnergy::W { w0 } => w0,
            DarkEnergy::W0Wa { w0, wa } => w0 + wa * z / (1.0 + z),
            DarkEnergy::WpWa { wp, zp, wa } => {
                let a = 1.0 / (1.0 + z);
                let ap = 1.0 / (1.0 + zp);
                wp + wa * (ap - a)
            }
            DarkEnergy::W0Wz { w0, wz } => w0 + wz * z,
        }
    }

    fn family_stem(&self) -> &'static str {
        match self {
            DarkEnergy::Lambda => "LambdaCDM",
            DarkEnergy::W { .. } => "wCDM",
            DarkEnergy::W0Wa { .. } => "w0waCDM",
            DarkEnergy::WpWa { .. } => "wpwaCDM",
            DarkEnergy::W0Wz { .. } => "w0wzCDM",
        }
    }

    fn parameters(&self) -> Vec<(&'static str, f64)> {
        match *self {
            DarkEnergy::Lambda => Vec::new(),
            DarkEnergy::W { w0 } => vec![("w0", w0)],
            DarkEnergy::W0Wa { w0, wa } => vec![("w0", w0), ("wa", wa)],
            DarkEnergy::WpWa { wp, zp, wa } => vec![("wp", wp), ("zp", zp), ("wa", wa)],
            DarkEnergy::W0Wz { w0, wz } => vec![("w0", w0), ("wz", wz)],
        }
    }
}

/// Parameters of an FLRW cosmology, handed unchanged to a distance calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CosmologyParams {
    /// Hubble constant in km/s/Mpc.
    pub h0: f64,
    /// Matter density today, in units of the critical density.
    pub om0: f64,
    /// Dark-energy density today. `None` marks a flat cosmology, where the
    /// calculator derives it from the other components.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ode0: Option<f64>,
    /// Dark-energy equation of state.
    #[serde(default)]
    pub dark_energy: DarkEnergy,
    /// CMB temperature today in K. Zero disables radiation entirely.
    #[serde(default)]
    pub tcmb0: f64,
    /// Effective number of neutrino species.
    #[serde(default = "default_neff")]
    pub neff: f64,
    /// Neutrino masses in eV: one value shared by every species, or one per species.
    #[serde(default)]
    pub m_nu: Vec<f64>,
}

impl CosmologyParams {
    fn base(h0: f64, om0: f64, ode0: Option<f64>) -> Self {
        Self {
            h0,
            om0,
            ode0,
            dark_energy: DarkEnergy::Lambda,
            tcmb0: 0.0,
            neff: DEFAULT_NEFF,
            m_nu: vec![0.0],
        }
    }

    /// Non-flat cosmology with explicit dark-energy density.
    pub fn non_flat(h0: f64, om0: f64, ode0: f64) -> Self {
        Self::base(h0, om0, Some(ode0))
    }

    /// Flat cosmology.
    pub fn flat(h0: f64, om0: f64) -> Self {
        Self::base(h0, om0, None)
    }

    /// Sets the dark-energy model.
    pub fn with_dark_energy(mut self, dark_energy: DarkEnergy) -> Self {
        self.dark_energy = dark_energy;
        self
    }

    /// Sets the CMB temperature.
    pub fn with_tcmb0(mut self, tcmb0: f64) -> Self {
        self.tcmb0 = tcmb0;
        self
    }

    /// Sets the effective number of neutrino species.
    pub fn with_neff(mut self, neff: f64) -> Self {
        self.neff = neff;
        self
    }

    /// Sets the neutrino masses.
    pub fn with_m_nu(mut self, m_nu: impl Into<Vec<f64>>) -> Self {
        self.m_nu = m_nu.into();
        self
    }

    /// True when no explicit dark-energy density is set.
    pub fn is_flat(&self) -> bool {
        self.ode0.is_none()
    }

    /// Class-style family name, e.g. `FlatLambdaCDM` or `wpwaCDM`.
    pub fn family_name(&self) -> String {
        if self.is_flat() {
            format!("Flat{}", self.dark_energy.family_stem())
        } else {
            self.dark_energy.family_stem().to_string()
        }
    }

    /// Integer number of neutrino species.
    pub fn neutrino_species(&self) -> usize {
        self.neff.max(0.0).floor() as usize
    }

    /// Masses expanded to one entry per species.
    pub fn species_masses(&self) -> Vec<f64> {
        match self.m_nu.as_slice() {
            [] => vec![0.0; self.neutrino_species()],
            [single] => vec![*single; self.neutrino_species()],
            many => many.to_vec(),
        }
    }

    /// True when neutrino masses take effect (they are inert without a CMB temperature).
    pub fn has_massive_nu(&self) -> bool {
        self.tcmb0 > 0.0 && self.m_nu.iter().any(|mass| *mass > 0.0)
    }

    /// Checks the physical ranges of every parameter.
    pub fn validate(&self) -> Result<(), SkyError> {
        if !(self.h0.is_finite() && self.h0 > 0.0) {
            return Err(range_error("invalid-h0", "H0 must be positive", "h0", self.h0));
        }
        let mut densities = vec![("om0", self.om0)];
        if let Some(ode0) = self.ode0 {
            densities.push(("ode0", ode0));
        }
        for (name, value) in densities {
            if !(value.is_finite() && value >= 0.0) {
                let message = format!("{name} must be non-negative");
                return Err(range_error("invalid-density", message, name, value));
            }
        }
        if !(self.tcmb0.is_finite() && self.tcmb0 >= 0.0) {
            let message = "Tcmb0 must be non-negative";
            return Err(range_error("invalid-tcmb0", message, "tcmb0", self.tcmb0));
        }
        if !(self.neff.is_finite() && self.neff >= 0.0) {
            let message = "Neff must be non-negative";
            return Err(range_error("invalid-neff", message, "neff", self.neff));
        }
        if self.m_nu.iter().any(|mass| !(mass.is_finite() && *mass >= 0.0)) {
            return Err(params_error("invalid-m-nu", "neutrino masses must be non-negative"));
        }
        if self.m_nu.len() > 1 && self.m_nu.len() != self.neutrino_species() {
            return Err(SkyError::Cosmology(
                ErrorInfo::new(
                    "m-nu-length",
                    "unexpected number of neutrino masses for the number of species",
                )
                .with_context("masses", self.m_nu.len().to_string())
                .with_context("species", self.neutrino_species().to_string())
                .with_hint("give one mass per species or a single shared mass"),
            ));
        }
        for (name, value) in self.dark_energy.parameters() {
            if !value.is_finite() {
                let message = format!("{name} must be finite");
                return Err(range_error("invalid-dark-energy", message, name, value));
            }
        }
        Ok(())
    }
}

/// Constructor-call rendering, e.g. `FlatwCDM(H0=75, Om0=0.25, w0=-1.05, Tcmb0=0)`.
impl fmt::Display for CosmologyParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(H0={}, Om0={}", self.family_name(), self.h0, self.om0)?;
        if let Some(ode0) = self.ode0 {
            write!(f, ", Ode0={ode0}")?;
        }
        for (name, value) in self.dark_energy.parameters() {
            write!(f, ", {name}={value}")?;
        }
        write!(f, ", Tcmb0={}", self.tcmb0)?;
        if self.tcmb0 > 0.0 {
            write!(f, ", Neff={}, m_nu={:?}", self.neff, self.m_nu)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_names_follow_flatness_and_model() {
        assert_eq!(CosmologyParams::flat(70.0, 0.3).family_name(), "FlatLambdaCDM");
        let wp = CosmologyParams::non_flat(70.0, 0.3, 0.7).with_dark_energy(DarkEnergy::WpWa {
            wp: -0.9,
            zp: 0.5,
            wa: 0.1,
        });
        assert_eq!(wp.family_name(), "wpwaCDM");
        let flat_w = CosmologyParams::flat(70.0, 0.3).with_dark_energy(DarkEnergy::W0Wa {
            w0: -0.95,
            wa: 0.15,
        });
        assert_eq!(flat_w.family_name(), "Flatw0waCDM");
    }

    #[test]
    fn equation_of_state_variants() {
        assert_eq!(DarkEnergy::Lambda.w(2.0), -1.0);
        assert_eq!(DarkEnergy::W { w0: -0.9 }.w(3.0), -0.9);
        let w0wa = DarkEnergy::W0Wa { w0: -0.9, wa: 0.1 };
        assert!((w0wa.w(1.0) - (-0.85)).abs() < 1e-12);
        let wpwa = DarkEnergy::WpWa { wp: -0.9, zp: 0.5, wa: 0.1 };
        assert!((wpwa.w(0.5) - (-0.9)).abs() < 1e-12);
        let w0wz = DarkEnergy::W0Wz { w0: -0.9, wz: 0.1 };
        assert!((w0wz.w(2.0) - (-0.7)).abs() < 1e-12);
    }

    #[test]
    fn masses_expand_per_species() {
        let shared = CosmologyParams::flat(75.0, 0.25)
            .with_tcmb0(3.0)
            .with_neff(3.0)
            .with_m_nu(vec![10.0]);
        assert_eq!(shared.species_masses(), vec![10.0, 10.0, 10.0]);
        assert!(shared.has_massive_nu());
        let cold = shared.clone().with_tcmb0(0.0);
        assert!(!cold.has_massive_nu());
    }

    #[test]
    fn validation_rejects_unphysical_values() {
        assert!(CosmologyParams::flat(75.0, 0.25).validate().is_ok());
        assert_eq!(CosmologyParams::flat(0.0, 0.25).validate().unwrap_err().code(), "invalid-h0");
        assert_eq!(
            CosmologyParams::non_flat(75.0, 0.25, -0.1).validate().unwrap_err().code(),
            "invalid-density"
        );
        let wrong_count = CosmologyParams::flat(75.0, 0.25)
            .with_tcmb0(3.0)
            .with_m_nu(vec![1.0, 2.0]);
        let err = wrong_count.validate().unwrap_err();
        assert_eq!(err.code(), "m-nu-length");
        assert_eq!(err.info().context.get("species").map(String::as_str), Some("3"));
        let four = CosmologyParams::flat(75.0, 0.25)
            .with_tcmb0(3.0)
            .with_neff(4.2)
            .with_m_nu(vec![1.0, 4.0, 5.0, 9.0]);
        assert!(four.validate().is_ok());
    }

    #[test]
    fn display_reads_like_a_constructor() {
        let params =
            CosmologyParams::flat(75.0, 0.25).with_dark_energy(DarkEnergy::W { w0: -1.05 });
        assert_eq!(params.to_string(), "FlatwCDM(H0=75, Om0=0.25, w0=-1.05, Tcmb0=0)");
    }
}
