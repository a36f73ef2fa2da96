use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sky_core::errors::{ErrorInfo, SkyError};
use sky_core::from_yaml_slice;

use crate::reference::REFERENCE_RTOL;

fn default_rtol() -> f64 {
    REFERENCE_RTOL
}

/// Tolerances and case selection for a regression run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionOpts {
    /// Relative tolerance applied element-wise.
    #[serde(default = "default_rtol")]
    pub rtol: f64,
    /// Absolute tolerance in Mpc.
    #[serde(default)]
    pub atol: f64,
    /// Restricts the run to these families (empty runs everything).
    #[serde(default)]
    pub families: Vec<String>,
}

impl Default for RegressionOpts {
    fn default() -> Self {
        Self {
            rtol: default_rtol(),
            atol: 0.0,
            families: Vec::new(),
        }
    }
}

impl RegressionOpts {
    /// Rejects negative or non-finite tolerances.
    pub fn validate(&self) -> Result<(), SkyError> {
        for (name, value) in [("rtol", self.rtol), ("atol", self.atol)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SkyError::Config(
                    ErrorInfo::new("invalid-tolerance", format!("{name} must be non-negative"))
                        .with_context(name, value.to_string()),
                ));
            }
        }
        Ok(())
    }

    /// True when `family` is selected.
    pub fn includes(&self, family: &str) -> bool {
        self.families.is_empty() || self.families.iter().any(|name| name == family)
    }

    /// Loads options from a YAML file.
    pub fn load(path: &Path) -> Result<Self, SkyError> {
        let bytes = fs::read(path).map_err(|err| {
            SkyError::Config(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let opts: RegressionOpts = from_yaml_slice(&bytes)?;
        opts.validate()?;
        Ok(opts)
    }
}
