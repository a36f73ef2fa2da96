use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sky_core::errors::{ErrorInfo, SkyError};
use sky_core::from_yaml_slice;

use crate::compat::{CompatMatrix, Direction};
use crate::compression::CompressionType;
use crate::matrix::{default_shape_groups, generate_cases, InteropCase, ShapeGroup};
use crate::pixels::Dtype;

/// Relative tolerance between the two readers' pixel values.
pub const DEFAULT_RTOL: f64 = 1e-7;

fn default_seed() -> u64 {
    0x5eed_f175
}

fn default_rtol() -> f64 {
    DEFAULT_RTOL
}

fn default_compression_types() -> Vec<CompressionType> {
    CompressionType::ALL.to_vec()
}

fn default_dtypes() -> Vec<Dtype> {
    Dtype::ALL.to_vec()
}

/// YAML-configurable interop run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteropConfig {
    /// Master seed for fixture data.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Relative tolerance for pixel comparisons (absolute tolerance is zero).
    #[serde(default = "default_rtol")]
    pub rtol: f64,
    /// Algorithms to exercise.
    #[serde(default = "default_compression_types")]
    pub compression_types: Vec<CompressionType>,
    /// Dtypes to exercise.
    #[serde(default = "default_dtypes")]
    pub dtypes: Vec<Dtype>,
    /// Shapes and tile layouts.
    #[serde(default = "default_shape_groups")]
    pub shape_groups: Vec<ShapeGroup>,
    /// Known incompatibilities.
    #[serde(default)]
    pub compat: CompatMatrix,
}

impl Default for InteropConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            rtol: default_rtol(),
            compression_types: default_compression_types(),
            dtypes: default_dtypes(),
            shape_groups: default_shape_groups(),
            compat: CompatMatrix::default(),
        }
    }
}

impl InteropConfig {
    /// Loads and validates a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, SkyError> {
        let bytes = fs::read(path).map_err(|err| {
            SkyError::Config(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let config: InteropConfig = from_yaml_slice(&bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks tolerances, selections, shape groups and rules.
    pub fn validate(&self) -> Result<(), SkyError> {
        if !(self.rtol.is_finite() && self.rtol >= 0.0) {
            return Err(SkyError::Config(
                ErrorInfo::new("invalid-tolerance", "rtol must be non-negative")
                    .with_context("rtol", self.rtol.to_string()),
            ));
        }
        if self.compression_types.is_empty() || self.dtypes.is_empty() {
            return Err(SkyError::Config(
                ErrorInfo::new("empty-selection", "at least one compression type and dtype is required")
                    .with_hint("omit the key to run every value"),
            ));
        }
        for group in &self.shape_groups {
            group.validate()?;
        }
        self.compat.validate()
    }

    /// Every case selected by the configuration.
    pub fn cases(&self) -> Result<Vec<InteropCase>, SkyError> {
        generate_cases(&self.shape_groups, &self.compression_types, &self.dtypes)
    }

    /// Cases with their expected-failure reasons, without touching any
    /// implementation.
    pub fn plan(&self) -> Result<Vec<PlannedCase>, SkyError> {
        self.validate()?;
        let reason = |case: &InteropCase, direction| {
            self.compat
                .expected_failure(case, direction)
                .map(|rule| rule.reason.clone())
        };
        Ok(self
            .cases()?
            .into_iter()
            .map(|case| PlannedCase {
                reference_writes: reason(&case, Direction::ReferenceWrites),
                under_test_writes: reason(&case, Direction::UnderTestWrites),
                case,
            })
            .collect())
    }
}

/// A case and the expected-failure reason, if any, per direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedCase {
    /// The case.
    pub case: InteropCase,
    /// Expected failure when the reference writes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_writes: Option<String>,
    /// Expected failure when the library under test writes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub under_test_writes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let config: InteropConfig = from_yaml_slice(b"{}").unwrap();
        assert_eq!(config, InteropConfig::default());
        assert_eq!(config.compat.rules.len(), 5);
    }

    #[test]
    fn plan_marks_hcompress_one_d_in_both_directions() {
        let plan = InteropConfig::default().plan().unwrap();
        let planned = plan
            .iter()
            .find(|planned| planned.case.id == "HCOMPRESS_1-default-i4-10-t5")
            .unwrap();
        assert!(planned.reference_writes.is_some());
        assert!(planned.under_test_writes.is_some());
    }

    #[test]
    fn empty_selection_is_rejected() {
        let config = InteropConfig {
            dtypes: Vec::new(),
            ..InteropConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().code(), "empty-selection");
    }
}
