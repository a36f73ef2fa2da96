//! Known cross-implementation incompatibilities, kept as data so they can
//! be re-derived against a particular reference library release.

use serde::{Deserialize, Serialize};
use sky_core::errors::{ErrorInfo, SkyError};

use crate::compression::{CompressionType, QuantizeMethod};
use crate::matrix::InteropCase;
use crate::pixels::{Dtype, DtypeKind};

/// Which implementation writes the compressed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Reference writes, library under test decompresses.
    ReferenceWrites,
    /// Library under test compresses, reference reads.
    UnderTestWrites,
}

impl Direction {
    /// Both directions, in check order.
    pub const BOTH: [Direction; 2] = [Direction::ReferenceWrites, Direction::UnderTestWrites];
}

fn both_directions() -> Vec<Direction> {
    Direction::BOTH.to_vec()
}

/// Conjunction of case predicates. Empty lists and absent bounds match
/// everything.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompatCondition {
    /// Algorithms the rule applies to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compression_types: Vec<CompressionType>,
    /// Exact dtypes the rule applies to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dtypes: Vec<Dtype>,
    /// Dtype kinds the rule applies to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dtype_kinds: Vec<DtypeKind>,
    /// Matches arrays with fewer axes than this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndim_below: Option<usize>,
    /// Matches arrays with more axes than this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndim_above: Option<usize>,
    /// Matches tile layouts whose count of non-unit axes differs from this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_unit_tile_dims_not: Option<usize>,
    /// Quantisation methods the rule applies to; a case without an explicit
    /// method never matches a non-empty list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qmethods: Vec<QuantizeMethod>,
}

impl CompatCondition {
    /// True when `case` satisfies every predicate.
    pub fn matches(&self, case: &InteropCase) -> bool {
        let ndim = case.shape.len();
        (self.compression_types.is_empty()
            || self.compression_types.contains(&case.compression_type))
            && (self.dtypes.is_empty() || self.dtypes.contains(&case.dtype))
            && (self.dtype_kinds.is_empty() || self.dtype_kinds.contains(&case.dtype.kind()))
            && self.ndim_below.map_or(true, |bound| ndim < bound)
            && self.ndim_above.map_or(true, |bound| ndim > bound)
            && self
                .non_unit_tile_dims_not
                .map_or(true, |count| case.non_unit_tile_dims() != count)
            && (self.qmethods.is_empty()
                || case
                    .params
                    .qmethod
                    .map_or(false, |method| self.qmethods.contains(&method)))
    }
}

/// A known incompatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatRule {
    /// Human readable explanation, reported with the expected failure.
    pub reason: String,
    /// Directions in which the incompatibility shows up.
    #[serde(default = "both_directions")]
    pub directions: Vec<Direction>,
    /// Cases the rule covers.
    #[serde(default)]
    pub when: CompatCondition,
}

impl CompatRule {
    fn new(reason: &str, directions: &[Direction], when: CompatCondition) -> Self {
        Self {
            reason: reason.to_string(),
            directions: directions.to_vec(),
            when,
        }
    }

    /// True when the rule covers `case` in `direction`.
    pub fn applies(&self, case: &InteropCase, direction: Direction) -> bool {
        self.directions.contains(&direction) && self.when.matches(case)
    }
}

/// Ordered list of incompatibilities; the first matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatMatrix {
    /// Rules in priority order.
    #[serde(default)]
    pub rules: Vec<CompatRule>,
}

impl Default for CompatMatrix {
    /// Incompatibilities observed with cfitsio as the reference writer.
    fn default() -> Self {
        let hcompress = vec![CompressionType::Hcompress1];
        Self {
            rules: vec![
                CompatRule::new(
                    "HCOMPRESS is 2D only",
                    &Direction::BOTH,
                    CompatCondition {
                        compression_types: hcompress.clone(),
                        ndim_below: Some(2),
                        ..CompatCondition::default()
                    },
                ),
                CompatRule::new(
                    "HCOMPRESS needs exactly two non-unit tile dimensions",
                    &Direction::BOTH,
                    CompatCondition {
                        compression_types: hcompress.clone(),
                        non_unit_tile_dims_not: Some(2),
                        ..CompatCondition::default()
                    },
                ),
                CompatRule::new(
                    "reference cannot write unsigned bytes beyond 2D",
                    &[Direction::ReferenceWrites],
                    CompatCondition {
                        dtypes: vec![Dtype::U1],
                        ndim_above: Some(2),
                        ..CompatCondition::default()
                    },
                ),
                CompatRule::new(
                    "reference fails to write PLIO_1 float data",
                    &[Direction::ReferenceWrites],
                    CompatCondition {
                        compression_types: vec![CompressionType::Plio1],
                        dtype_kinds: vec![DtypeKind::Float],
                        ..CompatCondition::default()
                    },
                ),
                CompatRule::new(
                    "reference writes incorrect ZZERO values for SUBTRACTIVE_DITHER_2 under HCOMPRESS",
                    &[Direction::ReferenceWrites],
                    CompatCondition {
                        compression_types: hcompress,
                        dtype_kinds: vec![DtypeKind::Float],
                        qmethods: vec![QuantizeMethod::SubtractiveDither2],
                        ..CompatCondition::default()
                    },
                ),
            ],
        }
    }
}

impl CompatMatrix {
    /// A matrix without known incompatibilities.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// First rule covering `case` in `direction`.
    pub fn expected_failure(&self, case: &InteropCase, direction: Direction) -> Option<&CompatRule> {
        self.rules
            .iter()
            .find(|rule| rule.applies(case, direction))
    }

    /// Rejects rules without a reason or without directions.
    pub fn validate(&self) -> Result<(), SkyError> {
        for (idx, rule) in self.rules.iter().enumerate() {
            if rule.reason.trim().is_empty() || rule.directions.is_empty() {
                return Err(SkyError::Config(
                    ErrorInfo::new(
                        "invalid-compat-rule",
                        "compatibility rules need a reason and at least one direction",
                    )
                    .with_context("rule", idx.to_string()),
                ));
            }
        }
        Ok(())
    }
}
