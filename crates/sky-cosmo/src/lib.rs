#![deny(missing_docs)]
#![doc = "Cosmology parameter sets and a table-driven regression harness for external comoving-distance calculators."]

/// YAML-configurable regression options.
pub mod config;
/// FLRW parameter sets and dark-energy models.
pub mod params;
/// Reference comoving distances.
pub mod reference;
/// Calculator seam and regression harness.
pub mod regression;

pub use config::RegressionOpts;
pub use params::{CosmologyParams, DarkEnergy, DEFAULT_NEFF};
pub use reference::{
    reference_case, reference_cases, ReferenceCase, REFERENCE_REDSHIFTS, REFERENCE_RTOL,
};
pub use regression::{
    allclose, check_case, max_relative_error, run_regression, CaseOutcome, CaseStatus,
    ComovingDistance, RegressionReport,
};
