#![deny(missing_docs)]
#![doc = "Tile-compression interoperability checks between two FITS implementations: the case matrix, fixture data, known incompatibilities and the two-direction harness."]

/// Known cross-implementation failures.
pub mod compat;
/// Algorithms, quantisation parameters and writer settings.
pub mod compression;
/// YAML-configurable interop runs.
pub mod config;
/// Deterministic fixture data.
pub mod fixtures;
/// Implementation seam and the interop harness.
pub mod harness;
/// Case enumeration.
pub mod matrix;
/// Dtypes and typed pixel arrays.
pub mod pixels;

pub use compat::{CompatCondition, CompatMatrix, CompatRule, Direction};
pub use compression::{
    normalize_tag, CompressionParams, CompressionType, QuantizeLevel, QuantizeMethod,
    WriteSettings,
};
pub use config::{InteropConfig, PlannedCase, DEFAULT_RTOL};
pub use fixtures::{base_values, fixture_array, uses_structured_fallback};
pub use harness::{
    compare_pixels, CaseResult, CompressedImage, FitsImplementation, ImageHeader, InteropHarness,
    InteropReport, Outcome,
};
pub use matrix::{default_shape_groups, generate_cases, InteropCase, ShapeGroup};
pub use pixels::{Dtype, DtypeKind, PixelArray, PixelData};
