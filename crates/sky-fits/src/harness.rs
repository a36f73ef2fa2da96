//! Two-direction interop checks between a library under test and a
//! reference FITS implementation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sky_core::errors::{ErrorInfo, SkyError};
use sky_core::{stable_hash_string, RngHandle};
use tracing::{debug, info, warn};

use crate::compat::Direction;
use crate::compression::{normalize_tag, CompressionType, QuantizeMethod, WriteSettings};
use crate::config::InteropConfig;
use crate::fixtures::fixture_array;
use crate::matrix::InteropCase;
use crate::pixels::{Dtype, PixelArray};

fn check_error(code: &str, message: impl Into<String>) -> SkyError {
    SkyError::Fits(ErrorInfo::new(code, message))
}

/// Header cards of a compressed image HDU. Keys are stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageHeader {
    cards: BTreeMap<String, String>,
}

impl ImageHeader {
    /// Empty header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cards a conforming writer records for `array` under `settings`.
    /// Tile and axis cards follow FITS order, fastest axis first.
    pub fn describe(settings: &WriteSettings, array: &PixelArray) -> Self {
        let mut header = ImageHeader::new()
            .with_card("ZCMPTYPE", settings.compression_type.as_str())
            .with_card("ZBITPIX", array.dtype().bitpix().to_string())
            .with_card("ZNAXIS", array.ndim().to_string());
        for (axis, dim) in array.shape().iter().rev().enumerate() {
            header.insert(&format!("ZNAXIS{}", axis + 1), dim.to_string());
        }
        for (axis, dim) in settings.tile_dims.iter().rev().enumerate() {
            header.insert(&format!("ZTILE{}", axis + 1), dim.to_string());
        }
        if let Some(method) = settings.quantize_method {
            header.insert("ZQUANTIZ", method.card_value());
        }
        header
    }

    /// Builder form of [`ImageHeader::insert`].
    pub fn with_card(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a card, replacing any previous value.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.cards.insert(key.to_ascii_uppercase(), value.into());
    }

    /// Card value, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.cards.get(&key.to_ascii_uppercase()).map(String::as_str)
    }

    /// All cards.
    pub fn cards(&self) -> &BTreeMap<String, String> {
        &self.cards
    }

    /// Raw `ZCMPTYPE` value.
    pub fn compression_tag(&self) -> Result<&str, SkyError> {
        self.get("ZCMPTYPE")
            .ok_or_else(|| check_error("missing-zcmptype", "header has no ZCMPTYPE card"))
    }

    /// Tile dimensions in array axis order, read from `ZTILEn`.
    pub fn tile_dims(&self) -> Result<Vec<usize>, SkyError> {
        let mut dims = Vec::new();
        while let Some(value) = self.get(&format!("ZTILE{}", dims.len() + 1)) {
            let dim = value.trim().parse::<usize>().map_err(|_| {
                SkyError::Fits(
                    ErrorInfo::new("invalid-ztile", "ZTILE card is not a positive integer")
                        .with_context("value", value),
                )
            })?;
            dims.push(dim);
        }
        dims.reverse();
        Ok(dims)
    }

    /// Quantisation method from `ZQUANTIZ`, if recorded.
    pub fn quantize_method(&self) -> Result<Option<QuantizeMethod>, SkyError> {
        let Some(value) = self.get("ZQUANTIZ") else {
            return Ok(None);
        };
        [
            QuantizeMethod::NoDither,
            QuantizeMethod::SubtractiveDither1,
            QuantizeMethod::SubtractiveDither2,
        ]
        .into_iter()
        .find(|method| method.card_value() == value.trim())
        .map(Some)
        .ok_or_else(|| {
            SkyError::Fits(
                ErrorInfo::new("invalid-zquantiz", "unrecognised ZQUANTIZ value")
                    .with_context("value", value),
            )
        })
    }
}

/// A decoded compressed image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressedImage {
    /// Compressed HDU header.
    pub header: ImageHeader,
    /// Decompressed pixels.
    pub data: PixelArray,
}

/// A FITS library able to write and read tile-compressed images.
pub trait FitsImplementation {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Writes `array` to a new file at `path`.
    fn write_compressed(
        &self,
        path: &Path,
        array: &PixelArray,
        settings: &WriteSettings,
    ) -> Result<(), SkyError>;

    /// Reads the first compressed image HDU of `path`.
    fn read_compressed(&self, path: &Path) -> Result<CompressedImage, SkyError>;
}

/// `numpy.testing.assert_allclose` with `atol = 0`: shapes must agree,
/// NaNs compare equal.
pub fn compare_pixels(actual: &PixelArray, desired: &PixelArray, rtol: f64) -> Result<(), SkyError> {
    if actual.shape() != desired.shape() {
        return Err(SkyError::Fits(
            ErrorInfo::new("shape-mismatch", "decoded arrays differ in shape")
                .with_context("actual", format!("{:?}", actual.shape()))
                .with_context("desired", format!("{:?}", desired.shape())),
        ));
    }
    let actual = actual.to_f64_vec();
    let desired = desired.to_f64_vec();
    let mut mismatched = actual
        .iter()
        .zip(&desired)
        .enumerate()
        .filter(|(_, (a, d))| {
            let close = a == d || (a.is_nan() && d.is_nan()) || (*a - *d).abs() <= rtol * d.abs();
            !close
        })
        .map(|(idx, _)| idx);
    match mismatched.next() {
        None => Ok(()),
        Some(first) => Err(SkyError::Fits(
            ErrorInfo::new("pixel-mismatch", "decoded pixels differ beyond tolerance")
                .with_context("first_index", first.to_string())
                .with_context("mismatched", (mismatched.count() + 1).to_string())
                .with_context("rtol", rtol.to_string()),
        )),
    }
}

fn check_dtype(read: Dtype, expected: Dtype) -> Result<(), SkyError> {
    if read.kind() != expected.kind() || read.itemsize() != expected.itemsize() {
        return Err(SkyError::Fits(
            ErrorInfo::new("dtype-mismatch", "decoded dtype differs from the written dtype")
                .with_context("read", read.as_str())
                .with_context("expected", expected.as_str()),
        ));
    }
    Ok(())
}

fn check_tag(tag: &str, expected: CompressionType) -> Result<(), SkyError> {
    if tag != expected.as_str() {
        return Err(SkyError::Fits(
            ErrorInfo::new("compression-tag-mismatch", "ZCMPTYPE does not name the requested algorithm")
                .with_context("read", tag)
                .with_context("expected", expected.as_str()),
        ));
    }
    Ok(())
}

/// Result of one case in one direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "kebab-case")]
pub enum Outcome {
    /// Every check held.
    Passed,
    /// A check failed on a case not covered by the compatibility matrix.
    Failed(String),
    /// A check failed on a case the compatibility matrix lists.
    ExpectedFailure(String),
    /// A case listed in the compatibility matrix passed; the rule may be stale.
    UnexpectedPass(String),
}

/// Outcome of a case in one direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseResult {
    /// Case identifier.
    pub case_id: String,
    /// Which implementation wrote the file.
    pub direction: Direction,
    /// Result.
    pub outcome: Outcome,
}

/// Aggregated interop run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteropReport {
    /// Per-case, per-direction results.
    pub results: Vec<CaseResult>,
    /// Passing checks.
    pub passed: usize,
    /// Unexpected failures.
    pub failed: usize,
    /// Failures listed in the compatibility matrix.
    pub expected_failures: usize,
    /// Listed failures that did not reproduce.
    pub unexpected_passes: usize,
    /// Stable hash over the results.
    pub report_hash: String,
}

impl InteropReport {
    fn from_results(results: Vec<CaseResult>) -> Result<Self, SkyError> {
        let count = |pred: fn(&Outcome) -> bool| results.iter().filter(|r| pred(&r.outcome)).count();
        let passed = count(|o| matches!(o, Outcome::Passed));
        let failed = count(|o| matches!(o, Outcome::Failed(_)));
        let expected_failures = count(|o| matches!(o, Outcome::ExpectedFailure(_)));
        let unexpected_passes = count(|o| matches!(o, Outcome::UnexpectedPass(_)));
        let report_hash = stable_hash_string(&results)?;
        Ok(Self {
            results,
            passed,
            failed,
            expected_failures,
            unexpected_passes,
            report_hash,
        })
    }

    /// True when nothing failed unexpectedly.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Unexpected failures.
    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.results
            .iter()
            .filter(|result| matches!(result.outcome, Outcome::Failed(_)))
    }
}

/// Drives the case matrix through both implementations.
pub struct InteropHarness<'a> {
    under_test: &'a dyn FitsImplementation,
    reference: &'a dyn FitsImplementation,
    config: &'a InteropConfig,
}

impl<'a> InteropHarness<'a> {
    /// Validates `config` and binds the two implementations.
    pub fn new(
        under_test: &'a dyn FitsImplementation,
        reference: &'a dyn FitsImplementation,
        config: &'a InteropConfig,
    ) -> Result<Self, SkyError> {
        config.validate()?;
        Ok(Self {
            under_test,
            reference,
            config,
        })
    }

    /// Fixture data for `case`, reproducible from the configured seed.
    pub fn fixture(&self, case: &InteropCase) -> Result<PixelArray, SkyError> {
        let mut rng = RngHandle::substream(self.config.seed, case.fixture_id);
        fixture_array(&case.shape, case.compression_type, case.dtype, &mut rng)
    }

    /// Reference writes; the library under test must decode the same
    /// pixels the reference decodes.
    pub fn check_decompress(
        &self,
        case: &InteropCase,
        fixture: &PixelArray,
        dir: &Path,
    ) -> Result<(), SkyError> {
        let path = file_path(dir, case);
        self.reference
            .write_compressed(&path, fixture, &case.write_settings()?)?;

        let image = self.under_test.read_compressed(&path)?;
        check_tag(&normalize_tag(image.header.compression_tag()?), case.compression_type)?;
        check_dtype(image.data.dtype(), case.dtype)?;

        let reference_image = self.reference.read_compressed(&path)?;
        compare_pixels(&image.data, &reference_image.data, self.config.rtol)?;

        if case.params.qmethod == Some(QuantizeMethod::SubtractiveDither2)
            && image.data.first() != Some(0.0)
        {
            return Err(check_error(
                "dither-zero-lost",
                "SUBTRACTIVE_DITHER_2 did not preserve the leading zero",
            ));
        }
        Ok(())
    }

    /// Library under test writes; the reference must see the exact
    /// compression tag and decode the same pixels.
    pub fn check_compress(
        &self,
        case: &InteropCase,
        fixture: &PixelArray,
        dir: &Path,
    ) -> Result<(), SkyError> {
        let path = file_path(dir, case);
        self.under_test
            .write_compressed(&path, fixture, &case.write_settings()?)?;

        let reference_image = self.reference.read_compressed(&path)?;
        check_tag(reference_image.header.compression_tag()?, case.compression_type)?;
        check_dtype(reference_image.data.dtype(), case.dtype)?;

        let image = self.under_test.read_compressed(&path)?;
        compare_pixels(&reference_image.data, &image.data, self.config.rtol)
    }

    /// Runs one case in one direction inside a scratch directory that is
    /// removed afterwards.
    pub fn run_direction(
        &self,
        case: &InteropCase,
        fixture: &PixelArray,
        direction: Direction,
    ) -> Result<CaseResult, SkyError> {
        let scratch = tempfile::Builder::new()
            .prefix("sky-fits-")
            .tempdir()
            .map_err(|err| check_error("tempdir", err.to_string()))?;
        let checked = match direction {
            Direction::ReferenceWrites => self.check_decompress(case, fixture, scratch.path()),
            Direction::UnderTestWrites => self.check_compress(case, fixture, scratch.path()),
        };
        let rule = self.config.compat.expected_failure(case, direction);
        let outcome = match (checked, rule) {
            (Ok(()), None) => Outcome::Passed,
            (Ok(()), Some(rule)) => {
                warn!(case = %case.id, ?direction, reason = %rule.reason, "listed incompatibility did not reproduce");
                Outcome::UnexpectedPass(rule.reason.clone())
            }
            (Err(_), Some(rule)) => Outcome::ExpectedFailure(rule.reason.clone()),
            (Err(err), None) => {
                warn!(
                    case = %case.id,
                    ?direction,
                    under_test = self.under_test.name(),
                    reference = self.reference.name(),
                    error = %err,
                    "interop check failed"
                );
                Outcome::Failed(err.to_string())
            }
        };
        debug!(case = %case.id, ?direction, ?outcome, "interop case finished");
        Ok(CaseResult {
            case_id: case.id.clone(),
            direction,
            outcome,
        })
    }

    /// Runs every configured case in both directions.
    pub fn run(&self) -> Result<InteropReport, SkyError> {
        let mut fixtures: BTreeMap<u64, PixelArray> = BTreeMap::new();
        let mut results = Vec::new();
        for case in self.config.cases()? {
            if !fixtures.contains_key(&case.fixture_id) {
                fixtures.insert(case.fixture_id, self.fixture(&case)?);
            }
            let fixture = &fixtures[&case.fixture_id];
            for direction in Direction::BOTH {
                results.push(self.run_direction(&case, fixture, direction)?);
            }
        }
        let report = InteropReport::from_results(results)?;
        info!(
            passed = report.passed,
            failed = report.failed,
            expected_failures = report.expected_failures,
            unexpected_passes = report.unexpected_passes,
            "interop run finished"
        );
        Ok(report)
    }
}

fn file_path(dir: &Path, case: &InteropCase) -> PathBuf {
    dir.join(format!("{}_{}.fits", case.compression_type, case.dtype))
}
