//! Compression algorithms, quantisation parameters and their mapping to
//! writer settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sky_core::errors::{ErrorInfo, SkyError};

fn compression_error(code: &str, message: impl Into<String>) -> SkyError {
    SkyError::Fits(ErrorInfo::new(code, message))
}

/// Tile-compression algorithm, spelled as in the `ZCMPTYPE` card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CompressionType {
    /// Rice coding.
    #[serde(rename = "RICE_1")]
    Rice1,
    /// Gzip of the raw tile bytes.
    #[serde(rename = "GZIP_1")]
    Gzip1,
    /// Gzip after byte shuffling.
    #[serde(rename = "GZIP_2")]
    Gzip2,
    /// IRAF pixel-list coding.
    #[serde(rename = "PLIO_1")]
    Plio1,
    /// H-transform compression.
    #[serde(rename = "HCOMPRESS_1")]
    Hcompress1,
}

impl CompressionType {
    /// Every algorithm, in matrix order.
    pub const ALL: [CompressionType; 5] = [
        CompressionType::Rice1,
        CompressionType::Gzip1,
        CompressionType::Gzip2,
        CompressionType::Plio1,
        CompressionType::Hcompress1,
    ];

    /// Canonical header spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            CompressionType::Rice1 => "RICE_1",
            CompressionType::Gzip1 => "GZIP_1",
            CompressionType::Gzip2 => "GZIP_2",
            CompressionType::Plio1 => "PLIO_1",
            CompressionType::Hcompress1 => "HCOMPRESS_1",
        }
    }
}

/// Folds the legacy `RICE_ONE` spelling onto the canonical one.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().replace("ONE", "1")
}

impl fmt::Display for CompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompressionType {
    type Err = SkyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_tag(s).to_ascii_uppercase();
        CompressionType::ALL
            .into_iter()
            .find(|ctype| ctype.as_str() == normalized)
            .ok_or_else(|| {
                SkyError::Fits(
                    ErrorInfo::new("unknown-compression", "unrecognised compression type")
                        .with_context("value", s),
                )
            })
    }
}

/// Dithering applied before quantising floating-point tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuantizeMethod {
    /// Plain rounding.
    NoDither,
    /// Subtractive dithering of every pixel.
    SubtractiveDither1,
    /// Subtractive dithering that preserves exact zeros.
    SubtractiveDither2,
}

impl QuantizeMethod {
    /// Numeric code used by writer APIs (`qmethod`).
    pub fn code(self) -> i8 {
        match self {
            QuantizeMethod::NoDither => -1,
            QuantizeMethod::SubtractiveDither1 => 1,
            QuantizeMethod::SubtractiveDither2 => 2,
        }
    }

    /// Inverse of [`QuantizeMethod::code`].
    pub fn from_code(code: i8) -> Result<Self, SkyError> {
        match code {
            -1 => Ok(QuantizeMethod::NoDither),
            1 => Ok(QuantizeMethod::SubtractiveDither1),
            2 => Ok(QuantizeMethod::SubtractiveDither2),
            other => Err(SkyError::Fits(
                ErrorInfo::new("unknown-quantize-method", "qmethod must be -1, 1 or 2")
                    .with_context("qmethod", other.to_string()),
            )),
        }
    }

    /// Value of the `ZQUANTIZ` card.
    pub fn card_value(self) -> &'static str {
        match self {
            QuantizeMethod::NoDither => "NO_DITHER",
            QuantizeMethod::SubtractiveDither1 => "SUBTRACTIVE_DITHER_1",
            QuantizeMethod::SubtractiveDither2 => "SUBTRACTIVE_DITHER_2",
        }
    }
}

/// Quantisation level requested by a parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum QuantizeLevel {
    /// Explicitly disabled quantisation (`qlevel: None`).
    Lossless,
    /// Quantise to the given level.
    Level(f64),
}

/// One compression parameter set in the reference writer's vocabulary.
///
/// Absent fields leave the writer defaults in place.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CompressionParams {
    /// `qlevel`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qlevel: Option<QuantizeLevel>,
    /// `qmethod`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qmethod: Option<QuantizeMethod>,
}

impl CompressionParams {
    /// Writer defaults.
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Quantisation disabled.
    pub fn lossless() -> Self {
        Self {
            qlevel: Some(QuantizeLevel::Lossless),
            qmethod: None,
        }
    }

    /// Quantise at `level` with `method`.
    pub fn quantized(level: f64, method: QuantizeMethod) -> Self {
        Self {
            qlevel: Some(QuantizeLevel::Level(level)),
            qmethod: Some(method),
        }
    }

    /// The parameter sets exercised for a dtype: integer data only runs the
    /// writer defaults.
    pub fn sets_for(is_float: bool) -> Vec<CompressionParams> {
        let mut sets = vec![CompressionParams::defaults()];
        if is_float {
            sets.push(CompressionParams::lossless());
            sets.push(CompressionParams::quantized(10.0, QuantizeMethod::SubtractiveDither1));
            sets.push(CompressionParams::quantized(10.0, QuantizeMethod::SubtractiveDither2));
        }
        sets
    }

    /// Short identifier used in case ids.
    pub fn label(&self) -> String {
        match (self.qlevel, self.qmethod) {
            (None, None) => "default".to_string(),
            (Some(QuantizeLevel::Lossless), None) => "lossless".to_string(),
            (Some(QuantizeLevel::Lossless), Some(method)) => format!("lossless-m{}", method.code()),
            (Some(QuantizeLevel::Level(level)), None) => format!("q{level}"),
            (Some(QuantizeLevel::Level(level)), Some(method)) => {
                format!("q{level}-m{}", method.code())
            }
            (None, Some(method)) => format!("m{}", method.code()),
        }
    }

    /// Maps the parameter set onto writer settings for the library under
    /// test: `qlevel` becomes `quantize_level`, `qmethod` becomes
    /// `quantize_method` and an explicit lossless level becomes `0.0`.
    pub fn write_settings(
        &self,
        compression_type: CompressionType,
        tile_dims: &[usize],
    ) -> Result<WriteSettings, SkyError> {
        if tile_dims.iter().any(|&dim| dim == 0) {
            return Err(compression_error("zero-tile-dim", "tile dimensions must be positive"));
        }
        let quantize_level = self.qlevel.map(|level| match level {
            QuantizeLevel::Lossless => 0.0,
            QuantizeLevel::Level(value) => value,
        });
        Ok(WriteSettings {
            compression_type,
            tile_dims: tile_dims.to_vec(),
            quantize_level,
            quantize_method: self.qmethod,
        })
    }
}

/// Everything a writer needs besides the pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteSettings {
    /// Algorithm to apply.
    pub compression_type: CompressionType,
    /// Tile shape, in array axis order.
    pub tile_dims: Vec<usize>,
    /// `quantize_level`; `None` keeps the writer default and `0.0` disables quantisation.
    pub quantize_level: Option<f64>,
    /// `quantize_method`; `None` keeps the writer default.
    pub quantize_method: Option<QuantizeMethod>,
}
