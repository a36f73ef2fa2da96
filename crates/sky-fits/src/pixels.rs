use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sky_core::errors::{ErrorInfo, SkyError};

/// Pixel element type, in numpy's short notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    /// Unsigned byte.
    U1,
    /// 16-bit signed integer.
    I2,
    /// 32-bit signed integer.
    I4,
    /// Single-precision float.
    F4,
    /// Double-precision float.
    F8,
}

/// Broad numeric category of a dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DtypeKind {
    /// Unsigned integer (`u`).
    Unsigned,
    /// Signed integer (`i`).
    Signed,
    /// Floating point (`f`).
    Float,
}

impl Dtype {
    /// Every dtype, in matrix order.
    pub const ALL: [Dtype; 5] = [Dtype::U1, Dtype::I2, Dtype::I4, Dtype::F4, Dtype::F8];

    /// Numeric category.
    pub fn kind(self) -> DtypeKind {
        match self {
            Dtype::U1 => DtypeKind::Unsigned,
            Dtype::I2 | Dtype::I4 => DtypeKind::Signed,
            Dtype::F4 | Dtype::F8 => DtypeKind::Float,
        }
    }

    /// Size of one element in bytes.
    pub fn itemsize(self) -> usize {
        match self {
            Dtype::U1 => 1,
            Dtype::I2 => 2,
            Dtype::I4 | Dtype::F4 => 4,
            Dtype::F8 => 8,
        }
    }

    /// True for `f4` and `f8`.
    pub fn is_float(self) -> bool {
        self.kind() == DtypeKind::Float
    }

    /// FITS `BITPIX` value of the uncompressed image.
    pub fn bitpix(self) -> i32 {
        match self {
            Dtype::U1 => 8,
            Dtype::I2 => 16,
            Dtype::I4 => 32,
            Dtype::F4 => -32,
            Dtype::F8 => -64,
        }
    }

    /// Short code such as `u1`.
    pub fn as_str(self) -> &'static str {
        match self {
            Dtype::U1 => "u1",
            Dtype::I2 => "i2",
            Dtype::I4 => "i4",
            Dtype::F4 => "f4",
            Dtype::F8 => "f8",
        }
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dtype {
    type Err = SkyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dtype::ALL
            .into_iter()
            .find(|dtype| dtype.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                SkyError::Fits(
                    ErrorInfo::new("unknown-dtype", "dtype must be one of u1, i2, i4, f4, f8")
                        .with_context("value", s),
                )
            })
    }
}

impl fmt::Display for DtypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            DtypeKind::Unsigned => "u",
            DtypeKind::Signed => "i",
            DtypeKind::Float => "f",
        };
        f.write_str(code)
    }
}

/// Typed pixel storage in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dtype", content = "values", rename_all = "lowercase")]
pub enum PixelData {
    /// `u1` pixels.
    U1(Vec<u8>),
    /// `i2` pixels.
    I2(Vec<i16>),
    /// `i4` pixels.
    I4(Vec<i32>),
    /// `f4` pixels.
    F4(Vec<f32>),
    /// `f8` pixels.
    F8(Vec<f64>),
}

impl PixelData {
    /// Element type of the storage.
    pub fn dtype(&self) -> Dtype {
        match self {
            PixelData::U1(_) => Dtype::U1,
            PixelData::I2(_) => Dtype::I2,
            PixelData::I4(_) => Dtype::I4,
            PixelData::F4(_) => Dtype::F4,
            PixelData::F8(_) => Dtype::F8,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            PixelData::U1(values) => values.len(),
            PixelData::I2(values) => values.len(),
            PixelData::I4(values) => values.len(),
            PixelData::F4(values) => values.len(),
            PixelData::F8(values) => values.len(),
        }
    }

    /// True when there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Widens every element to `f64`.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            PixelData::U1(values) => values.iter().map(|&v| f64::from(v)).collect(),
            PixelData::I2(values) => values.iter().map(|&v| f64::from(v)).collect(),
            PixelData::I4(values) => values.iter().map(|&v| f64::from(v)).collect(),
            PixelData::F4(values) => values.iter().map(|&v| f64::from(v)).collect(),
            PixelData::F8(values) => values.clone(),
        }
    }

    /// Converts `f64` values with numpy `astype` semantics: floats are
    /// truncated toward zero and integers wrap to the target width.
    pub fn cast_from_f64(values: &[f64], dtype: Dtype) -> Self {
        match dtype {
            Dtype::U1 => PixelData::U1(values.iter().map(|&v| truncate(v) as u8).collect()),
            Dtype::I2 => PixelData::I2(values.iter().map(|&v| truncate(v) as i16).collect()),
            Dtype::I4 => PixelData::I4(values.iter().map(|&v| truncate(v) as i32).collect()),
            Dtype::F4 => PixelData::F4(values.iter().map(|&v| v as f32).collect()),
            Dtype::F8 => PixelData::F8(values.to_vec()),
        }
    }
}

// Non-finite input has no defined integer value; it lands on zero.
fn truncate(value: f64) -> i64 {
    if value.is_finite() {
        value.trunc() as i64
    } else {
        0
    }
}

/// N-dimensional image with row-major typed data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelArray {
    shape: Vec<usize>,
    data: PixelData,
}

impl PixelArray {
    /// Builds an array, checking that `data` fills `shape` exactly.
    pub fn new(shape: Vec<usize>, data: PixelData) -> Result<Self, SkyError> {
        if shape.is_empty() || shape.iter().any(|&dim| dim == 0) {
            return Err(SkyError::Fits(
                ErrorInfo::new("invalid-shape", "shape must have positive dimensions")
                    .with_context("shape", format!("{shape:?}")),
            ));
        }
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(SkyError::Fits(
                ErrorInfo::new("shape-mismatch", "pixel count does not match shape")
                    .with_context("shape", format!("{shape:?}"))
                    .with_context("len", data.len().to_string()),
            ));
        }
        Ok(Self { shape, data })
    }

    /// Casts `values` to `dtype` and wraps them in an array of `shape`.
    pub fn from_f64(shape: Vec<usize>, values: &[f64], dtype: Dtype) -> Result<Self, SkyError> {
        Self::new(shape, PixelData::cast_from_f64(values, dtype))
    }

    /// Array shape.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Element count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false for a constructed array.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element type.
    pub fn dtype(&self) -> Dtype {
        self.data.dtype()
    }

    /// Typed storage.
    pub fn data(&self) -> &PixelData {
        &self.data
    }

    /// Flattened values widened to `f64`.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.data.to_f64_vec()
    }

    /// First element in flattened order, widened to `f64`.
    pub fn first(&self) -> Option<f64> {
        self.to_f64_vec().first().copied()
    }
}
