//! Deterministic pixel fixtures for interop cases.

use rand::Rng;
use sky_core::RngHandle;

use crate::compression::CompressionType;
use crate::pixels::{Dtype, PixelArray};
use sky_core::errors::SkyError;

/// Exclusive upper bound of the uniform fixture values.
pub const FIXTURE_HIGH: f64 = 255.0;

/// True when a case uses `arange` data instead of random values: `u1`
/// everywhere, and `i2` under HCOMPRESS, where random data does not
/// survive the reference writer.
pub fn uses_structured_fallback(compression_type: CompressionType, dtype: Dtype) -> bool {
    (compression_type == CompressionType::Hcompress1 && dtype == Dtype::I2) || dtype == Dtype::U1
}

/// Flattened `f64` fixture values before the dtype cast.
///
/// Random values are uniform on `[0, 255)` with the first element forced to
/// exactly zero, since zeros get special treatment under
/// `SUBTRACTIVE_DITHER_2`.
pub fn base_values(
    shape: &[usize],
    compression_type: CompressionType,
    dtype: Dtype,
    rng: &mut RngHandle,
) -> Vec<f64> {
    let len: usize = shape.iter().product();
    if uses_structured_fallback(compression_type, dtype) {
        return (0..len).map(|idx| idx as f64).collect();
    }
    let mut values: Vec<f64> = (0..len).map(|_| rng.gen_range(0.0..FIXTURE_HIGH)).collect();
    if let Some(first) = values.first_mut() {
        *first = 0.0;
    }
    values
}

/// Fixture array for one case, cast to `dtype` with `astype` semantics.
pub fn fixture_array(
    shape: &[usize],
    compression_type: CompressionType,
    dtype: Dtype,
    rng: &mut RngHandle,
) -> Result<PixelArray, SkyError> {
    let values = base_values(shape, compression_type, dtype, rng);
    PixelArray::from_f64(shape.to_vec(), &values, dtype)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::PixelData;

    #[test]
    fn random_fixture_starts_at_zero_and_stays_in_range() {
        let mut rng = RngHandle::from_seed(7);
        let values = base_values(&[12, 12], CompressionType::Rice1, Dtype::F8, &mut rng);
        assert_eq!(values.len(), 144);
        assert_eq!(values[0], 0.0);
        assert!(values.iter().all(|v| (0.0..FIXTURE_HIGH).contains(v)));
        assert!(values.iter().skip(1).any(|&v| v != values[1]));
    }

    #[test]
    fn byte_fixture_is_a_wrapping_ramp() {
        let mut rng = RngHandle::from_seed(7);
        let array = fixture_array(&[15, 15, 15], CompressionType::Gzip1, Dtype::U1, &mut rng).unwrap();
        let PixelData::U1(values) = array.data() else {
            panic!("expected u1 data");
        };
        assert_eq!(values[0], 0);
        assert_eq!(values[255], 255);
        assert_eq!(values[256], 0);
        assert_eq!(values[3374], (3374 % 256) as u8);
    }

    #[test]
    fn hcompress_i2_uses_ramp_but_i4_does_not() {
        assert!(uses_structured_fallback(CompressionType::Hcompress1, Dtype::I2));
        assert!(!uses_structured_fallback(CompressionType::Hcompress1, Dtype::I4));
        assert!(!uses_structured_fallback(CompressionType::Rice1, Dtype::I2));
        assert!(uses_structured_fallback(CompressionType::Plio1, Dtype::U1));
    }
}
