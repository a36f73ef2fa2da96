//! Interop case enumeration: shape and tile-dimension groups crossed with
//! compression types, dtypes and parameter sets.

use serde::{Deserialize, Serialize};
use sky_core::errors::{ErrorInfo, SkyError};

use crate::compression::{CompressionParams, CompressionType, WriteSettings};
use crate::pixels::Dtype;

/// One array shape and the tile layouts tried against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeGroup {
    /// Array shape.
    pub shape: Vec<usize>,
    /// Tile dimensions, each with the same rank as `shape`.
    pub tile_dims: Vec<Vec<usize>>,
}

impl ShapeGroup {
    /// Creates a group from borrowed dimensions.
    pub fn new(shape: &[usize], tile_dims: &[&[usize]]) -> Self {
        Self {
            shape: shape.to_vec(),
            tile_dims: tile_dims.iter().map(|dims| dims.to_vec()).collect(),
        }
    }

    /// Checks ranks and that every dimension is positive.
    pub fn validate(&self) -> Result<(), SkyError> {
        let invalid = |message: &str| {
            SkyError::Config(
                ErrorInfo::new("invalid-shape-group", message)
                    .with_context("shape", dims_label(&self.shape)),
            )
        };
        if self.shape.is_empty() || self.shape.contains(&0) {
            return Err(invalid("shape dimensions must be positive"));
        }
        if self.tile_dims.is_empty() {
            return Err(invalid("shape group has no tile layouts"));
        }
        for tile in &self.tile_dims {
            if tile.len() != self.shape.len() {
                return Err(invalid("tile rank differs from shape rank"));
            }
            if tile.contains(&0) {
                return Err(invalid("tile dimensions must be positive"));
            }
        }
        Ok(())
    }
}

/// Shapes up to three dimensions; cfitsio does not tile-compress beyond that.
pub fn default_shape_groups() -> Vec<ShapeGroup> {
    vec![
        ShapeGroup::new(&[10], &[&[5], &[1], &[3]]),
        ShapeGroup::new(&[12, 12], &[&[1, 12], &[4, 5], &[6, 6]]),
        ShapeGroup::new(&[15, 15], &[&[1, 15], &[5, 1], &[5, 5]]),
        ShapeGroup::new(
            &[15, 15, 15],
            &[&[5, 5, 1], &[5, 7, 1], &[1, 5, 4], &[1, 1, 15], &[15, 1, 5]],
        ),
    ]
}

/// Renders dimensions as `12x12`.
pub fn dims_label(dims: &[usize]) -> String {
    dims.iter()
        .map(|dim| dim.to_string())
        .collect::<Vec<_>>()
        .join("x")
}

/// A single point of the interop matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteropCase {
    /// Stable identifier.
    pub id: String,
    /// Substream of the fixture data; cases sharing shape, algorithm and
    /// dtype share fixture data.
    pub fixture_id: u64,
    /// Algorithm.
    pub compression_type: CompressionType,
    /// Parameter set.
    pub params: CompressionParams,
    /// Pixel type.
    pub dtype: Dtype,
    /// Array shape.
    pub shape: Vec<usize>,
    /// Tile layout.
    pub tile_dims: Vec<usize>,
}

impl InteropCase {
    /// Number of tile axes longer than one pixel.
    pub fn non_unit_tile_dims(&self) -> usize {
        self.tile_dims.iter().filter(|&&dim| dim != 1).count()
    }

    /// Writer settings for this case.
    pub fn write_settings(&self) -> Result<WriteSettings, SkyError> {
        self.params
            .write_settings(self.compression_type, &self.tile_dims)
    }
}

/// Enumerates every case, groups outermost and parameter sets innermost.
pub fn generate_cases(
    groups: &[ShapeGroup],
    compression_types: &[CompressionType],
    dtypes: &[Dtype],
) -> Result<Vec<InteropCase>, SkyError> {
    let mut cases = Vec::new();
    for (group_idx, group) in groups.iter().enumerate() {
        group.validate()?;
        for tile in &group.tile_dims {
            for (ctype_idx, &compression_type) in compression_types.iter().enumerate() {
                for (dtype_idx, &dtype) in dtypes.iter().enumerate() {
                    let fixture_id = ((group_idx * compression_types.len() + ctype_idx)
                        * dtypes.len()
                        + dtype_idx) as u64;
                    for params in CompressionParams::sets_for(dtype.is_float()) {
                        let id = format!(
                            "{compression_type}-{}-{dtype}-{}-t{}",
                            params.label(),
                            dims_label(&group.shape),
                            dims_label(tile)
                        );
                        cases.push(InteropCase {
                            id,
                            fixture_id,
                            compression_type,
                            params,
                            dtype,
                            shape: group.shape.clone(),
                            tile_dims: tile.clone(),
                        });
                    }
                }
            }
        }
    }
    Ok(cases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn full_matrix_size() {
        let cases =
            generate_cases(&default_shape_groups(), &CompressionType::ALL, &Dtype::ALL).unwrap();
        // 14 layouts x 5 algorithms x (3 integer + 2 float x 4 parameter sets).
        assert_eq!(cases.len(), 14 * 5 * 11);
        let ids: BTreeSet<_> = cases.iter().map(|case| case.id.as_str()).collect();
        assert_eq!(ids.len(), cases.len());
        assert!(ids.contains("HCOMPRESS_1-q10-m2-f4-15x15-t5x5"));
    }

    #[test]
    fn fixture_ids_ignore_tiles_and_params() {
        let cases =
            generate_cases(&default_shape_groups(), &CompressionType::ALL, &Dtype::ALL).unwrap();
        let ids: BTreeSet<_> = cases
            .iter()
            .filter(|case| case.shape == [12, 12] && case.dtype == Dtype::F4)
            .filter(|case| case.compression_type == CompressionType::Rice1)
            .map(|case| case.fixture_id)
            .collect();
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn mismatched_tile_rank_is_rejected() {
        let group = ShapeGroup::new(&[12, 12], &[&[4]]);
        let err = generate_cases(&[group], &[CompressionType::Rice1], &[Dtype::I4]).unwrap_err();
        assert_eq!(err.code(), "invalid-shape-group");
    }
}
