//! Half-resolution decoding by direct gather, no interpolation.

use crate::image_pipeline::common::error::InvalidGridError;
use crate::image_pipeline::debayer::cfa::{CfaGrid, CfaRole};
use crate::image_pipeline::debayer::types::{Execution, RgbImage, SubsampledImage};
use crate::image_pipeline::raw::types::{RawFrame, Sample};

/// Collapses every 2x2 tile into one RGB pixel.
///
/// Output shape is `(rows / 2, cols / 2, 3)` in the input sample type. Red and
/// blue are taken as-is; green is `0.5 * G1 + 0.5 * G2` of the same tile,
/// computed in `f64` and converted back to `T` (integer types truncate).
pub fn decode_subsampled<T: Sample>(raw: &RawFrame<T>) -> Result<SubsampledImage<T>, InvalidGridError> {
    decode_subsampled_with(raw, Execution::default())
}

pub fn decode_subsampled_with<T: Sample>(
    raw: &RawFrame<T>,
    execution: Execution,
) -> Result<SubsampledImage<T>, InvalidGridError> {
    let grid = CfaGrid::new(raw.rows(), raw.cols())?;
    let rows = raw.rows() / 2;
    let cols = raw.cols() / 2;

    let mut image = RgbImage::zeroed(rows, cols);
    execution.for_each_row(&mut image.data, cols * 3, |i, out| {
        let site = |role: CfaRole, j: usize| {
            let (r, c) = grid.tile_site(role, i, j);
            raw.get(r, c)
        };
        for (j, px) in out.chunks_exact_mut(3).enumerate() {
            let g1 = site(CfaRole::G1, j).to_f64();
            let g2 = site(CfaRole::G2, j).to_f64();
            px[0] = site(CfaRole::R, j);
            px[1] = T::from_f64(g1 * 0.5 + g2 * 0.5);
            px[2] = site(CfaRole::B, j);
        }
    });

    Ok(image)
}
