//! Full-resolution decoding by neighbour averaging.
//!
//! Every pixel keeps its native sample. Each missing channel is the mean of a
//! fixed neighbour template chosen by (site role, target channel). Near the
//! frame edge the template is cut down to the neighbours that exist and the
//! mean is taken over those alone, so borders get 2 or 3 term means and the
//! chroma channels of the corners come from a single neighbour.

use crate::image_pipeline::common::error::InvalidGridError;
use crate::image_pipeline::debayer::cfa::{CfaGrid, CfaRole, Channel, PositionClass};
use crate::image_pipeline::debayer::types::{
    DecodeOptions, DemosaicedImage, DiagonalMode, RgbImage,
};
use crate::image_pipeline::raw::types::{RawFrame, Sample};

/// Smallest extent on either axis the interpolating decoder accepts.
pub const MIN_FULL_SIZE: usize = 4;

type Offset = (isize, isize);

const N: Offset = (-1, 0);
const S: Offset = (1, 0);
const W: Offset = (0, -1);
const E: Offset = (0, 1);
const NW: Offset = (-1, -1);
const NE: Offset = (-1, 1);
const SW: Offset = (1, -1);
const SE: Offset = (1, 1);

const ORTHOGONAL: &[Offset] = &[N, S, W, E];
const DIAGONAL: &[Offset] = &[NW, NE, SW, SE];
const HORIZONTAL: &[Offset] = &[W, E];
const VERTICAL: &[Offset] = &[N, S];
const DIAGONAL_LEGACY: &[Offset] = &[NW, SE, NW, SE];

/// Neighbours that carry `channel` natively around a site of `role`.
///
/// Returns an empty template for the site's own channel.
pub(crate) fn neighbor_template(
    role: CfaRole,
    channel: Channel,
    diagonal: DiagonalMode,
    class: PositionClass,
) -> &'static [Offset] {
    match (role, channel) {
        (CfaRole::R, Channel::Green) | (CfaRole::B, Channel::Green) => ORTHOGONAL,
        (CfaRole::R, Channel::Blue) => DIAGONAL,
        (CfaRole::B, Channel::Red) => match (diagonal, class) {
            (DiagonalMode::Legacy, PositionClass::Interior) => DIAGONAL_LEGACY,
            _ => DIAGONAL,
        },
        (CfaRole::G1, Channel::Red) | (CfaRole::G2, Channel::Blue) => HORIZONTAL,
        (CfaRole::G1, Channel::Blue) | (CfaRole::G2, Channel::Red) => VERTICAL,
        _ => &[],
    }
}

#[inline]
fn shift(row: usize, col: usize, (dr, dc): Offset, rows: usize, cols: usize) -> Option<(usize, usize)> {
    let r = row.checked_add_signed(dr).filter(|&r| r < rows)?;
    let c = col.checked_add_signed(dc).filter(|&c| c < cols)?;
    Some((r, c))
}

/// Mean over the in-bounds part of `template` around `(row, col)`.
#[inline]
fn neighbor_mean<T: Sample>(raw: &RawFrame<T>, row: usize, col: usize, template: &[Offset]) -> f32 {
    let mut sum = 0.0f32;
    let mut count = 0u32;
    for &offset in template {
        if let Some((r, c)) = shift(row, col, offset, raw.rows(), raw.cols()) {
            sum += raw.get(r, c).to_f32();
            count += 1;
        }
    }
    debug_assert!(count > 0, "no in-bounds neighbour at ({row}, {col})");
    sum / count as f32
}

/// Interpolates the two missing channels at every pixel.
///
/// Output shape is `(rows, cols, 3)` in `f32`. Both dimensions must be even
/// and at least [`MIN_FULL_SIZE`].
pub fn decode_full<T: Sample>(raw: &RawFrame<T>) -> Result<DemosaicedImage, InvalidGridError> {
    decode_full_with(raw, &DecodeOptions::default())
}

pub fn decode_full_with<T: Sample>(
    raw: &RawFrame<T>,
    options: &DecodeOptions,
) -> Result<DemosaicedImage, InvalidGridError> {
    let grid = CfaGrid::with_min_size(raw.rows(), raw.cols(), MIN_FULL_SIZE)?;
    let cols = grid.cols();

    let mut image = RgbImage::zeroed(grid.rows(), cols);
    options.execution.for_each_row(&mut image.data, cols * 3, |row, out| {
        for (col, px) in out.chunks_exact_mut(3).enumerate() {
            let role = grid.role_at(row, col);
            let class = grid.position_class(row, col);
            for channel in Channel::ALL {
                px[channel.index()] = if channel == role.channel() {
                    raw.get(row, col).to_f32()
                } else {
                    let template = neighbor_template(role, channel, options.diagonal, class);
                    neighbor_mean(raw, row, col, template)
                };
            }
        }
    });

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::debayer::cfa::role_at;
    use crate::image_pipeline::debayer::types::Execution;

    fn ramp(rows: usize, cols: usize) -> RawFrame<u16> {
        RawFrame::from_fn(rows, cols, |r, c| (r * cols + c) as u16)
    }

    /// Pseudo-random but reproducible sensor content.
    fn noise(rows: usize, cols: usize) -> RawFrame<u16> {
        RawFrame::from_fn(rows, cols, |r, c| ((r * 7919 + c * 104729 + r * c * 31) % 4096) as u16)
    }

    fn legacy_options() -> DecodeOptions {
        DecodeOptions { diagonal: DiagonalMode::Legacy, ..Default::default() }
    }

    #[test]
    fn test_shape() {
        let image = decode_full(&ramp(6, 8)).unwrap();
        assert_eq!(image.shape(), (6, 8, 3));
    }

    #[test]
    fn test_native_sites_are_identity() {
        let raw = noise(10, 12);
        let image = decode_full(&raw).unwrap();
        for row in 0..raw.rows() {
            for col in 0..raw.cols() {
                let native = role_at(row, col).channel();
                assert_eq!(image.get(row, col, native), raw.get(row, col) as f32, "({row}, {col})");
            }
        }
    }

    #[test]
    fn test_corners_copy_single_neighbor() {
        let raw = noise(6, 8);
        let image = decode_full(&raw).unwrap();
        let (l, b) = (7, 5);
        let v = |r: usize, c: usize| raw.get(r, c) as f32;

        // top-left G1
        assert_eq!(image.get(0, 0, Channel::Red), v(0, 1));
        assert_eq!(image.get(0, 0, Channel::Blue), v(1, 0));
        // top-right R
        assert_eq!(image.get(0, l, Channel::Blue), v(1, l - 1));
        // bottom-left B
        assert_eq!(image.get(b, 0, Channel::Red), v(b - 1, 1));
        // bottom-right G2
        assert_eq!(image.get(b, l, Channel::Red), v(b - 1, l));
        assert_eq!(image.get(b, l, Channel::Blue), v(b, l - 1));
    }

    #[test]
    fn test_corner_green_uses_two_neighbors() {
        let raw = noise(6, 8);
        let image = decode_full(&raw).unwrap();
        let v = |r: usize, c: usize| raw.get(r, c) as f32;
        assert_eq!(image.get(0, 7, Channel::Green), (v(1, 7) + v(0, 6)) / 2.0);
        assert_eq!(image.get(5, 0, Channel::Green), (v(4, 0) + v(5, 1)) / 2.0);
    }

    #[test]
    fn test_4x4_scenario() {
        let image = decode_full(&ramp(4, 4)).unwrap();
        assert_eq!(image.pixel(0, 0), [1.0, 0.0, 4.0]);
        // R site on the top row: green from W, E and S; blue from SW and SE
        assert_eq!(image.pixel(0, 1), [1.0, (0.0 + 2.0 + 5.0) / 3.0, (4.0 + 6.0) / 2.0]);
        // interior B site
        assert_eq!(image.pixel(1, 2), [(1.0 + 3.0 + 9.0 + 11.0) / 4.0, (5.0 + 7.0 + 2.0 + 10.0) / 4.0, 6.0]);
        // interior R site
        assert_eq!(image.pixel(2, 1)[1], 9.0);
        // interior G2 site
        assert_eq!(image.pixel(1, 1), [(1.0 + 9.0) / 2.0, 5.0, (4.0 + 6.0) / 2.0]);
        // bottom-right G2 corner
        assert_eq!(image.pixel(3, 3), [11.0, 15.0, 14.0]);
    }

    #[test]
    fn test_border_means() {
        let raw = noise(6, 8);
        let image = decode_full(&raw).unwrap();
        let v = |r: usize, c: usize| raw.get(r, c) as f32;

        // first row G1: red from W/E, blue from S only
        assert_eq!(image.get(0, 2, Channel::Red), (v(0, 1) + v(0, 3)) / 2.0);
        assert_eq!(image.get(0, 2, Channel::Blue), v(1, 2));
        // last row B: red from NW/NE, green from N/W/E
        assert_eq!(image.get(5, 2, Channel::Red), (v(4, 1) + v(4, 3)) / 2.0);
        assert_eq!(image.get(5, 2, Channel::Green), (v(4, 2) + v(5, 1) + v(5, 3)) / 3.0);
        // first column G1: red from E only, blue from N/S
        assert_eq!(image.get(2, 0, Channel::Red), v(2, 1));
        assert_eq!(image.get(2, 0, Channel::Blue), (v(1, 0) + v(3, 0)) / 2.0);
        // last column R: green from N/S/W, blue from NW/SW
        assert_eq!(image.get(2, 7, Channel::Green), (v(1, 7) + v(3, 7) + v(2, 6)) / 3.0);
        assert_eq!(image.get(2, 7, Channel::Blue), (v(1, 6) + v(3, 6)) / 2.0);
        // last column G2: blue from W only
        assert_eq!(image.get(3, 7, Channel::Blue), v(3, 6));
    }

    /// Explicit edge, corner and interior passes of the legacy acquisition
    /// tooling's debayer, one plane at a time.
    fn legacy_passes(raw: &RawFrame<u16>) -> Vec<[f32; 3]> {
        let (nl, nc) = (raw.rows(), raw.cols());
        let (l, e) = (nl - 1, nc - 1);
        let at = |row: usize, col: usize| row * nc + col;
        let mut r = vec![0.0f32; nl * nc];
        let mut g = r.clone();
        let mut b = r.clone();
        for row in 0..nl {
            for col in 0..nc {
                let v = raw.get(row, col) as f32;
                match (row % 2, col % 2) {
                    (0, 1) => r[at(row, col)] = v,
                    (1, 0) => b[at(row, col)] = v,
                    _ => g[at(row, col)] = v,
                }
            }
        }

        // corners
        r[at(0, 0)] = r[at(0, 1)];
        b[at(0, 0)] = b[at(1, 0)];
        g[at(0, e)] = (g[at(0, e - 1)] + g[at(1, e)]) / 2.0;
        b[at(0, e)] = b[at(1, e - 1)];
        r[at(l, 0)] = r[at(l - 1, 1)];
        g[at(l, 0)] = (g[at(l - 1, 0)] + g[at(l, 1)]) / 2.0;
        r[at(l, e)] = r[at(l - 1, e)];
        b[at(l, e)] = b[at(l, e - 1)];

        // first and last row
        for c in (1..e - 1).step_by(2) {
            g[at(0, c)] = (g[at(0, c - 1)] + g[at(0, c + 1)] + g[at(1, c)]) / 3.0;
            b[at(0, c)] = (b[at(1, c - 1)] + b[at(1, c + 1)]) / 2.0;
            r[at(l, c)] = r[at(l - 1, c)];
            b[at(l, c)] = (b[at(l, c - 1)] + b[at(l, c + 1)]) / 2.0;
        }
        for c in (2..e).step_by(2) {
            r[at(0, c)] = (r[at(0, c - 1)] + r[at(0, c + 1)]) / 2.0;
            b[at(0, c)] = b[at(1, c)];
            r[at(l, c)] = (r[at(l - 1, c - 1)] + r[at(l - 1, c + 1)]) / 2.0;
            g[at(l, c)] = (g[at(l, c - 1)] + g[at(l, c + 1)] + g[at(l - 1, c)]) / 3.0;
        }

        // first and last column
        for row in (1..l - 1).step_by(2) {
            r[at(row, 0)] = 0.5 * (r[at(row - 1, 1)] + r[at(row + 1, 1)]);
            g[at(row, 0)] = (g[at(row - 1, 0)] + g[at(row + 1, 0)] + g[at(row, 1)]) / 3.0;
            r[at(row, e)] = (r[at(row - 1, e)] + r[at(row + 1, e)]) / 2.0;
            b[at(row, e)] = b[at(row, e - 1)];
        }
        for row in (2..l).step_by(2) {
            r[at(row, 0)] = r[at(row, 1)];
            b[at(row, 0)] = (b[at(row - 1, 0)] + b[at(row + 1, 0)]) / 2.0;
            g[at(row, e)] = (g[at(row - 1, e)] + g[at(row + 1, e)] + g[at(row, e - 1)]) / 3.0;
            b[at(row, e)] = (b[at(row - 1, e - 1)] + b[at(row + 1, e - 1)]) / 2.0;
        }

        // interior R and G1
        for row in (2..l).step_by(2) {
            for col in (1..e - 1).step_by(2) {
                g[at(row, col)] = (g[at(row - 1, col)] + g[at(row + 1, col)] + g[at(row, col - 1)] + g[at(row, col + 1)]) / 4.0;
                b[at(row, col)] = (b[at(row - 1, col - 1)] + b[at(row - 1, col + 1)] + b[at(row + 1, col - 1)] + b[at(row + 1, col + 1)]) / 4.0;
            }
            for col in (2..e).step_by(2) {
                r[at(row, col)] = (r[at(row, col - 1)] + r[at(row, col + 1)]) / 2.0;
                b[at(row, col)] = (b[at(row - 1, col)] + b[at(row + 1, col)]) / 2.0;
            }
        }
        // interior G2 and B
        for row in (1..l - 1).step_by(2) {
            for col in (1..e - 1).step_by(2) {
                r[at(row, col)] = (r[at(row - 1, col)] + r[at(row + 1, col)]) / 2.0;
                b[at(row, col)] = (b[at(row, col - 1)] + b[at(row, col + 1)]) / 2.0;
            }
            for col in (2..e).step_by(2) {
                let (nw, se) = (r[at(row - 1, col - 1)], r[at(row + 1, col + 1)]);
                r[at(row, col)] = (nw + se + nw + se) / 4.0;
                g[at(row, col)] = (g[at(row, col - 1)] + g[at(row, col + 1)] + g[at(row - 1, col)] + g[at(row + 1, col)]) / 4.0;
            }
        }

        (0..nl * nc).map(|i| [r[i], g[i], b[i]]).collect()
    }

    #[test]
    fn test_legacy_matches_plane_passes_on_every_pixel() {
        for (rows, cols) in [(4, 4), (6, 8), (10, 12), (8, 4), (4, 10)] {
            let raw = noise(rows, cols);
            let image = decode_full_with(&raw, &legacy_options()).unwrap();
            let expected = legacy_passes(&raw);
            for row in 0..rows {
                for col in 0..cols {
                    assert_eq!(image.pixel(row, col), expected[row * cols + col], "{rows}x{cols} at ({row}, {col})");
                }
            }
        }
    }

    #[test]
    fn test_first_column_blue_and_last_row_green2() {
        let raw = noise(6, 8);
        let image = decode_full(&raw).unwrap();
        let v = |r: usize, c: usize| raw.get(r, c) as f32;

        // first column B: red from NE/SE, green from N/S/E
        assert_eq!(image.get(3, 0, Channel::Red), (v(2, 1) + v(4, 1)) / 2.0);
        assert_eq!(image.get(3, 0, Channel::Green), (v(2, 0) + v(4, 0) + v(3, 1)) / 3.0);
        // last row G2: red from N only, blue from W/E
        assert_eq!(image.get(5, 3, Channel::Red), v(4, 3));
        assert_eq!(image.get(5, 3, Channel::Blue), (v(5, 2) + v(5, 4)) / 2.0);
    }

    #[test]
    fn test_constant_field_reconstructs_exactly() {
        let raw = RawFrame::from_fn(8, 10, |r, c| match role_at(r, c).channel() {
            Channel::Red => 700u16,
            Channel::Green => 1200,
            Channel::Blue => 300,
        });
        let image = decode_full(&raw).unwrap();
        for row in 0..8 {
            for col in 0..10 {
                assert_eq!(image.pixel(row, col), [700.0, 1200.0, 300.0]);
            }
        }
    }

    #[test]
    fn test_legacy_diagonal_only_touches_interior_blue_sites() {
        let raw = noise(8, 8);
        let distinct = decode_full(&raw).unwrap();
        let legacy = decode_full_with(&raw, &legacy_options()).unwrap();
        let v = |r: usize, c: usize| raw.get(r, c) as f32;

        assert_eq!(legacy.get(3, 2, Channel::Red), (v(2, 1) + v(4, 3)) / 2.0);
        assert_eq!(
            distinct.get(3, 2, Channel::Red),
            (v(2, 1) + v(2, 3) + v(4, 1) + v(4, 3)) / 4.0
        );
        for row in 0..8 {
            for col in 0..8 {
                let interior_blue = role_at(row, col) == CfaRole::B && row != 7 && col != 0;
                if !interior_blue {
                    assert_eq!(legacy.pixel(row, col), distinct.pixel(row, col), "({row}, {col})");
                }
            }
        }
        // border blue sites keep the in-bounds diagonal pair
        assert_eq!(legacy.get(7, 2, Channel::Red), (v(6, 1) + v(6, 3)) / 2.0);
    }

    #[test]
    fn test_rejects_bad_grids() {
        let odd = RawFrame::from_fn(5, 4, |_, _| 0u16);
        assert_eq!(
            decode_full(&odd).unwrap_err(),
            InvalidGridError::OddDimensions { rows: 5, cols: 4 }
        );
        for (rows, cols) in [(2, 8), (8, 2), (2, 2)] {
            let raw = RawFrame::from_fn(rows, cols, |_, _| 0u16);
            assert_eq!(
                decode_full(&raw).unwrap_err(),
                InvalidGridError::TooSmall { rows, cols, min: MIN_FULL_SIZE }
            );
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let raw = noise(66, 50);
        for diagonal in [DiagonalMode::Distinct, DiagonalMode::Legacy] {
            let seq = decode_full_with(&raw, &DecodeOptions { diagonal, execution: Execution::Sequential }).unwrap();
            let par = decode_full_with(&raw, &DecodeOptions { diagonal, execution: Execution::Parallel }).unwrap();
            assert!(seq.data.iter().zip(&par.data).all(|(a, b)| a.to_bits() == b.to_bits()));
        }
    }

    #[test]
    fn test_templates_point_at_matching_roles() {
        let grid = CfaGrid::new(8, 8).unwrap();
        for row in 0..8 {
            for col in 0..8 {
                let role = role_at(row, col);
                for channel in Channel::ALL {
                    let template = neighbor_template(role, channel, DiagonalMode::Distinct, grid.position_class(row, col));
                    assert_eq!(template.is_empty(), channel == role.channel());
                    for &offset in template {
                        if let Some((r, c)) = shift(row, col, offset, 8, 8) {
                            assert_eq!(role_at(r, c).channel(), channel);
                        }
                    }
                }
            }
        }
    }
}
