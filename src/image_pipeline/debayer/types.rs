//! Types for debayering operations

use rayon::prelude::*;

use crate::image_pipeline::debayer::cfa::Channel;
use crate::image_pipeline::raw::types::Sample;

/// Three-channel image, shape `(rows, cols, 3)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbImage<T: Sample> {
    /// Height of the image in pixels
    pub rows: usize,
    /// Width of the image in pixels
    pub cols: usize,
    /// RGB pixel data interleaved [R, G, B, R, G, B, ...]
    pub data: Vec<T>,
}

/// Which decoder turns the Bayer grid into RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebayerMode {
    /// Keep the single-channel Bayer grid
    Off,
    /// One RGB pixel per 2x2 tile, half resolution
    #[default]
    Subsampled,
    /// Neighbour-averaged RGB at full resolution
    Full,
}

/// How rows of an output image are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Execution {
    Sequential,
    /// Disjoint output rows on the rayon pool
    #[default]
    Parallel,
}

impl Execution {
    /// Calls `f(row_index, row)` for every `row_len`-sized row of `data`.
    pub(crate) fn for_each_row<T, F>(self, data: &mut [T], row_len: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Send + Sync,
    {
        if row_len == 0 {
            return;
        }
        match self {
            Execution::Sequential => data
                .chunks_exact_mut(row_len)
                .enumerate()
                .for_each(|(row, out)| f(row, out)),
            Execution::Parallel => data
                .par_chunks_exact_mut(row_len)
                .enumerate()
                .for_each(|(row, out)| f(row, out)),
        }
    }
}

/// Neighbour set used for red at interior blue sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagonalMode {
    /// Mean of the four diagonal red neighbours.
    #[default]
    Distinct,
    /// Mean of the north-west and south-east neighbours only, each counted
    /// twice. Reproduces images produced by the legacy acquisition tooling.
    Legacy,
}

/// Knobs for the interpolating decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    pub diagonal: DiagonalMode,
    pub execution: Execution,
}

/// Half-resolution output of the subsampling decoder, input sample type.
pub type SubsampledImage<T> = RgbImage<T>;

/// Full-resolution output of the interpolating decoder.
pub type DemosaicedImage = RgbImage<f32>;

impl<T: Sample> RgbImage<T> {
    pub fn zeroed(rows: usize, cols: usize) -> Self {
        Self { rows, cols, data: vec![T::default(); rows * cols * 3] }
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        (self.rows, self.cols, 3)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize, channel: Channel) -> T {
        self.data[(row * self.cols + col) * 3 + channel.index()]
    }

    #[inline]
    pub fn pixel(&self, row: usize, col: usize) -> [T; 3] {
        let i = (row * self.cols + col) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Single channel as a row-major plane.
    pub fn plane(&self, channel: Channel) -> Vec<T> {
        self.data.iter().skip(channel.index()).step_by(3).copied().collect()
    }

    /// Converts every sample into another storage type.
    pub fn cast<U: Sample>(&self) -> RgbImage<U> {
        RgbImage {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| U::from_f32(v.to_f32())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexing_and_planes() {
        let image = RgbImage::<u16> { rows: 1, cols: 2, data: vec![1, 2, 3, 4, 5, 6] };
        assert_eq!(image.shape(), (1, 2, 3));
        assert_eq!(image.get(0, 1, Channel::Green), 5);
        assert_eq!(image.pixel(0, 0), [1, 2, 3]);
        assert_eq!(image.plane(Channel::Blue), vec![3, 6]);
    }

    #[test]
    fn test_cast_truncates() {
        let image = RgbImage::<f32> { rows: 1, cols: 1, data: vec![1.0, 2.5, 70000.0] };
        assert_eq!(image.cast::<u16>().data, vec![1, 2, 65535]);
    }
}
