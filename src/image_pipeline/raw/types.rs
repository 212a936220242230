//! RAW frame data types

use std::fmt::Debug;

use crate::image_pipeline::common::error::InvalidGridError;

/// Numeric type a Bayer grid or decoded image can be stored in.
///
/// Conversions from floats truncate toward zero and saturate at the type's
/// range, the same way an array cast of a float result behaves. The `f64`
/// pair is exact for every 32-bit integer.
pub trait Sample: Copy + Default + Debug + PartialEq + Send + Sync + 'static {
    /// Bit width used when the sensor does not report one.
    const BITS: u32;

    fn to_f32(self) -> f32;
    fn from_f32(value: f32) -> Self;
    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_integer_sample {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                const BITS: u32 = <$t>::BITS;

                #[inline]
                fn to_f32(self) -> f32 {
                    self as f32
                }

                #[inline]
                fn from_f32(value: f32) -> Self {
                    value as $t
                }

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(value: f64) -> Self {
                    value as $t
                }
            }
        )*
    };
}

impl_integer_sample!(u8, u16, u32);

impl Sample for f32 {
    const BITS: u32 = 32;

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(value: f32) -> Self {
        value
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

/// Single-channel Bayer sensor grid, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame<T: Sample = u16> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
    /// Actual bits per sample from the sensor (e.g., 8, 12, 14 or 16)
    pub bits_per_sample: u32,
}

impl<T: Sample> RawFrame<T> {
    pub fn new(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, InvalidGridError> {
        let expected = rows * cols;
        if data.len() != expected {
            return Err(InvalidGridError::SizeMismatch { expected, got: data.len() });
        }
        Ok(Self { rows, cols, data, bits_per_sample: T::BITS })
    }

    pub fn with_bits_per_sample(mut self, bits: u32) -> Self {
        self.bits_per_sample = bits;
        self
    }

    /// Builds a frame by evaluating `f(row, col)` for every site.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                data.push(f(row, col));
            }
        }
        Self { rows, cols, data, bits_per_sample: T::BITS }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[T] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

/// Capture-time record supplied by the frame source alongside the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureMetadata {
    pub camera_name: String,
    pub pixel_format: String,
    /// Capture timestamp as recorded by the source, e.g. `2022-03-01 10:43:29.120`
    pub captured_at: Option<String>,
    /// Exposure duration in seconds
    pub exposure_s: f64,
    pub offset_x: u32,
    pub offset_y: u32,
    /// Lens aperture; `None` when it was never registered
    pub fnumber: Option<f64>,
    pub description: String,
}

impl Default for CaptureMetadata {
    fn default() -> Self {
        Self {
            camera_name: String::new(),
            pixel_format: String::new(),
            captured_at: None,
            exposure_s: 0.0,
            offset_x: 0,
            offset_y: 0,
            fnumber: None,
            description: "single image acquisition".to_string(),
        }
    }
}

impl CaptureMetadata {
    /// Exposure rounded to whole microseconds.
    pub fn exposure_us(&self) -> u64 {
        (self.exposure_s * 1e6).round().max(0.0) as u64
    }

    /// File stem used for saved frames: `head_TTTTTTTT` for a single shot,
    /// `head_NN_TTTTTTTT` inside a sequence, where `T` is the exposure in
    /// microseconds and `NN` the 1-based frame counter.
    pub fn file_stem(&self, head: &str, index: Option<usize>) -> String {
        match index {
            Some(n) => format!("{}_{:02}_{:08}", head, n, self.exposure_us()),
            None => format!("{}_{:08}", head, self.exposure_us()),
        }
    }
}

/// A raw grid together with the metadata recorded when it was captured.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub frame: RawFrame<u16>,
    pub metadata: CaptureMetadata,
}
