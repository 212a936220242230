//! RAW frame reader implementation using the rawloader library.
//!
//! Camera RAW containers (ARW, CR2, NEF, DNG, ...) are decoded to their bare
//! sensor grid. Only single-component Bayer data is accepted; the capture
//! metadata is filled from what the container exposes.

use std::io::Cursor;

use tracing::{debug, warn};
use rawloader::RawImageData as RawloaderImageData;
use crate::image_pipeline::common::error::{Result, ConversionError};
use crate::image_pipeline::raw::types::{CaptureMetadata, CapturedFrame, RawFrame};
use crate::image_pipeline::raw::reader::RawFrameReader;

/// RAW frame reader backed by rawloader.
pub struct RawLoaderReader;

/// Default bit depth when no white level information is available from the RAW file.
const DEFAULT_BITS_PER_SAMPLE: u32 = 16;

/// The bit width of the u16 data type, used for calculating actual bits per sample.
const U16_BITS: u32 = 16;

/// rawloader's name for the tile the decoders expect (G1 R / B G2).
const EXPECTED_CFA: &str = "GRBG";

impl RawFrameReader for RawLoaderReader {
    /// Decodes a camera RAW file into a Bayer frame.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bayer_pipeline::image_pipeline::{RawFrameReader, RawLoaderReader};
    ///
    /// let bytes = std::fs::read("image.arw").unwrap();
    /// let captured = RawLoaderReader.read_frame(&bytes).unwrap();
    /// println!("{}x{}", captured.frame.cols(), captured.frame.rows());
    /// ```
    fn read_frame(&self, data: &[u8]) -> Result<CapturedFrame> {
        debug!("Decoding RAW image, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;

        if decoded.cpp != 1 {
            return Err(ConversionError::UnsupportedFormat(format!(
                "{} components per pixel, expected a single-channel Bayer grid",
                decoded.cpp
            )));
        }

        let width = decoded.width;
        let height = decoded.height;
        let cfa_name = decoded.cfa.name.clone();

        debug!("Decoded image: {}x{}, CFA {}", width, height, cfa_name);
        if cfa_name != EXPECTED_CFA {
            warn!("Sensor reports CFA {}, decoding as {}", cfa_name, EXPECTED_CFA);
        }

        // Float data is normalized 0.0-1.0 and gets scaled to the u16 range
        let samples: Vec<u16> = match decoded.data {
            RawloaderImageData::Integer(values) => values,
            RawloaderImageData::Float(values) => {
                values.iter().map(|&v| (v * u16::MAX as f32) as u16).collect()
            }
        };

        // The white level is the largest value the sensor can produce, so it
        // gives the real bit depth (4095 -> 12 bits, 16383 -> 14 bits).
        let max_white_level = decoded.whitelevels.iter().max().copied().unwrap_or(u16::MAX);
        let bits_per_sample = if max_white_level == 0 {
            DEFAULT_BITS_PER_SAMPLE
        } else {
            U16_BITS - max_white_level.leading_zeros()
        };

        debug!("Calculated bits_per_sample: {} (max white level: {})", bits_per_sample, max_white_level);

        let frame = RawFrame::new(height, width, samples)?.with_bits_per_sample(bits_per_sample);
        let metadata = CaptureMetadata {
            camera_name: format!("{} {}", decoded.clean_make, decoded.clean_model),
            pixel_format: format!("Bayer{}{}", cfa_name, bits_per_sample),
            ..Default::default()
        };

        Ok(CapturedFrame { frame, metadata })
    }
}
