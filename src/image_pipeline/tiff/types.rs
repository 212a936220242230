//! Conversion configuration types

use crate::image_pipeline::debayer::types::{DebayerMode, DecodeOptions, DiagonalMode, Execution};

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - best compression (slower)
    DeflateBest,
    /// Deflate compression - balanced
    DeflateBalanced,
}

/// Configuration for RAW to TIFF conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Compression method to use
    pub compression: TiffCompression,
    /// Predictor value for compression (typically 2 for horizontal differencing)
    /// Note: Predictor adds processing time, set to None for maximum speed
    pub predictor: Option<u16>,
    /// Whether to validate image dimensions before conversion
    pub validate_dimensions: bool,
    /// Largest accepted width or height when validating
    pub max_dimension: Option<usize>,
    /// Decoder to run, or `Off` to store the Bayer grid as-is
    pub debayer: DebayerMode,
    /// Neighbour set for red at interior blue sites (full decoder only)
    pub diagonal: DiagonalMode,
    /// Decode rows on the rayon pool
    pub parallel: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            compression: TiffCompression::None,
            predictor: None,
            validate_dimensions: true,
            max_dimension: Some(50000),
            debayer: DebayerMode::Subsampled,
            diagonal: DiagonalMode::Distinct,
            parallel: true,
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            diagonal: self.diagonal,
            execution: if self.parallel { Execution::Parallel } else { Execution::Sequential },
        }
    }
}

/// Builder for ConversionConfig
#[derive(Default)]
pub struct ConversionConfigBuilder {
    compression: Option<TiffCompression>,
    predictor: Option<Option<u16>>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
    debayer: Option<DebayerMode>,
    diagonal: Option<DiagonalMode>,
    parallel: Option<bool>,
}

impl ConversionConfigBuilder {
    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn debayer(mut self, mode: DebayerMode) -> Self {
        self.debayer = Some(mode);
        self
    }

    pub fn diagonal(mut self, diagonal: DiagonalMode) -> Self {
        self.diagonal = Some(diagonal);
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    pub fn build(self) -> ConversionConfig {
        let default = ConversionConfig::default();
        ConversionConfig {
            compression: self.compression.unwrap_or(default.compression),
            predictor: self.predictor.unwrap_or(default.predictor),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
            debayer: self.debayer.unwrap_or(default.debayer),
            diagonal: self.diagonal.unwrap_or(default.diagonal),
            parallel: self.parallel.unwrap_or(default.parallel),
        }
    }
}
