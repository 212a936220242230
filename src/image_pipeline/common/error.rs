use thiserror::Error;

/// Malformed raw grid handed to a decoder.
///
/// Raised before any output buffer is allocated; decoders never return a
/// partially filled image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidGridError {
    #[error("Bayer grid must have even dimensions, got {rows}x{cols}")]
    OddDimensions { rows: usize, cols: usize },

    #[error("Bayer grid {rows}x{cols} is below the {min}x{min} minimum for interpolation")]
    TooSmall { rows: usize, cols: usize, min: usize },

    #[error("Sample buffer holds {got} values, expected {expected}")]
    SizeMismatch { expected: usize, got: usize },
}

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode raw frame: {0}")]
    DecodeError(String),

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid Bayer grid: {0}")]
    InvalidGrid(#[from] InvalidGridError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;
