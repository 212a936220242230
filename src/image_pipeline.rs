//! Image processing pipeline module
//!
//! Raw Bayer frames are read by a frame source, turned into RGB by one of the
//! CPU decoders and stored as TIFF with their capture metadata as tags.

pub mod raw;
pub mod debayer;
pub mod tiff;
pub mod conversions;
pub mod common;

pub use self::common::{
    ConversionError,
    InvalidGridError,
    Result,
};

pub use self::raw::{
    CaptureMetadata,
    CapturedFrame,
    RawFrame,
    RawFrameReader,
    RawLoaderReader,
    Sample,
    TiffFrameReader,
};

pub use self::debayer::{
    CpuDebayer,
    DebayerMode,
    DecodeOptions,
    DemosaicedImage,
    DiagonalMode,
    Execution,
    RgbImage,
    SubsampledImage,
    decode_full,
    decode_full_with,
    decode_subsampled,
    decode_subsampled_with,
};

pub use self::tiff::{
    TiffCompression,
    ConversionConfig,
    ConversionConfigBuilder,
    TagDictionary,
    TagValue,
    TiffWriter,
    StandardTiffWriter,
};

pub use self::conversions::{
    RawToTiffPipeline,
};
