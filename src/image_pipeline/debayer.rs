//! Debayering module for converting Bayer pattern RAW frames to RGB

pub mod cfa;
pub mod cpu_debayer;
pub mod full;
pub mod subsample;
pub mod types;

pub use cfa::{CfaGrid, CfaRole, Channel, PositionClass, role_at};
pub use cpu_debayer::CpuDebayer;
pub use full::{MIN_FULL_SIZE, decode_full, decode_full_with};
pub use subsample::{decode_subsampled, decode_subsampled_with};
pub use types::{
    DebayerMode, DecodeOptions, DemosaicedImage, DiagonalMode, Execution, RgbImage,
    SubsampledImage,
};
