//! RAW frame reading module
//!
//! Frame sources hand the decoders a single-channel Bayer grid together with
//! the metadata recorded at capture time.

mod reader;
mod rawloader_reader;
mod tiff_reader;
pub mod types;

pub use reader::RawFrameReader;
pub use rawloader_reader::RawLoaderReader;
pub use tiff_reader::TiffFrameReader;
pub use types::{CaptureMetadata, CapturedFrame, RawFrame, Sample};
