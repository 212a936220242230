//! TIFF persistence module
//!
//! This module provides TIFF file writing with compression options and
//! capture metadata stored as directory tags.

mod writer;
mod standard_tiff_writer;
pub mod tags;
pub mod types;

pub use writer::TiffWriter;
pub use standard_tiff_writer::StandardTiffWriter;
pub use tags::{TagDictionary, TagValue};
pub use types::{TiffCompression, ConversionConfig, ConversionConfigBuilder};
