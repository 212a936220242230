//! Pipeline conversions module
//!
//! This module contains orchestration logic for frame decoding and storage.

mod raw_to_tiff;


pub use raw_to_tiff::RawToTiffPipeline;
