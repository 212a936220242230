use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raw::types::CapturedFrame;

/// Source of raw Bayer frames and their capture metadata.
pub trait RawFrameReader {
    fn read_frame(&self, data: &[u8]) -> Result<CapturedFrame>;
}
