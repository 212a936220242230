//! Reader for Bayer frames previously stored as single-channel TIFF.

use std::io::Cursor;

use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw::reader::RawFrameReader;
use crate::image_pipeline::raw::types::{CapturedFrame, RawFrame};
use crate::image_pipeline::tiff::tags::TagDictionary;

/// Reads 8- or 16-bit grayscale TIFF frames along with their capture tags.
pub struct TiffFrameReader;

fn decode_error(e: tiff::TiffError) -> ConversionError {
    ConversionError::DecodeError(e.to_string())
}

impl TiffFrameReader {
    /// Tag dictionary of the first image directory, without decoding pixels.
    pub fn read_tags(&self, data: &[u8]) -> Result<TagDictionary> {
        let mut decoder = Decoder::new(Cursor::new(data)).map_err(decode_error)?;
        TagDictionary::read_from(&mut decoder).map_err(decode_error)
    }
}

impl RawFrameReader for TiffFrameReader {
    fn read_frame(&self, data: &[u8]) -> Result<CapturedFrame> {
        debug!("Decoding Bayer TIFF, {} bytes", data.len());

        let mut decoder = Decoder::new(Cursor::new(data)).map_err(decode_error)?;
        let (width, height) = decoder.dimensions().map_err(decode_error)?;
        let bits = match decoder.colortype().map_err(decode_error)? {
            ColorType::Gray(bits @ (8 | 16)) => bits as u32,
            other => {
                return Err(ConversionError::UnsupportedFormat(format!(
                    "{:?}, expected an 8 or 16 bit single-channel Bayer frame",
                    other
                )));
            }
        };

        let tags = TagDictionary::read_from(&mut decoder).map_err(decode_error)?;
        debug!("Read {} tags from {}x{} frame", tags.len(), width, height);

        let samples: Vec<u16> = match decoder.read_image().map_err(decode_error)? {
            DecodingResult::U8(values) => values.into_iter().map(u16::from).collect(),
            DecodingResult::U16(values) => values,
            _ => {
                return Err(ConversionError::UnsupportedFormat(
                    "non-integer sample format".to_string(),
                ));
            }
        };

        let frame = RawFrame::new(height as usize, width as usize, samples)?.with_bits_per_sample(bits);
        Ok(CapturedFrame { frame, metadata: tags.to_capture() })
    }
}
