use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::debayer::types::RgbImage;
use crate::image_pipeline::raw::types::RawFrame;
use crate::image_pipeline::tiff::tags::TagDictionary;
use crate::image_pipeline::tiff::types::ConversionConfig;

/// Persistence layer: stores pixel data plus a tag dictionary.
pub trait TiffWriter {
    fn write_raw(&self, frame: &RawFrame<u16>, tags: &TagDictionary, output: &mut dyn Write, config: &ConversionConfig) -> Result<()>;
    fn write_rgb(&self, image: &RgbImage<u16>, tags: &TagDictionary, output: &mut dyn Write, config: &ConversionConfig) -> Result<()>;
}
