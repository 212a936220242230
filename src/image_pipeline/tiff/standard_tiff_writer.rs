use std::io::{Cursor, Write};
use tracing::debug;
use tiff::encoder::{colortype::{self, ColorType}, compression::DeflateLevel, Compression, Rational, TiffEncoder, TiffValue};
use tiff::tags::{Predictor, Tag};
use crate::image_pipeline::common::error::{Result, ConversionError};
use crate::image_pipeline::debayer::types::RgbImage;
use crate::image_pipeline::raw::types::RawFrame;
use crate::image_pipeline::tiff::tags::{TagDictionary, TagValue};
use crate::image_pipeline::tiff::types::{ConversionConfig, TiffCompression};
use crate::image_pipeline::tiff::writer::TiffWriter;

pub struct StandardTiffWriter;

fn encode_error(e: tiff::TiffError) -> ConversionError {
    ConversionError::EncodeError(e.to_string())
}

fn compression(config: &ConversionConfig) -> Compression {
    match config.compression {
        TiffCompression::None => Compression::Uncompressed,
        TiffCompression::Lzw => Compression::Lzw,
        TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
        TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
        TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
    }
}

/// Encodes one image directory with every dictionary entry as a tag.
fn encode<C>(
    width: usize,
    height: usize,
    data: &[C::Inner],
    tags: &TagDictionary,
    config: &ConversionConfig,
) -> Result<Vec<u8>>
where
    C: ColorType,
    [C::Inner]: TiffValue,
{
    let mut buffer = Vec::new();

    {
        let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
            .map_err(encode_error)?
            .with_compression(compression(config));

        if let Some(predictor_val) = config.predictor {
            let predictor = match predictor_val {
                2 => Predictor::Horizontal,
                _ => Predictor::None,
            };
            encoder = encoder.with_predictor(predictor);
        }

        let mut image = encoder
            .new_image::<C>(width as u32, height as u32)
            .map_err(encode_error)?;

        for (id, value) in tags.iter() {
            let tag = Tag::from_u16_exhaustive(id);
            let directory = image.encoder();
            match value {
                TagValue::Ascii(s) => directory.write_tag(tag, s.as_str()),
                TagValue::Short(n) => directory.write_tag(tag, *n),
                TagValue::Long(n) => directory.write_tag(tag, *n),
                TagValue::Rational(n, d) => directory.write_tag(tag, Rational { n: *n, d: *d }),
            }
            .map_err(encode_error)?;
        }

        image.write_data(data).map_err(encode_error)?;
    }

    Ok(buffer)
}

impl TiffWriter for StandardTiffWriter {
    fn write_raw(&self, frame: &RawFrame<u16>, tags: &TagDictionary, output: &mut dyn Write, config: &ConversionConfig) -> Result<()> {
        debug!(
            "Encoding Bayer TIFF: {}x{}, {} bits, {} tags",
            frame.cols(),
            frame.rows(),
            frame.bits_per_sample,
            tags.len()
        );

        let buffer = if frame.bits_per_sample <= 8 {
            let narrow: Vec<u8> = frame.as_slice().iter().map(|&v| v as u8).collect();
            encode::<colortype::Gray8>(frame.cols(), frame.rows(), &narrow, tags, config)?
        } else {
            encode::<colortype::Gray16>(frame.cols(), frame.rows(), frame.as_slice(), tags, config)?
        };

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }

    fn write_rgb(&self, image: &RgbImage<u16>, tags: &TagDictionary, output: &mut dyn Write, config: &ConversionConfig) -> Result<()> {
        debug!("Encoding RGB TIFF: {}x{}, {} tags", image.cols, image.rows, tags.len());

        let buffer = encode::<colortype::RGB16>(image.cols, image.rows, &image.data, tags, config)?;
        output.write_all(&buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }
}
