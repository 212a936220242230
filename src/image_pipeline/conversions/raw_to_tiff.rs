use tracing::{info, instrument, warn};
use std::io::Write;
use std::path::Path;

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    debayer::{CpuDebayer, DebayerMode},
    raw::{CapturedFrame, RawFrameReader, TiffFrameReader},
    tiff::{TiffWriter, StandardTiffWriter, ConversionConfig, TagDictionary},
};

pub struct RawToTiffPipeline<R: RawFrameReader, W: TiffWriter> {
    reader: R,
    writer: W,
    config: ConversionConfig,
}

impl RawToTiffPipeline<TiffFrameReader, StandardTiffWriter> {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            reader: TiffFrameReader,
            writer: StandardTiffWriter,
            config,
        }
    }
}

impl<R: RawFrameReader, W: TiffWriter> RawToTiffPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: ConversionConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                warn!(
                    "Image dimensions {}x{} exceed maximum {}",
                    width, height, max
                );
                return Err(ConversionError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }

    /// Decodes an already captured frame and stores it with its capture tags.
    #[instrument(skip_all, fields(width = captured.frame.cols(), height = captured.frame.rows()))]
    pub fn store(&self, captured: &CapturedFrame, output: &mut dyn Write) -> Result<()> {
        let frame = &captured.frame;
        {
            let _span = tracing::info_span!("validate_dimensions").entered();
            self.validate_dimensions(frame.cols(), frame.rows())?;
        }

        let tags = TagDictionary::from_capture(&captured.metadata);

        match self.config.debayer {
            DebayerMode::Off => {
                let _span = tracing::info_span!("encode_tiff").entered();
                self.writer.write_raw(frame, &tags, output, &self.config)?;
            }
            mode => {
                let rgb = {
                    let _span = tracing::info_span!("debayer", mode = ?mode).entered();
                    CpuDebayer::new(mode, self.config.decode_options())?.process(frame)?
                };
                let _span = tracing::info_span!("encode_tiff").entered();
                self.writer.write_rgb(&rgb, &tags, output, &self.config)?;
            }
        }

        Ok(())
    }

    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn convert(&self, input_data: &[u8], output: &mut dyn Write) -> Result<()> {
        info!("Starting raw frame to TIFF conversion");

        let captured = {
            let _span = tracing::info_span!("decode_raw").entered();
            self.reader.read_frame(input_data)?
        };

        self.store(&captured, output)?;

        info!(
            width = captured.frame.cols(),
            height = captured.frame.rows(),
            mode = ?self.config.debayer,
            "Conversion complete"
        );
        Ok(())
    }

    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<()> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                ConversionError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let mut output_file = {
            let _span = tracing::info_span!("create_output_file").entered();
            std::fs::File::create(output_path).map_err(|e| {
                ConversionError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?
        };

        self.convert(&input_data, &mut output_file)?;

        Ok(())
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ConversionConfig) {
        self.config = config;
    }
}
