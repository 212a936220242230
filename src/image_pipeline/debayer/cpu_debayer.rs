use tracing::{debug, info};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::debayer::full::decode_full_with;
use crate::image_pipeline::debayer::subsample::decode_subsampled_with;
use crate::image_pipeline::debayer::types::{DebayerMode, DecodeOptions, RgbImage};
use crate::image_pipeline::raw::types::RawFrame;

/// Runs one of the Bayer decoders on the CPU and hands back 16-bit RGB.
#[derive(Debug, Clone, Copy)]
pub struct CpuDebayer {
    mode: DebayerMode,
    options: DecodeOptions,
}

impl CpuDebayer {
    pub fn new(mode: DebayerMode, options: DecodeOptions) -> Result<Self> {
        if mode == DebayerMode::Off {
            return Err(ConversionError::UnsupportedFormat(
                "debayer mode Off has no RGB decoder".to_string(),
            ));
        }
        Ok(Self { mode, options })
    }

    pub fn mode(&self) -> DebayerMode {
        self.mode
    }

    pub fn process(&self, raw: &RawFrame<u16>) -> Result<RgbImage<u16>> {
        info!(
            "Starting CPU debayering for frame {}x{} ({:?})",
            raw.cols(),
            raw.rows(),
            self.mode
        );

        let image = match self.mode {
            DebayerMode::Full => {
                debug!("Interpolating with {:?} diagonal handling", self.options.diagonal);
                decode_full_with(raw, &self.options)?.cast::<u16>()
            }
            DebayerMode::Subsampled | DebayerMode::Off => {
                decode_subsampled_with(raw, self.options.execution)?
            }
        };

        debug!("Debayer output: {}x{}x3", image.cols, image.rows);
        Ok(image)
    }
}
