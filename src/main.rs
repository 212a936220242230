use std::path::PathBuf;

use anyhow::Context;
use bayer_pipeline::image_pipeline::{
    ConversionConfig, DebayerMode, DiagonalMode, RawLoaderReader, RawToTiffPipeline,
    StandardTiffWriter, TiffCompression, TiffFrameReader,
};
use bayer_pipeline::logger;
use clap::{Parser, ValueEnum};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Half resolution, one pixel per 2x2 tile
    Sub,
    /// Full resolution, neighbour averaged
    Full,
    /// Store the Bayer grid untouched
    Raw,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Diagonal {
    Distinct,
    Legacy,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Compression {
    None,
    Lzw,
    DeflateFast,
    DeflateBalanced,
    DeflateBest,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Source {
    /// Single-channel Bayer TIFF with capture tags
    Tiff,
    /// Camera RAW container decoded by rawloader
    CameraRaw,
}

/// Decode Bayer sensor frames to RGB TIFF.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Input frame
    input: PathBuf,

    /// Output TIFF; omit together with --tags to only print metadata
    output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Mode::Sub)]
    mode: Mode,

    /// Neighbour set for red at interior blue sites
    #[arg(long, value_enum, default_value_t = Diagonal::Distinct)]
    diagonal: Diagonal,

    #[arg(short, long, value_enum, default_value_t = Compression::None)]
    compression: Compression,

    /// TIFF predictor (2 = horizontal differencing)
    #[arg(long)]
    predictor: Option<u16>,

    #[arg(short, long, value_enum, default_value_t = Source::Tiff)]
    source: Source,

    /// Decode on a single thread
    #[arg(long)]
    sequential: bool,

    /// Print the capture tags of a TIFF input
    #[arg(long)]
    tags: bool,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn config(&self) -> ConversionConfig {
        ConversionConfig::builder()
            .debayer(match self.mode {
                Mode::Sub => DebayerMode::Subsampled,
                Mode::Full => DebayerMode::Full,
                Mode::Raw => DebayerMode::Off,
            })
            .diagonal(match self.diagonal {
                Diagonal::Distinct => DiagonalMode::Distinct,
                Diagonal::Legacy => DiagonalMode::Legacy,
            })
            .compression(match self.compression {
                Compression::None => TiffCompression::None,
                Compression::Lzw => TiffCompression::Lzw,
                Compression::DeflateFast => TiffCompression::DeflateFast,
                Compression::DeflateBalanced => TiffCompression::DeflateBalanced,
                Compression::DeflateBest => TiffCompression::DeflateBest,
            })
            .predictor(self.predictor)
            .parallel(!self.sequential)
            .build()
    }
}

fn print_tags(cli: &Cli) -> anyhow::Result<()> {
    let data = std::fs::read(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let tags = TiffFrameReader.read_tags(&data)?;
    for (name, value) in tags.selected() {
        println!("{} : {}", name, value);
    }
    Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if cli.tags {
        print_tags(cli)?;
    }

    let Some(output) = &cli.output else {
        anyhow::ensure!(cli.tags, "an output path is required unless --tags is given");
        return Ok(());
    };

    let config = cli.config();
    info!("Compression: {:?}", config.compression);
    info!("Debayering: {:?}", config.debayer);

    match cli.source {
        Source::Tiff => RawToTiffPipeline::new(config).convert_file(&cli.input, output)?,
        Source::CameraRaw => {
            RawToTiffPipeline::with_custom(RawLoaderReader, StandardTiffWriter, config)
                .convert_file(&cli.input, output)?
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(&cli.log_level);

    info!("Starting bayer_pipeline...");

    if let Err(e) = run(&cli) {
        error!("Conversion failed: {:#}", e);
        return Err(e);
    }

    info!("Conversion successful!");
    Ok(())
}
