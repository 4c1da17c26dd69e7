//! gprtool - VC-5 RAW codec command-line utility.
//!
//! Encodes and decodes raw Bayer mosaic buffers against the VC-5
//! elementary profile used by GPR. Takes and produces plain pixel
//! buffers; wrapping the result in a DNG container is left to the
//! caller.

use clap::{Parser, Subcommand, ValueEnum};
use gpr_vc5::vc5::decoder;
use gpr_vc5::vc5::encoder;
use gpr_vc5::vc5::parameters::{DecoderParameters, EncoderParameters, RgbResolution};
use gpr_vc5::vc5::pixel_format::{BayerPattern, PixelFormat};
use gpr_vc5::vc5::quality::Quality;
use log::{error, info};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// VC-5 RAW codec for GPR-style Bayer mosaics
#[derive(Parser)]
#[command(name = "gprtool")]
#[command(author = "gpr-vc5 contributors")]
#[command(version)]
#[command(about = "Encode and decode VC-5 wavelet-compressed RAW mosaics", long_about = None)]
#[command(after_help = "EXAMPLES:
    gprtool encode -i frame.raw16 -o frame.vc5 -w 4000 -h 3000 -q fs1
    gprtool decode -i frame.vc5 -o frame.raw16
    gprtool thumbnail -i frame.vc5 -o preview.ppm -r quarter
    gprtool info -i frame.vc5")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum QualityArg {
    Low,
    Medium,
    High,
    Fs1Fast,
    Fs1,
    Fs2,
}

impl From<QualityArg> for Quality {
    fn from(q: QualityArg) -> Self {
        match q {
            QualityArg::Low => Quality::Low,
            QualityArg::Medium => Quality::Medium,
            QualityArg::High => Quality::High,
            QualityArg::Fs1Fast => Quality::Fs1Fast,
            QualityArg::Fs1 => Quality::Fs1,
            QualityArg::Fs2 => Quality::Fs2,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PatternArg {
    Rggb,
    Gbrg,
}

impl From<PatternArg> for BayerPattern {
    fn from(p: PatternArg) -> Self {
        match p {
            PatternArg::Rggb => BayerPattern::Rggb,
            PatternArg::Gbrg => BayerPattern::Gbrg,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ResolutionArg {
    Sixteenth,
    Eighth,
    Quarter,
    Full,
}

impl From<ResolutionArg> for RgbResolution {
    fn from(r: ResolutionArg) -> Self {
        match r {
            ResolutionArg::Sixteenth => RgbResolution::Sixteenth,
            ResolutionArg::Eighth => RgbResolution::Eighth,
            ResolutionArg::Quarter => RgbResolution::Quarter,
            ResolutionArg::Full => RgbResolution::Full,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a raw 16-bit mosaic buffer into a VC-5 bitstream
    #[command(visible_alias = "e")]
    Encode {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long)]
        width: usize,
        #[arg(short = 'H', long)]
        height: usize,
        #[arg(short, long, value_enum, default_value = "fs1")]
        quality: QualityArg,
        #[arg(short, long, value_enum, default_value = "rggb")]
        pattern: PatternArg,
    },

    /// Decode a VC-5 bitstream back into a raw 16-bit mosaic buffer
    #[command(visible_alias = "d")]
    Decode {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Decode a fast low-resolution RGB preview without a full decode
    #[command(visible_alias = "t")]
    Thumbnail {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long, value_enum, default_value = "quarter")]
        resolution: ResolutionArg,
    },

    /// Print the header parameters of a VC-5 bitstream
    Info {
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encode {
            input,
            output,
            width,
            height,
            quality,
            pattern,
        } => run_encode(input, output, width, height, quality.into(), pattern.into()),
        Commands::Decode { input, output } => run_decode(input, output),
        Commands::Thumbnail { input, output, resolution } => run_thumbnail(input, output, resolution.into()),
        Commands::Info { input } => run_info(input),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run_encode(input: PathBuf, output: PathBuf, width: usize, height: usize, quality: Quality, pattern: BayerPattern) -> Result<(), String> {
    let raw = fs::read(&input).map_err(|e| format!("reading {}: {e}", input.display()))?;
    let expected = width * height * 2;
    if raw.len() != expected {
        return Err(format!("input is {} bytes, expected {}x{} Raw16 = {} bytes", raw.len(), width, height, expected));
    }
    let params = EncoderParameters {
        pattern,
        input_format: PixelFormat::Raw16,
        quality,
        ..Default::default()
    };
    let encoded = encoder::encode(&raw, width, height, &params).map_err(|e| format!("encode failed: {e}"))?;
    info!("encoded {}x{} mosaic to {} bytes", width, height, encoded.len());
    fs::write(&output, encoded).map_err(|e| format!("writing {}: {e}", output.display()))
}

fn run_decode(input: PathBuf, output: PathBuf) -> Result<(), String> {
    let bytes = fs::read(&input).map_err(|e| format!("reading {}: {e}", input.display()))?;
    let params = DecoderParameters {
        output_format: PixelFormat::Raw16,
        ..Default::default()
    };
    let decoded = decoder::decode(&bytes, &params).map_err(|e| format!("decode failed: {e}"))?;
    info!("decoded {}x{} mosaic", decoded.width, decoded.height);
    fs::write(&output, decoded.bytes).map_err(|e| format!("writing {}: {e}", output.display()))
}

fn run_thumbnail(input: PathBuf, output: PathBuf, resolution: RgbResolution) -> Result<(), String> {
    let bytes = fs::read(&input).map_err(|e| format!("reading {}: {e}", input.display()))?;
    let params = DecoderParameters {
        rgb_resolution: resolution,
        ..Default::default()
    };
    let thumb = decoder::decode_rgb_thumbnail(&bytes, &params).map_err(|e| format!("thumbnail decode failed: {e}"))?;
    info!("decoded {}x{} thumbnail", thumb.width, thumb.height);
    let mut ppm = format!("P6\n{} {}\n255\n", thumb.width, thumb.height).into_bytes();
    ppm.extend_from_slice(&thumb.rgb);
    fs::write(&output, ppm).map_err(|e| format!("writing {}: {e}", output.display()))
}

fn run_info(input: PathBuf) -> Result<(), String> {
    let bytes = fs::read(&input).map_err(|e| format!("reading {}: {e}", input.display()))?;
    let decoded = decoder::decode(&bytes, &DecoderParameters::default()).map_err(|e| format!("parse failed: {e}"))?;
    println!("width: {}", decoded.width);
    println!("height: {}", decoded.height);
    Ok(())
}
