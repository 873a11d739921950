//! `rusty-codec` CLI - base64 and pixel rotation over files.
//!
//! # Usage
//!
//! ```bash
//! rusty-codec encode --wrap input.bin output.b64
//! rusty-codec decode output.b64 roundtrip.bin
//! rusty-codec rotate --width 640 --height 480 --format bgr --angle 90 in.raw out.raw
//! ```

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rusty_codec::{ImageFormat, base64, rotate_buffer};

/// Base64 and axis-aligned pixel rotation over files.
#[derive(Parser, Debug)]
#[command(name = "rusty-codec")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a file as base64 text.
    Encode {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Break lines every 76 characters.
        #[arg(short, long)]
        wrap: bool,
    },

    /// Decode base64 text back into bytes. Line breaks are ignored.
    Decode {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Rotate a raw row-major pixel file clockwise.
    Rotate {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Source width in pixels.
        #[arg(long, value_name = "INT")]
        width: usize,

        /// Source height in pixels.
        #[arg(long, value_name = "INT")]
        height: usize,

        /// Pixel layout of the input file.
        #[arg(short, long, value_enum, default_value = "bgr")]
        format: FormatArg,

        /// Rotation in degrees; must be a multiple of 90.
        #[arg(
            short,
            long,
            default_value = "90",
            allow_negative_numbers = true,
            value_name = "DEGREES"
        )]
        angle: f32,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FormatArg {
    Gray,
    Bgr,
    Bgra,
}

impl From<FormatArg> for ImageFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Gray => ImageFormat::Gray,
            FormatArg::Bgr => ImageFormat::Bgr,
            FormatArg::Bgra => ImageFormat::Bgra,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("rusty_codec={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(&args.command) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(command: &Command) -> Result<()> {
    match command {
        Command::Encode {
            input,
            output,
            wrap,
        } => {
            let data = fs::read(input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let mut text = vec![0u8; base64::encoded_len(data.len(), *wrap)];
            let written = base64::encode_into(&data, &mut text, *wrap)
                .context("Failed to encode input")?;
            fs::write(output, &text[..written])
                .with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!("Encoded {} bytes into {written} characters", data.len());
        }
        Command::Decode { input, output } => {
            let text = fs::read(input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let data = base64::decode(&text)
                .with_context(|| format!("Failed to decode {}", input.display()))?;
            fs::write(output, &data)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!("Decoded {} characters into {} bytes", text.len(), data.len());
        }
        Command::Rotate {
            input,
            output,
            width,
            height,
            format,
            angle,
        } => {
            let format = ImageFormat::from(*format);
            let src = fs::read(input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let mut dst = vec![0u8; src.len()];
            let (out_w, out_h) = rotate_buffer(&src, &mut dst, *width, *height, format, *angle)
                .with_context(|| format!("Failed to rotate {}", input.display()))?;
            // Trailing bytes past the described image are not carried over.
            let len = out_w * out_h * format.channel_count();
            fs::write(output, &dst[..len])
                .with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!(
                "Rotated {width}x{height} {format:?} by {angle} degrees into {out_w}x{out_h}"
            );
        }
    }

    Ok(())
}
