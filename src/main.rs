use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use srprep::commands::{evaluate, luma, roundtrip};

#[derive(Parser)]
#[command(
    version,
    about = "Color-space preparation and PSNR evaluation for super-resolution images"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the luma plane of an image as grayscale
    Luma { input: PathBuf, output: PathBuf },
    /// Convert RGB -> YCbCr -> RGB and write the result
    Roundtrip { input: PathBuf, output: PathBuf },
    /// Y-channel PSNR of each test image against a reference
    Psnr {
        reference: PathBuf,
        #[arg(required = true)]
        tests: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse_from(wild::args());
    match cli.command {
        Command::Luma { input, output } => luma(&input, &output),
        Command::Roundtrip { input, output } => roundtrip(&input, &output),
        Command::Psnr { reference, tests } => {
            println!("{}", evaluate(&reference, &tests)?);
            return Ok(());
        }
    }
}
