//! The work behind each `srprep` subcommand.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use humansize::{format_size, DECIMAL};
use image::{ColorType, DynamicImage, ImageReader};
use kdam::tqdm;
use tracing::{info, warn};

use crate::{
    colors::{to_brightness, to_rgb, to_ycbcr},
    meter::RunningAverage,
    metrics::psnr_u8_range,
    planes::{array2rgb, plane2luma},
};

/// Outcome of comparing a set of images against a reference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Evaluation {
    /// Mean PSNR of the images that differ from the reference.
    Average { meter: RunningAverage, identical: usize },
    /// Every image matched the reference, so PSNR is infinite for all of them.
    AllIdentical(usize),
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Evaluation::Average { meter, identical } => {
                write!(
                    f,
                    "average Y PSNR: {:.2} dB over {} images",
                    meter.average(),
                    meter.count()
                )?;
                if *identical > 0 {
                    write!(f, " ({identical} identical to reference, skipped)")?;
                }
                return Ok(());
            }
            Evaluation::AllIdentical(count) => {
                write!(f, "all {count} test images identical to reference (PSNR = inf)")
            }
        }
    }
}

/// Decodes an image, widening non-RGB formats to the RGB type of matching depth.
pub fn load_image(filename: &Path) -> Result<DynamicImage> {
    let image = ImageReader::open(filename)
        .with_context(|| format!("opening {}", filename.display()))?
        .decode()
        .with_context(|| format!("decoding {}", filename.display()))?;

    let color = image.color();
    let converted = match color {
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => return Ok(image),
        ColorType::L8 | ColorType::La8 | ColorType::Rgba8 => {
            DynamicImage::ImageRgb8(image.into_rgb8())
        }
        ColorType::L16 | ColorType::La16 | ColorType::Rgba16 => {
            DynamicImage::ImageRgb16(image.into_rgb16())
        }
        _ => DynamicImage::ImageRgb32F(image.into_rgb32f()),
    };
    warn!(path = %filename.display(), ?color, to = ?converted.color(), "converting to RGB");
    return Ok(converted);
}

fn report_written(filename: &Path) -> Result<()> {
    let size = fs::metadata(filename)?.len();
    info!(path = %filename.display(), size = %format_size(size, DECIMAL), "written");
    return Ok(());
}

/// Writes the quantized Y plane of `input` as a grayscale image.
pub fn luma(input: &Path, output: &Path) -> Result<()> {
    let image = load_image(input)?;
    let plane = to_brightness(&image)?;
    plane2luma(&plane).save(output)?;
    return report_written(output);
}

/// Converts `input` to YCbCr and back, writing the quantized RGB result.
pub fn roundtrip(input: &Path, output: &Path) -> Result<()> {
    let image = load_image(input)?;
    let ycbcr = to_ycbcr(&image)?;
    let rgb = to_rgb(&ycbcr)?;
    array2rgb(&rgb).save(output)?;
    return report_written(output);
}

/// Y-channel PSNR of every test image against `reference`.
pub fn evaluate(reference: &Path, tests: &[PathBuf]) -> Result<Evaluation> {
    let reference_y = to_brightness(&load_image(reference)?)?;
    let mut meter = RunningAverage::new();
    let mut identical = 0;

    for filename in tqdm!(tests.iter(), desc = "psnr") {
        let test_y = to_brightness(&load_image(filename)?)?;
        let value = psnr_u8_range(&reference_y, &test_y).with_context(|| {
            format!("comparing {} with {}", filename.display(), reference.display())
        })?;
        if value.is_infinite() {
            warn!(path = %filename.display(), "identical to reference, skipped");
            identical += 1;
            continue;
        }
        meter.update(value);
        info!(path = %filename.display(), psnr = %meter, "evaluated");
    }

    if meter.count() == 0.0 {
        return Ok(Evaluation::AllIdentical(identical));
    }
    return Ok(Evaluation::Average { meter, identical });
}
