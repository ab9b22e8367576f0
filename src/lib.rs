//! Color-space conversions and running statistics for preparing images for
//! super-resolution training and evaluation.

pub mod colors;
pub mod commands;
pub mod error;
pub mod meter;
pub mod metrics;
pub mod planes;

pub use colors::{quantize, to_brightness, to_rgb, to_ycbcr};
pub use error::{Error, Result};
pub use meter::RunningAverage;
pub use metrics::{psnr, psnr_u8_range};
pub use planes::{ChannelSource, Tensor};
