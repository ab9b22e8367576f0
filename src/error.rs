use ndarray::ShapeError;
use ndarray_stats::errors::MultiInputError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The buffer's representation isn't one the converters know how to read.
    #[error("unsupported buffer type: {0}")]
    UnsupportedType(String),

    #[error("expected 3 channels, got {0}")]
    ChannelCount(usize),

    /// Only a singleton leading batch dimension is squeezed away.
    #[error("batch of {0} images, convert each element separately")]
    BatchSize(usize),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("metric inputs: {0}")]
    Metric(#[from] MultiInputError),
}
