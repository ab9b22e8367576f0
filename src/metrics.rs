use ndarray::{ArrayBase, Data, Dimension};
use ndarray_stats::DeviationExt;

use crate::error::Result;

/// Peak signal-to-noise ratio in dB of two buffers normalized to `[0, 1]`.
///
/// Identical buffers give `f64::INFINITY`. Shapes must match exactly.
pub fn psnr<S1, S2, D>(a: &ArrayBase<S1, D>, b: &ArrayBase<S2, D>) -> Result<f64>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    let mse = a.mean_sq_err(b)?;
    return Ok(10.0 * (1.0 / mse).log10());
}

/// [`psnr`] for buffers on the 8-bit `[0, 255]` scale.
pub fn psnr_u8_range<S1, S2, D>(a: &ArrayBase<S1, D>, b: &ArrayBase<S2, D>) -> Result<f64>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    psnr(&a.mapv(|v| v / 255.0), &b.mapv(|v| v / 255.0))
}
