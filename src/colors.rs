use ndarray::{Array, Array2, Array3, ArrayBase, Axis, CowArray, Data, Dimension, Ix2, Zip};
use tracing::trace;

use crate::{error::Result, planes::ChannelSource};

pub fn rgb2y(r: f64, g: f64, b: f64) -> f64 {
    16.0 + (64.738 * r + 129.057 * g + 25.064 * b) / 256.0
}

pub fn rgb2ycbcr(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let y = rgb2y(r, g, b);
    let cb = 128.0 + (-37.945 * r - 74.494 * g + 112.439 * b) / 256.0;
    let cr = 128.0 + (112.439 * r - 94.154 * g - 18.285 * b) / 256.0;

    return (y, cb, cr);
}

pub fn ycbcr2rgb(y: f64, cb: f64, cr: f64) -> (f64, f64, f64) {
    let luma = 298.082 * y / 256.0;
    let r = luma + 408.583 * cr / 256.0 - 222.921;
    let g = luma - 100.291 * cb / 256.0 - 208.120 * cr / 256.0 + 135.576;
    let b = luma + 516.412 * cb / 256.0 - 276.836;

    return (r, g, b);
}

/// Luma plane `[height, width]` of an RGB buffer.
pub fn to_brightness<I: ChannelSource + ?Sized>(image: &I) -> Result<Array2<f64>> {
    let [r, g, b] = image.planes()?;
    trace!(dim = ?r.dim(), "to_brightness");
    return Ok(Zip::from(&r).and(&g).and(&b).map_collect(|&r, &g, &b| rgb2y(r, g, b)));
}

/// Full YCbCr conversion, returned channel-last regardless of the input layout.
pub fn to_ycbcr<I: ChannelSource + ?Sized>(image: &I) -> Result<Array3<f64>> {
    let planes = image.planes()?;
    return Ok(map_pixels(&planes, rgb2ycbcr));
}

/// Inverse of [`to_ycbcr`]; the input channels are read as Y, Cb, Cr.
pub fn to_rgb<I: ChannelSource + ?Sized>(image: &I) -> Result<Array3<f64>> {
    let planes = image.planes()?;
    return Ok(map_pixels(&planes, ycbcr2rgb));
}

/// Rounds and clamps to 8-bit values. The conversions themselves never do this.
pub fn quantize<S, D>(values: &ArrayBase<S, D>) -> Array<u8, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    values.mapv(|v| v.round().clamp(0.0, 255.0) as u8)
}

fn map_pixels<F>(planes: &[CowArray<'_, f64, Ix2>; 3], convert: F) -> Array3<f64>
where
    F: Fn(f64, f64, f64) -> (f64, f64, f64),
{
    let (height, width) = planes[0].dim();
    trace!(height, width, "converting pixels");
    let mut result = Array3::<f64>::zeros((height, width, 3));
    Zip::from(result.lanes_mut(Axis(2)))
        .and(&planes[0])
        .and(&planes[1])
        .and(&planes[2])
        .for_each(|mut pixel, &a, &b, &c| {
            let (x, y, z) = convert(a, b, c);
            pixel[0] = x;
            pixel[1] = y;
            pixel[2] = z;
        });
    result
}

#[cfg(test)]
mod tests {
    use ndarray::{array, s, Array3};

    use super::*;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() <= tol, "{a} != {b} (tolerance {tol})");
    }

    fn gradient() -> Array3<f64> {
        Array3::from_shape_fn((4, 5, 3), |(y, x, c)| ((y * 53 + x * 29 + c * 71) % 256) as f64)
    }

    #[test]
    fn white_patch() {
        let white = Array3::<f64>::from_elem((2, 2, 3), 255.0);
        let ycbcr = to_ycbcr(&white).unwrap();
        assert_eq!(ycbcr.dim(), (2, 2, 3));
        for pixel in ycbcr.lanes(Axis(2)) {
            assert_close(pixel[0], 235.0, 1.0);
            assert_close(pixel[1], 128.0, 0.01);
            assert_close(pixel[2], 128.0, 0.01);
        }

        let rgb = to_rgb(&ycbcr).unwrap();
        for v in rgb.iter() {
            assert_close(*v, 255.0, 1.5);
        }
    }

    #[test]
    fn black_pixel() {
        let (y, cb, cr) = rgb2ycbcr(0.0, 0.0, 0.0);
        assert_eq!((y, cb, cr), (16.0, 128.0, 128.0));
    }

    #[test]
    fn round_trip() {
        let image = gradient();
        let back = to_rgb(&to_ycbcr(&image).unwrap()).unwrap();
        for (a, b) in image.iter().zip(back.iter()) {
            assert_close(*a, *b, 1.5);
        }
    }

    #[test]
    fn brightness_matches_y_channel() {
        let image = gradient();
        let luma = to_brightness(&image).unwrap();
        let ycbcr = to_ycbcr(&image).unwrap();
        assert_eq!(luma, ycbcr.slice(s![.., .., 0]));
    }

    #[test]
    fn no_clamping() {
        let image = array![[[-10.0, 300.0, 0.0]]];
        let (r, g, b) = ycbcr2rgb(255.0, 255.0, 255.0);
        assert!(r > 255.0 && b > 255.0 && g < 255.0);
        assert!(to_brightness(&image).unwrap()[(0, 0)] > 16.0);
    }

    #[test]
    fn quantize_rounds_and_clamps() {
        let values = array![[-3.0, 12.4, 12.6, 300.0]];
        assert_eq!(quantize(&values), array![[0u8, 12, 13, 255]]);
    }
}
