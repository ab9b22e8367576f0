//! Channel plane access for the buffer representations the converters accept.
//!
//! Every representation is reduced to three `[height, width]` planes, so the
//! color math in [`crate::colors`] is written once.

use std::array;

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Pixel, Rgb, RgbImage};
use ndarray::{Array2, ArrayBase, ArrayD, ArrayView3, Axis, CowArray, Data, Ix2, Ix3};
use tracing::debug;

use crate::{
    colors::quantize,
    error::{Error, Result},
};

pub type Planes<'a> = [CowArray<'a, f64, Ix2>; 3];

pub trait ChannelSource {
    /// The three color planes, in channel order.
    fn planes(&self) -> Result<Planes<'_>>;
}

/// Plain channel-last `[height, width, channel]` array.
impl<S> ChannelSource for ArrayBase<S, Ix3>
where
    S: Data<Elem = f64>,
{
    fn planes(&self) -> Result<Planes<'_>> {
        let channels = self.len_of(Axis(2));
        if channels != 3 {
            return Err(Error::ChannelCount(channels));
        }
        return Ok(array::from_fn(|c| CowArray::from(self.index_axis(Axis(2), c))));
    }
}

/// Channel-first buffer, `[channel, height, width]` or `[1, channel, height, width]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor(pub ArrayD<f64>);

impl Tensor {
    pub fn new(data: ArrayD<f64>) -> Tensor {
        Tensor(data)
    }

    pub fn from_channel_last<S: Data<Elem = f64>>(image: &ArrayBase<S, Ix3>) -> Tensor {
        let data = image.view().permuted_axes([2, 0, 1]);
        Tensor(data.as_standard_layout().into_owned().into_dyn())
    }

    /// Adds a leading batch dimension of size 1.
    pub fn unsqueeze(self) -> Tensor {
        Tensor(self.0.insert_axis(Axis(0)))
    }

    pub fn shape(&self) -> &[usize] {
        self.0.shape()
    }

    /// Splits a `[batch, channel, height, width]` tensor into per-image tensors.
    pub fn batch(&self) -> Result<Vec<Tensor>> {
        if self.0.ndim() != 4 {
            return Err(Error::UnsupportedType(format!(
                "tensor of rank {}, expected a batch",
                self.0.ndim()
            )));
        }
        let items = self.0.axis_iter(Axis(0)).map(|item| Tensor(item.to_owned())).collect();
        return Ok(items);
    }

    fn image_view(&self) -> Result<ArrayView3<'_, f64>> {
        match self.0.ndim() {
            3 => Ok(self.0.view().into_dimensionality::<Ix3>()?),
            4 => {
                let batch = self.0.len_of(Axis(0));
                if batch != 1 {
                    return Err(Error::BatchSize(batch));
                }
                debug!(shape = ?self.0.shape(), "squeezing batch dimension");
                Ok(self.0.index_axis(Axis(0), 0).into_dimensionality::<Ix3>()?)
            }
            rank => Err(Error::UnsupportedType(format!("tensor of rank {rank}"))),
        }
    }
}

impl ChannelSource for Tensor {
    fn planes(&self) -> Result<Planes<'_>> {
        let view = self.image_view()?;
        let channels = view.len_of(Axis(0));
        if channels != 3 {
            return Err(Error::ChannelCount(channels));
        }
        return Ok(array::from_fn(|c| CowArray::from(view.clone().index_axis_move(Axis(0), c))));
    }
}

impl ChannelSource for RgbImage {
    fn planes(&self) -> Result<Planes<'_>> {
        return Ok(pixel_planes(self, 1.0));
    }
}

/// Decoded images are read on the 8-bit scale; only RGB formats are accepted.
impl ChannelSource for DynamicImage {
    fn planes(&self) -> Result<Planes<'_>> {
        match self {
            DynamicImage::ImageRgb8(image) => Ok(pixel_planes(image, 1.0)),
            DynamicImage::ImageRgb16(image) => Ok(pixel_planes(image, 255.0 / 65535.0)),
            DynamicImage::ImageRgb32F(image) => Ok(pixel_planes(image, 255.0)),
            other => Err(Error::UnsupportedType(format!("{:?} image", other.color()))),
        }
    }
}

fn pixel_planes<'a, P>(image: &ImageBuffer<P, Vec<P::Subpixel>>, scale: f64) -> Planes<'a>
where
    P: Pixel,
    P::Subpixel: Into<f64>,
{
    let (width, height) = image.dimensions();
    let shape = (height as usize, width as usize);
    let mut planes: [Array2<f64>; 3] = array::from_fn(|_| Array2::zeros(shape));
    for (x, y, pixel) in image.enumerate_pixels() {
        for (plane, value) in planes.iter_mut().zip(pixel.channels()) {
            plane[(y as usize, x as usize)] = (*value).into() * scale;
        }
    }
    planes.map(CowArray::from)
}

pub fn plane2luma<S: Data<Elem = f64>>(plane: &ArrayBase<S, Ix2>) -> GrayImage {
    let values = quantize(plane);
    let (height, width) = values.dim();
    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        Luma([values[(y as usize, x as usize)]])
    })
}

pub fn array2rgb<S: Data<Elem = f64>>(image: &ArrayBase<S, Ix3>) -> RgbImage {
    let values = quantize(image);
    let (height, width, _) = values.dim();
    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let (x, y) = (x as usize, y as usize);
        Rgb([values[(y, x, 0)], values[(y, x, 1)], values[(y, x, 2)]])
    })
}
