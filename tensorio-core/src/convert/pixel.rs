//! Pixel buffer layer conversion
//!
//! Images are written row-major, three channel values per pixel in the
//! order the layer's [`PixelFormat`](crate::layer::PixelFormat) declares.
//! Alpha is dropped on the way in and forced opaque on the way out.

use std::borrow::Cow;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tracing::trace;

use crate::buffer::Buffer;
use crate::convert::{prepare, Converter};
use crate::error::{Error, Result};
use crate::layer::PixelBufferLayerDescription;
use crate::transform::saturate_u8;
use crate::value::Value;

/// Converts images to and from pixel buffer layer buffers
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelBufferConverter;

impl PixelBufferConverter {
    /// Scale an image to the layer's dimensions, borrowing it when it already fits
    fn fit<'a>(image: &'a RgbaImage, description: &PixelBufferLayerDescription) -> Result<Cow<'a, RgbaImage>> {
        let (width, height) = (description.width(), description.height());

        if image.width() == 0 || image.height() == 0 {
            return Err(Error::LengthMismatch {
                expected: width as usize * height as usize,
                given: 0,
            });
        }

        if image.dimensions() == (width, height) {
            return Ok(Cow::Borrowed(image));
        }

        trace!(
            from_width = image.width(),
            from_height = image.height(),
            width,
            height,
            "resizing image"
        );
        Ok(Cow::Owned(imageops::resize(image, width, height, FilterType::Triangle)))
    }
}

impl Converter for PixelBufferConverter {
    type Description = PixelBufferLayerDescription;

    fn byte_size(&self, description: &PixelBufferLayerDescription) -> usize {
        description.byte_size()
    }

    fn write(&self, value: &Value, description: &PixelBufferLayerDescription, buffer: &mut Buffer) -> Result<()> {
        let image = value.as_image().ok_or(Error::UnsupportedType {
            expected: "image",
            given: value.type_name(),
        })?;
        let image = Self::fit(image, description)?;
        prepare(buffer, description.byte_size())?;

        let order = description.format().channel_order();

        if description.is_quantized() {
            for pixel in image.pixels() {
                for &channel in &order {
                    buffer.put_u8(pixel[channel])?;
                }
            }
        } else {
            let normalizer = description.normalizer();
            for pixel in image.pixels() {
                for &channel in &order {
                    let value = match normalizer {
                        Some(normalizer) => normalizer.normalize(pixel[channel], channel),
                        None => f32::from(pixel[channel]),
                    };
                    buffer.put_f32(value)?;
                }
            }
        }

        trace!(
            width = description.width(),
            height = description.height(),
            quantized = description.is_quantized(),
            "wrote pixel buffer"
        );
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn read(&self, buffer: &mut Buffer, description: &PixelBufferLayerDescription) -> Result<Value> {
        prepare(buffer, description.byte_size())?;

        let order = description.format().channel_order();
        let denormalizer = description.denormalizer();
        let mut image = RgbaImage::new(description.width(), description.height());

        for pixel in image.pixels_mut() {
            let mut rgb = [0u8; 3];
            for &channel in &order {
                rgb[channel] = if description.is_quantized() {
                    buffer.get_u8()?
                } else {
                    let value = buffer.get_f32()?;
                    match denormalizer {
                        Some(denormalizer) => saturate_u8(denormalizer.denormalize(value, channel)),
                        None => saturate_u8(value as i32),
                    }
                };
            }
            *pixel = Rgba([rgb[0], rgb[1], rgb[2], u8::MAX]);
        }

        trace!(
            width = description.width(),
            height = description.height(),
            quantized = description.is_quantized(),
            "read pixel buffer"
        );
        Ok(Value::Image(image))
    }
}
