//! Scale and bias value transforms
//!
//! Quantizers map floats into an integer domain, dequantizers map back.
//! Pixel normalizers and denormalizers do the same for image channels and
//! may carry a separate bias per colour channel.
//!
//! Quantizing truncates toward zero after scaling; it does not round to
//! nearest. A quantizer and a dequantizer are only inverses when built from
//! reciprocal scale/bias pairs, which is left to the caller.

use serde::{Deserialize, Serialize};

/// Maps a float into an integer domain: `int = trunc((value + bias) * scale)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantizer {
    scale: f32,
    bias: f32,
}

impl Quantizer {
    /// Create a quantizer from a scale and bias
    pub fn new(scale: f32, bias: f32) -> Self {
        Self { scale, bias }
    }

    /// Quantizer for floats in `[0, 1]` to integers in `[0, 255]`
    pub fn zero_to_one() -> Self {
        Self::new(255.0, 0.0)
    }

    /// Quantizer for floats in `[-1, 1]` to integers in `[0, 255]`
    pub fn negative_one_to_one() -> Self {
        Self::new(127.5, 1.0)
    }

    /// Quantize a single value
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub fn quantize(&self, value: f32) -> i32 {
        ((value + self.bias) * self.scale) as i32
    }

    /// Scale applied after the bias
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Bias added before scaling
    pub fn bias(&self) -> f32 {
        self.bias
    }
}

/// Maps an integer back to a float: `value = int * scale + bias`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dequantizer {
    scale: f32,
    bias: f32,
}

impl Dequantizer {
    /// Create a dequantizer from a scale and bias
    pub fn new(scale: f32, bias: f32) -> Self {
        Self { scale, bias }
    }

    /// Dequantizer for integers in `[0, 255]` to floats in `[0, 1]`
    pub fn zero_to_one() -> Self {
        Self::new(1.0 / 255.0, 0.0)
    }

    /// Dequantizer for integers in `[0, 255]` to floats in `[-1, 1]`
    pub fn negative_one_to_one() -> Self {
        Self::new(2.0 / 255.0, -1.0)
    }

    /// Dequantize a single value
    #[inline]
    #[allow(clippy::cast_precision_loss)]
    pub fn dequantize(&self, value: i32) -> f32 {
        (value as f32) * self.scale + self.bias
    }

    /// Scale applied to the integer
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Bias added after scaling
    pub fn bias(&self) -> f32 {
        self.bias
    }
}

/// Bias applied to pixel channels, either shared or one per colour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ChannelBias {
    /// Same bias for every channel
    Single(f32),
    /// Red, green and blue biases
    PerChannel([f32; 3]),
}

impl ChannelBias {
    /// Bias for a channel index; anything past green uses the blue bias
    #[inline]
    pub fn for_channel(&self, channel: usize) -> f32 {
        match self {
            ChannelBias::Single(bias) => *bias,
            ChannelBias::PerChannel([red, green, blue]) => match channel {
                0 => *red,
                1 => *green,
                _ => *blue,
            },
        }
    }
}

/// Maps a pixel channel byte to a float: `value = channel * scale + bias[c]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelNormalizer {
    scale: f32,
    bias: ChannelBias,
}

impl PixelNormalizer {
    /// Normalizer with one bias for all channels
    pub fn new(scale: f32, bias: f32) -> Self {
        Self {
            scale,
            bias: ChannelBias::Single(bias),
        }
    }

    /// Normalizer with a red, green and blue bias
    pub fn per_channel(scale: f32, red: f32, green: f32, blue: f32) -> Self {
        Self {
            scale,
            bias: ChannelBias::PerChannel([red, green, blue]),
        }
    }

    /// Normalizer for pixels in `[0, 255]` to floats in `[0, 1]`
    pub fn zero_to_one() -> Self {
        Self::new(1.0 / 255.0, 0.0)
    }

    /// Normalizer for pixels in `[0, 255]` to floats in `[-1, 1]`
    pub fn negative_one_to_one() -> Self {
        Self::new(2.0 / 255.0, -1.0)
    }

    /// Normalize one channel value
    #[inline]
    pub fn normalize(&self, value: u8, channel: usize) -> f32 {
        f32::from(value) * self.scale + self.bias.for_channel(channel)
    }

    /// Scale applied to the channel value
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Channel bias
    pub fn bias(&self) -> ChannelBias {
        self.bias
    }
}

/// Maps a float back to a pixel channel: `int = trunc((value + bias[c]) * scale)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelDenormalizer {
    scale: f32,
    bias: ChannelBias,
}

impl PixelDenormalizer {
    /// Denormalizer with one bias for all channels
    pub fn new(scale: f32, bias: f32) -> Self {
        Self {
            scale,
            bias: ChannelBias::Single(bias),
        }
    }

    /// Denormalizer with a red, green and blue bias
    pub fn per_channel(scale: f32, red: f32, green: f32, blue: f32) -> Self {
        Self {
            scale,
            bias: ChannelBias::PerChannel([red, green, blue]),
        }
    }

    /// Denormalizer for floats in `[0, 1]` to pixels in `[0, 255]`
    pub fn zero_to_one() -> Self {
        Self::new(255.0, 0.0)
    }

    /// Denormalizer for floats in `[-1, 1]` to pixels in `[0, 255]`
    pub fn negative_one_to_one() -> Self {
        Self::new(127.5, 1.0)
    }

    /// Denormalize one channel value
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub fn denormalize(&self, value: f32, channel: usize) -> i32 {
        ((value + self.bias.for_channel(channel)) * self.scale) as i32
    }

    /// Scale applied after the bias
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Channel bias
    pub fn bias(&self) -> ChannelBias {
        self.bias
    }
}

/// Clamp an integer produced by a transform into a single byte
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn saturate_u8(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}
