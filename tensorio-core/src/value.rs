//! Application-facing values
//!
//! [`Value`] is what callers hand to converters, store in batches and get
//! back from a model.

use std::collections::HashMap;

use image::RgbaImage;

/// A typed value supplied by or returned to application code
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Float vector
    Float32(Vec<f32>),
    /// Unsigned byte vector
    UInt8(Vec<u8>),
    /// Raw byte string
    Bytes(Vec<u8>),
    /// RGBA image
    Image(RgbaImage),
    /// Labeled vector output, label to value
    Labeled(HashMap<String, f32>),
    /// Scalar number
    Scalar(f64),
    /// Text
    Text(String),
}

impl Value {
    /// Name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Float32(_) => "float32 array",
            Value::UInt8(_) => "uint8 array",
            Value::Bytes(_) => "byte string",
            Value::Image(_) => "image",
            Value::Labeled(_) => "labeled map",
            Value::Scalar(_) => "scalar",
            Value::Text(_) => "text",
        }
    }

    /// Borrow as a float slice
    pub fn as_f32_slice(&self) -> Option<&[f32]> {
        match self {
            Value::Float32(values) => Some(values),
            _ => None,
        }
    }

    /// Borrow as an image
    pub fn as_image(&self) -> Option<&RgbaImage> {
        match self {
            Value::Image(image) => Some(image),
            _ => None,
        }
    }

    /// Borrow as a labeled map
    pub fn as_labeled(&self) -> Option<&HashMap<String, f32>> {
        match self {
            Value::Labeled(map) => Some(map),
            _ => None,
        }
    }
}

impl From<Vec<f32>> for Value {
    fn from(values: Vec<f32>) -> Self {
        Value::Float32(values)
    }
}

impl From<Vec<u8>> for Value {
    fn from(values: Vec<u8>) -> Self {
        Value::UInt8(values)
    }
}

impl From<RgbaImage> for Value {
    fn from(image: RgbaImage) -> Self {
        Value::Image(image)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Scalar(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}
