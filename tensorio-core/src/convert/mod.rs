//! Conversion between application values and backing buffers
//!
//! Each layer family has a [`Converter`]. The free functions in this module
//! dispatch on a [`LayerDescription`] to the matching converter.
//!
//! [`Converter::to_buffer`] allocates a fresh buffer. To reuse a buffer
//! across calls, keep it and pass it by reference to [`Converter::write`]
//! or [`write_buffer`]: it is rewound and written in place, and stays with
//! the caller when the conversion fails. A reused buffer must have exactly
//! the size the layer needs.

mod pixel;
mod string;
mod vector;

pub use pixel::PixelBufferConverter;
pub use string::StringConverter;
pub use vector::VectorConverter;

use tracing::{debug, warn};

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::layer::LayerDescription;
use crate::value::Value;

/// Converts values of one layer family to and from backing buffers
pub trait Converter {
    /// Description of the layers this converter handles
    type Description;

    /// Size in bytes of a buffer for the given layer
    fn byte_size(&self, description: &Self::Description) -> usize;

    /// Write a value into a caller-owned buffer, starting from its beginning
    fn write(&self, value: &Value, description: &Self::Description, buffer: &mut Buffer) -> Result<()>;

    /// Read a value from a buffer, starting from the buffer's beginning
    fn read(&self, buffer: &mut Buffer, description: &Self::Description) -> Result<Value>;

    /// Allocate a zeroed buffer sized exactly for the layer
    fn create_backing_buffer(&self, description: &Self::Description) -> Buffer {
        let size = self.byte_size(description);
        debug!(size, "allocating backing buffer");
        Buffer::new_zeroed(size)
    }

    /// Convert a value into a newly allocated buffer
    fn to_buffer(&self, value: &Value, description: &Self::Description) -> Result<Buffer> {
        let mut buffer = self.create_backing_buffer(description);
        self.write(value, description, &mut buffer)?;
        Ok(buffer)
    }

    /// Convert a buffer back into a value
    fn from_buffer(&self, buffer: &mut Buffer, description: &Self::Description) -> Result<Value> {
        self.read(buffer, description)
    }
}

/// Rewind a buffer and check it has the size a layer needs
pub(crate) fn prepare(buffer: &mut Buffer, expected: usize) -> Result<()> {
    if buffer.size() != expected {
        warn!(expected, given = buffer.size(), "backing buffer has the wrong size");
        return Err(Error::LengthMismatch {
            expected,
            given: buffer.size(),
        });
    }

    buffer.rewind();
    Ok(())
}

/// Allocate a zeroed buffer sized exactly for the layer
pub fn create_backing_buffer(description: &LayerDescription) -> Buffer {
    match description {
        LayerDescription::Vector(description) => VectorConverter.create_backing_buffer(description),
        LayerDescription::PixelBuffer(description) => {
            PixelBufferConverter.create_backing_buffer(description)
        }
        LayerDescription::String(description) => StringConverter.create_backing_buffer(description),
    }
}

/// Write a value into a caller-owned buffer for the layer
///
/// This is the reuse path: the buffer is rewound and overwritten, and is
/// left with the caller on failure.
pub fn write_buffer(value: &Value, description: &LayerDescription, buffer: &mut Buffer) -> Result<()> {
    match description {
        LayerDescription::Vector(description) => VectorConverter.write(value, description, buffer),
        LayerDescription::PixelBuffer(description) => {
            PixelBufferConverter.write(value, description, buffer)
        }
        LayerDescription::String(description) => StringConverter.write(value, description, buffer),
    }
}

/// Convert a value into a newly allocated buffer for the layer
pub fn to_buffer(value: &Value, description: &LayerDescription) -> Result<Buffer> {
    match description {
        LayerDescription::Vector(description) => VectorConverter.to_buffer(value, description),
        LayerDescription::PixelBuffer(description) => PixelBufferConverter.to_buffer(value, description),
        LayerDescription::String(description) => StringConverter.to_buffer(value, description),
    }
}

/// Convert a buffer for the layer back into a value
pub fn from_buffer(buffer: &mut Buffer, description: &LayerDescription) -> Result<Value> {
    match description {
        LayerDescription::Vector(description) => VectorConverter.from_buffer(buffer, description),
        LayerDescription::PixelBuffer(description) => {
            PixelBufferConverter.from_buffer(buffer, description)
        }
        LayerDescription::String(description) => StringConverter.from_buffer(buffer, description),
    }
}
