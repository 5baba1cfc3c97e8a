//! String layer conversion, raw bytes in and out

use tracing::trace;

use crate::buffer::Buffer;
use crate::convert::{prepare, Converter};
use crate::error::{Error, Result};
use crate::layer::StringLayerDescription;
use crate::value::Value;

/// Passes byte strings through unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct StringConverter;

impl Converter for StringConverter {
    type Description = StringLayerDescription;

    fn byte_size(&self, description: &StringLayerDescription) -> usize {
        description.byte_size()
    }

    fn write(&self, value: &Value, description: &StringLayerDescription, buffer: &mut Buffer) -> Result<()> {
        let bytes = match value {
            Value::Bytes(bytes) => bytes.as_slice(),
            Value::Text(text) => text.as_bytes(),
            other => {
                return Err(Error::UnsupportedType {
                    expected: "byte string",
                    given: other.type_name(),
                })
            }
        };

        if bytes.len() != description.length() {
            return Err(Error::LengthMismatch {
                expected: description.length(),
                given: bytes.len(),
            });
        }

        prepare(buffer, description.byte_size())?;
        buffer.put_slice(bytes)?;

        trace!(length = bytes.len(), "wrote string buffer");
        Ok(())
    }

    fn read(&self, buffer: &mut Buffer, description: &StringLayerDescription) -> Result<Value> {
        prepare(buffer, description.byte_size())?;
        let bytes = buffer.get_bytes(description.length())?.to_vec();

        trace!(length = bytes.len(), "read string buffer");
        Ok(Value::Bytes(bytes))
    }
}
