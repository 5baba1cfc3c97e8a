//! Vector layer conversion

use tracing::trace;

use crate::buffer::Buffer;
use crate::convert::{prepare, Converter};
use crate::error::{Error, Result};
use crate::layer::VectorLayerDescription;
use crate::transform::saturate_u8;
use crate::value::Value;

/// Converts float and byte arrays to and from vector layer buffers
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorConverter;

impl VectorConverter {
    /// Read a vector buffer as floats
    ///
    /// Unlike [`Converter::read`], a quantized layer without a dequantizer
    /// is an error here rather than returning raw bytes.
    pub fn read_f32(&self, buffer: &mut Buffer, description: &VectorLayerDescription) -> Result<Vec<f32>> {
        if description.is_quantized() && description.dequantizer().is_none() {
            return Err(Error::MissingDequantizer);
        }

        match self.read(buffer, description)? {
            Value::Float32(values) => Ok(values),
            other => Err(Error::UnsupportedType {
                expected: "float32 array",
                given: other.type_name(),
            }),
        }
    }
}

fn check_length(expected: usize, given: usize) -> Result<()> {
    if expected == given {
        Ok(())
    } else {
        Err(Error::LengthMismatch { expected, given })
    }
}

impl Converter for VectorConverter {
    type Description = VectorLayerDescription;

    fn byte_size(&self, description: &VectorLayerDescription) -> usize {
        description.byte_size()
    }

    fn write(&self, value: &Value, description: &VectorLayerDescription, buffer: &mut Buffer) -> Result<()> {
        let length = description.length();

        match value {
            Value::UInt8(bytes) => {
                check_length(length, bytes.len())?;
                prepare(buffer, description.byte_size())?;

                if description.is_quantized() {
                    buffer.put_slice(bytes.as_slice())?;
                } else {
                    for &byte in bytes {
                        buffer.put_f32(f32::from(byte))?;
                    }
                }
            }
            Value::Float32(floats) => {
                check_length(length, floats.len())?;

                if description.is_quantized() {
                    let quantizer = description.quantizer().ok_or(Error::MissingQuantizer)?;
                    prepare(buffer, description.byte_size())?;
                    for &value in floats {
                        buffer.put_u8(saturate_u8(quantizer.quantize(value)))?;
                    }
                } else {
                    prepare(buffer, description.byte_size())?;
                    buffer.put_slice(floats.as_slice())?;
                }
            }
            other => {
                return Err(Error::UnsupportedType {
                    expected: "float32 or uint8 array",
                    given: other.type_name(),
                })
            }
        }

        trace!(length, data_type = %description.data_type(), "wrote vector buffer");
        Ok(())
    }

    fn read(&self, buffer: &mut Buffer, description: &VectorLayerDescription) -> Result<Value> {
        let length = description.length();
        prepare(buffer, description.byte_size())?;

        let value = if description.is_quantized() {
            let bytes = buffer.get_bytes(length)?;
            match description.dequantizer() {
                Some(dequantizer) => Value::Float32(
                    bytes
                        .iter()
                        .map(|&byte| dequantizer.dequantize(i32::from(byte)))
                        .collect(),
                ),
                None => Value::UInt8(bytes.to_vec()),
            }
        } else {
            let floats = (0..length)
                .map(|_| buffer.get_f32())
                .collect::<Result<Vec<_>>>()?;
            Value::Float32(floats)
        };

        trace!(length, data_type = %description.data_type(), "read vector buffer");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{Dequantizer, Quantizer};

    #[test]
    fn test_float_round_trip_is_exact() {
        let description = VectorLayerDescription::new(vec![4], false).unwrap();
        let mut buffer = VectorConverter
            .to_buffer(&Value::Float32(vec![1.0, 2.0, 3.0, 4.0]), &description)
            .unwrap();

        assert_eq!(buffer.size(), 16);
        let value = VectorConverter.from_buffer(&mut buffer, &description).unwrap();
        assert_eq!(value, Value::Float32(vec![1.0, 2.0, 3.0, 4.0]));
    }

    #[test]
    fn test_quantized_round_trip() {
        let description = VectorLayerDescription::new(vec![1], true).unwrap()
            .with_quantizer(Quantizer::zero_to_one())
            .with_dequantizer(Dequantizer::zero_to_one());

        let mut buffer = VectorConverter
            .to_buffer(&Value::Float32(vec![0.5]), &description)
            .unwrap();
        assert_eq!(buffer.as_bytes(), &[127]);

        let value = VectorConverter.from_buffer(&mut buffer, &description).unwrap();
        let floats = value.as_f32_slice().unwrap();
        assert!((floats[0] - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_quantized_without_dequantizer_returns_unsigned_bytes() {
        let description = VectorLayerDescription::new(vec![3], true).unwrap();
        let mut buffer = VectorConverter
            .to_buffer(&Value::UInt8(vec![0, 128, 255]), &description)
            .unwrap();

        let value = VectorConverter.from_buffer(&mut buffer, &description).unwrap();
        assert_eq!(value, Value::UInt8(vec![0, 128, 255]));
    }

    #[test]
    fn test_quantized_float_input_requires_quantizer() {
        let description = VectorLayerDescription::new(vec![2], true).unwrap();
        let result = VectorConverter.to_buffer(&Value::Float32(vec![0.1, 0.2]), &description);
        assert!(matches!(result, Err(Error::MissingQuantizer)));
    }

    #[test]
    fn test_read_f32_requires_dequantizer() {
        let description = VectorLayerDescription::new(vec![2], true).unwrap();
        let mut buffer = VectorConverter.create_backing_buffer(&description);
        let result = VectorConverter.read_f32(&mut buffer, &description);
        assert!(matches!(result, Err(Error::MissingDequantizer)));
    }

    #[test]
    fn test_quantize_saturates() {
        let description = VectorLayerDescription::new(vec![2], true).unwrap().with_quantizer(Quantizer::zero_to_one());
        let buffer = VectorConverter
            .to_buffer(&Value::Float32(vec![-0.5, 2.0]), &description)
            .unwrap();
        assert_eq!(buffer.as_bytes(), &[0, 255]);
    }

    #[test]
    fn test_length_mismatch() {
        let description = VectorLayerDescription::new(vec![4], false).unwrap();
        let result = VectorConverter.to_buffer(&Value::Float32(vec![1.0, 2.0]), &description);
        assert!(matches!(result, Err(Error::LengthMismatch { expected: 4, given: 2 })));
    }

    #[test]
    fn test_unsupported_type() {
        let description = VectorLayerDescription::new(vec![1], false).unwrap();
        let result = VectorConverter.to_buffer(&Value::Text("x".into()), &description);
        assert!(matches!(result, Err(Error::UnsupportedType { given: "text", .. })));
    }

    #[test]
    fn test_bytes_widen_into_float_layer() {
        let description = VectorLayerDescription::new(vec![2], false).unwrap();
        let mut buffer = VectorConverter
            .to_buffer(&Value::UInt8(vec![3, 200]), &description)
            .unwrap();
        let value = VectorConverter.from_buffer(&mut buffer, &description).unwrap();
        assert_eq!(value, Value::Float32(vec![3.0, 200.0]));
    }
}
