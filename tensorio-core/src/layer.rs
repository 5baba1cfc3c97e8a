//! Layer descriptions and interfaces
//!
//! A [`LayerInterface`] names one input, output or placeholder slot of a
//! model and owns a [`LayerDescription`] saying what data the slot holds.
//! Descriptions are a closed set of variants; consumers `match` on them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::transform::{Dequantizer, PixelDenormalizer, PixelNormalizer, Quantizer};

/// Element type of a backing buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Unsigned 8-bit integer (quantized data)
    UInt8,
    /// 32-bit IEEE 754 float, native byte order
    Float32,
}

impl DataType {
    /// Size of one element in bytes
    pub fn size_bytes(self) -> usize {
        match self {
            DataType::UInt8 => 1,
            DataType::Float32 => 4,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::UInt8 => write!(f, "UInt8"),
            DataType::Float32 => write!(f, "Float32"),
        }
    }
}

/// Role a layer plays in a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerMode {
    /// Data fed to the model
    Input,
    /// Data produced by the model
    Output,
    /// Named value set before inference or training, such as a hyperparameter
    Placeholder,
}

/// Order in which pixel channels are laid out in a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    /// Red, green, blue
    #[default]
    Rgb,
    /// Blue, green, red
    Bgr,
}

impl PixelFormat {
    /// Colour channel (0 = red, 1 = green, 2 = blue) stored at each buffer slot
    pub fn channel_order(self) -> [usize; 3] {
        match self {
            PixelFormat::Rgb => [0, 1, 2],
            PixelFormat::Bgr => [2, 1, 0],
        }
    }
}

/// Description of a flat numeric vector layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VectorLayerRecord", into = "VectorLayerRecord")]
pub struct VectorLayerDescription {
    shape: Vec<i32>,
    length: usize,
    data_type: DataType,
    quantized: bool,
    quantizer: Option<Quantizer>,
    dequantizer: Option<Dequantizer>,
    labels: Option<Vec<String>>,
}

/// Persisted form of a vector description; length and type are derived on load
#[derive(Serialize, Deserialize)]
struct VectorLayerRecord {
    shape: Vec<i32>,
    quantized: bool,
    #[serde(default)]
    quantizer: Option<Quantizer>,
    #[serde(default)]
    dequantizer: Option<Dequantizer>,
    #[serde(default)]
    labels: Option<Vec<String>>,
}

impl TryFrom<VectorLayerRecord> for VectorLayerDescription {
    type Error = Error;

    fn try_from(record: VectorLayerRecord) -> Result<Self> {
        let mut description = Self::new(record.shape, record.quantized)?;
        description.quantizer = record.quantizer;
        description.dequantizer = record.dequantizer;
        description.labels = record.labels;
        Ok(description)
    }
}

impl From<VectorLayerDescription> for VectorLayerRecord {
    fn from(description: VectorLayerDescription) -> Self {
        Self {
            shape: description.shape,
            quantized: description.quantized,
            quantizer: description.quantizer,
            dequantizer: description.dequantizer,
            labels: description.labels,
        }
    }
}

impl VectorLayerDescription {
    /// Create a vector description
    ///
    /// Dimensions of `-1` stand for an unknown batch dimension and count as
    /// one toward the vector length. Quantized vectors hold `UInt8` data,
    /// unquantized vectors hold `Float32`.
    pub fn new(shape: Vec<i32>, quantized: bool) -> Result<Self> {
        let data_type = if quantized {
            DataType::UInt8
        } else {
            DataType::Float32
        };

        let length = shape
            .iter()
            .try_fold(1usize, |length, &d| length.checked_mul(d.unsigned_abs() as usize))
            .filter(|length| length.checked_mul(data_type.size_bytes()).is_some())
            .ok_or_else(|| {
                Error::InvalidArgument(format!("Vector shape {shape:?} overflows the addressable size"))
            })?;

        Ok(Self {
            shape,
            length,
            data_type,
            quantized,
            quantizer: None,
            dequantizer: None,
            labels: None,
        })
    }

    /// Attach the quantizer used when float data is written to a quantized input
    #[must_use]
    pub fn with_quantizer(mut self, quantizer: Quantizer) -> Self {
        self.quantizer = Some(quantizer);
        self
    }

    /// Attach the dequantizer used when a quantized output is read as floats
    #[must_use]
    pub fn with_dequantizer(mut self, dequantizer: Dequantizer) -> Self {
        self.dequantizer = Some(dequantizer);
        self
    }

    /// Attach an ordered label per vector element
    #[must_use]
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Declared shape
    pub fn shape(&self) -> &[i32] {
        &self.shape
    }

    /// Number of elements in the vector
    pub fn length(&self) -> usize {
        self.length
    }

    /// Element type held by the backing buffer
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Whether the backing buffer holds quantized bytes
    pub fn is_quantized(&self) -> bool {
        self.quantized
    }

    /// Quantizer for float input, if any
    pub fn quantizer(&self) -> Option<&Quantizer> {
        self.quantizer.as_ref()
    }

    /// Dequantizer for float output, if any
    pub fn dequantizer(&self) -> Option<&Dequantizer> {
        self.dequantizer.as_ref()
    }

    /// Element labels, if any
    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    /// A vector is labeled when it has exactly one label per element
    pub fn is_labeled(&self) -> bool {
        self.labels
            .as_ref()
            .is_some_and(|labels| labels.len() == self.length)
    }

    /// Size of the backing buffer in bytes
    pub fn byte_size(&self) -> usize {
        self.length * self.data_type.size_bytes()
    }
}

/// Description of an image layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PixelBufferLayerRecord", into = "PixelBufferLayerRecord")]
pub struct PixelBufferLayerDescription {
    width: u32,
    height: u32,
    channels: usize,
    format: PixelFormat,
    quantized: bool,
    normalizer: Option<PixelNormalizer>,
    denormalizer: Option<PixelDenormalizer>,
}

#[derive(Serialize, Deserialize)]
struct PixelBufferLayerRecord {
    width: u32,
    height: u32,
    channels: usize,
    #[serde(default)]
    format: PixelFormat,
    quantized: bool,
    #[serde(default)]
    normalizer: Option<PixelNormalizer>,
    #[serde(default)]
    denormalizer: Option<PixelDenormalizer>,
}

impl TryFrom<PixelBufferLayerRecord> for PixelBufferLayerDescription {
    type Error = Error;

    fn try_from(record: PixelBufferLayerRecord) -> Result<Self> {
        let mut description = Self::new(
            record.width,
            record.height,
            record.channels,
            record.format,
            record.quantized,
        )?;
        description.normalizer = record.normalizer;
        description.denormalizer = record.denormalizer;
        Ok(description)
    }
}

impl From<PixelBufferLayerDescription> for PixelBufferLayerRecord {
    fn from(description: PixelBufferLayerDescription) -> Self {
        Self {
            width: description.width,
            height: description.height,
            channels: description.channels,
            format: description.format,
            quantized: description.quantized,
            normalizer: description.normalizer,
            denormalizer: description.denormalizer,
        }
    }
}

impl PixelBufferLayerDescription {
    /// Number of channels a pixel buffer layer carries
    pub const CHANNELS: usize = 3;

    /// Create an image description
    ///
    /// Only three-channel layouts are supported.
    pub fn new(
        width: u32,
        height: u32,
        channels: usize,
        format: PixelFormat,
        quantized: bool,
    ) -> Result<Self> {
        if channels != Self::CHANNELS {
            return Err(Error::InvalidArgument(format!(
                "Pixel buffer layers must have {} channels, got {}",
                Self::CHANNELS,
                channels
            )));
        }

        if width == 0 || height == 0 {
            return Err(Error::InvalidArgument(format!(
                "Pixel buffer dimensions must be non-zero, got {width}x{height}"
            )));
        }

        Ok(Self {
            width,
            height,
            channels,
            format,
            quantized,
            normalizer: None,
            denormalizer: None,
        })
    }

    /// Attach the normalizer applied to unquantized input pixels
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: PixelNormalizer) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// Attach the denormalizer applied to unquantized output pixels
    #[must_use]
    pub fn with_denormalizer(mut self, denormalizer: PixelDenormalizer) -> Self {
        self.denormalizer = Some(denormalizer);
        self
    }

    /// Image width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channels per pixel
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Channel layout
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Whether channels are stored as raw bytes
    pub fn is_quantized(&self) -> bool {
        self.quantized
    }

    /// Normalizer, if any
    pub fn normalizer(&self) -> Option<&PixelNormalizer> {
        self.normalizer.as_ref()
    }

    /// Denormalizer, if any
    pub fn denormalizer(&self) -> Option<&PixelDenormalizer> {
        self.denormalizer.as_ref()
    }

    /// Element type held by the backing buffer
    pub fn data_type(&self) -> DataType {
        if self.quantized {
            DataType::UInt8
        } else {
            DataType::Float32
        }
    }

    /// Number of channel values in the image
    pub fn length(&self) -> usize {
        self.width as usize * self.height as usize * self.channels
    }

    /// Size of the backing buffer in bytes
    pub fn byte_size(&self) -> usize {
        self.length() * self.data_type().size_bytes()
    }
}

/// Description of a raw byte string layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringLayerDescription {
    length: usize,
}

impl StringLayerDescription {
    /// Create a byte string description
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    /// Number of bytes
    pub fn length(&self) -> usize {
        self.length
    }

    /// Size of the backing buffer in bytes
    pub fn byte_size(&self) -> usize {
        self.length
    }
}

/// What a layer holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayerDescription {
    /// Numeric vector
    Vector(VectorLayerDescription),
    /// Image
    PixelBuffer(PixelBufferLayerDescription),
    /// Raw bytes
    String(StringLayerDescription),
}

impl LayerDescription {
    /// Size of the backing buffer in bytes
    pub fn byte_size(&self) -> usize {
        match self {
            LayerDescription::Vector(description) => description.byte_size(),
            LayerDescription::PixelBuffer(description) => description.byte_size(),
            LayerDescription::String(description) => description.byte_size(),
        }
    }

    /// Short name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            LayerDescription::Vector(_) => "vector",
            LayerDescription::PixelBuffer(_) => "pixel buffer",
            LayerDescription::String(_) => "string",
        }
    }
}

impl From<VectorLayerDescription> for LayerDescription {
    fn from(description: VectorLayerDescription) -> Self {
        LayerDescription::Vector(description)
    }
}

impl From<PixelBufferLayerDescription> for LayerDescription {
    fn from(description: PixelBufferLayerDescription) -> Self {
        LayerDescription::PixelBuffer(description)
    }
}

impl From<StringLayerDescription> for LayerDescription {
    fn from(description: StringLayerDescription) -> Self {
        LayerDescription::String(description)
    }
}

/// A named model slot and the description of the data it holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerInterface {
    name: String,
    mode: LayerMode,
    description: LayerDescription,
}

impl LayerInterface {
    /// Create a new layer interface
    pub fn new(name: &str, mode: LayerMode, description: impl Into<LayerDescription>) -> Self {
        Self {
            name: name.to_string(),
            mode,
            description: description.into(),
        }
    }

    /// Layer name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Layer mode
    pub fn mode(&self) -> LayerMode {
        self.mode
    }

    /// Layer description
    pub fn description(&self) -> &LayerDescription {
        &self.description
    }
}

impl fmt::Display for LayerInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?}, {})", self.name, self.mode, self.description.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_length_and_size() {
        let description = VectorLayerDescription::new(vec![-1, 2, 3], false).unwrap();
        assert_eq!(description.length(), 6);
        assert_eq!(description.data_type(), DataType::Float32);
        assert_eq!(description.byte_size(), 24);

        let quantized = VectorLayerDescription::new(vec![10], true).unwrap();
        assert_eq!(quantized.data_type(), DataType::UInt8);
        assert_eq!(quantized.byte_size(), 10);
    }

    #[test]
    fn test_vector_labeled_requires_matching_length() {
        let labels = vec!["cat".to_string(), "dog".to_string()];

        let labeled = VectorLayerDescription::new(vec![2], false).unwrap().with_labels(labels.clone());
        assert!(labeled.is_labeled());

        let mismatched = VectorLayerDescription::new(vec![3], false).unwrap().with_labels(labels);
        assert!(!mismatched.is_labeled());

        let unlabeled = VectorLayerDescription::new(vec![2], false).unwrap();
        assert!(!unlabeled.is_labeled());
    }

    #[test]
    fn test_vector_shape_overflow_is_rejected() {
        let result = VectorLayerDescription::new(vec![i32::MAX, i32::MAX, i32::MAX], false);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_vector_serde_recomputes_length() {
        let description = VectorLayerDescription::new(vec![-1, 4], true)
            .unwrap()
            .with_quantizer(Quantizer::zero_to_one())
            .with_labels(vec!["a".into(), "b".into(), "c".into(), "d".into()]);

        let json = serde_json::to_string(&description).unwrap();
        assert!(!json.contains("length"));
        let restored: VectorLayerDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, description);

        let stale: VectorLayerDescription =
            serde_json::from_str(r#"{"shape":[4],"length":1,"quantized":false}"#).unwrap();
        assert_eq!(stale.length(), 4);
        assert_eq!(stale.byte_size(), 16);
    }

    #[test]
    fn test_vector_serde_rejects_overflowing_shape() {
        let result = serde_json::from_str::<VectorLayerDescription>(
            r#"{"shape":[2147483647,2147483647,2147483647],"quantized":true}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_pixel_buffer_serde_enforces_constructor_checks() {
        let four_channels = serde_json::from_str::<PixelBufferLayerDescription>(
            r#"{"width":1,"height":1,"channels":4,"format":"Rgb","quantized":true}"#,
        );
        assert!(four_channels.unwrap_err().to_string().contains("3 channels"));

        let empty = serde_json::from_str::<PixelBufferLayerDescription>(
            r#"{"width":0,"height":2,"channels":3,"quantized":true}"#,
        );
        assert!(empty.is_err());

        let description = PixelBufferLayerDescription::new(2, 3, 3, PixelFormat::Bgr, false)
            .unwrap()
            .with_normalizer(PixelNormalizer::negative_one_to_one());
        let json = serde_json::to_string(&LayerDescription::from(description.clone())).unwrap();
        let restored: LayerDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, LayerDescription::PixelBuffer(description));
    }

    #[test]
    fn test_data_type_display() {
        assert_eq!(DataType::UInt8.to_string(), "UInt8");
        assert_eq!(VectorLayerDescription::new(vec![1], false).unwrap().data_type().to_string(), "Float32");
    }

    #[test]
    fn test_pixel_buffer_size() {
        let description = PixelBufferLayerDescription::new(4, 2, 3, PixelFormat::Rgb, true).unwrap();
        assert_eq!(description.byte_size(), 24);

        let float = PixelBufferLayerDescription::new(4, 2, 3, PixelFormat::Rgb, false).unwrap();
        assert_eq!(float.byte_size(), 96);
    }

    #[test]
    fn test_pixel_buffer_rejects_channel_count() {
        let result = PixelBufferLayerDescription::new(4, 4, 4, PixelFormat::Rgb, true);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_pixel_format_order() {
        assert_eq!(PixelFormat::Rgb.channel_order(), [0, 1, 2]);
        assert_eq!(PixelFormat::Bgr.channel_order(), [2, 1, 0]);
    }

    #[test]
    fn test_interface_dispatch() {
        let interfaces = vec![
            LayerInterface::new("v", LayerMode::Input, VectorLayerDescription::new(vec![1], false).unwrap()),
            LayerInterface::new(
                "p",
                LayerMode::Input,
                PixelBufferLayerDescription::new(1, 1, 3, PixelFormat::Rgb, true).unwrap(),
            ),
            LayerInterface::new("s", LayerMode::Output, StringLayerDescription::new(8)),
        ];

        let kinds: Vec<&str> = interfaces
            .iter()
            .map(|interface| match interface.description() {
                LayerDescription::Vector(_) => "vector",
                LayerDescription::PixelBuffer(_) => "pixel",
                LayerDescription::String(_) => "string",
            })
            .collect();

        assert_eq!(kinds, vec!["vector", "pixel", "string"]);
        assert_eq!(interfaces[2].mode(), LayerMode::Output);
    }
}
