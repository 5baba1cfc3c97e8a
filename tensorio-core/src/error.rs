//! Error types for model I/O and data marshalling

use thiserror::Error;

/// Result type for TensorIO operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for TensorIO operations
#[derive(Error, Debug)]
pub enum Error {
    /// A batch item's key set differs from the batch's key set
    #[error("Invalid batch item keys: expected {expected:?}, got {given:?}")]
    InvalidKeys {
        /// Keys declared by the batch
        expected: Vec<String>,
        /// Keys carried by the rejected item
        given: Vec<String>,
    },

    /// Supplied data does not match the layer's declared shape
    #[error("Length mismatch: expected {expected}, got {given}")]
    LengthMismatch {
        /// Length declared by the layer
        expected: usize,
        /// Length of the supplied data
        given: usize,
    },

    /// A quantized input layer was used without a quantizer
    #[error("Quantized layer requires a quantizer to convert float input")]
    MissingQuantizer,

    /// A quantized output layer was read as floats without a dequantizer
    #[error("Quantized layer requires a dequantizer to produce float output")]
    MissingDequantizer,

    /// The supplied value is not of a type the converter understands
    #[error("Unsupported type: expected {expected}, got {given}")]
    UnsupportedType {
        /// Type the converter accepts
        expected: &'static str,
        /// Type that was supplied
        given: &'static str,
    },

    /// No layer with the given name exists
    #[error("Layer not found: {0}")]
    NotFound(String),

    /// Two layers in one collection share a name
    #[error("Duplicate layer name: {0}")]
    DuplicateLayerName(String),

    /// Index out of bounds
    #[error("Index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Number of valid entries
        len: usize,
    },

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Failure raised by the inference or training backend
    #[error("Backend failure: {0}")]
    Backend(#[source] anyhow::Error),
}
