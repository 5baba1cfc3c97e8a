//! Model I/O contract and data marshalling for on-device inference
//!
//! This crate describes a model's inputs, outputs and placeholders, converts
//! application data (float and byte vectors, images, byte strings) to and
//! from the flat buffers an inference backend consumes, and stores labeled
//! training examples in column-oriented batches.
//!
//! The inference engine itself is opaque: see [`model::Backend`].

#![warn(missing_docs)]

pub mod batch;
pub mod buffer;
pub mod convert;
pub mod error;
pub mod index;
pub mod layer;
pub mod model;
pub mod source;
pub mod transform;
pub mod value;

// Re-export key types for convenience
pub use batch::{Batch, BatchItem};
pub use buffer::Buffer;
pub use convert::{Converter, PixelBufferConverter, StringConverter, VectorConverter};
pub use error::{Error, Result};
pub use index::{IoIndex, LayerList};
pub use layer::{
    DataType, LayerDescription, LayerInterface, LayerMode, PixelBufferLayerDescription,
    PixelFormat, StringLayerDescription, VectorLayerDescription,
};
pub use model::{Backend, Model};
pub use source::{BatchDataSource, InMemoryDataSource};
pub use transform::{ChannelBias, Dequantizer, PixelDenormalizer, PixelNormalizer, Quantizer};
pub use value::Value;
