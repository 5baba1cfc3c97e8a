//! Running a model through an opaque backend
//!
//! A [`Model`] owns an [`IoIndex`], a [`Backend`] and one backing buffer
//! per layer. Each call converts application values into those buffers,
//! hands them to the backend and converts the outputs back. Buffers are
//! allocated once and reused, so a model must not run concurrently with
//! itself; `run` takes `&mut self` to enforce that.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::buffer::Buffer;
use crate::convert::{self, VectorConverter};
use crate::error::{Error, Result};
use crate::index::{IoIndex, LayerList};
use crate::layer::LayerDescription;
use crate::value::Value;

/// Executes a compiled model over raw buffers
pub trait Backend {
    /// Run one pass
    ///
    /// `inputs` holds the model's input buffers followed by its placeholder
    /// buffers, each in declaration order. `outputs` holds the output
    /// buffers in declaration order.
    fn run(&mut self, inputs: &[Buffer], outputs: &mut [Buffer]) -> anyhow::Result<()>;
}

/// A loaded model ready for inference
pub struct Model<B: Backend> {
    index: IoIndex,
    backend: B,
    /// Input buffers followed by placeholder buffers
    input_buffers: Vec<Buffer>,
    output_buffers: Vec<Buffer>,
}

impl<B: Backend> Model<B> {
    /// Create a model and allocate its backing buffers
    pub fn new(index: IoIndex, backend: B) -> Self {
        let input_buffers: Vec<Buffer> = index
            .inputs()
            .iter()
            .chain(index.placeholders())
            .map(|interface| convert::create_backing_buffer(interface.description()))
            .collect();

        let output_buffers: Vec<Buffer> = index
            .outputs()
            .iter()
            .map(|interface| convert::create_backing_buffer(interface.description()))
            .collect();

        debug!(
            inputs = index.inputs().len(),
            outputs = index.outputs().len(),
            placeholders = index.placeholders().len(),
            "created model"
        );

        Self {
            index,
            backend,
            input_buffers,
            output_buffers,
        }
    }

    /// The model's layers
    pub fn index(&self) -> &IoIndex {
        &self.index
    }

    /// The backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The backend, mutably
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Run inference
    ///
    /// Every declared input must be supplied. Placeholders are optional;
    /// an omitted placeholder is passed to the backend zero-filled. Labeled
    /// vector outputs come back as [`Value::Labeled`].
    pub fn run(
        &mut self,
        inputs: &HashMap<String, Value>,
        placeholders: &HashMap<String, Value>,
    ) -> Result<HashMap<String, Value>> {
        check_known(inputs, self.index.inputs())?;
        check_known(placeholders, self.index.placeholders())?;

        let (input_buffers, placeholder_buffers) =
            self.input_buffers.split_at_mut(self.index.inputs().len());

        for (interface, buffer) in self.index.inputs().iter().zip(input_buffers.iter_mut()) {
            let value = inputs
                .get(interface.name())
                .ok_or_else(|| Error::NotFound(interface.name().to_string()))?;
            convert::write_buffer(value, interface.description(), buffer)?;
        }

        for (interface, buffer) in self
            .index
            .placeholders()
            .iter()
            .zip(placeholder_buffers.iter_mut())
        {
            match placeholders.get(interface.name()) {
                Some(value) => convert::write_buffer(value, interface.description(), buffer)?,
                None => buffer.as_bytes_mut().fill(0),
            }
        }

        trace!("running backend");
        self.backend
            .run(&self.input_buffers, &mut self.output_buffers)
            .map_err(Error::Backend)?;

        let mut results = HashMap::with_capacity(self.output_buffers.len());
        for (interface, buffer) in self.index.outputs().iter().zip(self.output_buffers.iter_mut()) {
            let value = match interface.description() {
                LayerDescription::Vector(description) if description.is_labeled() => {
                    let values = VectorConverter.read_f32(buffer, description)?;
                    label(description.labels().unwrap_or_default(), values)
                }
                description => convert::from_buffer(buffer, description)?,
            };
            results.insert(interface.name().to_string(), value);
        }

        Ok(results)
    }

    /// Run inference on a model with exactly one input
    pub fn run_single(&mut self, value: Value) -> Result<HashMap<String, Value>> {
        let name = match self.index.inputs().len() {
            1 => self.index.inputs()[0].name().to_string(),
            n => {
                return Err(Error::InvalidArgument(format!(
                    "run_single requires a model with one input, this model has {n}"
                )))
            }
        };

        let inputs = HashMap::from([(name, value)]);
        self.run(&inputs, &HashMap::new())
    }
}

/// Pair each label with the value at the same position
fn label(labels: &[String], values: Vec<f32>) -> Value {
    Value::Labeled(labels.iter().cloned().zip(values).collect())
}

fn check_known(values: &HashMap<String, Value>, layers: &LayerList) -> Result<()> {
    match values.keys().find(|name| !layers.contains(name)) {
        Some(name) => Err(Error::NotFound(name.clone())),
        None => Ok(()),
    }
}
