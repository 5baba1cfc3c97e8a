//! The trainable model seam

use std::collections::HashMap;

use tensorio_core::{Batch, Result, Value};

/// Named values produced by one training call, such as the loss
pub type TrainingResults = HashMap<String, Value>;

/// Named values set before each training call, such as a learning rate
pub type Placeholders = HashMap<String, Value>;

/// A model that can be trained one batch at a time
///
/// Failures should be reported as [`tensorio_core::Error::Backend`]; the
/// trainer stops at the first one.
#[cfg_attr(test, mockall::automock)]
pub trait TrainableModel {
    /// Train on one batch and return the step's results
    fn train_batch(&mut self, batch: &Batch, placeholders: &Placeholders) -> Result<TrainingResults>;
}
