//! Training loop for models fed from TensorIO batch data sources
//!
//! A [`ModelTrainer`] walks a [`tensorio_core::BatchDataSource`] in fixed-size
//! batches for a configured number of epochs, handing each batch to a
//! [`TrainableModel`].

#![warn(missing_docs)]

pub mod config;
pub mod model;
pub mod trainer;

pub use config::TrainerConfig;
pub use model::{Placeholders, TrainableModel, TrainingResults};
pub use trainer::{ModelTrainer, TrainingStats};
