//! Epoch and batch driven training loop

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, trace};

use tensorio_core::{Batch, BatchDataSource, Result};

use crate::config::TrainerConfig;
use crate::model::{Placeholders, TrainableModel, TrainingResults};

/// Statistics from a training run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingStats {
    /// Number of epochs that ran to completion
    pub epochs_completed: usize,

    /// Number of training calls that succeeded
    pub batches_processed: usize,

    /// Number of items fed to the model, counting repeats across epochs
    pub items_processed: usize,

    /// Total execution time
    pub elapsed: Duration,
}

/// Feeds batches from a data source through a trainable model
///
/// Item order is fixed for the whole run. With shuffling enabled the order
/// is permuted once before the first epoch and every epoch reuses it.
pub struct ModelTrainer<'a, M: ?Sized, S: ?Sized> {
    model: &'a mut M,
    source: &'a S,
    placeholders: Placeholders,
    config: TrainerConfig,
    stats: TrainingStats,
}

impl<'a, M, S> ModelTrainer<'a, M, S>
where
    M: TrainableModel + ?Sized,
    S: BatchDataSource + ?Sized,
{
    /// Create a trainer
    pub fn new(model: &'a mut M, source: &'a S, config: TrainerConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            model,
            source,
            placeholders: Placeholders::new(),
            config,
            stats: TrainingStats::default(),
        })
    }

    /// Set the placeholder values passed with every training call
    #[must_use]
    pub fn with_placeholders(mut self, placeholders: Placeholders) -> Self {
        self.placeholders = placeholders;
        self
    }

    /// The configuration driving this trainer
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Statistics from the most recent run
    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    /// Number of training calls per epoch
    pub fn batch_count(&self) -> usize {
        self.source.size().div_ceil(self.config.batch_size)
    }

    /// Train for every epoch and return the results of the last call
    ///
    /// Returns an empty map when the data source is empty.
    pub fn train(&mut self) -> Result<TrainingResults> {
        self.run(|_, _| {})
    }

    /// Train for every epoch, passing the latest results to `on_epoch` after each one
    pub fn train_with_callback<F>(&mut self, on_epoch: F) -> Result<TrainingResults>
    where
        F: FnMut(usize, &TrainingResults),
    {
        self.run(on_epoch)
    }

    fn run<F>(&mut self, mut on_epoch: F) -> Result<TrainingResults>
    where
        F: FnMut(usize, &TrainingResults),
    {
        let start_time = Instant::now();
        self.stats = TrainingStats::default();

        let size = self.source.size();
        let batch_size = self.config.batch_size;
        let batch_count = self.batch_count();
        let order = self.item_order();

        debug!(
            size,
            batch_size,
            batch_count,
            epochs = self.config.epochs,
            shuffle = self.config.shuffle,
            "starting training"
        );

        let mut results = TrainingResults::new();

        for epoch in 0..self.config.epochs {
            for batch_index in 0..batch_count {
                let start = batch_index * batch_size;
                let end = (start + batch_size).min(size);

                let mut batch = Batch::new(self.source.keys().iter().cloned());
                for &index in &order[start..end] {
                    batch.add(self.source.get(index)?)?;
                }

                trace!(epoch, batch_index, rows = batch.len(), "training batch");
                results = self.model.train_batch(&batch, &self.placeholders)?;

                self.stats.batches_processed += 1;
                self.stats.items_processed += batch.len();
            }

            self.stats.epochs_completed += 1;
            self.stats.elapsed = start_time.elapsed();
            info!(epoch, batches = batch_count, "epoch complete");

            on_epoch(epoch, &results);
        }

        self.stats.elapsed = start_time.elapsed();
        Ok(results)
    }

    fn item_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.source.size()).collect();

        if self.config.shuffle {
            let mut rng = match self.config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            order.shuffle(&mut rng);
        }

        order
    }
}
