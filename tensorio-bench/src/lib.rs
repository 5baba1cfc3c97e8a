//! Benchmarks for TensorIO conversion and training components

use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use tracing::debug;

use tensorio_core::{
    convert, Batch, InMemoryDataSource, LayerDescription, PixelBufferLayerDescription,
    PixelFormat, PixelNormalizer, Quantizer, Value, VectorLayerDescription,
};
use tensorio_train::{ModelTrainer, Placeholders, TrainableModel, TrainerConfig, TrainingResults};

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Number of timed iterations
    pub iterations: usize,

    /// Warmup iterations
    pub warmup_iterations: usize,

    /// Elements in the benchmarked vector layer
    pub vector_length: usize,

    /// Edge length of the benchmarked square image layer
    pub image_size: u32,

    /// Items in the benchmarked data source
    pub items: usize,

    /// Items per training batch
    pub batch_size: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            warmup_iterations: 3,
            vector_length: 1001,
            image_size: 224,
            items: 1000,
            batch_size: 32,
        }
    }
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchResult {
    /// Name of the benchmark
    pub name: String,

    /// Total time taken
    pub total_time: Duration,

    /// Average time per iteration
    pub avg_time: Duration,

    /// Min time per iteration
    pub min_time: Duration,

    /// Max time per iteration
    pub max_time: Duration,

    /// Throughput in units of work per second
    pub throughput: f64,
}

/// Run `func` repeatedly and time it
///
/// `units` is the amount of work one call does, used for throughput.
pub fn run_benchmark<F>(name: &str, config: &BenchConfig, units: usize, mut func: F) -> Result<BenchResult>
where
    F: FnMut() -> tensorio_core::Result<()>,
{
    for _ in 0..config.warmup_iterations {
        func().with_context(|| format!("{name} failed during warmup"))?;
    }

    let mut times = Vec::with_capacity(config.iterations);
    let start_total = Instant::now();

    for _ in 0..config.iterations {
        let start = Instant::now();
        func().with_context(|| format!("{name} failed"))?;
        times.push(start.elapsed());
    }

    let total_time = start_total.elapsed();

    let min_time = times.iter().min().copied().unwrap_or_default();
    let max_time = times.iter().max().copied().unwrap_or_default();
    let avg_time = u32::try_from(times.len())
        .ok()
        .filter(|&count| count > 0)
        .map(|count| times.iter().sum::<Duration>() / count)
        .unwrap_or_default();

    let total_units = config.iterations * units;
    let throughput = total_units as f64 / total_time.as_secs_f64().max(f64::EPSILON);

    debug!(name, ?avg_time, throughput, "benchmark finished");

    Ok(BenchResult {
        name: name.to_string(),
        total_time,
        avg_time,
        min_time,
        max_time,
        throughput,
    })
}

/// Quantize a float vector into a reused byte buffer and dequantize it back
pub fn bench_vector_conversion(config: &BenchConfig) -> Result<BenchResult> {
    let length = i32::try_from(config.vector_length).context("vector length overflows i32")?;
    let description: LayerDescription = VectorLayerDescription::new(vec![length], true)?
        .with_quantizer(Quantizer::zero_to_one())
        .with_dequantizer(tensorio_core::Dequantizer::zero_to_one())
        .into();

    let value = Value::Float32(
        (0..config.vector_length)
            .map(|i| (i % 256) as f32 / 255.0)
            .collect(),
    );

    let mut buffer = convert::create_backing_buffer(&description);
    run_benchmark("Vector Conversion", config, config.vector_length, || {
        convert::write_buffer(&value, &description, &mut buffer)?;
        convert::from_buffer(&mut buffer, &description)?;
        Ok(())
    })
}

/// Resize and normalize an image into a float buffer and read it back
pub fn bench_pixel_conversion(config: &BenchConfig) -> Result<BenchResult> {
    let size = config.image_size;
    let description: LayerDescription =
        PixelBufferLayerDescription::new(size, size, 3, PixelFormat::Bgr, false)?
            .with_normalizer(PixelNormalizer::negative_one_to_one())
            .with_denormalizer(tensorio_core::PixelDenormalizer::negative_one_to_one())
            .into();

    let image = RgbaImage::from_fn(size * 2, size * 2, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    });
    let value = Value::Image(image);

    let pixels = size as usize * size as usize;
    let mut buffer = convert::create_backing_buffer(&description);
    run_benchmark("Pixel Conversion", config, pixels, || {
        convert::write_buffer(&value, &description, &mut buffer)?;
        convert::from_buffer(&mut buffer, &description)?;
        Ok(())
    })
}

/// A model that does no work, so batch assembly dominates the timing
struct NoopModel;

impl TrainableModel for NoopModel {
    fn train_batch(
        &mut self,
        batch: &Batch,
        _placeholders: &Placeholders,
    ) -> tensorio_core::Result<TrainingResults> {
        Ok(HashMap::from([("rows".to_string(), Value::Scalar(batch.len() as f64))]))
    }
}

/// Assemble shuffled batches from an in-memory source for one epoch
pub fn bench_batch_assembly(config: &BenchConfig) -> Result<BenchResult> {
    let mut batch = Batch::new(["features", "label"]);
    for i in 0..config.items {
        batch.add(HashMap::from([
            ("features".to_string(), Value::Float32(vec![i as f32; 16])),
            ("label".to_string(), Value::Scalar((i % 10) as f64)),
        ]))?;
    }
    let source = InMemoryDataSource::new(batch);

    let trainer_config = TrainerConfig {
        epochs: 1,
        batch_size: config.batch_size,
        shuffle: true,
        seed: Some(0),
    };

    let mut model = NoopModel;
    run_benchmark("Batch Assembly", config, config.items, || {
        ModelTrainer::new(&mut model, &source, trainer_config.clone())?.train()?;
        Ok(())
    })
}

/// Run every benchmark with one configuration
pub fn run_all(config: &BenchConfig) -> Result<Vec<BenchResult>> {
    Ok(vec![
        bench_vector_conversion(config)?,
        bench_pixel_conversion(config)?,
        bench_batch_assembly(config)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> BenchConfig {
        BenchConfig {
            iterations: 2,
            warmup_iterations: 1,
            vector_length: 16,
            image_size: 8,
            items: 10,
            batch_size: 3,
        }
    }

    #[test]
    fn test_run_all() {
        let results = run_all(&quick()).unwrap();
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Vector Conversion", "Pixel Conversion", "Batch Assembly"]);
        assert!(results.iter().all(|r| r.min_time <= r.max_time));
    }

    #[test]
    fn test_failure_is_reported() {
        let result = run_benchmark("Broken", &quick(), 1, || {
            Err(tensorio_core::Error::InvalidArgument("nope".into()))
        });
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("Broken failed during warmup"));
    }
}
