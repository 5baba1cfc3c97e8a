//! Benchmark runner for TensorIO components

use anyhow::Result;
use tensorio_bench::{run_all, BenchConfig, BenchResult};
use tracing_subscriber::EnvFilter;

fn print_result(result: &BenchResult) {
    println!("\nBenchmark: {}", result.name);
    println!("  Total time:   {:?}", result.total_time);
    println!("  Average time: {:?}", result.avg_time);
    println!("  Min time:     {:?}", result.min_time);
    println!("  Max time:     {:?}", result.max_time);
    println!("  Throughput:   {:.2} units/sec", result.throughput);
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("=== TensorIO Benchmarks ===");

    for result in run_all(&BenchConfig::default())? {
        print_result(&result);
    }

    println!("\n=== Image Size Scaling ===");
    for image_size in [64, 128, 224, 512] {
        let config = BenchConfig {
            iterations: 3,
            warmup_iterations: 1,
            image_size,
            ..BenchConfig::default()
        };

        let result = tensorio_bench::bench_pixel_conversion(&config)?;
        println!("\nImage: {image_size}x{image_size}");
        println!("  Average time: {:?}", result.avg_time);
        println!("  Throughput:   {:.2} pixels/sec", result.throughput);
    }

    println!("\n=== Batch Size Scaling ===");
    for batch_size in [1, 8, 32, 128] {
        let config = BenchConfig {
            iterations: 3,
            warmup_iterations: 1,
            batch_size,
            ..BenchConfig::default()
        };

        let result = tensorio_bench::bench_batch_assembly(&config)?;
        println!("\nBatch size: {batch_size}");
        println!("  Average time: {:?}", result.avg_time);
        println!("  Throughput:   {:.2} items/sec", result.throughput);
    }

    Ok(())
}
