use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{Rgba, RgbaImage};
use tensorio_core::{
    convert, Batch, Dequantizer, LayerDescription, PixelBufferLayerDescription, PixelFormat,
    PixelNormalizer, Quantizer, Value, VectorLayerDescription,
};

fn vector_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("vector");

    for length in [10, 1001, 100_000] {
        let description: LayerDescription = VectorLayerDescription::new(vec![length], true).unwrap()
            .with_quantizer(Quantizer::zero_to_one())
            .with_dequantizer(Dequantizer::zero_to_one())
            .into();
        let value = Value::Float32((0..length).map(|i| (i % 256) as f32 / 255.0).collect());
        let mut buffer = convert::create_backing_buffer(&description);

        group.bench_with_input(BenchmarkId::new("quantize_roundtrip", length), &value, |b, value| {
            b.iter(|| {
                convert::write_buffer(black_box(value), &description, &mut buffer).unwrap();
                convert::from_buffer(&mut buffer, &description).unwrap()
            });
        });
    }

    group.finish();
}

fn pixel_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("pixel");

    for size in [64u32, 224] {
        let description: LayerDescription =
            PixelBufferLayerDescription::new(size, size, 3, PixelFormat::Rgb, false)
                .unwrap()
                .with_normalizer(PixelNormalizer::zero_to_one())
                .into();

        let same = Value::Image(RgbaImage::from_pixel(size, size, Rgba([10, 20, 30, 255])));
        let larger = Value::Image(RgbaImage::from_pixel(size * 2, size * 2, Rgba([10, 20, 30, 255])));
        let mut buffer = convert::create_backing_buffer(&description);

        group.bench_with_input(BenchmarkId::new("normalize", size), &same, |b, value| {
            b.iter(|| {
                convert::write_buffer(black_box(value), &description, &mut buffer).unwrap();
            });
        });

        group.bench_with_input(BenchmarkId::new("resize_normalize", size), &larger, |b, value| {
            b.iter(|| {
                convert::write_buffer(black_box(value), &description, &mut buffer).unwrap();
            });
        });
    }

    group.finish();
}

fn batch_assembly(c: &mut Criterion) {
    let items: Vec<_> = (0..256)
        .map(|i| {
            HashMap::from([
                ("features".to_string(), Value::Float32(vec![i as f32; 16])),
                ("label".to_string(), Value::Scalar(f64::from(i % 10))),
            ])
        })
        .collect();

    c.bench_function("batch_from_items_256", |b| {
        b.iter(|| Batch::from_items(black_box(items.clone())).unwrap());
    });
}

criterion_group!(benches, vector_conversion, pixel_conversion, batch_assembly);
criterion_main!(benches);
