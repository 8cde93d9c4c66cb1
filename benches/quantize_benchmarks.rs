//! Benchmarks for the per-frame quantizer and container assembly.
//!
//! Run with: cargo bench
//!
//! All inputs are synthetic, so no fixture files are required.

use criterion::Criterion;
use image::{Rgba, RgbaImage};
use reloop::{GifAssembler, quantize};

/// Deterministic pseudo-noise frame (xorshift, no RNG dependency).
fn noise_frame(width: u32, height: u32) -> RgbaImage {
    let mut state = 0x2545_f491u32;
    RgbaImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, _] = state.to_le_bytes();
        Rgba([r, g, b, 255])
    })
}

fn benchmark_quantize(criterion: &mut Criterion) {
    let frame = noise_frame(400, 224);

    criterion.bench_function("quantize 400x224 noise, 256 colors", |bencher| {
        bencher.iter(|| quantize(&frame, 256, 10, 100));
    });

    criterion.bench_function("quantize 400x224 noise, 64 colors", |bencher| {
        bencher.iter(|| quantize(&frame, 64, 10, 100));
    });

    criterion.bench_function("quantize 400x224 noise, fastest sampling", |bencher| {
        bencher.iter(|| quantize(&frame, 256, 30, 100));
    });
}

fn benchmark_assembly(criterion: &mut Criterion) {
    let frames: Vec<_> = (0..10)
        .map(|_| quantize(&noise_frame(400, 224), 256, 10, 100))
        .collect();

    criterion.bench_function("assemble 10-frame container", |bencher| {
        bencher.iter(|| {
            let mut assembler = GifAssembler::in_memory(400, 224, None).unwrap();
            for frame in &frames {
                assembler.push(frame).unwrap();
            }
            assembler.finish().unwrap()
        });
    });
}

criterion::criterion_group!(benches, benchmark_quantize, benchmark_assembly);
criterion::criterion_main!(benches);
