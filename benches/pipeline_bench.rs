//! Benchmarks for the effect stages and the full pipeline.
//!
//! Run with: cargo bench
//!
//! These measure per-block cost to confirm the engine sits comfortably
//! inside real-time audio deadlines.
//!
//! Reference timing at 48kHz sample rate:
//!   - 64 samples  = 1.33ms deadline
//!   - 128 samples = 2.67ms deadline
//!   - 256 samples = 5.33ms deadline
//!   - 512 samples = 10.67ms deadline

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use deckfx::fx::filter::FilterStage;
use deckfx::fx::flanger::Flanger;
use deckfx::fx::varispeed::Varispeed;
use deckfx::fx::BlockCtx;
use deckfx::{Engine, EngineConfig, Interpolation};

/// Common buffer sizes used in audio applications.
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

fn saw(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
        .collect()
}

fn bench_varispeed(c: &mut Criterion) {
    let mut group = c.benchmark_group("fx/varispeed");

    for &size in BLOCK_SIZES {
        let input = saw(size);

        for (name, interp) in [("linear", Interpolation::Linear), ("cubic", Interpolation::Cubic)] {
            let mut vs = Varispeed::new(interp);
            vs.prepare(1 << 16).unwrap();
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    vs.render(black_box(&mut buffer), black_box(1.2599));
                })
            });
        }
    }
    group.finish();
}

fn bench_flanger(c: &mut Criterion) {
    let mut group = c.benchmark_group("fx/flanger");
    let ctx = BlockCtx { sample_rate: 48_000.0 };

    for &size in BLOCK_SIZES {
        let input = saw(size);
        let mut flanger = Flanger::new();
        flanger.prepare(48_000.0).unwrap();
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("enabled", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                flanger.render(black_box(&mut buffer), &ctx, true, 0.8, 1.0);
            })
        });
    }
    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("fx/filter");
    let ctx = BlockCtx { sample_rate: 48_000.0 };

    for &size in BLOCK_SIZES {
        let input = saw(size);
        let mut stage = FilterStage::new();
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                let _ = stage.render(black_box(&mut buffer), black_box(&ctx), 1_000.0, 2.0);
            })
        });
    }
    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/process_block");

    for &size in BLOCK_SIZES {
        let input = saw(size);

        let mut engine = Engine::new(EngineConfig::default());
        engine.prepare().unwrap();
        engine.set_pitch_bend(3.0);
        engine.set_flanger_enabled(true);
        engine.set_filter_cutoff(1_200.0);
        engine.set_filter_resonance(3.0);
        engine.set_volume(0.8);

        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("all_stages", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                engine.process_block(black_box(&mut buffer), black_box(48_000.0));
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_varispeed,
    bench_flanger,
    bench_filter,
    bench_full_pipeline,
);
criterion_main!(benches);
