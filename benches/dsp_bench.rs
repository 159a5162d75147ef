//! Benchmarks for the voice model components and the full render loop.
//!
//! Run with: cargo bench
//!
//! Every output sample costs one glottal step and two tract steps, so the
//! tract dominates. These numbers should stay far inside the real-time
//! deadline for each block size.
//!
//! Reference timing at 48kHz sample rate:
//!   - 64 samples   = 1.33ms deadline
//!   - 256 samples  = 5.33ms deadline
//!   - 512 samples  = 10.67ms deadline
//!   - 2048 samples = 42.67ms deadline
//!
//! Benchmark groups:
//!   - dsp/*        Glottis, tract waveguide and noise in isolation
//!   - scenarios/*  Whole synthesizer blocks under typical articulations

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Block sizes worth tracking: small host callbacks up to the default block.
pub const BLOCK_SIZES: &[usize] = &[64, 256, 512, 2048];

pub const SAMPLE_RATE: f64 = 48_000.0;

criterion_group!(
    benches,
    dsp::bench_glottis,
    dsp::bench_tract,
    dsp::bench_noise,
    scenarios::bench_synth,
);
criterion_main!(benches);
