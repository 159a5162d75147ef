//! Benchmarks for the filtered noise pair.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tract_dsp::dsp::noise::NoiseSource;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/noise");

    for &size in BLOCK_SIZES {
        let mut noise = NoiseSource::new(SAMPLE_RATE, 7);
        let mut aspirate = vec![0.0; size];
        let mut fricative = vec![0.0; size];
        group.bench_with_input(BenchmarkId::new("fill", size), &size, |b, _| {
            b.iter(|| {
                noise.fill(black_box(&mut aspirate), black_box(&mut fricative));
            })
        });
    }

    group.finish();
}
