//! Benchmarks for the LF glottal source.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tract_dsp::dsp::glottis::{GlottalSource, GlottisTargets};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_glottis(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/glottis");

    for &size in BLOCK_SIZES {
        let block_time = size as f64 / SAMPLE_RATE;
        let step = 1.0 / size as f64;

        // Steady modal voice
        let mut glottis = GlottalSource::new(SAMPLE_RATE, block_time, 1);
        glottis.set_targets(&GlottisTargets {
            always_voice: true,
            ..GlottisTargets::default()
        });
        group.bench_with_input(BenchmarkId::new("voiced", size), &size, |b, &size| {
            b.iter(|| {
                let mut acc = 0.0;
                for j in 0..size {
                    acc += glottis.step(j as f64 * step, 0.0);
                }
                glottis.finish_block();
                black_box(acc)
            })
        });

        // Wobble adds simplex taps and the pitch glide every block
        let mut wobbly = GlottalSource::new(SAMPLE_RATE, block_time, 2);
        wobbly.set_targets(&GlottisTargets {
            always_voice: true,
            auto_wobble: true,
            ..GlottisTargets::default()
        });
        group.bench_with_input(BenchmarkId::new("wobble", size), &size, |b, &size| {
            b.iter(|| {
                let mut acc = 0.0;
                for j in 0..size {
                    acc += wobbly.step(j as f64 * step, 0.0);
                }
                wobbly.finish_block();
                black_box(acc)
            })
        });
    }

    group.finish();
}
