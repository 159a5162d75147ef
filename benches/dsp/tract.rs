//! Benchmarks for the tract and nose waveguide.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tract_dsp::dsp::{
    glottis::GlottalSource,
    tract::{Constriction, TractWaveguide},
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_tract(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/tract");

    for &size in BLOCK_SIZES {
        let block_time = size as f64 / SAMPLE_RATE;
        let step = 1.0 / size as f64;
        let glottis = GlottalSource::new(SAMPLE_RATE, block_time, 1);
        let excitation: Vec<f64> = (0..size).map(|i| ((i % 64) as f64 / 32.0) - 1.0).collect();

        for segments in [44, 128] {
            let mut tract = TractWaveguide::new(segments, SAMPLE_RATE, block_time);
            let id = format!("open_{segments}");
            group.bench_with_input(BenchmarkId::new(id, size), &size, |b, _| {
                b.iter(|| {
                    for (j, &x) in excitation.iter().enumerate() {
                        tract.step(black_box(x), 0.0, j as f64 * step, &glottis);
                    }
                    tract.finish_block();
                    black_box(tract.lip_output())
                })
            });
        }

        // Constriction with turbulence injection every step
        let mut tract = TractWaveguide::new(44, SAMPLE_RATE, block_time);
        let targets = tract.rest_diameters().to_vec();
        let constriction = Constriction {
            index: 30.0,
            diameter: 0.5,
            fricative_intensity: 1.0,
        };
        tract.set_targets(&targets, 0.01, &[constriction]);
        group.bench_with_input(BenchmarkId::new("fricative", size), &size, |b, _| {
            b.iter(|| {
                for (j, &x) in excitation.iter().enumerate() {
                    tract.step(black_box(x), x, j as f64 * step, &glottis);
                }
                tract.finish_block();
                black_box(tract.lip_output())
            })
        });
    }

    group.finish();
}
