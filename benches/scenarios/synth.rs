//! Benchmarks for complete synthesizer blocks.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tract_dsp::{articulation::Articulator, SynthConfig, Synthesizer};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn synth_for(size: usize, articulator: &Articulator) -> Synthesizer {
    let config = SynthConfig::default()
        .with_sample_rate(SAMPLE_RATE)
        .with_block_length(size);
    let mut synth = Synthesizer::new(config).expect("bench config is valid");
    synth.apply_controls(&articulator.snapshot());
    synth
}

pub fn bench_synth(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/synth");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === VOWEL ===
        // Sustained "ah" at the resting pitch
        let mut vowel = Articulator::new(44);
        vowel.always_voice = true;
        let mut synth = synth_for(size, &vowel);
        group.bench_with_input(BenchmarkId::new("vowel", size), &size, |b, _| {
            b.iter(|| synth.render_block(black_box(&mut buffer)))
        });

        // === FRICATIVE ===
        // Voiced "z": narrowing near the teeth feeds turbulence every sample
        let mut fricative = Articulator::new(44);
        fricative.always_voice = true;
        fricative.press(1, 36.0, 0.5, 0.0);
        fricative.update(0.5);
        let mut synth = synth_for(size, &fricative);
        group.bench_with_input(BenchmarkId::new("fricative", size), &size, |b, _| {
            b.iter(|| synth.render_block(black_box(&mut buffer)))
        });

        // === NASAL ===
        // Open velum drives the nose branch
        let mut nasal = Articulator::new(44);
        nasal.always_voice = true;
        nasal.press(1, 41.0, -1.0, 0.0);
        nasal.update(0.5);
        let mut synth = synth_for(size, &nasal);
        group.bench_with_input(BenchmarkId::new("nasal", size), &size, |b, _| {
            b.iter(|| synth.render_block(black_box(&mut buffer)))
        });
    }

    group.finish();
}
