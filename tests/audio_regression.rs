use rustfft::{num_complex::Complex, FftPlanner};
use tract_dsp::{
    articulation::Articulator, dsp::tract::Constriction, io::render, synth::message::NoControls,
    SynthConfig, Synthesizer,
};

const SAMPLE_RATE: f64 = 48_000.0;
const WELCH_FRAME: usize = 8192;

fn rms(samples: &[f32]) -> f64 {
    let sum: f64 = samples.iter().map(|&x| f64::from(x) * f64::from(x)).sum();
    (sum / samples.len().max(1) as f64).sqrt()
}

/// Strongest frequency between `min_hz` and `max_hz`, from Hann-windowed
/// frames with averaged power.
fn welch_peak(signal: &[f32], min_hz: f64, max_hz: f64) -> f64 {
    let fft = FftPlanner::<f64>::new().plan_fft_forward(WELCH_FRAME);
    let window: Vec<f64> = (0..WELCH_FRAME)
        .map(|i| {
            0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / (WELCH_FRAME - 1) as f64).cos())
        })
        .collect();

    let mut power = vec![0.0; WELCH_FRAME / 2];
    let mut buffer = vec![Complex::new(0.0, 0.0); WELCH_FRAME];
    for frame in signal.chunks_exact(WELCH_FRAME) {
        for ((bin, &x), &w) in buffer.iter_mut().zip(frame).zip(&window) {
            *bin = Complex::new(f64::from(x) * w, 0.0);
        }
        fft.process(&mut buffer);
        for (p, bin) in power.iter_mut().zip(&buffer) {
            *p += bin.norm_sqr();
        }
    }

    let bin_hz = SAMPLE_RATE / WELCH_FRAME as f64;
    let lo = (min_hz / bin_hz).ceil() as usize;
    let hi = (max_hz / bin_hz) as usize;
    let peak = (lo..hi)
        .max_by(|&a, &b| power[a].total_cmp(&power[b]))
        .unwrap_or(lo);
    peak as f64 * bin_hz
}

fn voiced_synth(seed: u64) -> (Synthesizer, Articulator) {
    let config = SynthConfig::default().with_seed(seed);
    let mut synth = Synthesizer::new(config).unwrap();
    let mut articulator = Articulator::new(44);
    articulator.always_voice = true;
    synth.apply_controls(&articulator.snapshot());
    (synth, articulator)
}

#[test]
fn sustained_vowel_sounds_at_its_pitch() {
    let (mut synth, _) = voiced_synth(1);
    let out = render(&mut synth, 2.0, &mut NoControls);

    assert!(out.iter().all(|s| s.is_finite() && s.abs() <= 0.5));

    let settled = &out[(0.5 * SAMPLE_RATE) as usize..];
    let level = rms(settled);
    assert!(level > 0.01, "voiced rms too low: {level}");

    let peak = welch_peak(settled, 50.0, 1000.0);
    assert!(
        (peak - 140.0).abs() / 140.0 < 0.06,
        "dominant frequency {peak} Hz, expected about 140 Hz"
    );
}

#[test]
fn voice_dies_away_when_voicing_stops() {
    let (mut synth, mut articulator) = voiced_synth(2);
    let block_length = synth.config().block_length;
    let mut block = vec![0.0f32; block_length];

    let voiced_blocks = (0.5 * SAMPLE_RATE / block_length as f64).ceil() as usize;
    for _ in 0..voiced_blocks {
        synth.render_block(&mut block);
    }
    assert_eq!(synth.glottis().intensity(), 1.0);

    articulator.always_voice = false;
    synth.apply_controls(&articulator.snapshot());

    let block_time = synth.config().block_time();
    let limit = (1.0 / (block_time * 5.0)).ceil() as usize;
    let mut blocks = 0;
    while synth.glottis().intensity() > 0.0 {
        synth.render_block(&mut block);
        blocks += 1;
        assert!(
            blocks <= limit,
            "intensity still {} after {blocks} blocks",
            synth.glottis().intensity()
        );
    }

    let tail = render(&mut synth, 0.5, &mut NoControls);
    let level = rms(&tail[tail.len() / 2..]);
    assert!(level < 1e-3, "silence rms too high: {level}");
}

#[test]
fn held_constriction_adds_frication() {
    // Same seed and shape; only the turbulence gain of the constriction differs
    let render_constriction = |fricative: bool| {
        let (mut synth, mut articulator) = voiced_synth(3);
        articulator.always_voice = false;
        articulator.press(1, 36.0, 0.5, 0.0);
        articulator.update(0.5);

        let mut snapshot = articulator.snapshot();
        assert!(snapshot.constrictions().iter().any(|c| c.fricative_intensity > 0.0));
        if !fricative {
            let silent: Vec<Constriction> = snapshot
                .constrictions()
                .iter()
                .map(|c| Constriction { fricative_intensity: 0.0, ..*c })
                .collect();
            snapshot.set_constrictions(&silent);
        }
        synth.apply_controls(&snapshot);
        render(&mut synth, 1.0, &mut NoControls)
    };

    let fricated = render_constriction(true);
    let plain = render_constriction(false);
    for out in [&fricated, &plain] {
        assert!(out.iter().all(|s| s.is_finite() && s.abs() <= 0.5));
    }

    let half = fricated.len() / 2;
    let difference: Vec<f32> = fricated[half..]
        .iter()
        .zip(&plain[half..])
        .map(|(a, b)| a - b)
        .collect();
    let level = rms(&difference);
    assert!(level > 1e-5, "frication rms {level}");
}

#[test]
fn renders_are_reproducible_per_seed() {
    let (mut a, _) = voiced_synth(9);
    let (mut b, _) = voiced_synth(9);
    let (mut c, _) = voiced_synth(10);

    let out_a = render(&mut a, 0.5, &mut NoControls);
    let out_b = render(&mut b, 0.5, &mut NoControls);
    let out_c = render(&mut c, 0.5, &mut NoControls);

    assert_eq!(out_a, out_b);
    assert_ne!(out_a, out_c);
}
