//! Glottal excitation: an LF pulse train with jitter, vibrato and breath.
//!
//! The source runs at the output sample rate. Pitch and tenseness arrive as
//! slow targets, are eased and jittered once per block in
//! [`GlottalSource::finish_block`], and are then interpolated across the next
//! block with the `lambda` passed to [`GlottalSource::step`]. Shape parameters
//! only change at cycle boundaries so a pulse is never cut mid-way.

use std::f64::consts::TAU;

use super::{lf::LfShape, math::lerp, simplex::SimplexNoise};

pub const DEFAULT_FREQUENCY: f64 = 140.0;
pub const DEFAULT_TENSENESS: f64 = 0.6;

const VIBRATO_AMOUNT: f64 = 0.005;
const VIBRATO_FREQUENCY: f64 = 6.0;
/// Per-block multiplicative step of the pitch glide.
const GLIDE_RATIO: f64 = 1.1;
const INTENSITY_ATTACK: f64 = 0.13;
const INTENSITY_RELEASE_RATE: f64 = 5.0;
/// Floor of the noise envelope when the folds are not vibrating.
const UNVOICED_NOISE_LEVEL: f64 = 0.3;

/// Control-rate inputs of the glottis, written by the pitch control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlottisTargets {
    /// Target fundamental in Hz.
    pub frequency: f64,
    /// 0 = breathy, 1 = pressed.
    pub tenseness: f64,
    pub loudness: f64,
    /// The pitch control itself is held.
    pub is_touched: bool,
    /// Any control anywhere is held.
    pub is_touching_somewhere: bool,
    /// Keep voicing with no input at all.
    pub always_voice: bool,
    /// Add a slow, wide pitch wander on top of the natural jitter.
    pub auto_wobble: bool,
}

impl Default for GlottisTargets {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_FREQUENCY,
            tenseness: DEFAULT_TENSENESS,
            loudness: 1.0,
            is_touched: false,
            is_touching_somewhere: false,
            always_voice: false,
            auto_wobble: false,
        }
    }
}

impl GlottisTargets {
    fn is_voicing(&self) -> bool {
        self.is_touched || self.always_voice || self.is_touching_somewhere
    }
}

pub struct GlottalSource {
    time_step: f64,
    block_time: f64,

    // Phase accumulators
    time_in_waveform: f64,
    total_time: f64,
    waveform_length: f64,
    frequency: f64,

    // Block-rate double buffers, interpolated by lambda
    old_frequency: f64,
    new_frequency: f64,
    smooth_frequency: f64,
    old_tenseness: f64,
    new_tenseness: f64,

    targets: GlottisTargets,
    intensity: f64,

    shape: LfShape,
    jitter: SimplexNoise,

    cycles: u64,
    degenerate_cycles: u64,
}

impl GlottalSource {
    pub fn new(sample_rate: f64, block_time: f64, seed: u64) -> Self {
        let targets = GlottisTargets::default();
        let mut source = Self {
            time_step: 1.0 / sample_rate,
            block_time,
            time_in_waveform: 0.0,
            total_time: 0.0,
            waveform_length: 1.0 / targets.frequency,
            frequency: targets.frequency,
            old_frequency: targets.frequency,
            new_frequency: targets.frequency,
            smooth_frequency: targets.frequency,
            old_tenseness: targets.tenseness,
            new_tenseness: targets.tenseness,
            targets,
            intensity: 0.0,
            shape: LfShape::from_tenseness(targets.tenseness),
            jitter: SimplexNoise::new(seed),
            cycles: 0,
            degenerate_cycles: 0,
        };
        source.setup_waveform(0.0);
        source
    }

    /// Replace the control targets. Takes effect at the next block boundary,
    /// except that a silent source jumps straight to the new pitch instead of
    /// gliding into it.
    pub fn set_targets(&mut self, targets: &GlottisTargets) {
        self.targets = *targets;
        if self.intensity == 0.0 {
            self.smooth_frequency = targets.frequency;
        }
    }

    /// Produce one excitation sample.
    ///
    /// `lambda` in [0, 1] is the position inside the current block and
    /// selects the blend between the previous and current block's pitch and
    /// tenseness when a new cycle starts.
    pub fn step(&mut self, lambda: f64, noise_sample: f64) -> f64 {
        self.time_in_waveform += self.time_step;
        self.total_time += self.time_step;
        if self.time_in_waveform >= self.waveform_length {
            self.time_in_waveform -= self.waveform_length;
            self.setup_waveform(lambda);
        }

        let mut out = self.normalized_lf_waveform(self.time_in_waveform / self.waveform_length);

        let mut aspiration = self.intensity
            * (1.0 - self.targets.tenseness.sqrt())
            * self.noise_modulator()
            * noise_sample;
        aspiration *= 0.2 + 0.02 * self.jitter.sample1(self.total_time * 1.99);
        out += aspiration;
        out
    }

    /// Envelope for all noise sources: pulses with the glottal cycle while
    /// voicing, flat otherwise.
    pub fn noise_modulator(&self) -> f64 {
        let phase = TAU * self.time_in_waveform / self.waveform_length;
        let voiced = 0.1 + 0.2 * phase.sin().max(0.0);
        let voicing = self.targets.tenseness * self.intensity;
        voicing * voiced + (1.0 - voicing) * UNVOICED_NOISE_LEVEL
    }

    /// Block-rate update: jitter, glide, buffer rotation and intensity.
    pub fn finish_block(&mut self) {
        let t = self.total_time;
        let mut vibrato = VIBRATO_AMOUNT * (TAU * t * VIBRATO_FREQUENCY).sin();
        vibrato += 0.02 * self.jitter.sample1(t * 4.07);
        vibrato += 0.04 * self.jitter.sample1(t * 2.15);
        if self.targets.auto_wobble {
            vibrato += 0.2 * self.jitter.sample1(t * 0.98);
            vibrato += 0.4 * self.jitter.sample1(t * 0.5);
        }

        let target = self.targets.frequency;
        if target > self.smooth_frequency {
            self.smooth_frequency = (self.smooth_frequency * GLIDE_RATIO).min(target);
        }
        if target < self.smooth_frequency {
            self.smooth_frequency = (self.smooth_frequency / GLIDE_RATIO).max(target);
        }

        self.old_frequency = self.new_frequency;
        self.new_frequency = self.smooth_frequency * (1.0 + vibrato);

        let ui_tenseness = self.targets.tenseness;
        self.old_tenseness = self.new_tenseness;
        self.new_tenseness = ui_tenseness
            + 0.1 * self.jitter.sample1(t * 0.46)
            + 0.05 * self.jitter.sample1(t * 0.36);
        // Untouched but voicing: hold the folds pressed until intensity is up
        if !self.targets.is_touched
            && (self.targets.always_voice || self.targets.is_touching_somewhere)
        {
            self.new_tenseness += (3.0 - ui_tenseness) * (1.0 - self.intensity);
        }

        if self.targets.is_voicing() {
            self.intensity += INTENSITY_ATTACK;
        } else {
            self.intensity -= self.block_time * INTENSITY_RELEASE_RATE;
        }
        self.intensity = self.intensity.clamp(0.0, 1.0);
    }

    /// Start a new cycle: settle frequency and tenseness for it and derive
    /// the LF shape.
    fn setup_waveform(&mut self, lambda: f64) {
        self.frequency = lerp(self.old_frequency, self.new_frequency, lambda);
        let tenseness = lerp(self.old_tenseness, self.new_tenseness, lambda);
        self.waveform_length = 1.0 / self.frequency;
        if self.time_in_waveform >= self.waveform_length {
            self.time_in_waveform %= self.waveform_length;
        }

        let shape = LfShape::from_tenseness(tenseness);
        debug_assert!(shape.is_finite(), "degenerate LF shape: {shape:?}");
        if shape.is_finite() {
            self.shape = shape;
        } else {
            self.degenerate_cycles += 1;
        }
        self.cycles += 1;
    }

    /// LF waveform at normalized time `t`, scaled by intensity and loudness.
    pub fn normalized_lf_waveform(&self, t: f64) -> f64 {
        self.shape.evaluate(t) * self.intensity * self.targets.loudness
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Frequency of the cycle currently playing.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn smooth_frequency(&self) -> f64 {
        self.smooth_frequency
    }

    pub fn waveform_length(&self) -> f64 {
        self.waveform_length
    }

    pub fn time_in_waveform(&self) -> f64 {
        self.time_in_waveform
    }

    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn shape(&self) -> &LfShape {
        &self.shape
    }

    pub fn targets(&self) -> &GlottisTargets {
        &self.targets
    }

    /// Number of cycles started, including the one seeded at construction.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Cycles whose derived shape was non-finite and kept the previous one.
    pub fn degenerate_cycles(&self) -> u64 {
        self.degenerate_cycles
    }
}
