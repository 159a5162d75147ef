use tracing::{debug, warn};

use crate::{
    articulation::tongue::Tongue,
    config::SynthConfig,
    dsp::{glottis::GlottalSource, noise::NoiseSource, tract::TractWaveguide},
    error::Result,
    synth::{controls::ControlSnapshot, message::ControlReceiver},
    MAX_TRACT_SEGMENTS,
};

/// Seed offset so the jitter field and the white noise do not share a stream.
const JITTER_SEED_OFFSET: u64 = 0x9e37_79b9;

/// Owns the glottis, the tract and the noise source, and runs them block by
/// block.
///
/// Each output sample is one glottal step followed by two tract steps, half a
/// sample apart. After every block the slow parameters of both components are
/// re-derived.
pub struct Synthesizer {
    config: SynthConfig,
    glottis: GlottalSource,
    tract: TractWaveguide,
    noise: NoiseSource,
    gain: f64,

    // Streaming FIFO for hosts whose callback size differs from the block length
    pending: Vec<f32>,
    pending_pos: usize,
    blocks: u64,
}

impl Synthesizer {
    pub fn new(config: SynthConfig) -> Result<Self> {
        if let Err(err) = config.validate() {
            warn!(%err, "rejected synthesizer configuration");
            return Err(err);
        }

        let block_time = config.block_time();
        let glottis = GlottalSource::new(
            config.sample_rate,
            block_time,
            config.noise_seed.wrapping_add(JITTER_SEED_OFFSET),
        );
        let mut tract = TractWaveguide::new(config.tract_segments, config.sample_rate, block_time);

        let mut rest = [0.0; MAX_TRACT_SEGMENTS];
        let rest = &mut rest[..config.tract_segments];
        Tongue::default().write_rest_diameters(tract.layout(), rest);
        tract.set_rest_diameters(rest);

        debug!(
            sample_rate = config.sample_rate,
            block_length = config.block_length,
            segments = config.tract_segments,
            "synthesizer ready"
        );

        Ok(Self {
            noise: NoiseSource::new(config.sample_rate, config.noise_seed),
            gain: f64::from(config.output_gain),
            pending: vec![0.0; config.block_length],
            pending_pos: config.block_length,
            blocks: 0,
            glottis,
            tract,
            config,
        })
    }

    /// Apply a control snapshot. Out-of-range values are clamped first.
    pub fn apply_controls(&mut self, snapshot: &ControlSnapshot) {
        let snapshot = snapshot.sanitized();
        self.glottis.set_targets(&snapshot.glottis);
        self.tract.set_targets(
            snapshot.target_diameters(),
            snapshot.velum_target,
            snapshot.constrictions(),
        );
    }

    /// Drain `controls` and apply the newest snapshot, if any.
    pub fn poll_controls<R: ControlReceiver + ?Sized>(&mut self, controls: &mut R) {
        if let Some(snapshot) = controls.latest() {
            self.apply_controls(&snapshot);
        }
    }

    /// Render one block using caller-supplied noise. All three slices should
    /// have the same length; the shortest one sets the block size.
    pub fn render_block_with_noise(
        &mut self,
        aspirate: &[f64],
        fricative: &[f64],
        out: &mut [f32],
    ) {
        let len = out.len().min(aspirate.len()).min(fricative.len());
        let step = 1.0 / len as f64;
        for (j, sample) in out[..len].iter_mut().enumerate() {
            *sample = self.tick(j as f64 * step, 0.5 * step, aspirate[j], fricative[j]);
        }
        self.finish_block();
    }

    /// Render one block, drawing noise from the internal source.
    pub fn render_block(&mut self, out: &mut [f32]) {
        let step = 1.0 / out.len() as f64;
        for (j, sample) in out.iter_mut().enumerate() {
            let noise = self.noise.next_pair();
            *sample = self.tick(j as f64 * step, 0.5 * step, noise.aspirate, noise.fricative);
        }
        self.finish_block();
    }

    /// Fill `out` of any length, rendering fixed-size blocks internally and
    /// polling `controls` at each block boundary.
    pub fn process<R: ControlReceiver + ?Sized>(&mut self, out: &mut [f32], controls: &mut R) {
        let block_length = self.config.block_length;
        let mut written = 0;
        while written < out.len() {
            if self.pending_pos >= block_length {
                self.poll_controls(controls);
                let mut block = std::mem::take(&mut self.pending);
                self.render_block(&mut block[..block_length]);
                self.pending = block;
                self.pending_pos = 0;
            }

            let available = &self.pending[self.pending_pos..block_length];
            let n = available.len().min(out.len() - written);
            out[written..written + n].copy_from_slice(&available[..n]);
            self.pending_pos += n;
            written += n;
        }
    }

    #[inline]
    fn tick(&mut self, lambda: f64, half_step: f64, aspirate: f64, fricative: f64) -> f32 {
        let glottal = self.glottis.step(lambda, aspirate);

        self.tract.step(glottal, fricative, lambda, &self.glottis);
        let mut mix = self.tract.lip_output() + self.tract.nose_output();
        self.tract.step(glottal, fricative, lambda + half_step, &self.glottis);
        mix += self.tract.lip_output() + self.tract.nose_output();

        (mix * self.gain) as f32
    }

    fn finish_block(&mut self) {
        self.glottis.finish_block();
        self.tract.finish_block();
        self.blocks += 1;
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn glottis(&self) -> &GlottalSource {
        &self.glottis
    }

    pub fn tract(&self) -> &TractWaveguide {
        &self.tract
    }

    /// Blocks rendered so far.
    pub fn blocks(&self) -> u64 {
        self.blocks
    }

    /// Peak amplitude at the lips and at the nostrils.
    pub fn output_peaks(&self) -> (f64, f64) {
        let lips = self.tract.max_amplitude().last().copied().unwrap_or(0.0);
        let nose = self.tract.nose_max_amplitude().last().copied().unwrap_or(0.0);
        (lips, nose)
    }
}
