//! Shared state types for UI communication
//!
//! Sent from the audio thread once per callback, so everything here is Copy
//! and allocation-free.

use tract_dsp::{Synthesizer, MAX_TRACT_SEGMENTS};

/// Snapshot of the running model for display
#[derive(Clone, Copy, Debug)]
pub struct AudioStatus {
    /// Frequency of the glottal cycle currently playing (Hz)
    pub frequency: f64,
    pub intensity: f64,
    /// Tenseness target after sanitizing
    pub tenseness: f64,
    pub lip_peak: f64,
    pub nose_peak: f64,
    /// Live oral tract diameters (first `segments` entries are valid)
    pub diameters: [f64; MAX_TRACT_SEGMENTS],
    pub segments: usize,
    /// Current velum opening
    pub velum: f64,
    pub transients: usize,
    pub blocks: u64,
}

impl Default for AudioStatus {
    fn default() -> Self {
        Self {
            frequency: 0.0,
            intensity: 0.0,
            tenseness: 0.0,
            lip_peak: 0.0,
            nose_peak: 0.0,
            diameters: [0.0; MAX_TRACT_SEGMENTS],
            segments: 0,
            velum: 0.0,
            transients: 0,
            blocks: 0,
        }
    }
}

impl AudioStatus {
    pub fn capture(synth: &Synthesizer) -> Self {
        let glottis = synth.glottis();
        let tract = synth.tract();
        let (lip_peak, nose_peak) = synth.output_peaks();

        let mut diameters = [0.0; MAX_TRACT_SEGMENTS];
        let live = tract.diameters();
        let segments = live.len().min(MAX_TRACT_SEGMENTS);
        diameters[..segments].copy_from_slice(&live[..segments]);

        Self {
            frequency: glottis.frequency(),
            intensity: glottis.intensity(),
            tenseness: glottis.targets().tenseness,
            lip_peak,
            nose_peak,
            diameters,
            segments,
            velum: tract.nose_diameters().first().copied().unwrap_or(0.0),
            transients: tract.transients().len(),
            blocks: synth.blocks(),
        }
    }

    pub fn diameters(&self) -> &[f64] {
        &self.diameters[..self.segments]
    }
}
