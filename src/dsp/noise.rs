//! White noise feeding the aspiration and frication inputs.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::filter::BandPass;

/// One sample of each pre-filtered noise input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NoisePair {
    /// Band-passed around 500 Hz, mixed into the glottal source.
    pub aspirate: f64,
    /// Band-passed around 1 kHz, injected at tract constrictions.
    pub fricative: f64,
}

/// A shared white noise generator split through the two band-pass filters.
///
/// Both outputs are filtered from the same white sample, so aspiration and
/// frication stay correlated the way a single breath source would be.
pub struct NoiseSource {
    rng: Pcg32,
    aspirate: BandPass,
    fricative: BandPass,
}

impl NoiseSource {
    pub fn new(sample_rate: f64, seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            aspirate: BandPass::aspiration(sample_rate),
            fricative: BandPass::frication(sample_rate),
        }
    }

    /// Zero-mean white sample with unit peak-to-peak range.
    #[inline]
    fn white(&mut self) -> f64 {
        self.rng.gen::<f64>() - 0.5
    }

    #[inline]
    pub fn next_pair(&mut self) -> NoisePair {
        let white = self.white();
        NoisePair {
            aspirate: self.aspirate.next_sample(white),
            fricative: self.fricative.next_sample(white),
        }
    }

    /// Fill both buffers with one block of noise. Extra length in the longer
    /// buffer is left untouched.
    pub fn fill(&mut self, aspirate: &mut [f64], fricative: &mut [f64]) {
        for (a, f) in aspirate.iter_mut().zip(fricative.iter_mut()) {
            let pair = self.next_pair();
            *a = pair.aspirate;
            *f = pair.fricative;
        }
    }
}
