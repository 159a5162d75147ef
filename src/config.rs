//! Construction-time configuration for a [`Synthesizer`](crate::Synthesizer).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    MAX_BLOCK_SIZE, MAX_TRACT_SEGMENTS, MIN_TRACT_SEGMENTS, REFERENCE_TRACT_SEGMENTS,
};

/// Fixed parameters of a synthesis session.
///
/// Everything here is decided once, before the audio thread starts. Runtime
/// controls (pitch, tongue, constrictions) travel separately as
/// [`ControlSnapshot`](crate::ControlSnapshot)s.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    /// Output sample rate in Hz. The tract runs at twice this rate.
    pub sample_rate: f64,
    /// Samples per block. Slow-rate parameters are re-derived once per block.
    pub block_length: usize,
    /// Number of waveguide segments in the oral tract.
    pub tract_segments: usize,
    /// Seed for the white noise source and the simplex jitter tables.
    pub noise_seed: u64,
    /// Final attenuation applied to the summed lip and nose outputs.
    pub output_gain: f32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            block_length: MAX_BLOCK_SIZE,
            tract_segments: REFERENCE_TRACT_SEGMENTS,
            noise_seed: 0x5eed_7ac7,
            output_gain: 0.125,
        }
    }
}

impl SynthConfig {
    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_block_length(mut self, block_length: usize) -> Self {
        self.block_length = block_length;
        self
    }

    pub fn with_tract_segments(mut self, segments: usize) -> Self {
        self.tract_segments = segments;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.noise_seed = seed;
        self
    }

    /// Seconds covered by one block.
    pub fn block_time(&self) -> f64 {
        self.block_length as f64 / self.sample_rate
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(Error::InvalidSampleRate(self.sample_rate));
        }
        if self.block_length == 0 || self.block_length > MAX_BLOCK_SIZE {
            return Err(Error::InvalidBlockLength {
                got: self.block_length,
                max: MAX_BLOCK_SIZE,
            });
        }
        if !(MIN_TRACT_SEGMENTS..=MAX_TRACT_SEGMENTS).contains(&self.tract_segments) {
            return Err(Error::InvalidSegmentCount {
                got: self.tract_segments,
                min: MIN_TRACT_SEGMENTS,
                max: MAX_TRACT_SEGMENTS,
            });
        }
        if !self.output_gain.is_finite() {
            return Err(Error::InvalidOutputGain(self.output_gain));
        }
        Ok(())
    }
}
