//! The physical voice model and its numeric building blocks.
//!
//! Everything here runs on the audio thread. Buffers are sized when a
//! component is built and never grow afterwards, so `step` and `finish_block`
//! are allocation-free and safe to call from a realtime callback.

/// Band-pass pre-filters for the noise inputs.
pub mod filter;
/// Glottal excitation source.
pub mod glottis;
/// Liljencrants-Fant pulse shape.
pub mod lf;
pub mod math;
/// Seeded white noise split into aspiration and frication bands.
pub mod noise;
pub mod simplex;
/// Branching digital waveguide for the oral and nasal tracts.
pub mod tract;
/// Fixed-capacity pool of plosive bursts.
pub mod transient;

pub use glottis::{GlottalSource, GlottisTargets};
pub use noise::{NoisePair, NoiseSource};
pub use tract::{Constriction, TractLayout, TractWaveguide};
