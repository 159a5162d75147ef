//! Whole-synthesizer benchmarks.
//!
//! These drive the synthesizer the way the binary does: a control snapshot
//! from the articulator, then block after block of audio.

mod synth;

pub use synth::bench_synth;
