pub mod articulation; // Tongue, constriction and pitch controls (control thread)
pub mod config;
pub mod dsp;
pub mod error;
pub mod io;
pub mod synth; // Block orchestration and control snapshots

pub use config::SynthConfig;
pub use error::{Error, Result};
pub use synth::{controls::ControlSnapshot, synthesizer::Synthesizer};

pub const MAX_BLOCK_SIZE: usize = 2048;

/// Segment count of the reference tract all landmark positions are scaled from.
pub const REFERENCE_TRACT_SEGMENTS: usize = 44;
pub const MIN_TRACT_SEGMENTS: usize = 30;
pub const MAX_TRACT_SEGMENTS: usize = 128;

/// Upper bound on simultaneous constrictions carried by a control snapshot.
pub const MAX_CONSTRICTIONS: usize = 8;
