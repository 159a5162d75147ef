use thiserror::Error;

/// Errors reported while building or driving a synthesizer outside the audio thread.
///
/// Nothing on the per-sample or per-block path returns an error: the physical
/// model guards itself numerically (see `dsp::tract` and `dsp::glottis`).
#[derive(Debug, Error)]
pub enum Error {
    #[error("sample rate must be positive and finite, got {0}")]
    InvalidSampleRate(f64),

    #[error("block length must be in 1..={max}, got {got}")]
    InvalidBlockLength { got: usize, max: usize },

    #[error("tract segment count must be in {min}..={max}, got {got}")]
    InvalidSegmentCount { got: usize, min: usize, max: usize },

    #[error("output gain must be finite, got {0}")]
    InvalidOutputGain(f32),

    #[error("wav i/o failed: {0}")]
    Wav(#[from] hound::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
