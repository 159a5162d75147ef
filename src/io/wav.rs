//! Offline rendering to WAV files.
//!
//! Lets a voice be auditioned without an audio device: the synthesizer is run
//! block by block and written as 32-bit float mono.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::info;

use crate::{error::Result, synth::message::ControlReceiver, Synthesizer};

fn wav_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    }
}

/// Run `synth` for `seconds`, polling `controls` at every block boundary.
pub fn render<R: ControlReceiver + ?Sized>(
    synth: &mut Synthesizer,
    seconds: f64,
    controls: &mut R,
) -> Vec<f32> {
    let frames = (seconds.max(0.0) * synth.config().sample_rate).round() as usize;
    let mut out = vec![0.0_f32; frames];
    for chunk in out.chunks_mut(synth.config().block_length) {
        synth.process(chunk, controls);
    }
    out
}

pub fn write_wav(samples: &[f32], path: &Path, sample_rate: u32) -> Result<()> {
    let mut writer = WavWriter::create(path, wav_spec(sample_rate))?;
    for &s in samples {
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Render `seconds` of audio from `synth` straight into a WAV file. Returns
/// the number of frames written.
pub fn render_to_wav<R: ControlReceiver + ?Sized>(
    synth: &mut Synthesizer,
    seconds: f64,
    controls: &mut R,
    path: &Path,
) -> Result<usize> {
    let samples = render(synth, seconds, controls);
    let sample_rate = synth.config().sample_rate.round() as u32;
    write_wav(&samples, path, sample_rate)?;

    let peak = samples.iter().fold(0.0_f32, |a, &b| a.max(b.abs()));
    info!(path = %path.display(), frames = samples.len(), peak, "rendered wav");
    Ok(samples.len())
}

/// Read a mono float WAV back, as written by [`write_wav`].
pub fn read_wav(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut reader = WavReader::open(path)?;
    let sample_rate = reader.spec().sample_rate;
    let samples = reader.samples::<f32>().collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((samples, sample_rate))
}
