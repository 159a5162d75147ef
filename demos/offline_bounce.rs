//! Bounce a short scripted utterance to `bounce.wav`: a vowel glide from
//! "ah" to "ee", a lip closure released as a burst, then "oo".

use std::path::Path;

use tract_dsp::{articulation::Articulator, io::write_wav, SynthConfig, Synthesizer};

/// (time in seconds, tongue index, tongue diameter)
const TONGUE_PATH: [(f64, f64, f64); 4] = [
    (0.0, 12.9, 2.43), // ah
    (0.8, 27.0, 2.2),  // ee
    (1.4, 27.0, 2.2),
    (2.0, 20.0, 3.0), // oo
];
const LIP_TOUCH: u32 = 1;

fn tongue_at(time: f64) -> (f64, f64) {
    for pair in TONGUE_PATH.windows(2) {
        let (t0, i0, d0) = pair[0];
        let (t1, i1, d1) = pair[1];
        if time <= t1 {
            let x = ((time - t0) / (t1 - t0)).clamp(0.0, 1.0);
            return (i0 + (i1 - i0) * x, d0 + (d1 - d0) * x);
        }
    }
    let (_, i, d) = TONGUE_PATH[TONGUE_PATH.len() - 1];
    (i, d)
}

fn main() -> tract_dsp::Result<()> {
    let config = SynthConfig::default().with_block_length(512);
    let mut synth = Synthesizer::new(config.clone())?;
    let mut articulator = Articulator::new(config.tract_segments);
    articulator.always_voice = true;

    let seconds = 2.5;
    let block_time = config.block_time();
    let mut out = vec![0.0f32; (seconds * config.sample_rate) as usize];

    for (k, chunk) in out.chunks_mut(config.block_length).enumerate() {
        let time = k as f64 * block_time;

        let (index, diameter) = tongue_at(time);
        articulator.set_tongue(index, diameter);
        if (1.45..1.5).contains(&time) && articulator.touches().is_empty() {
            articulator.press(LIP_TOUCH, 41.0, 0.0, time);
        }
        if time >= 1.6 {
            articulator.release(LIP_TOUCH, time);
        }
        articulator.update(time);

        synth.apply_controls(&articulator.snapshot());
        synth.render_block(chunk);
    }

    let peak = out.iter().fold(0.0f32, |a, &b| a.max(b.abs()));
    write_wav(&out, Path::new("bounce.wav"), config.sample_rate as u32)?;
    println!("Rendered {} samples to bounce.wav (peak {:.3})", out.len(), peak);
    Ok(())
}
