//! Offline rendering of a held articulation

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing::info;

use tract_dsp::{
    articulation::{pitch::BASE_NOTE, Articulator},
    io::render_to_wav,
    synth::message::NoControls,
    SynthConfig, Synthesizer,
};

use super::RenderArgs;

/// Touch ids for the held constriction and the nasal opening.
const CONSTRICTION_TOUCH: u32 = 1;
const NASAL_TOUCH: u32 = 2;

pub fn run(args: &RenderArgs) -> EyreResult<()> {
    let mut config = SynthConfig::default().with_sample_rate(args.sample_rate);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let mut synth = Synthesizer::new(config.clone()).wrap_err("invalid render configuration")?;

    let mut articulator = Articulator::new(config.tract_segments);
    articulator.always_voice = true;
    articulator.auto_wobble = args.wobble;
    articulator.set_tongue(args.tongue_index, args.tongue_diameter);

    let semitone = 12.0 * (args.frequency.max(1.0) / BASE_NOTE).log2();
    let vertical = (1.0 - args.tenseness.clamp(0.0, 1.0)).acos() / std::f64::consts::FRAC_PI_2;
    articulator.pitch_mut().set(semitone, vertical);

    if let Some((index, diameter)) = args.constriction {
        articulator.press(CONSTRICTION_TOUCH, index, diameter, 0.0);
    }
    if args.nasal {
        let layout = *articulator.layout();
        articulator.press(NASAL_TOUCH, (layout.nose_start + 4) as f64, -1.0, 0.0);
    }
    // Let the touch envelopes settle before the snapshot is taken
    articulator.update(1.0);

    let mut snapshot = articulator.snapshot();
    // The pitch control spans a limited range; the CLI may go beyond it
    snapshot.glottis.frequency = args.frequency;
    snapshot.glottis.tenseness = args.tenseness;
    synth.apply_controls(&snapshot);

    let frames = render_to_wav(&mut synth, args.seconds, &mut NoControls, &args.output)
        .wrap_err_with(|| format!("failed to render {}", args.output.display()))?;
    info!(frames, "render finished");
    eprintln!("wrote {} ({} frames)", args.output.display(), frames);
    Ok(())
}
