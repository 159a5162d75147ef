//! Live playback: audio device setup and the realtime callback

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;
use tracing::{error, info};

use tract_dsp::{
    synth::message::ControlPublisher, SynthConfig, Synthesizer, MAX_BLOCK_SIZE,
};

use super::{
    ui::{state::AudioStatus, UiApp},
    PlayArgs,
};

/// Samples kept in flight for the oscilloscope and spectrum
const SCOPE_RING_SIZE: usize = 16_384;
const CONTROL_RING_SIZE: usize = 16;
const STATUS_RING_SIZE: usize = 8;

pub fn run(args: &PlayArgs) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let supported = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = supported.sample_rate().0 as f64;
    let channels = supported.channels() as usize;
    // Smaller blocks keep control latency low on a live device
    let config = SynthConfig::default()
        .with_sample_rate(sample_rate)
        .with_block_length(512)
        .with_tract_segments(args.segments);
    let mut synth = Synthesizer::new(config.clone()).wrap_err("invalid synthesizer configuration")?;
    info!(sample_rate, channels, segments = args.segments, "opening output stream");

    let (publisher, mut control_rx) = ControlPublisher::channel(CONTROL_RING_SIZE);
    let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_RING_SIZE);
    let (mut status_tx, status_rx) = RingBuffer::<AudioStatus>::new(STATUS_RING_SIZE);

    let mut mono = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device.build_output_stream(
        &supported.into(),
        move |data: &mut [f32], _| {
            let total_frames = data.len() / channels;
            let mut frames_written = 0;

            while frames_written < total_frames {
                let frames = (total_frames - frames_written).min(mono.len());
                let block = &mut mono[..frames];
                synth.process(block, &mut control_rx);

                // Copy to output (mono to all channels)
                let out_off = frames_written * channels;
                for (i, &s) in block.iter().enumerate() {
                    let frame = &mut data[out_off + i * channels..out_off + (i + 1) * channels];
                    frame.fill(s);
                    // Scope drops samples when the UI falls behind
                    let _ = scope_tx.push(s);
                }
                frames_written += frames;
            }

            let _ = status_tx.push(AudioStatus::capture(&synth));
        },
        |err| error!(%err, "audio stream error"),
        None,
    )?;

    stream.play().wrap_err("failed to start output stream")?;

    let mut terminal = ratatui::init();
    let result = UiApp::new(config, publisher, scope_rx, status_rx).run(&mut terminal);
    ratatui::restore();
    drop(stream);
    result
}
