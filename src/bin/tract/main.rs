//! tract - articulatory voice synthesizer in the terminal
//!
//! Run with: cargo run -- play
//!       or: cargo run -- render voice.wav --seconds 2

mod app;
mod render;
mod ui;

use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tract", version, about = "Articulatory voice synthesizer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play live through the default output device with a terminal UI
    Play(PlayArgs),
    /// Render a fixed articulation to a WAV file
    Render(RenderArgs),
}

#[derive(Args)]
pub struct PlayArgs {
    /// Waveguide segments in the oral tract
    #[arg(long, default_value_t = tract_dsp::REFERENCE_TRACT_SEGMENTS)]
    pub segments: usize,
    /// Log file (the terminal is taken by the UI)
    #[arg(long, default_value = "tract.log")]
    pub log_file: PathBuf,
}

#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV path
    pub output: PathBuf,
    #[arg(long, default_value_t = 2.0)]
    pub seconds: f64,
    #[arg(long, default_value_t = 48_000.0)]
    pub sample_rate: f64,
    /// Fundamental in Hz
    #[arg(long, default_value_t = 140.0)]
    pub frequency: f64,
    /// Voice quality, 0 = breathy, 1 = pressed
    #[arg(long, default_value_t = 0.6)]
    pub tenseness: f64,
    #[arg(long, default_value_t = tract_dsp::articulation::tongue::DEFAULT_TONGUE_INDEX)]
    pub tongue_index: f64,
    #[arg(long, default_value_t = tract_dsp::articulation::tongue::DEFAULT_TONGUE_DIAMETER)]
    pub tongue_diameter: f64,
    /// Hold a constriction at INDEX,DIAMETER for the whole render
    #[arg(long, value_parser = parse_point)]
    pub constriction: Option<(f64, f64)>,
    /// Open the velum for a nasal voice
    #[arg(long)]
    pub nasal: bool,
    #[arg(long)]
    pub wobble: bool,
    #[arg(long)]
    pub seed: Option<u64>,
}

fn parse_point(s: &str) -> Result<(f64, f64), String> {
    let (index, diameter) = s
        .split_once(',')
        .ok_or_else(|| format!("expected INDEX,DIAMETER, got {s:?}"))?;
    let index = index.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let diameter = diameter.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok((index, diameter))
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    match cli.command {
        Command::Play(args) => {
            let log = File::create(&args.log_file)
                .wrap_err_with(|| format!("failed to create {}", args.log_file.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(Mutex::new(log))
                .with_ansi(false)
                .init();
            app::run(&args)
        }
        Command::Render(args) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .init();
            render::run(&args)
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}
