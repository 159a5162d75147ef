//! Benchmarks for the voice model components.

mod glottis;
mod noise;
mod tract;

pub use glottis::bench_glottis;
pub use noise::bench_noise;
pub use tract::bench_tract;
