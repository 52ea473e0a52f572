//! Procedural rain-on-water ripples on a dense CPU grid.
//!
//! A fixed pool of drops drives a heightfield that is rebuilt every frame
//! from closed-form wave terms. An optional ink field persists between
//! frames, fading and diffusing. The shader turns both into packed ARGB
//! pixels. [`Simulation`] wires the stages together; the modules are public
//! for callers that want to drive them individually.

pub mod accumulate;
pub mod config;
pub mod constants;
pub mod error;
pub mod grid;
pub mod ink;
pub mod raindrop;
pub mod rng;
pub mod shade;
pub mod sim;
pub mod world;

pub use accumulate::{
    accumulate, accumulate_full_scan, accumulate_par_rows, sample_cell, Accumulation,
    HeightfieldAccumulator, InkInjection,
};
pub use config::{Palette, RippleConfig};
pub use error::{ConfigError, FrameError};
pub use grid::Grid;
pub use ink::{InkChannels, InkPostProcessor};
pub use raindrop::{cell_jitter, ripple_contrib, Raindrop, WaveParams};
pub use rng::RandomSource;
pub use shade::{FrameBuffer, PixelTarget, ShadeOutcome, ShadeParams, Shader, SurfaceView};
pub use sim::{Simulation, StepTimings};
pub use world::World;
