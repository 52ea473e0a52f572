//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rain_ripples::{Accumulation, ConfigError, Palette, RippleConfig};

#[derive(Parser, Debug)]
#[command(name = "ripples")]
#[command(about = "Rain falling on water, shaded on the CPU", long_about = None)]
pub struct Args {
    /// Canvas width in pixels (>= 640)
    #[arg(short = 'w', long, default_value_t = 800)]
    pub width: u32,

    /// Canvas height in pixels (>= 480)
    #[arg(short = 'H', long, default_value_t = 600)]
    pub height: u32,

    /// Number of simultaneously active drops
    #[arg(short = 'n', long = "n", alias = "N", value_name = "COUNT", default_value_t = 5)]
    pub drops: usize,

    /// RNG seed; -1 seeds from system entropy
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub seed: i64,

    /// Normal slope amplification (0.1..40)
    #[arg(long, default_value_t = 6.0)]
    pub slope: f32,

    /// Colour model: aqua, mix (aquamix) or real
    #[arg(long, default_value = "aqua")]
    pub palette: Palette,

    /// Inject and diffuse coloured ink along wavefronts
    #[arg(long)]
    pub ink: bool,

    /// Ink injected per frame (0..3)
    #[arg(long, default_value_t = 0.6)]
    pub ink_gain: f32,

    /// Ink fading rate in 1/s (0..5)
    #[arg(long, default_value_t = 0.8)]
    pub ink_decay: f32,

    /// Blend towards the blurred ink each frame (0..1)
    #[arg(long, default_value_t = 0.25)]
    pub ink_blur: f32,

    /// Weight of ink in the final colour (0..2)
    #[arg(long, default_value_t = 0.9)]
    pub ink_strength: f32,

    /// Respawn rate multiplier; divides drop lifetimes (0.1..10)
    #[arg(long, default_value_t = 1.0)]
    pub spawn_rate: f32,

    /// Heightfield accumulation scheduling
    #[arg(long, value_enum, default_value_t = AccumulationArg::Parallel)]
    pub accumulation: AccumulationArg,

    /// Log smoothed FPS once per second
    #[arg(long)]
    pub fpslog: bool,

    /// Present without waiting for vertical sync
    #[arg(long)]
    pub novsync: bool,

    /// Log per-stage frame timings
    #[arg(long)]
    pub profile: bool,

    /// Render headless for this many seconds and write PNG frames
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Output directory for recorded frames
    #[arg(long, value_name = "DIR", default_value = "frames")]
    pub out: PathBuf,

    /// Simulation rate for recording
    #[arg(long, default_value_t = 60)]
    pub fps: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AccumulationArg {
    Sequential,
    Parallel,
}

impl From<AccumulationArg> for Accumulation {
    fn from(arg: AccumulationArg) -> Self {
        match arg {
            AccumulationArg::Sequential => Accumulation::Sequential,
            AccumulationArg::Parallel => Accumulation::RowParallel,
        }
    }
}

impl Args {
    /// Core configuration, validated.
    pub fn ripple_config(&self) -> Result<RippleConfig, ConfigError> {
        let config = RippleConfig {
            width: self.width,
            height: self.height,
            drops: self.drops,
            seed: self.seed,
            slope: self.slope,
            palette: self.palette,
            ink: self.ink,
            ink_gain: self.ink_gain,
            ink_decay: self.ink_decay,
            ink_blur: self.ink_blur,
            ink_strength: self.ink_strength,
            spawn_rate: self.spawn_rate,
        };
        config.validate()?;
        Ok(config)
    }
}
