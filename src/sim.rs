//! One frame of the pipeline: respawn, accumulate, ink, shade.

use std::time::{Duration, Instant};

use crate::accumulate::{Accumulation, HeightfieldAccumulator, InkInjection};
use crate::config::RippleConfig;
use crate::error::ConfigError;
use crate::ink::InkPostProcessor;
use crate::shade::{FrameBuffer, PixelTarget, ShadeOutcome, ShadeParams, Shader};
use crate::world::World;

/// Wall-clock cost of each stage of one [`Simulation::step`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StepTimings {
    /// Drops recycled this frame
    pub respawned: usize,
    /// Respawn plus heightfield accumulation
    pub accumulate: Duration,
    pub ink: Duration,
    pub shade: Duration,
    pub outcome: Option<ShadeOutcome>,
}

impl StepTimings {
    /// Everything except shading.
    pub fn simulate(&self) -> Duration {
        self.accumulate + self.ink
    }
}

/// The simulation clock plus everything a frame needs.
///
/// Time is an explicit accumulator advanced by [`Simulation::step`]; nothing
/// here reads a global clock for simulation time.
pub struct Simulation {
    world: World,
    accumulator: HeightfieldAccumulator,
    ink_post: Option<InkPostProcessor>,
    ink_gain: f32,
    shader: Shader,
    frame: FrameBuffer,
    time_s: f64,
}

impl Simulation {
    /// Validates `config` and builds a simulation at time zero with every
    /// drop spawned.
    pub fn new(config: &RippleConfig) -> Result<Self, ConfigError> {
        Self::with_accumulation(config, Accumulation::default())
    }

    pub fn with_accumulation(
        config: &RippleConfig,
        strategy: Accumulation,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut world = World::new(config);
        world.init(0.0);
        let grid = world.grid();

        let shader = Shader::new(ShadeParams {
            slope: config.slope,
            palette: config.palette,
            ink_strength: config.ink.then_some(config.ink_strength),
        });

        Ok(Self {
            world,
            accumulator: HeightfieldAccumulator::new(strategy),
            ink_post: config
                .ink
                .then(|| InkPostProcessor::new(config.ink_decay, config.ink_blur)),
            ink_gain: config.ink_gain,
            shader,
            frame: FrameBuffer::new(grid),
            time_s: 0.0,
        })
    }

    /// Simulation time in seconds.
    pub fn time(&self) -> f64 {
        self.time_s
    }

    /// Advances the clock by `dt` seconds and produces a frame into the
    /// internal [`FrameBuffer`]. Negative or NaN `dt` counts as zero.
    pub fn step(&mut self, dt: f32) -> StepTimings {
        let dt = if dt > 0.0 && dt.is_finite() { dt } else { 0.0 };
        self.time_s += f64::from(dt);
        let t = self.time_s as f32;
        let mut timings = StepTimings::default();

        let start = Instant::now();
        timings.respawned = self.world.maybe_respawn(t);
        let (grid, drops, height, ink) = self.world.buffers_mut();
        let injection = ink.map(|channels| InkInjection {
            channels,
            gain: self.ink_gain,
        });
        self.accumulator.accumulate(grid, height, injection, drops, t);
        timings.accumulate = start.elapsed();

        let start = Instant::now();
        if let (Some(post), Some(ink)) = (self.ink_post.as_mut(), self.world.ink_mut()) {
            post.process(grid, ink, dt);
        }
        timings.ink = start.elapsed();

        let start = Instant::now();
        let outcome = self.shader.shade(self.world.surface(), &mut self.frame);
        timings.shade = start.elapsed();
        timings.outcome = Some(outcome);
        timings
    }

    /// Shades the current state into an external target.
    pub fn shade_into<T: PixelTarget + ?Sized>(&self, target: &mut T) -> ShadeOutcome {
        self.shader.shade(self.world.surface(), target)
    }

    /// The most recently shaded frame.
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn world(&self) -> &World {
        &self.world
    }
}
