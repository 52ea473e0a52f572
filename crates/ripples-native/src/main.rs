use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use winit::{
    dpi::PhysicalSize,
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use rain_ripples::{ShadeOutcome, Simulation, StepTimings};

mod cli;
mod present;
mod record;

use cli::Args;
use present::GpuState;

/// Exponentially smoothed frame rate, reported once per interval.
struct FpsCounter {
    smoothed: f32,
    last_report: Instant,
}

impl FpsCounter {
    const INTERVAL: Duration = Duration::from_secs(1);

    fn new() -> Self {
        Self {
            smoothed: 0.0,
            last_report: Instant::now(),
        }
    }

    /// Folds in one frame; returns the smoothed rate when a report is due.
    fn tick(&mut self, dt: f32) -> Option<f32> {
        if dt > 0.0 {
            let inst = 1.0 / dt;
            self.smoothed = if self.smoothed == 0.0 {
                inst
            } else {
                0.9 * self.smoothed + 0.1 * inst
            };
        }
        if self.last_report.elapsed() >= Self::INTERVAL {
            self.last_report = Instant::now();
            Some(self.smoothed)
        } else {
            None
        }
    }
}

fn log_profile(timings: &StepTimings, present: Duration) {
    log::info!(
        "sim+ink {:.2} ms (accumulate {:.2}, ink {:.2}), shade {:.2} ms, present {:.2} ms, respawned {}",
        timings.simulate().as_secs_f64() * 1e3,
        timings.accumulate.as_secs_f64() * 1e3,
        timings.ink.as_secs_f64() * 1e3,
        timings.shade.as_secs_f64() * 1e3,
        present.as_secs_f64() * 1e3,
        timings.respawned
    );
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let config = args.ripple_config().context("invalid arguments")?;
    let mut sim = Simulation::with_accumulation(&config, args.accumulation.into())
        .context("building simulation")?;
    log::info!(
        "{}x{}, {} drops, palette {}, ink {}",
        config.width,
        config.height,
        config.drops,
        config.palette,
        if config.ink { "on" } else { "off" }
    );

    if let Some(seconds) = args.record {
        record::record(&mut sim, seconds, args.fps, &args.out)?;
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Rain ripples")
        .with_inner_size(PhysicalSize::new(config.width, config.height))
        .build(&event_loop)
        .context("creating window")?;

    let mut state = pollster::block_on(GpuState::new(
        &window,
        sim.world().grid(),
        !args.novsync,
    ))?;
    let mut last_frame = Instant::now();
    let mut fps = FpsCounter::new();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => state.resize(size),
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key: Key::Named(NamedKey::Escape),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                },
            ..
        } => elwt.exit(),
        Event::AboutToWait => {
            let now = Instant::now();
            let dt = (now - last_frame).as_secs_f32();
            last_frame = now;

            let timings = sim.step(dt);
            if timings.outcome == Some(ShadeOutcome::Fallback) {
                log::warn!("frame {:.2} s shaded as fallback", sim.time());
            }

            let present_start = Instant::now();
            match state.present(sim.frame().pixels()) {
                Ok(_) => state.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(e) => log::warn!("present failed: {e:?}"),
            }
            let present = present_start.elapsed();

            if let Some(rate) = fps.tick(dt) {
                state
                    .window
                    .set_title(&format!("Rain ripples | {rate:.1} fps"));
                if args.fpslog {
                    log::info!("fps {rate:.1}");
                }
                if args.profile {
                    log_profile(&timings, present);
                }
            }
        }
        _ => {}
    })?;
    Ok(())
}
