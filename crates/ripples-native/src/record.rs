//! Headless capture: step at a fixed rate and write numbered PNG frames.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use rain_ripples::{FrameBuffer, Simulation};

/// Writes `frame` to `dir/frame_NNNNN.png`.
pub fn save_png(dir: &Path, index: usize, frame: &FrameBuffer) -> anyhow::Result<PathBuf> {
    let grid = frame.grid();
    let path = dir.join(format!("frame_{index:05}.png"));
    let img = image::RgbImage::from_raw(grid.width as u32, grid.height as u32, frame.to_rgb8())
        .context("frame buffer does not match its dimensions")?;
    img.save(&path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Runs `seconds` of simulation at `fps` and saves every frame.
pub fn record(sim: &mut Simulation, seconds: f32, fps: u32, dir: &Path) -> anyhow::Result<usize> {
    anyhow::ensure!(seconds > 0.0, "record duration must be positive, got {seconds}");
    anyhow::ensure!(fps > 0, "fps must be positive");
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let frames = (seconds * fps as f32).round().max(1.0) as usize;
    let dt = 1.0 / fps as f32;
    log::info!("recording {frames} frames at {fps} fps into {}", dir.display());

    let start = Instant::now();
    for i in 0..frames {
        sim.step(dt);
        save_png(dir, i, sim.frame())?;
        if (i + 1) % fps as usize == 0 {
            log::info!("recorded {}/{} frames", i + 1, frames);
        }
    }
    log::info!(
        "recording done: {frames} frames in {:.1} s",
        start.elapsed().as_secs_f32()
    );
    Ok(frames)
}
