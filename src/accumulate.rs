//! Heightfield accumulation with optional ink injection.
//!
//! Every frame the heightfield is zero-filled and rebuilt from the active
//! drops. Ink channels are not cleared: injected ink persists and is left to
//! the post-processor to fade and diffuse.
//!
//! Each drop only touches cells inside its bounding annulus
//! `[max(0, ring - band), ring + band]` (widened to a disk while the splash is
//! live), clipped to the axis-aligned box around its reach. Cells are
//! rejected on squared distance before any transcendental math.
//!
//! Two bounded strategies are provided:
//! - [`accumulate`]: drop-major and sequential, the canonical path;
//! - [`accumulate_par_rows`]: row-major and parallel with rayon. Each row is
//!   owned by one task, which walks the drops whose box covers that row, so
//!   writes never overlap and no synchronisation is needed. Per-cell
//!   summation order is the drop order in both, so results match exactly.
//!
//! [`accumulate_full_scan`] evaluates every drop at every cell and serves as
//! the reference the bounded paths are checked against.

use rayon::prelude::*;

use crate::constants::{BBOX_MARGIN_PX, SPLASH_WINDOW_SEC};
use crate::grid::Grid;
use crate::ink::InkChannels;
use crate::raindrop::{cell_jitter, Raindrop, Wave};

/// Ink buffers receiving wavefront tint, with the injection gain.
pub struct InkInjection<'a> {
    pub channels: &'a mut InkChannels,
    pub gain: f32,
}

/// Scheduling strategy for [`HeightfieldAccumulator`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Accumulation {
    Sequential,
    #[default]
    RowParallel,
}

/// Precomputed bounds of one live drop for the current frame.
#[derive(Clone, Copy, Debug)]
struct DropSpan {
    index: usize,
    tau: f32,
    rmin2: f32,
    rmax2: f32,
    xmin: usize,
    xmax: usize,
    ymin: usize,
    ymax: usize,
}

impl DropSpan {
    fn new(index: usize, drop: &Raindrop, t: f32, grid: Grid) -> Option<Self> {
        let tau = drop.age(t);
        if tau <= 0.0 || grid.is_empty() {
            return None;
        }
        let ring = drop.ring_radius(tau);
        let band = drop.band();
        let mut rmin = (ring - band).max(0.0);
        let mut rmax = ring + band;
        if tau <= SPLASH_WINDOW_SEC {
            // the crown sits on the impact point, inside the ring
            rmin = 0.0;
            rmax = rmax.max(drop.splash_reach());
        }

        let reach = rmax + BBOX_MARGIN_PX;
        let xmin = (drop.x - reach).floor().max(0.0);
        let ymin = (drop.y - reach).floor().max(0.0);
        let xmax = (drop.x + reach).ceil().min(grid.width as f32 - 1.0);
        let ymax = (drop.y + reach).ceil().min(grid.height as f32 - 1.0);
        if xmax < xmin || ymax < ymin {
            return None;
        }

        Some(Self {
            index,
            tau,
            rmin2: rmin * rmin,
            rmax2: rmax * rmax,
            xmin: xmin as usize,
            xmax: xmax as usize,
            ymin: ymin as usize,
            ymax: ymax as usize,
        })
    }

    #[inline]
    fn covers_row(&self, y: usize) -> bool {
        self.ymin <= y && y <= self.ymax
    }

    /// Wave at cell `(x, y)`, or `None` when the cell lies outside the annulus.
    #[inline]
    fn visit(&self, drop: &Raindrop, x: usize, y: usize) -> Option<Wave> {
        let dx = x as f32 + 0.5 - drop.x;
        let dy = y as f32 + 0.5 - drop.y;
        let dist2 = dx * dx + dy * dy;
        if dist2 < self.rmin2 || dist2 > self.rmax2 {
            return None;
        }
        let dist = dist2.sqrt() + cell_jitter(x, y);
        Some(drop.evaluate(self.tau, dx, dy, dist))
    }
}

/// Height a drop adds to grid cell `(x, y)` at time `t`, evaluated at the
/// cell centre with the cell's radial jitter.
pub fn sample_cell(x: usize, y: usize, t: f32, drop: &Raindrop) -> f32 {
    cell_wave(x, y, drop.age(t), drop).height
}

#[inline]
fn cell_wave(x: usize, y: usize, tau: f32, drop: &Raindrop) -> Wave {
    if tau <= 0.0 {
        return Wave::default();
    }
    let dx = x as f32 + 0.5 - drop.x;
    let dy = y as f32 + 0.5 - drop.y;
    let dist = (dx * dx + dy * dy).sqrt() + cell_jitter(x, y);
    drop.evaluate(tau, dx, dy, dist)
}

#[inline]
fn deposit(
    field: &mut [f32],
    ink: &mut Option<InkInjection<'_>>,
    idx: usize,
    wave: Wave,
    drop: &Raindrop,
) {
    field[idx] += wave.height;
    if let Some(inj) = ink {
        let w = inj.gain * wave.ink;
        inj.channels.r[idx] += w * drop.tint[0];
        inj.channels.g[idx] += w * drop.tint[1];
        inj.channels.b[idx] += w * drop.tint[2];
    }
}

/// Rebuilds `field` from `drops` at time `t`, visiting only each drop's
/// bounding annulus.
pub fn accumulate(
    grid: Grid,
    field: &mut [f32],
    mut ink: Option<InkInjection<'_>>,
    drops: &[Raindrop],
    t: f32,
) {
    field.fill(0.0);
    for (i, drop) in drops.iter().enumerate() {
        let Some(span) = DropSpan::new(i, drop, t, grid) else {
            continue;
        };
        for y in span.ymin..=span.ymax {
            for x in span.xmin..=span.xmax {
                if let Some(wave) = span.visit(drop, x, y) {
                    deposit(field, &mut ink, grid.index(x, y), wave, drop);
                }
            }
        }
    }
}

/// Unbounded O(W·H·N) reference for [`accumulate`].
pub fn accumulate_full_scan(
    grid: Grid,
    field: &mut [f32],
    mut ink: Option<InkInjection<'_>>,
    drops: &[Raindrop],
    t: f32,
) {
    field.fill(0.0);
    for drop in drops {
        let tau = drop.age(t);
        if tau <= 0.0 {
            continue;
        }
        for y in 0..grid.height {
            for x in 0..grid.width {
                let wave = cell_wave(x, y, tau, drop);
                deposit(field, &mut ink, grid.index(x, y), wave, drop);
            }
        }
    }
}

/// Row-parallel bounded accumulation. `spans` is scratch space reused
/// between frames.
fn accumulate_rows(
    grid: Grid,
    field: &mut [f32],
    ink: Option<InkInjection<'_>>,
    drops: &[Raindrop],
    t: f32,
    spans: &mut Vec<DropSpan>,
) {
    spans.clear();
    spans.extend(
        drops
            .iter()
            .enumerate()
            .filter_map(|(i, d)| DropSpan::new(i, d, t, grid)),
    );
    let spans: &[DropSpan] = spans;
    let width = grid.width;
    if grid.is_empty() {
        field.fill(0.0);
        return;
    }

    match ink {
        None => {
            field
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(y, row)| {
                    row.fill(0.0);
                    for span in spans.iter().filter(|s| s.covers_row(y)) {
                        let drop = &drops[span.index];
                        for x in span.xmin..=span.xmax {
                            if let Some(wave) = span.visit(drop, x, y) {
                                row[x] += wave.height;
                            }
                        }
                    }
                });
        }
        Some(InkInjection { channels, gain }) => {
            let InkChannels { r, g, b } = channels;
            field
                .par_chunks_mut(width)
                .zip(r.par_chunks_mut(width))
                .zip(g.par_chunks_mut(width))
                .zip(b.par_chunks_mut(width))
                .enumerate()
                .for_each(|(y, (((row, rr), rg), rb))| {
                    row.fill(0.0);
                    for span in spans.iter().filter(|s| s.covers_row(y)) {
                        let drop = &drops[span.index];
                        for x in span.xmin..=span.xmax {
                            if let Some(wave) = span.visit(drop, x, y) {
                                row[x] += wave.height;
                                let w = gain * wave.ink;
                                rr[x] += w * drop.tint[0];
                                rg[x] += w * drop.tint[1];
                                rb[x] += w * drop.tint[2];
                            }
                        }
                    }
                });
        }
    }
}

/// Parallel bounded accumulation; allocates its own span list.
pub fn accumulate_par_rows(
    grid: Grid,
    field: &mut [f32],
    ink: Option<InkInjection<'_>>,
    drops: &[Raindrop],
    t: f32,
) {
    let mut spans = Vec::with_capacity(drops.len());
    accumulate_rows(grid, field, ink, drops, t, &mut spans);
}

/// Frame-to-frame accumulator holding the chosen strategy and its scratch.
#[derive(Debug, Default)]
pub struct HeightfieldAccumulator {
    strategy: Accumulation,
    spans: Vec<DropSpan>,
}

impl HeightfieldAccumulator {
    pub fn new(strategy: Accumulation) -> Self {
        Self {
            strategy,
            spans: Vec::new(),
        }
    }

    pub fn accumulate(
        &mut self,
        grid: Grid,
        field: &mut [f32],
        ink: Option<InkInjection<'_>>,
        drops: &[Raindrop],
        t: f32,
    ) {
        match self.strategy {
            Accumulation::Sequential => accumulate(grid, field, ink, drops, t),
            Accumulation::RowParallel => {
                accumulate_rows(grid, field, ink, drops, t, &mut self.spans)
            }
        }
    }
}
