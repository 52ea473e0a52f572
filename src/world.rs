//! Simulation state: the fixed drop pool and the buffers it drives.

use crate::config::RippleConfig;
use crate::constants::DROP_TINTS;
use crate::grid::Grid;
use crate::ink::InkChannels;
use crate::raindrop::{Raindrop, WaveParams};
use crate::rng::RandomSource;
use crate::shade::SurfaceView;

/// Owns the drop pool, the heightfield and, when enabled, the ink channels.
///
/// The pool has a fixed capacity of `N` slots. Drops are never added or
/// removed: an expired slot is redrawn in place, so indices are stable for
/// the lifetime of the world.
pub struct World {
    grid: Grid,
    spawn_rate: f32,
    params: WaveParams,
    rng: RandomSource,
    drops: Vec<Raindrop>,
    height: Vec<f32>,
    ink: Option<InkChannels>,
    next_tint: usize,
    respawns: u64,
}

impl World {
    /// Builds a world from an already validated configuration. Drops start
    /// zeroed; call [`World::init`] before the first frame.
    pub fn new(config: &RippleConfig) -> Self {
        Self::with_params(config, WaveParams::default())
    }

    pub fn with_params(config: &RippleConfig, params: WaveParams) -> Self {
        let grid = Grid::new(config.width as usize, config.height as usize);
        log::debug!(
            "world {}x{}: {} drops, seed {}, ink {}",
            grid.width,
            grid.height,
            config.drops,
            config.seed,
            config.ink
        );
        Self {
            grid,
            spawn_rate: config.spawn_rate,
            params,
            rng: RandomSource::new(config.seed),
            drops: vec![Raindrop::default(); config.drops],
            height: vec![0.0; grid.len()],
            ink: config.ink.then(|| InkChannels::new(grid.len())),
            next_tint: 0,
            respawns: 0,
        }
    }

    /// Redraws slot `index` as a fresh drop landing around `now` and gives it
    /// the next colour of the tint cycle.
    pub fn respawn_drop(&mut self, index: usize, now: f32) {
        let mut drop = self.params.spawn(
            &mut self.rng,
            self.grid.width as f32,
            self.grid.height as f32,
            now,
            self.spawn_rate,
        );
        drop.tint = DROP_TINTS[self.next_tint];
        self.next_tint = (self.next_tint + 1) % DROP_TINTS.len();
        self.respawns += 1;
        log::trace!(
            "respawn #{} slot {index} at ({:.1}, {:.1}) t0 {:.3} life {:.2}",
            self.respawns,
            drop.x,
            drop.y,
            drop.t0,
            drop.max_life
        );
        self.drops[index] = drop;
    }

    /// Respawns every slot.
    pub fn init(&mut self, now: f32) {
        for i in 0..self.drops.len() {
            self.respawn_drop(i, now);
        }
    }

    /// Recycles each drop older than its lifetime. Returns how many were
    /// respawned.
    pub fn maybe_respawn(&mut self, now: f32) -> usize {
        let mut count = 0;
        for i in 0..self.drops.len() {
            let d = &self.drops[i];
            if d.age(now) > d.max_life {
                self.respawn_drop(i, now);
                count += 1;
            }
        }
        count
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn drops(&self) -> &[Raindrop] {
        &self.drops
    }

    /// Mutable access to the pool slots. The slot count cannot change.
    pub fn drops_mut(&mut self) -> &mut [Raindrop] {
        &mut self.drops
    }

    pub fn height_field(&self) -> &[f32] {
        &self.height
    }

    pub fn ink(&self) -> Option<&InkChannels> {
        self.ink.as_ref()
    }

    /// Index into [`DROP_TINTS`] the next respawn will receive.
    pub fn next_tint(&self) -> usize {
        self.next_tint
    }

    /// Respawns performed so far, including [`World::init`].
    pub fn respawn_count(&self) -> u64 {
        self.respawns
    }

    pub(crate) fn ink_mut(&mut self) -> Option<&mut InkChannels> {
        self.ink.as_mut()
    }

    /// Read-only view of the heightfield and ink for shading.
    pub fn surface(&self) -> SurfaceView<'_> {
        SurfaceView {
            grid: self.grid,
            height: &self.height,
            ink: self.ink.as_ref(),
        }
    }

    /// Splits the world into the pieces one accumulation pass needs: the
    /// drops (read), the heightfield and the ink channels (written).
    pub(crate) fn buffers_mut(
        &mut self,
    ) -> (Grid, &[Raindrop], &mut [f32], Option<&mut InkChannels>) {
        (self.grid, &self.drops, &mut self.height, self.ink.as_mut())
    }
}
