//! Persistent ink field: three channel grids that fade and diffuse each frame.

use rayon::prelude::*;

use crate::grid::Grid;

/// Per-channel ink buffers, row-major, nominally in `[0, 1]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InkChannels {
    pub r: Vec<f32>,
    pub g: Vec<f32>,
    pub b: Vec<f32>,
}

impl InkChannels {
    pub fn new(len: usize) -> Self {
        Self {
            r: vec![0.0; len],
            g: vec![0.0; len],
            b: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.r.len()
    }

    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }

    #[inline]
    pub fn at(&self, idx: usize) -> [f32; 3] {
        [self.r[idx], self.g[idx], self.b[idx]]
    }

    fn channels_mut(&mut self) -> [&mut Vec<f32>; 3] {
        [&mut self.r, &mut self.g, &mut self.b]
    }
}

/// Exponential fade plus a blended 3x3 box blur standing in for diffusion.
#[derive(Clone, Debug)]
pub struct InkPostProcessor {
    /// Fading rate (s^-1)
    pub decay: f32,
    /// 0 keeps the field sharp, 1 replaces it with its blur each frame
    pub blur_mix: f32,
    scratch: Vec<f32>,
}

impl InkPostProcessor {
    pub fn new(decay: f32, blur_mix: f32) -> Self {
        Self {
            decay,
            blur_mix,
            scratch: Vec::new(),
        }
    }

    /// Fades every sample by `exp(-decay * max(0, dt))`, then, if `blur_mix`
    /// is positive, blends each channel towards its edge-clamped box blur and
    /// clamps the result to `[0, 1]`.
    pub fn process(&mut self, grid: Grid, ink: &mut InkChannels, dt: f32) {
        let keep = (-self.decay * dt.max(0.0)).exp();
        for channel in ink.channels_mut() {
            channel.par_iter_mut().for_each(|v| *v *= keep);
        }

        if self.blur_mix <= 0.0 || grid.is_empty() {
            return;
        }

        let mix = self.blur_mix;
        let own = 1.0 - mix;
        self.scratch.resize(grid.len(), 0.0);
        for channel in ink.channels_mut() {
            box_blur(grid, channel, &mut self.scratch);
            channel
                .par_iter_mut()
                .zip(self.scratch.par_iter())
                .for_each(|(v, blurred)| *v = (own * *v + mix * blurred).clamp(0.0, 1.0));
        }
    }
}

/// 3x3 mean of `src` into `dst`, sampling past the edges by clamping.
pub fn box_blur(grid: Grid, src: &[f32], dst: &mut [f32]) {
    if grid.is_empty() {
        return;
    }
    dst.par_chunks_mut(grid.width)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as isize;
            for (x, out) in row.iter_mut().enumerate() {
                let x = x as isize;
                let mut sum = 0.0;
                for j in -1..=1 {
                    for i in -1..=1 {
                        sum += grid.sample(src, x + i, y + j);
                    }
                }
                *out = sum / 9.0;
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_blur_spreads_a_point_evenly() {
        let grid = Grid::new(5, 5);
        let mut src = vec![0.0; grid.len()];
        src[grid.index(2, 2)] = 9.0;
        let mut dst = vec![0.0; grid.len()];
        box_blur(grid, &src, &mut dst);
        for y in 0..5 {
            for x in 0..5 {
                let expected = if (1..=3).contains(&x) && (1..=3).contains(&y) {
                    1.0
                } else {
                    0.0
                };
                assert!((dst[grid.index(x, y)] - expected).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn box_blur_clamps_at_corners() {
        let grid = Grid::new(3, 3);
        let mut src = vec![0.0; grid.len()];
        src[0] = 1.0;
        let mut dst = vec![0.0; grid.len()];
        box_blur(grid, &src, &mut dst);
        // corner sample is replicated into four of its own nine taps
        assert!((dst[0] - 4.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn blur_blend_clamps_to_unit_range() {
        let grid = Grid::new(4, 4);
        let mut ink = InkChannels::new(grid.len());
        ink.r.fill(3.0);
        let mut post = InkPostProcessor::new(0.0, 0.5);
        post.process(grid, &mut ink, 0.016);
        assert!(ink.r.iter().all(|v| *v == 1.0));
        assert!(ink.g.iter().all(|v| *v == 0.0));
    }
}
