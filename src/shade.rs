//! Per-pixel water shading of the heightfield.
//!
//! Normals come from edge-clamped central differences of the height. The
//! ramp palettes light a height-indexed gradient with Lambert plus
//! Blinn-Phong. The real palette models the water body by exponential
//! absorption, mixes in Fresnel-weighted sky reflection and underwater
//! refraction, and finishes with a rim light, a vignette, height micro
//! variation and gamma encoding. Ink, when enabled, tints the base colour in
//! every palette.

use glam::Vec3;
use rayon::prelude::*;

use crate::config::Palette;
use crate::constants::*;
use crate::error::FrameError;
use crate::grid::Grid;
use crate::ink::InkChannels;

/// Destination for a shaded frame: one packed `0xAARRGGBB` per pixel,
/// row-major, top to bottom.
pub trait PixelTarget {
    /// Writable pixels for a frame of `grid` dimensions.
    fn acquire(&mut self, grid: Grid) -> Result<&mut [u32], FrameError>;

    /// Presents a flat colour when [`PixelTarget::acquire`] failed.
    fn fill_fallback(&mut self, argb: u32);
}

/// Heap-backed pixel target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    grid: Grid,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            pixels: vec![FALLBACK_ARGB; grid.len()],
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixels as `[r, g, b]` bytes, row-major.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 3);
        for p in &self.pixels {
            let [_, r, g, b] = p.to_be_bytes();
            out.extend_from_slice(&[r, g, b]);
        }
        out
    }
}

impl PixelTarget for FrameBuffer {
    fn acquire(&mut self, grid: Grid) -> Result<&mut [u32], FrameError> {
        if grid != self.grid {
            return Err(FrameError::SizeMismatch {
                width: grid.width,
                height: grid.height,
                actual_width: self.grid.width,
                actual_height: self.grid.height,
            });
        }
        Ok(&mut self.pixels)
    }

    fn fill_fallback(&mut self, argb: u32) {
        self.pixels.fill(argb);
    }
}

/// Whether a frame was shaded or replaced by the flat fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadeOutcome {
    Shaded,
    Fallback,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadeParams {
    pub slope: f32,
    pub palette: Palette,
    /// Ink weight in the final colour; `None` disables tinting
    pub ink_strength: Option<f32>,
}

impl Default for ShadeParams {
    fn default() -> Self {
        Self {
            slope: 6.0,
            palette: Palette::Aqua,
            ink_strength: None,
        }
    }
}

/// Read-only view of the buffers the shader samples.
#[derive(Clone, Copy)]
pub struct SurfaceView<'a> {
    pub grid: Grid,
    pub height: &'a [f32],
    pub ink: Option<&'a InkChannels>,
}

pub struct Shader {
    params: ShadeParams,
    light: Vec3,
    view: Vec3,
    half: Vec3,
}

impl Shader {
    pub fn new(params: ShadeParams) -> Self {
        let light = safe_normalize(Vec3::from(LIGHT_DIR));
        let view = Vec3::from(VIEW_DIR);
        Self {
            params,
            light,
            view,
            half: safe_normalize(light + view),
        }
    }

    /// Shades the whole surface into `target`, rows in parallel.
    ///
    /// If the target cannot be acquired the frame degrades to a flat
    /// [`FALLBACK_ARGB`] fill; simulation state is untouched either way.
    pub fn shade<T: PixelTarget + ?Sized>(
        &self,
        surface: SurfaceView<'_>,
        target: &mut T,
    ) -> ShadeOutcome {
        let grid = surface.grid;
        let err = match target.acquire(grid) {
            Ok(pixels) => {
                if !grid.is_empty() {
                    self.shade_rows(surface, pixels);
                }
                return ShadeOutcome::Shaded;
            }
            Err(e) => e,
        };
        log::warn!("shading fallback frame: {err}");
        target.fill_fallback(FALLBACK_ARGB);
        ShadeOutcome::Fallback
    }

    fn shade_rows(&self, surface: SurfaceView<'_>, pixels: &mut [u32]) {
        pixels
            .par_chunks_mut(surface.grid.width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, px) in row.iter_mut().enumerate() {
                    *px = self.shade_pixel(surface, x, y);
                }
            });
    }

    /// Packed ARGB colour of pixel `(x, y)`.
    pub fn shade_pixel(&self, surface: SurfaceView<'_>, x: usize, y: usize) -> u32 {
        let grid = surface.grid;
        let h = surface.height;
        let (xi, yi) = (x as isize, y as isize);
        let slope = self.params.slope;

        let h_c = grid.sample(h, xi, yi);
        let dhdx = 0.5 * (grid.sample(h, xi + 1, yi) - grid.sample(h, xi - 1, yi));
        let dhdy = 0.5 * (grid.sample(h, xi, yi + 1) - grid.sample(h, xi, yi - 1));
        let n = safe_normalize(Vec3::new(-slope * dhdx, -slope * dhdy, 1.0));

        let ndotl = n.dot(self.light).max(0.0);
        let ndoth = n.dot(self.half).max(0.0);

        let ink = surface
            .ink
            .zip(self.params.ink_strength)
            .map(|(channels, strength)| (channels.at(grid.index(x, y)), strength));

        let color = match self.params.palette {
            Palette::Aqua | Palette::Mix => {
                let t = 0.5 + 0.5 * (RAMP_TANH_GAIN * h_c).tanh();
                let ramp = if self.params.palette == Palette::Aqua {
                    ramp_aqua(t)
                } else {
                    ramp_mix(t)
                };
                let base = tint_with_ink(ramp, ink);
                let spec = ndoth.powf(RAMP_SHININESS);
                base * RAMP_AMBIENT
                    + base * (RAMP_DIFFUSE * ndotl)
                    + Vec3::from(RAMP_SPECULAR_COLOR) * (RAMP_SPECULAR * spec)
            }
            Palette::Real => {
                let spec = ndoth.powf(WATER_SHININESS);
                let slope_mag = (dhdx * dhdx + dhdy * dhdy).sqrt();
                let water = tint_with_ink(water_transmittance(h_c.abs()), ink);
                let linear = self.water_color(n, water, ndotl, spec, slope_mag);
                let linear = linear * vignette(grid, x, y);
                let micro = MICRO_VARIATION * (MICRO_TANH_GAIN * h_c).tanh();
                gamma_encode(linear + Vec3::splat(micro))
            }
        };
        pack_argb(color)
    }

    fn water_color(
        &self,
        n: Vec3,
        water: Vec3,
        ndotl: f32,
        spec: f32,
        slope_mag: f32,
    ) -> Vec3 {
        let cos_nv = n.dot(self.view).max(0.0);
        let fresnel = FRESNEL_F0 + (1.0 - FRESNEL_F0) * (1.0 - cos_nv).powi(5);

        let incident = -self.view;
        let reflected = sample_sky(reflect(incident, n));
        let refracted = refract(incident, n, WATER_ETA)
            .map(sample_underwater)
            .unwrap_or(water);

        let local = water * WATER_AMBIENT
            + water * (WATER_DIFFUSE * ndotl)
            + Vec3::from(WATER_SPECULAR_COLOR) * (WATER_SPECULAR * spec);
        let color = local + refracted.lerp(reflected, fresnel);

        let rim = ((slope_mag * self.params.slope - RIM_THRESHOLD) * RIM_GAIN).clamp(0.0, 1.0);
        color + Vec3::ONE * (RIM_INTENSITY * rim)
    }
}

#[inline]
fn safe_normalize(v: Vec3) -> Vec3 {
    v / v.length_squared().max(1e-8).sqrt()
}

#[inline]
fn reflect(i: Vec3, n: Vec3) -> Vec3 {
    n * (2.0 * n.dot(i)) - i
}

/// Snell refraction of incident direction `i` through normal `n`; `None` on
/// total internal reflection.
#[inline]
fn refract(i: Vec3, n: Vec3, eta: f32) -> Option<Vec3> {
    let cos_i = -n.dot(i);
    let cos_t2 = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if cos_t2 < 0.0 {
        return None;
    }
    Some(i * eta + n * (eta * cos_i - cos_t2.sqrt()))
}

/// Blends `base` towards the normalised ink hue by `strength * total ink`.
#[inline]
fn tint_with_ink(base: Vec3, ink: Option<([f32; 3], f32)>) -> Vec3 {
    let Some(([r, g, b], strength)) = ink else {
        return base;
    };
    let sum = (r + g + b).max(1e-6);
    let s = (strength * sum).clamp(0.0, 1.0);
    base.lerp(Vec3::new(r, g, b) / sum, s)
}

fn water_transmittance(thickness: f32) -> Vec3 {
    let absorption = Vec3::from(WATER_ABSORPTION);
    let trans = Vec3::new(
        (-absorption.x * thickness).exp(),
        (-absorption.y * thickness).exp(),
        (-absorption.z * thickness).exp(),
    );
    Vec3::from(WATER_BASE_COLOR) * trans
}

fn vignette(grid: Grid, x: usize, y: usize) -> f32 {
    let ux = (x as f32 + 0.5) / grid.width as f32 - 0.5;
    let uy = (y as f32 + 0.5) / grid.height as f32 - 0.5;
    let r2 = ux * ux + uy * uy;
    1.0 - VIGNETTE_STRENGTH * (r2 * VIGNETTE_SCALE).min(1.0).powf(VIGNETTE_EXPONENT)
}

pub fn ramp_aqua(t: f32) -> Vec3 {
    let c0 = Vec3::new(0.03, 0.07, 0.12); // deep
    let c1 = Vec3::new(0.10, 0.28, 0.45);
    let c2 = Vec3::new(0.20, 0.55, 0.78); // shallow
    if t < 0.5 {
        c0.lerp(c1, 2.0 * t)
    } else {
        c1.lerp(c2, 2.0 * (t - 0.5))
    }
}

pub fn ramp_mix(t: f32) -> Vec3 {
    let a = Vec3::new(0.05, 0.12, 0.18);
    let b = Vec3::new(0.08, 0.35, 0.55);
    let c = Vec3::new(0.18, 0.65, 0.70);
    let d = Vec3::new(0.06, 0.40, 0.30);
    if t < 0.33 {
        a.lerp(b, t / 0.33)
    } else if t < 0.66 {
        b.lerp(c, (t - 0.33) / 0.33)
    } else {
        c.lerp(d, (t - 0.66) / 0.34)
    }
}

/// Procedural sky for reflections: horizon-to-zenith gradient with a faint
/// banded tint, darkened when looking down.
fn sample_sky(dir: Vec3) -> Vec3 {
    let u = 0.5 * (dir.x + 1.0);
    let v = 0.5 * (dir.y + 1.0);
    let horizon = Vec3::new(0.90, 0.95, 1.00);
    let zenith = Vec3::new(0.52, 0.70, 0.88);
    let tint = Vec3::new(0.02, 0.02, 0.03);
    let sky = horizon * (1.0 - v).clamp(0.0, 1.0)
        + zenith * v.clamp(0.0, 1.0)
        + tint * (0.15 * (std::f32::consts::TAU * u).sin() * (std::f32::consts::PI * v).sin());
    if dir.z < 0.0 {
        Vec3::new(0.02, 0.05, 0.08) * 0.8 + sky * 0.2
    } else {
        sky
    }
}

fn sample_underwater(dir: Vec3) -> Vec3 {
    let v = 0.5 * (dir.y + 1.0);
    let deep = Vec3::new(0.03, 0.07, 0.10);
    let green = Vec3::new(0.04, 0.12, 0.09);
    deep * (1.0 - v) + green * v
}

#[inline]
fn gamma_encode(c: Vec3) -> Vec3 {
    let inv = 1.0 / DISPLAY_GAMMA;
    Vec3::new(
        c.x.clamp(0.0, 1.0).powf(inv),
        c.y.clamp(0.0, 1.0).powf(inv),
        c.z.clamp(0.0, 1.0).powf(inv),
    )
}

#[inline]
fn to_byte(v: f32) -> u32 {
    (255.0 * v.clamp(0.0, 1.0)).round() as u32
}

/// Opaque `0xAARRGGBB` from a colour in `[0, 1]` per channel.
#[inline]
pub fn pack_argb(c: Vec3) -> u32 {
    0xFF00_0000 | (to_byte(c.x) << 16) | (to_byte(c.y) << 8) | to_byte(c.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_argb_is_opaque_and_ordered() {
        assert_eq!(pack_argb(Vec3::new(1.0, 0.0, 0.0)), 0xFFFF_0000);
        assert_eq!(pack_argb(Vec3::new(0.0, 1.0, 0.0)), 0xFF00_FF00);
        assert_eq!(pack_argb(Vec3::new(0.0, 0.0, 1.0)), 0xFF00_00FF);
        assert_eq!(pack_argb(Vec3::new(-1.0, 2.0, 0.5)), 0xFF00_FF80);
    }

    #[test]
    fn ramps_are_continuous_at_stops() {
        let eps = 1e-4;
        assert!((ramp_aqua(0.5 - eps) - ramp_aqua(0.5)).length() < 1e-3);
        assert!((ramp_mix(0.33 - eps) - ramp_mix(0.33)).length() < 1e-3);
        assert!((ramp_mix(0.66 - eps) - ramp_mix(0.66)).length() < 1e-3);
    }

    #[test]
    fn refraction_total_internal_reflection() {
        let n = Vec3::Z;
        // straight down through a flat surface bends nowhere
        let t = refract(-Vec3::Z, n, WATER_ETA).unwrap();
        assert!((t - -Vec3::Z).length() < 1e-6);
        // leaving a dense medium at a grazing angle reflects totally
        let grazing = Vec3::new(0.95, 0.0, -0.3122).normalize();
        assert!(refract(grazing, n, 1.33).is_none());
    }

    #[test]
    fn ink_tint_moves_towards_hue() {
        let base = Vec3::new(0.1, 0.2, 0.3);
        assert_eq!(tint_with_ink(base, None), base);
        let full = tint_with_ink(base, Some(([2.0, 0.0, 0.0], 1.0)));
        assert!((full - Vec3::X).length() < 1e-6);
        let none = tint_with_ink(base, Some(([0.0, 0.0, 0.0], 2.0)));
        assert!((none - base).length() < 1e-6);
    }

    #[test]
    fn mismatched_target_falls_back() {
        let grid = Grid::new(8, 6);
        let height = vec![0.0; grid.len()];
        let mut fb = FrameBuffer::new(Grid::new(4, 4));
        let shader = Shader::new(ShadeParams::default());
        let out = shader.shade(
            SurfaceView {
                grid,
                height: &height,
                ink: None,
            },
            &mut fb,
        );
        assert_eq!(out, ShadeOutcome::Fallback);
        assert!(fb.pixels().iter().all(|p| *p == FALLBACK_ARGB));
    }
}
