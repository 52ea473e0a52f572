//! Drop parameters and the closed-form wave model.
//!
//! A drop's height contribution is the sum of three terms:
//! - a principal crest shaped as the derivative of a gaussian riding on the
//!   expanding ring `c * tau`, damped in time and attenuated by geometric
//!   spreading `1 / sqrt(1 + k * dist)`;
//! - two capillary satellites at `ring ± cap_delta`, averaged, with their own
//!   width and a faster decay;
//! - a short-lived, m-lobed splash crown centred on the impact point.

use crate::constants::*;
use crate::rng::RandomSource;

/// A transient circular wave source.
///
/// Drops live in a fixed-size pool and are recycled in place when they
/// expire, so every field is plain data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Raindrop {
    /// Impact position (px)
    pub x: f32,
    pub y: f32,
    /// Impact time (s); may sit slightly in the past after a respawn
    pub t0: f32,

    /// Base amplitude
    pub a0: f32,
    /// Temporal damping (s^-1)
    pub alpha: f32,
    /// Principal crest width (px)
    pub sigma: f32,
    /// Carrier frequency (Hz); retained for the carrier wave profile
    pub freq_hz: f32,
    /// Ring expansion speed (px/s)
    pub speed: f32,
    /// Age after which the drop is recycled (s)
    pub max_life: f32,

    pub cap_delta: f32,
    pub cap_sigma: f32,
    pub cap_gain: f32,

    pub splash_amp: f32,
    pub splash_decay: f32,
    pub splash_r0: f32,
    pub splash_lobes: i32,
    pub splash_phase: f32,

    /// Ink tint per channel (0..1)
    pub tint: [f32; 3],
}

/// Height and ink envelope of one drop at one point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Wave {
    pub height: f32,
    /// Unscaled ink weight: damped gaussian envelope of the crest
    pub ink: f32,
}

impl Raindrop {
    #[inline]
    pub fn age(&self, t: f32) -> f32 {
        t - self.t0
    }

    #[inline]
    pub fn ring_radius(&self, tau: f32) -> f32 {
        self.speed * tau
    }

    /// Half-width of the annulus around the ring outside which the crest
    /// and capillaries are negligible.
    #[inline]
    pub fn band(&self) -> f32 {
        BAND_SIGMAS * self.sigma
            + (self.cap_delta + BAND_SIGMAS * self.cap_sigma)
            + self.splash_r0
    }

    /// Radius outside which the splash crown is negligible.
    #[inline]
    pub fn splash_reach(&self) -> f32 {
        SPLASH_REACH_RADII * self.splash_r0
    }

    /// Evaluates all wave terms at offset `(dx, dy)` from the impact point.
    ///
    /// `dist` is the radial distance fed to the crest and capillaries and may
    /// carry a small jitter; the splash always uses the exact offset.
    #[inline]
    pub(crate) fn evaluate(&self, tau: f32, dx: f32, dy: f32, dist: f32) -> Wave {
        let ring = self.ring_radius(tau);
        let sigma = self.sigma.max(MIN_WIDTH_PX);
        let att = 1.0 / (1.0 + SPREADING_LOSS_PER_PX * dist).sqrt();
        let damp = (-self.alpha * tau).exp();

        let s = (dist - ring) / sigma;
        let env = (-0.5 * s * s).exp();
        let main = self.a0 * damp * (-s * env) * att;

        let cap_sigma = self.cap_sigma.max(MIN_WIDTH_PX);
        let s1 = (dist - (ring - self.cap_delta)) / cap_sigma;
        let s2 = (dist - (ring + self.cap_delta)) / cap_sigma;
        let g1 = -s1 * (-0.5 * s1 * s1).exp();
        let g2 = -s2 * (-0.5 * s2 * s2).exp();
        let cap_damp = (-(self.alpha * CAPILLARY_DAMPING_RATIO) * tau).exp();
        let cap = self.cap_gain * self.a0 * cap_damp * 0.5 * (g1 + g2) * att;

        let splash = if tau <= SPLASH_WINDOW_SEC {
            let rho = self.splash_r0.max(MIN_WIDTH_PX);
            let r2 = (dx * dx + dy * dy) / (2.0 * rho * rho);
            let angle = dy.atan2(dx);
            let crown = 1.0
                + SPLASH_CROWN_DEPTH * (self.splash_lobes as f32 * angle + self.splash_phase).cos();
            self.splash_amp * (-self.splash_decay * tau).exp() * (-r2).exp() * crown
        } else {
            0.0
        };

        Wave {
            height: main + cap + splash,
            ink: damp * env * att,
        }
    }
}

/// Instantaneous height contribution of `drop` at `(x, y)` and time `t`.
///
/// Zero until the drop has landed (`t <= t0`).
pub fn ripple_contrib(x: f32, y: f32, t: f32, drop: &Raindrop) -> f32 {
    let tau = drop.age(t);
    if tau <= 0.0 {
        return 0.0;
    }
    let dx = x - drop.x;
    let dy = y - drop.y;
    let dist = (dx * dx + dy * dy).sqrt();
    drop.evaluate(tau, dx, dy, dist).height
}

/// Deterministic radial offset for grid cell `(x, y)`, in
/// `[-RADIAL_JITTER_PX / 2, RADIAL_JITTER_PX / 2)`.
///
/// Breaks up perfectly circular banding without touching amplitudes.
#[inline]
pub fn cell_jitter(x: usize, y: usize) -> f32 {
    (hash2(x as u32, y as u32) - 0.5) * RADIAL_JITTER_PX
}

#[inline]
fn hash2(x: u32, y: u32) -> f32 {
    let h = x
        .wrapping_mul(374_761_393)
        .wrapping_add(y.wrapping_mul(668_265_263));
    let h = (h ^ (h >> 13)).wrapping_mul(1_274_126_177);
    ((h ^ (h >> 16)) & 0x00FF_FFFF) as f32 / 16_777_216.0
}

/// Ranges from which a respawned drop's parameters are drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveParams {
    pub a0: (f32, f32),
    pub alpha: (f32, f32),
    pub sigma: (f32, f32),
    pub freq_hz: (f32, f32),
    pub speed: (f32, f32),
    pub life: (f32, f32),

    pub cap_delta: (f32, f32),
    pub cap_sigma: (f32, f32),
    pub cap_gain: (f32, f32),

    /// Relative to the drop's own `a0`
    pub splash_amp: (f32, f32),
    pub splash_decay: (f32, f32),
    pub splash_r0: (f32, f32),
    pub splash_lobes: (i32, i32),
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            a0: (0.6, 1.1),
            alpha: (0.6, 1.2),
            sigma: (2.5, 6.5),
            freq_hz: (2.0, 4.0),
            speed: (90.0, 140.0),
            life: (2.0, 4.0),
            cap_delta: (2.0, 5.0),
            cap_sigma: (1.0, 2.5),
            cap_gain: (0.20, 0.40),
            splash_amp: (0.10, 0.35),
            splash_decay: (6.0, 10.0),
            splash_r0: (3.0, 7.0),
            splash_lobes: (6, 10),
        }
    }
}

impl WaveParams {
    /// Draws a fresh drop landing on a `width` x `height` canvas near `now`.
    ///
    /// Lifetime is divided by `spawn_rate`. The tint is left black; the world
    /// assigns it from its colour cycle.
    pub fn spawn(
        &self,
        rng: &mut RandomSource,
        width: f32,
        height: f32,
        now: f32,
        spawn_rate: f32,
    ) -> Raindrop {
        let x = rng.uniform(0.0, width);
        let y = rng.uniform(0.0, height);
        let t0 = now - rng.uniform(0.0, SPAWN_JITTER_SEC);

        let a0 = draw(rng, self.a0);
        let alpha = draw(rng, self.alpha);
        let sigma = draw(rng, self.sigma);
        let freq_hz = draw(rng, self.freq_hz);
        let speed = draw(rng, self.speed);
        let max_life = draw(rng, self.life) / spawn_rate.max(f32::EPSILON);

        let cap_delta = draw(rng, self.cap_delta);
        let cap_sigma = draw(rng, self.cap_sigma);
        let cap_gain = draw(rng, self.cap_gain);

        let splash_amp = draw(rng, self.splash_amp) * a0;
        let splash_decay = draw(rng, self.splash_decay);
        let splash_r0 = draw(rng, self.splash_r0);
        let splash_lobes = rng.uniform_int(self.splash_lobes.0, self.splash_lobes.1);
        let splash_phase = rng.uniform(0.0, std::f32::consts::TAU);

        Raindrop {
            x,
            y,
            t0,
            a0,
            alpha,
            sigma,
            freq_hz,
            speed,
            max_life,
            cap_delta,
            cap_sigma,
            cap_gain,
            splash_amp,
            splash_decay,
            splash_r0,
            splash_lobes,
            splash_phase,
            tint: [0.0; 3],
        }
    }
}

#[inline]
fn draw(rng: &mut RandomSource, range: (f32, f32)) -> f32 {
    rng.uniform(range.0, range.1)
}
