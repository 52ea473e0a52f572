//! Wave model, ink and shading tuning constants.

// Splash burst is only evaluated during a drop's first moments (seconds)
pub const SPLASH_WINDOW_SEC: f32 = 0.25;
pub const SPLASH_CROWN_DEPTH: f32 = 0.25; // lobe modulation of the crown
pub const SPLASH_REACH_RADII: f32 = 5.0; // splash bound in units of splash_r0

// Impact times are staggered into the past by up to this much (seconds)
pub const SPAWN_JITTER_SEC: f32 = 0.25;

// Capillary satellites decay faster than the principal crest
pub const CAPILLARY_DAMPING_RATIO: f32 = 1.25;

// Geometric spreading loss: 1 / sqrt(1 + k * dist)
pub const SPREADING_LOSS_PER_PX: f32 = 0.015;

// Radial micro-jitter span (pixels, centred on zero)
pub const RADIAL_JITTER_PX: f32 = 0.35;

// Guards widths against division by zero
pub const MIN_WIDTH_PX: f32 = 1e-3;

// Annulus half-width is this many sigmas of each gaussian term
pub const BAND_SIGMAS: f32 = 3.0;
pub const BBOX_MARGIN_PX: f32 = 2.0;

// Tints cycled through on each respawn
pub const DROP_TINTS: [[f32; 3]; 4] = [
    [0.95, 0.35, 0.40], // coral
    [0.30, 0.85, 0.55], // jade
    [0.35, 0.50, 0.95], // cobalt
    [0.95, 0.80, 0.30], // amber
];

// Light arrives at a grazing angle from the upper left; view is straight on
pub const LIGHT_DIR: [f32; 3] = [-0.4, -0.7, 0.6];
pub const VIEW_DIR: [f32; 3] = [0.0, 0.0, 1.0];

// Height → ramp index compression: 0.5 + 0.5 * tanh(k * h)
pub const RAMP_TANH_GAIN: f32 = 0.75;

// Ramp palettes (aqua/mix) use a brighter, flatter lighting model
pub const RAMP_AMBIENT: f32 = 0.35;
pub const RAMP_DIFFUSE: f32 = 0.75;
pub const RAMP_SPECULAR: f32 = 0.35;
pub const RAMP_SHININESS: f32 = 32.0;
pub const RAMP_SPECULAR_COLOR: [f32; 3] = [0.80, 0.90, 1.00];

// Physically-motivated water
pub const WATER_AMBIENT: f32 = 0.18;
pub const WATER_DIFFUSE: f32 = 0.62;
pub const WATER_SPECULAR: f32 = 0.25;
pub const WATER_SHININESS: f32 = 90.0;
pub const WATER_SPECULAR_COLOR: [f32; 3] = [0.96, 0.98, 1.00];
pub const WATER_BASE_COLOR: [f32; 3] = [0.04, 0.10, 0.16];
pub const WATER_ABSORPTION: [f32; 3] = [0.35, 0.18, 0.05]; // per unit thickness
pub const FRESNEL_F0: f32 = 0.02;
pub const WATER_ETA: f32 = 1.0 / 1.33; // air → water

// Cosmetic passes
pub const RIM_THRESHOLD: f32 = 0.25;
pub const RIM_GAIN: f32 = 1.6;
pub const RIM_INTENSITY: f32 = 0.07;
pub const VIGNETTE_STRENGTH: f32 = 0.15;
pub const VIGNETTE_SCALE: f32 = 3.2;
pub const VIGNETTE_EXPONENT: f32 = 1.2;
pub const MICRO_VARIATION: f32 = 0.02;
pub const MICRO_TANH_GAIN: f32 = 0.8;
pub const DISPLAY_GAMMA: f32 = 2.2;

// Flat frame emitted when the pixel target cannot be written
pub const FALLBACK_ARGB: u32 = 0xFF0A_0E16;
