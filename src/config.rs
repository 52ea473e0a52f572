//! Run configuration consumed by the core.
//!
//! Values are validated once, up front, against the documented ranges. The
//! simulation and shading code downstream never re-checks them.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

pub const MIN_WIDTH: u32 = 640;
pub const MIN_HEIGHT: u32 = 480;
pub const MAX_DIMENSION: u32 = 16384;

/// Base colour model used by the shader.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Palette {
    /// Three-stop blue gradient indexed by compressed height.
    #[default]
    Aqua,
    /// Four-stop cyan/blue/green gradient.
    Mix,
    /// Absorption-based water with Fresnel reflection and refraction.
    Real,
}

impl Palette {
    pub fn as_str(self) -> &'static str {
        match self {
            Palette::Aqua => "aqua",
            Palette::Mix => "mix",
            Palette::Real => "real",
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Palette {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aqua" => Ok(Palette::Aqua),
            "mix" | "aquamix" => Ok(Palette::Mix),
            "real" => Ok(Palette::Real),
            _ => Err(ConfigError::UnknownPalette(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RippleConfig {
    /// Canvas width in pixels (>= 640)
    pub width: u32,
    /// Canvas height in pixels (>= 480)
    pub height: u32,
    /// Number of simultaneously active drops (>= 1)
    pub drops: usize,
    /// RNG seed; -1 draws one from system entropy
    pub seed: i64,
    /// Normal slope amplification (0.1..=40)
    pub slope: f32,
    pub palette: Palette,
    pub ink: bool,
    /// Ink injected per frame along each wavefront (0..=3)
    pub ink_gain: f32,
    /// Ink fading rate, s^-1 (0..=5)
    pub ink_decay: f32,
    /// Blend factor towards the 3x3 box blur each frame (0..=1)
    pub ink_blur: f32,
    /// Visual weight of ink in the final colour (0..=2)
    pub ink_strength: f32,
    /// Respawn rate multiplier; drop lifetimes are divided by it (0.1..=10)
    pub spawn_rate: f32,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            drops: 5,
            seed: -1,
            slope: 6.0,
            palette: Palette::Aqua,
            ink: false,
            ink_gain: 0.6,
            ink_decay: 0.8,
            ink_blur: 0.25,
            ink_strength: 0.9,
            spawn_rate: 1.0,
        }
    }
}

impl RippleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_dimension("width", self.width, MIN_WIDTH)?;
        check_dimension("height", self.height, MIN_HEIGHT)?;
        if self.drops == 0 {
            return Err(ConfigError::DropCount(self.drops));
        }
        if self.seed < -1 {
            return Err(ConfigError::Seed(self.seed));
        }
        check_range("slope", self.slope, 0.1, 40.0)?;
        check_range("ink gain", self.ink_gain, 0.0, 3.0)?;
        check_range("ink decay", self.ink_decay, 0.0, 5.0)?;
        check_range("ink blur", self.ink_blur, 0.0, 1.0)?;
        check_range("ink strength", self.ink_strength, 0.0, 2.0)?;
        check_range("spawn rate", self.spawn_rate, 0.1, 10.0)?;
        Ok(())
    }
}

fn check_dimension(name: &'static str, value: u32, min: u32) -> Result<(), ConfigError> {
    if value < min || value > MAX_DIMENSION {
        return Err(ConfigError::Dimension {
            name,
            value,
            min,
            max: MAX_DIMENSION,
        });
    }
    Ok(())
}

fn check_range(name: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    // NaN fails both comparisons, so test for containment rather than exclusion
    if !(min..=max).contains(&value) {
        return Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(RippleConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_small_canvas() {
        let cfg = RippleConfig {
            width: 639,
            ..RippleConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Dimension { name: "width", .. })
        ));
        let cfg = RippleConfig {
            height: 479,
            ..RippleConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Dimension { name: "height", .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let cases = [
            RippleConfig {
                drops: 0,
                ..RippleConfig::default()
            },
            RippleConfig {
                seed: -2,
                ..RippleConfig::default()
            },
            RippleConfig {
                slope: 0.05,
                ..RippleConfig::default()
            },
            RippleConfig {
                ink_blur: 1.5,
                ..RippleConfig::default()
            },
            RippleConfig {
                spawn_rate: f32::NAN,
                ..RippleConfig::default()
            },
        ];
        for cfg in cases {
            assert!(cfg.validate().is_err(), "accepted {cfg:?}");
        }
    }

    #[test]
    fn palette_parses_names_and_alias() {
        assert_eq!("aqua".parse::<Palette>(), Ok(Palette::Aqua));
        assert_eq!("AquaMix".parse::<Palette>(), Ok(Palette::Mix));
        assert_eq!(" real ".parse::<Palette>(), Ok(Palette::Real));
        assert!("sepia".parse::<Palette>().is_err());
        assert_eq!(Palette::Mix.to_string(), "mix");
    }
}
