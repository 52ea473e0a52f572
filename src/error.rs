//! Error types for configuration and frame output.

use thiserror::Error;

/// A configuration value outside its accepted range.
///
/// Raised by [`crate::RippleConfig::validate`] before any core state is built;
/// the pipeline itself assumes validated input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be between {min} and {max}, got {value}")]
    Dimension {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    #[error("drop count must be at least 1, got {0}")]
    DropCount(usize),
    #[error("seed must be -1 (random) or non-negative, got {0}")]
    Seed(i64),
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("unknown palette '{0}' (expected aqua, mix or real)")]
    UnknownPalette(String),
}

/// Failure to obtain a writable pixel buffer for a frame.
///
/// Recoverable: the shader emits a flat fallback frame instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("pixel target is {actual_width}x{actual_height}, expected {width}x{height}")]
    SizeMismatch {
        width: usize,
        height: usize,
        actual_width: usize,
        actual_height: usize,
    },
    #[error("pixel target unavailable: {0}")]
    Unavailable(String),
}
