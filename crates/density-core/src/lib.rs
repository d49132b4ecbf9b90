pub mod field;
pub mod fluid;
pub mod quad;
pub mod reference;
pub mod tone;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// ---------------------------------------------------------------------------
// DisplayMode — the tone response a display pipeline is built for
// ---------------------------------------------------------------------------

/// Which tone curve the display pass applies to a density sample.
///
/// Chosen once when a pipeline is built; every pixel of a draw uses the same
/// curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum DisplayMode {
    /// `clamp(d, 0, 1)`
    #[default]
    Linear,
    /// `max(d, 0) ^ 2.2`
    Gamma,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 2] = [DisplayMode::Linear, DisplayMode::Gamma];

    pub fn name(self) -> &'static str {
        match self {
            DisplayMode::Linear => "linear",
            DisplayMode::Gamma => "gamma",
        }
    }

    /// The other mode. Used by the viewer's toggle key.
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Linear => DisplayMode::Gamma,
            DisplayMode::Gamma => DisplayMode::Linear,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown display mode `{0}` (expected `linear` or `gamma`)")]
pub struct ParseDisplayModeError(pub String);

impl FromStr for DisplayMode {
    type Err = ParseDisplayModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(DisplayMode::Linear),
            "gamma" => Ok(DisplayMode::Gamma),
            _ => Err(ParseDisplayModeError(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Maps one density sample to one grayscale channel value.
///
/// Implemented by zero-sized types so that code generic over `C: Colorizer`
/// is monomorphized per mode and carries no per-pixel branch.
pub trait Colorizer: Send + Sync {
    const MODE: DisplayMode;

    fn channel(density: f32) -> f32;

    /// Full RGBA output: equal color channels, opaque alpha.
    #[inline]
    fn colorize(density: f32) -> [f32; 4] {
        let c = Self::channel(density);
        [c, c, c, 1.0]
    }
}
