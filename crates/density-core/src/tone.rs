use crate::{Colorizer, DisplayMode};

/// Display gamma exponent used by [`Gamma`].
pub const DISPLAY_GAMMA: f32 = 2.2;

/// `clamp(d, 0, 1)`; saturates overshoot instead of wrapping.
///
/// NaN maps to 0 (`f32::max` returns the non-NaN operand).
#[inline]
pub fn linear(density: f32) -> f32 {
    density.max(0.0).min(1.0)
}

/// `max(d, 0) ^ 2.2`.
///
/// Negative density is clamped to 0 before the power so a negative base never
/// produces NaN. Values above 1 are not clamped; `+inf` stays `+inf`.
#[inline]
pub fn gamma(density: f32) -> f32 {
    density.max(0.0).powf(DISPLAY_GAMMA)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

#[derive(Debug, Clone, Copy, Default)]
pub struct Gamma;

impl Colorizer for Linear {
    const MODE: DisplayMode = DisplayMode::Linear;

    #[inline]
    fn channel(density: f32) -> f32 {
        linear(density)
    }
}

impl Colorizer for Gamma {
    const MODE: DisplayMode = DisplayMode::Gamma;

    #[inline]
    fn channel(density: f32) -> f32 {
        gamma(density)
    }
}
