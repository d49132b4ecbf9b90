use clap::Parser;
use density_core::DisplayMode;

/// Interactive viewer for a 2D fluid density field.
#[derive(Parser, Debug, Clone)]
#[command(name = "density-viewer", version)]
pub struct Config {
    /// Tone response of the display pass: `linear` or `gamma`.
    #[arg(long, default_value = "linear")]
    pub display_mode: DisplayMode,

    /// Simulation grid size (cells per side).
    #[arg(long, default_value_t = 200, value_parser = clap::value_parser!(u32).range(2..=2048))]
    pub resolution: u32,

    /// Window edge length in logical pixels.
    #[arg(long, default_value_t = 800)]
    pub window_size: u32,

    /// Density diffusion rate.
    #[arg(long, default_value_t = 0.0)]
    pub diffusion: f32,

    /// Velocity diffusion rate.
    #[arg(long, default_value_t = 0.0)]
    pub viscosity: f32,

    /// Brush radius in normalised device units.
    #[arg(long, default_value_t = 0.1)]
    pub brush_radius: f32,

    /// Density added per second under the brush.
    #[arg(long, default_value_t = 1.0)]
    pub brush_density: f32,
}
