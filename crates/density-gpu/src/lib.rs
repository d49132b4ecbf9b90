pub mod context;
pub mod density_texture;
pub mod display_pass;
pub mod quad;
pub mod readback;
pub mod shaders;

pub use context::{GpuContext, GpuError};
pub use density_texture::DensityTexture;
pub use display_pass::{DisplayPass, DisplayResources};
