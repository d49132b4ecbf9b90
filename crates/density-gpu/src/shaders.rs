//! WGSL for the density display pass.
//!
//! Both display modes share the quad vertex stage and the bindings; each mode
//! has its own fragment stage, so switching modes means building a different
//! pipeline rather than branching per pixel.

use density_core::DisplayMode;

pub const VS_ENTRY: &str = "vs_main";
pub const FS_ENTRY: &str = "fs_main";

pub const QUAD_VS_WGSL: &str = r#"
struct VertexOut {
    @builtin(position) pos: vec4<f32>,
    @location(0)       uv:  vec2<f32>,
};

@vertex
fn vs_main(@location(0) position: vec2<f32>) -> VertexOut {
    var out: VertexOut;
    out.pos = vec4<f32>(position, 0.0, 1.0);
    out.uv  = position * 0.5 + 0.5;
    return out;
}

@group(0) @binding(0) var t_density: texture_2d<f32>;
@group(0) @binding(1) var s_density: sampler;
"#;

pub const LINEAR_FS_WGSL: &str = r#"
@fragment
fn fs_main(in: VertexOut) -> @location(0) vec4<f32> {
    let value = clamp(textureSample(t_density, s_density, in.uv).x, 0.0, 1.0);
    return vec4<f32>(value, value, value, 1.0);
}
"#;

pub const GAMMA_FS_WGSL: &str = r#"
const DISPLAY_GAMMA: f32 = 2.2;

@fragment
fn fs_main(in: VertexOut) -> @location(0) vec4<f32> {
    // Negative bases are undefined for pow.
    let value = max(textureSample(t_density, s_density, in.uv).x, 0.0);
    let color = pow(value, DISPLAY_GAMMA);
    return vec4<f32>(color, color, color, 1.0);
}
"#;

pub fn fragment_source(mode: DisplayMode) -> &'static str {
    match mode {
        DisplayMode::Linear => LINEAR_FS_WGSL,
        DisplayMode::Gamma => GAMMA_FS_WGSL,
    }
}

/// Complete shader module source for one display mode.
pub fn display_shader_source(mode: DisplayMode) -> String {
    format!("{QUAD_VS_WGSL}{}", fragment_source(mode))
}
