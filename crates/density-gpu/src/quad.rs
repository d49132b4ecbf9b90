use density_core::quad::QUAD_POSITIONS;
use wgpu::util::DeviceExt;

/// One full-screen quad vertex. Must match `@location(0)` in the display
/// shader's vertex stage.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
}

impl QuadVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Strip-ordered vertices covering clip space.
pub fn quad_vertices() -> [QuadVertex; 4] {
    QUAD_POSITIONS.map(|p| QuadVertex {
        position: p.to_array(),
    })
}

/// The 4-vertex buffer, created once and drawn as a triangle strip.
pub struct QuadBuffer {
    pub buffer: wgpu::Buffer,
}

impl QuadBuffer {
    pub const VERTEX_COUNT: u32 = 4;

    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("fullscreen_quad"),
            contents: bytemuck::cast_slice(&quad_vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self { buffer }
    }
}
