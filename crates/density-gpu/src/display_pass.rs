use std::sync::Arc;

use density_core::DisplayMode;
use wgpu::{BindGroup, BindGroupLayout, Device, RenderPipeline, TextureFormat, TextureView};

use crate::quad::{QuadBuffer, QuadVertex};
use crate::shaders::{display_shader_source, FS_ENTRY, VS_ENTRY};

pub const DENSITY_TEXTURE_BINDING: u32 = 0;
pub const DENSITY_SAMPLER_BINDING: u32 = 1;

/// Objects every [`DisplayPass`] on one device shares: the bind group layout
/// and the quad vertex buffer. Built once; passes hold it through an `Arc`, so
/// rebuilding a pass for another mode reuses both.
pub struct DisplayResources {
    bind_group_layout: BindGroupLayout,
    quad: QuadBuffer,
}

impl DisplayResources {
    pub fn new(device: &Device) -> Arc<Self> {
        Arc::new(Self {
            bind_group_layout: create_bind_group_layout(device),
            quad: QuadBuffer::new(device),
        })
    }

    pub fn bind_group_layout(&self) -> &BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn quad(&self) -> &QuadBuffer {
        &self.quad
    }
}

/// Full-screen density visualisation: one render pipeline for one display
/// mode, the shared quad it draws, and the density texture + sampler it reads.
///
/// The texture view and sampler are bound when the pass is built and stay
/// bound for its lifetime. To change mode, build a new pass from the same
/// [`DisplayResources`].
pub struct DisplayPass {
    mode: DisplayMode,
    target_format: TextureFormat,
    pipeline: RenderPipeline,
    bind_group: BindGroup,
    resources: Arc<DisplayResources>,
}

impl DisplayPass {
    pub fn new(
        device: &Device,
        resources: &Arc<DisplayResources>,
        target_format: TextureFormat,
        mode: DisplayMode,
        density_view: &TextureView,
        density_sampler: &wgpu::Sampler,
    ) -> Self {
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("display_bg"),
            layout: &resources.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: DENSITY_TEXTURE_BINDING,
                    resource: wgpu::BindingResource::TextureView(density_view),
                },
                wgpu::BindGroupEntry {
                    binding: DENSITY_SAMPLER_BINDING,
                    resource: wgpu::BindingResource::Sampler(density_sampler),
                },
            ],
        });

        let pipeline = build_pipeline(device, &resources.bind_group_layout, target_format, mode);
        log::debug!("Built {mode} display pipeline for {target_format:?}");

        Self {
            mode,
            target_format,
            pipeline,
            bind_group,
            resources: Arc::clone(resources),
        }
    }

    pub fn resources(&self) -> &Arc<DisplayResources> {
        &self.resources
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn target_format(&self) -> TextureFormat {
        self.target_format
    }

    /// Record the full-screen draw into `encoder`, writing every pixel of
    /// `target` exactly once.
    pub fn record(&self, encoder: &mut wgpu::CommandEncoder, target: &TextureView) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("display_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.resources.quad.buffer.slice(..));
        rpass.draw(0..QuadBuffer::VERTEX_COUNT, 0..1);
    }
}

// binding 0 : r32float density texture (unfilterable)
// binding 1 : non-filtering sampler
fn create_bind_group_layout(device: &Device) -> BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("display_bgl"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: DENSITY_TEXTURE_BINDING,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: false },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: DENSITY_SAMPLER_BINDING,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::NonFiltering),
                count: None,
            },
        ],
    })
}

fn build_pipeline(
    device: &Device,
    bind_group_layout: &BindGroupLayout,
    target_format: TextureFormat,
    mode: DisplayMode,
) -> RenderPipeline {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("display_pl"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(mode.name()),
        source: wgpu::ShaderSource::Wgsl(display_shader_source(mode).into()),
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("display_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: VS_ENTRY,
            buffers: &[QuadVertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: FS_ENTRY,
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                // Each pixel is written once; nothing to blend with.
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            strip_index_format: None,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
