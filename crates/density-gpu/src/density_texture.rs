use density_core::field::{AddressMode, DensityField};

/// Single-channel float texture holding the density grid, refreshed from the
/// simulation before each display pass.
pub struct DensityTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

impl DensityTexture {
    /// `R32Float` is not filterable without an optional feature, so the
    /// display pass samples it through a non-filtering sampler.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R32Float;

    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("density_texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::COPY_DST | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&Default::default());
        Self {
            texture,
            view,
            width,
            height,
        }
    }

    /// Copy `densities` (row-major, `width * height` values) into the texture.
    pub fn upload(&self, queue: &wgpu::Queue, densities: &[f32]) {
        assert_eq!(
            densities.len(),
            (self.width * self.height) as usize,
            "density upload does not match a {}×{} texture",
            self.width,
            self.height
        );

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(densities),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(std::mem::size_of::<f32>() as u32 * self.width),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }

    pub fn upload_field(&self, queue: &wgpu::Queue, field: &DensityField) {
        self.upload(queue, &field.texels());
    }
}

pub fn wgpu_address_mode(mode: AddressMode) -> wgpu::AddressMode {
    match mode {
        AddressMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        AddressMode::Repeat => wgpu::AddressMode::Repeat,
        AddressMode::MirrorRepeat => wgpu::AddressMode::MirrorRepeat,
    }
}

/// Nearest-filtering sampler compatible with [`DensityTexture::FORMAT`].
pub fn create_density_sampler(device: &wgpu::Device, address: AddressMode) -> wgpu::Sampler {
    let mode = wgpu_address_mode(address);
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("density_sampler"),
        address_mode_u: mode,
        address_mode_v: mode,
        address_mode_w: mode,
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}
