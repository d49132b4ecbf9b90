use density_core::reference::Image;
use half::f16;
use wgpu::{Adapter, TextureFormat, TextureUsages};

use crate::context::{GpuContext, GpuError};
use crate::display_pass::DisplayPass;

/// Color formats [`render_to_image`] can decode, most precise first.
pub const READBACK_FORMATS: [TextureFormat; 3] = [
    TextureFormat::Rgba32Float,
    TextureFormat::Rgba16Float,
    TextureFormat::Rgba8Unorm,
];

/// First entry of [`READBACK_FORMATS`] accepted by `is_renderable`.
pub fn choose_readback_format(
    is_renderable: impl Fn(TextureFormat) -> bool,
) -> Result<TextureFormat, GpuError> {
    READBACK_FORMATS
        .into_iter()
        .find(|&format| is_renderable(format))
        .ok_or(GpuError::NoReadbackFormat)
}

/// The most precise readback format `adapter` can render to and copy from.
/// Build the [`DisplayPass`] passed to [`render_to_image`] with this format.
pub fn readback_format(adapter: &Adapter) -> Result<TextureFormat, GpuError> {
    let format = choose_readback_format(|format| {
        adapter
            .get_texture_format_features(format)
            .allowed_usages
            .contains(TextureUsages::RENDER_ATTACHMENT | TextureUsages::COPY_SRC)
    })?;
    log::debug!("Readback format: {format:?}");
    Ok(format)
}

/// Size of one texel of a readback format, `None` for formats that cannot be
/// decoded.
pub fn bytes_per_pixel(format: TextureFormat) -> Option<u32> {
    match format {
        TextureFormat::Rgba32Float => Some(16),
        TextureFormat::Rgba16Float => Some(8),
        TextureFormat::Rgba8Unorm => Some(4),
        _ => None,
    }
}

/// Bytes per row in the staging buffer, padded to the copy alignment.
pub fn padded_bytes_per_row(width: u32, bytes_per_pixel: u32) -> u32 {
    let unpadded = width * bytes_per_pixel;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Append the RGBA texels of one tightly packed row of `format` to `pixels`.
fn decode_row(format: TextureFormat, row: &[u8], pixels: &mut Vec<[f32; 4]>) {
    match format {
        TextureFormat::Rgba32Float => {
            let texels: &[f32] = bytemuck::cast_slice(row);
            pixels.extend(texels.chunks_exact(4).map(|c| [c[0], c[1], c[2], c[3]]));
        }
        TextureFormat::Rgba16Float => {
            let texels: &[f16] = bytemuck::cast_slice(row);
            pixels.extend(
                texels
                    .chunks_exact(4)
                    .map(|c| [c[0].to_f32(), c[1].to_f32(), c[2].to_f32(), c[3].to_f32()]),
            );
        }
        TextureFormat::Rgba8Unorm => {
            pixels.extend(
                row.chunks_exact(4)
                    .map(|c| [c[0], c[1], c[2], c[3]].map(|b| f32::from(b) / 255.0)),
            );
        }
        _ => unreachable!("{format:?} has no readback decoder"),
    }
}

/// Draw `pass` into a `width` × `height` offscreen target and copy the
/// result back to the CPU. Blocks until the GPU has finished.
///
/// The pass must target one of [`READBACK_FORMATS`]; anything else is
/// rejected with [`GpuError::UnsupportedFormat`] before touching the GPU.
pub fn render_to_image(
    ctx: &GpuContext,
    pass: &DisplayPass,
    width: u32,
    height: u32,
) -> Result<Image, GpuError> {
    let format = pass.target_format();
    let texel_size = bytes_per_pixel(format).ok_or(GpuError::UnsupportedFormat(format))?;

    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let target = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("readback_target"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: TextureUsages::RENDER_ATTACHMENT | TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let target_view = target.create_view(&Default::default());

    let padded = padded_bytes_per_row(width, texel_size);
    let staging = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("readback_staging"),
        size: padded as u64 * height as u64,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("readback-encoder"),
        });
    pass.record(&mut encoder, &target_view);
    encoder.copy_texture_to_buffer(
        wgpu::ImageCopyTexture {
            texture: &target,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::ImageCopyBuffer {
            buffer: &staging,
            layout: wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(padded),
                rows_per_image: Some(height),
            },
        },
        size,
    );
    ctx.queue.submit(std::iter::once(encoder.finish()));

    let slice = staging.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    let _ = ctx.device.poll(wgpu::Maintain::Wait);
    rx.recv().map_err(|_| GpuError::ReadbackLost)??;

    let unpadded = (width * texel_size) as usize;
    let mut pixels = Vec::with_capacity((width * height) as usize);
    {
        let data = slice.get_mapped_range();
        for row in data.chunks_exact(padded as usize) {
            decode_row(format, &row[..unpadded], &mut pixels);
        }
    }
    staging.unmap();

    Ok(Image {
        width,
        height,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_padded_to_copy_alignment() {
        assert_eq!(padded_bytes_per_row(1, 16), 256);
        assert_eq!(padded_bytes_per_row(16, 16), 256);
        assert_eq!(padded_bytes_per_row(17, 16), 512);
        assert_eq!(padded_bytes_per_row(32, 8), 256);
        assert_eq!(padded_bytes_per_row(65, 4), 512);
    }

    #[test]
    fn every_readback_format_has_a_texel_size() {
        let sizes = READBACK_FORMATS.map(bytes_per_pixel);
        assert_eq!(sizes, [Some(16), Some(8), Some(4)]);
        assert_eq!(bytes_per_pixel(TextureFormat::Bgra8Unorm), None);
        assert_eq!(bytes_per_pixel(TextureFormat::R32Float), None);
    }

    #[test]
    fn prefers_full_precision_float() {
        assert_eq!(
            choose_readback_format(|_| true).unwrap(),
            TextureFormat::Rgba32Float
        );
    }

    #[test]
    fn falls_back_when_float32_is_not_renderable() {
        let format = choose_readback_format(|f| f != TextureFormat::Rgba32Float).unwrap();
        assert_eq!(format, TextureFormat::Rgba16Float);

        let format = choose_readback_format(|f| f == TextureFormat::Rgba8Unorm).unwrap();
        assert_eq!(format, TextureFormat::Rgba8Unorm);
    }

    #[test]
    fn no_renderable_format_is_an_error() {
        assert!(matches!(
            choose_readback_format(|_| false),
            Err(GpuError::NoReadbackFormat)
        ));
    }

    #[test]
    fn decodes_each_format_to_the_same_pixels() {
        let expected = [[0.0, 0.25, 1.0, 1.0], [0.5, 0.5, 0.5, 1.0]];
        let full = [0.0f32, 0.25, 1.0, 1.0, 0.5, 0.5, 0.5, 1.0];
        let halves = full.map(f16::from_f32);

        let mut pixels = Vec::new();
        decode_row(TextureFormat::Rgba32Float, bytemuck::cast_slice(&full), &mut pixels);
        assert_eq!(pixels, expected);

        let mut pixels = Vec::new();
        decode_row(TextureFormat::Rgba16Float, bytemuck::cast_slice(&halves), &mut pixels);
        assert_eq!(pixels, expected);

        let mut pixels = Vec::new();
        decode_row(TextureFormat::Rgba8Unorm, &[0, 255, 128, 255], &mut pixels);
        assert_eq!(pixels[0][0], 0.0);
        assert_eq!(pixels[0][1], 1.0);
        assert!((pixels[0][2] - 0.5).abs() < 1.0 / 255.0);
        assert_eq!(pixels[0][3], 1.0);
    }
}
