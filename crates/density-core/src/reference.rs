//! CPU rendition of the display pass.
//!
//! Evaluates the same quad → interpolant → colorizer chain as the GPU
//! pipeline, one pixel at a time, so images can be checked without a device.

use crate::field::{AddressMode, DensityField};
use crate::quad::{pixel_center_clip, tex_coord};
use crate::tone::{Gamma, Linear};
use crate::{Colorizer, DisplayMode};

/// An RGBA32F image, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[f32; 4]>,
}

impl Image {
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 4] {
        self.pixels[(y * self.width + x) as usize]
    }

    /// True if every pixel has R = G = B and A = 1.
    pub fn is_opaque_grayscale(&self) -> bool {
        self.pixels
            .iter()
            .all(|&[r, g, b, a]| r.to_bits() == g.to_bits() && g.to_bits() == b.to_bits() && a == 1.0)
    }
}

/// Render `field` into a `width` × `height` image with colorizer `C`.
pub fn render<C: Colorizer>(
    field: &DensityField,
    address: AddressMode,
    width: u32,
    height: u32,
) -> Image {
    let mut pixels = Vec::with_capacity((width * height) as usize);
    for py in 0..height {
        for px in 0..width {
            let uv = tex_coord(pixel_center_clip(px, py, width, height));
            pixels.push(C::colorize(field.sample(uv, address)));
        }
    }
    Image {
        width,
        height,
        pixels,
    }
}

/// Dispatch once on `mode` to the monomorphized renderer.
pub fn render_mode(
    mode: DisplayMode,
    field: &DensityField,
    address: AddressMode,
    width: u32,
    height: u32,
) -> Image {
    match mode {
        DisplayMode::Linear => render::<Linear>(field, address, width, height),
        DisplayMode::Gamma => render::<Gamma>(field, address, width, height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_quarter_density_linear() {
        let field = DensityField::uniform(8, 8, 0.25);
        let img = render::<Linear>(&field, AddressMode::ClampToEdge, 16, 12);
        assert_eq!(img.pixels.len(), 16 * 12);
        assert!(img.pixels.iter().all(|&p| p == [0.25, 0.25, 0.25, 1.0]));
    }

    #[test]
    fn uniform_quarter_density_gamma() {
        let field = DensityField::uniform(8, 8, 0.25);
        let img = render::<Gamma>(&field, AddressMode::ClampToEdge, 16, 12);
        for [r, _, _, a] in &img.pixels {
            assert!((r - 0.04736).abs() < 1e-4, "got {r}");
            assert_eq!(*a, 1.0);
        }
        assert!(img.is_opaque_grayscale());
    }

    #[test]
    fn rerender_is_bit_identical() {
        let field = DensityField::from_fn(5, 7, |x, y| (x as f32 - y as f32) * 0.3);
        for mode in DisplayMode::ALL {
            let a = render_mode(mode, &field, AddressMode::Repeat, 13, 9);
            let b = render_mode(mode, &field, AddressMode::Repeat, 13, 9);
            let bits = |img: &Image| -> Vec<u32> {
                img.pixels.iter().flatten().map(|c| c.to_bits()).collect()
            };
            assert_eq!(bits(&a), bits(&b), "mode {mode}");
        }
    }

    #[test]
    fn bottom_row_of_field_is_bottom_of_image() {
        // Field row 0 = 1.0, row 1 = 0.0; 2×2 output maps 1:1.
        let field = DensityField::from_fn(2, 2, |_, y| if y == 0 { 1.0 } else { 0.0 });
        let img = render::<Linear>(&field, AddressMode::ClampToEdge, 2, 2);
        assert_eq!(img.pixel(0, 1)[0], 1.0, "bottom-left");
        assert_eq!(img.pixel(1, 1)[0], 1.0, "bottom-right");
        assert_eq!(img.pixel(0, 0)[0], 0.0, "top-left");
    }

    #[test]
    fn left_column_of_field_is_left_of_image() {
        let field = DensityField::from_fn(2, 2, |x, _| if x == 0 { 1.0 } else { 0.0 });
        let img = render::<Linear>(&field, AddressMode::ClampToEdge, 4, 4);
        assert_eq!(img.pixel(0, 2)[0], 1.0);
        assert_eq!(img.pixel(3, 2)[0], 0.0);
    }

    #[test]
    fn out_of_range_densities_stay_grayscale() {
        let field = DensityField::from_fn(4, 4, |x, y| match (x + y) % 4 {
            0 => -2.0,
            1 => f32::INFINITY,
            2 => f32::NAN,
            _ => 7.5,
        });
        for mode in DisplayMode::ALL {
            for address in [
                AddressMode::ClampToEdge,
                AddressMode::Repeat,
                AddressMode::MirrorRepeat,
            ] {
                let img = render_mode(mode, &field, address, 8, 8);
                assert!(img.is_opaque_grayscale(), "{mode} {address:?}");
                assert!(img.pixels.iter().all(|p| !p[0].is_nan()), "{mode} {address:?}");
            }
        }
    }

    #[test]
    fn linear_image_never_leaves_unit_range() {
        let field = DensityField::from_fn(3, 3, |x, y| x as f32 - y as f32 * 1.5);
        let img = render::<Linear>(&field, AddressMode::ClampToEdge, 9, 9);
        assert!(img.pixels.iter().all(|p| (0.0..=1.0).contains(&p[0])));
    }
}
