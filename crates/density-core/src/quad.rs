use glam::{Vec2, Vec4};

/// Full-screen quad as a triangle strip: bottom-left, bottom-right,
/// top-left, top-right.
pub const QUAD_POSITIONS: [Vec2; 4] = [
    Vec2::new(-1.0, -1.0),
    Vec2::new(1.0, -1.0),
    Vec2::new(-1.0, 1.0),
    Vec2::new(1.0, 1.0),
];

/// Homogeneous clip-space position for a quad vertex (z = 0, w = 1).
#[inline]
pub fn clip_position(position: Vec2) -> Vec4 {
    position.extend(0.0).extend(1.0)
}

/// Texture coordinate for a clip-space position: `p * 0.5 + 0.5`.
///
/// Maps [-1, 1]² onto [0, 1]² with no half-texel offset.
#[inline]
pub fn tex_coord(position: Vec2) -> Vec2 {
    position * 0.5 + 0.5
}

/// Clip-space position of the centre of pixel `(px, py)` in a
/// `width` × `height` target, with row 0 at the top of the target.
///
/// This is where the rasterizer evaluates the interpolant for that pixel.
pub fn pixel_center_clip(px: u32, py: u32, width: u32, height: u32) -> Vec2 {
    let x = (px as f32 + 0.5) / width as f32 * 2.0 - 1.0;
    let y = 1.0 - (py as f32 + 0.5) / height as f32 * 2.0;
    Vec2::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_map_exactly_to_texture_corners() {
        let coords: Vec<Vec2> = QUAD_POSITIONS.iter().map(|&p| tex_coord(p)).collect();
        assert_eq!(coords[0], Vec2::new(0.0, 0.0));
        assert_eq!(coords[1], Vec2::new(1.0, 0.0));
        assert_eq!(coords[2], Vec2::new(0.0, 1.0));
        assert_eq!(coords[3], Vec2::new(1.0, 1.0));
    }

    #[test]
    fn tex_coord_is_half_position_plus_half() {
        for p in [Vec2::ZERO, Vec2::new(0.5, -0.25), Vec2::new(-1.0, 0.75)] {
            assert_eq!(tex_coord(p), p / 2.0 + 0.5, "p={p}");
        }
    }

    #[test]
    fn clip_position_extends_with_zero_and_one() {
        for p in QUAD_POSITIONS {
            let c = clip_position(p);
            assert_eq!(c, Vec4::new(p.x, p.y, 0.0, 1.0));
        }
    }

    #[test]
    fn mapping_preserves_orientation() {
        // Moving right/up in clip space moves right/up in texture space.
        let a = tex_coord(Vec2::new(-0.5, -0.5));
        let b = tex_coord(Vec2::new(0.5, 0.5));
        assert!(b.x > a.x && b.y > a.y, "a={a} b={b}");
    }

    #[test]
    fn strip_uses_every_corner_once() {
        for x in [-1.0, 1.0] {
            for y in [-1.0, 1.0] {
                let n = QUAD_POSITIONS
                    .iter()
                    .filter(|p| **p == Vec2::new(x, y))
                    .count();
                assert_eq!(n, 1, "corner ({x}, {y})");
            }
        }
    }

    #[test]
    fn pixel_centres_stay_inside_clip_space() {
        let top_left = pixel_center_clip(0, 0, 4, 4);
        let bottom_right = pixel_center_clip(3, 3, 4, 4);
        assert_eq!(top_left, Vec2::new(-0.75, 0.75));
        assert_eq!(bottom_right, Vec2::new(0.75, -0.75));
    }
}
