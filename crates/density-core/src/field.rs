use glam::Vec2;
use ndarray::Array2;

/// How texture coordinates outside [0, 1] resolve to a texel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressMode {
    #[default]
    ClampToEdge,
    Repeat,
    MirrorRepeat,
}

impl AddressMode {
    /// Resolve a (possibly out-of-range) texel index into `0..size`.
    pub fn resolve(self, index: i64, size: usize) -> usize {
        let n = size as i64;
        let i = match self {
            AddressMode::ClampToEdge => index.clamp(0, n - 1),
            AddressMode::Repeat => index.rem_euclid(n),
            AddressMode::MirrorRepeat => {
                let period = index.rem_euclid(2 * n);
                if period < n {
                    period
                } else {
                    2 * n - 1 - period
                }
            }
        };
        i as usize
    }
}

/// A grid of scalar densities, the CPU-side image of the density texture.
/// Stored as an `(height, width)` array indexed `[[y, x]]`, so its logical
/// order is texture order. Row 0 is sampled at texture v = 0, which the
/// display pass puts at the bottom of the view.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityField {
    data: Array2<f32>,
}

impl DensityField {
    /// Zero-filled field.
    pub fn new(width: usize, height: usize) -> Self {
        Self::uniform(width, height, 0.0)
    }

    pub fn uniform(width: usize, height: usize, value: f32) -> Self {
        Self::from_array(Array2::from_elem((height, width), value))
    }

    /// Build a field by evaluating `f(x, y)` at every texel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        Self::from_array(Array2::from_shape_fn((height, width), |(y, x)| f(x, y)))
    }

    /// Wrap an `(height, width)` array.
    pub fn from_array(data: Array2<f32>) -> Self {
        assert!(!data.is_empty(), "density field must be non-empty");
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn as_array(&self) -> &Array2<f32> {
        &self.data
    }

    /// Texels in upload order: row-major, row 0 first.
    pub fn texels(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[[y, x]]
    }

    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        self.data[[y, x]] = value;
    }

    /// Nearest-texel sample at normalized coordinate `coord`.
    pub fn sample(&self, coord: Vec2, address: AddressMode) -> f32 {
        let (width, height) = (self.width(), self.height());
        let x = (coord.x * width as f32).floor() as i64;
        let y = (coord.y * height as f32).floor() as i64;
        self.get(address.resolve(x, width), address.resolve(y, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> DensityField {
        // 4×1 field: 0.0, 0.25, 0.5, 0.75
        DensityField::from_fn(4, 1, |x, _| x as f32 * 0.25)
    }

    #[test]
    fn from_fn_is_row_major() {
        let f = DensityField::from_fn(3, 2, |x, y| (y * 10 + x) as f32);
        assert_eq!(f.texels(), vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(f.get(2, 1), 12.0);
        assert_eq!((f.width(), f.height()), (3, 2));
        assert_eq!(f.as_array().dim(), (2, 3));
    }

    #[test]
    fn set_then_get() {
        let mut f = DensityField::new(2, 2);
        f.set(1, 0, 0.7);
        assert_eq!(f.get(1, 0), 0.7);
        assert_eq!(f.get(0, 1), 0.0);
    }

    #[test]
    fn sample_picks_nearest_texel() {
        let f = ramp();
        assert_eq!(f.sample(Vec2::new(0.0, 0.5), AddressMode::ClampToEdge), 0.0);
        assert_eq!(f.sample(Vec2::new(0.3, 0.5), AddressMode::ClampToEdge), 0.25);
        assert_eq!(f.sample(Vec2::new(0.99, 0.5), AddressMode::ClampToEdge), 0.75);
    }

    #[test]
    fn upper_edge_resolves_per_address_mode() {
        // u = 1.0 lands one texel past the end.
        let f = ramp();
        let edge = Vec2::new(1.0, 0.5);
        assert_eq!(f.sample(edge, AddressMode::ClampToEdge), 0.75);
        assert_eq!(f.sample(edge, AddressMode::Repeat), 0.0);
        assert_eq!(f.sample(edge, AddressMode::MirrorRepeat), 0.75);
    }

    #[test]
    fn resolve_negative_indices() {
        assert_eq!(AddressMode::ClampToEdge.resolve(-3, 4), 0);
        assert_eq!(AddressMode::Repeat.resolve(-1, 4), 3);
        assert_eq!(AddressMode::MirrorRepeat.resolve(-1, 4), 0);
        assert_eq!(AddressMode::MirrorRepeat.resolve(-5, 4), 3);
    }

    #[test]
    fn resolve_large_indices() {
        assert_eq!(AddressMode::ClampToEdge.resolve(99, 4), 3);
        assert_eq!(AddressMode::Repeat.resolve(9, 4), 1);
        assert_eq!(AddressMode::MirrorRepeat.resolve(6, 4), 1);
    }

    #[test]
    #[should_panic(expected = "non-empty")]
    fn empty_field_is_rejected() {
        DensityField::new(0, 4);
    }

    #[test]
    fn texels_follow_logical_order_of_a_column_major_array() {
        use ndarray::ShapeBuilder;

        let column_major = Array2::from_shape_fn((2, 3).f(), |(y, x)| (y * 10 + x) as f32);
        let f = DensityField::from_array(column_major);
        assert_eq!(f.texels(), vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
    }
}
