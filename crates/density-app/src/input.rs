use density_core::fluid::Fluid;
use glam::Vec2;

// ---------------------------------------------------------------------------
// Key — windowing-library-independent key representation
// ---------------------------------------------------------------------------

/// A keyboard key, independent of any windowing library.
///
/// `main.rs` maps `winit::keyboard::PhysicalKey` → `Key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    G,
    C,
    Q,
    Escape,
}

/// High-level action produced by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    ToggleDisplayMode,
    ClearField,
    Quit,
}

pub fn action_for_key(key: Key) -> InputAction {
    match key {
        Key::G => InputAction::ToggleDisplayMode,
        Key::C => InputAction::ClearField,
        Key::Q | Key::Escape => InputAction::Quit,
    }
}

// ---------------------------------------------------------------------------
// Coordinate conversions (pure, testable)
// ---------------------------------------------------------------------------

/// Window position (logical pixels, y down) → normalised device coords (y up).
pub fn window_to_normalized(x: f32, y: f32, window_width: f32, window_height: f32) -> Vec2 {
    Vec2::new(x / window_width * 2.0 - 1.0, 1.0 - y / window_height * 2.0)
}

/// Lower-left corner of cell `(i, j)` in normalised device coords.
pub fn cell_to_normalized(i: isize, j: isize, resolution: usize) -> Vec2 {
    Vec2::new(i as f32, j as f32) / resolution as f32 * 2.0 - 1.0
}

/// Centre of cell `(i, j)` in normalised device coords.
pub fn cell_center_to_normalized(i: isize, j: isize, resolution: usize) -> Vec2 {
    cell_to_normalized(i, j, resolution) + Vec2::splat(1.0 / resolution as f32)
}

pub fn normalized_to_cell(position: Vec2, resolution: usize) -> (isize, isize) {
    let cell = (position * 0.5 + 0.5) * resolution as f32;
    (cell.x.floor() as isize, cell.y.floor() as isize)
}

// ---------------------------------------------------------------------------
// Brush
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    /// Radius in normalised device units.
    pub radius: f32,
    /// Density added per second.
    pub density: f32,
}

impl Brush {
    /// Add density and momentum to every cell whose centre lies strictly
    /// within `radius` of `cursor`. Cells outside the grid wrap around.
    /// Returns how many cells were painted.
    pub fn paint(&self, fluid: &mut Fluid, cursor: Vec2, cursor_velocity: Vec2, dt: f32) -> usize {
        let resolution = fluid.size;
        let reach = (self.radius * resolution as f32 / 2.0).ceil() as isize;
        let (ci, cj) = normalized_to_cell(cursor, resolution);
        let radius_sq = self.radius * self.radius;

        let mut painted = 0;
        for i in (ci - reach)..=(ci + reach) {
            for j in (cj - reach)..=(cj + reach) {
                if cell_center_to_normalized(i, j, resolution).distance_squared(cursor) < radius_sq {
                    let cell = &mut fluid[(i, j)];
                    cell.density += self.density * dt;
                    cell.velocity += cursor_velocity;
                    painted += 1;
                }
            }
        }
        painted
    }
}

/// Cursor tracking between frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pointer {
    pub position: Vec2,
    pub velocity: Vec2,
    pub pressed: bool,
}

impl Pointer {
    /// Move to `position`; velocity is the displacement over `dt`.
    pub fn move_to(&mut self, position: Vec2, dt: f32) {
        if dt > 0.0 {
            self.velocity = (position - self.position) / dt;
        }
        self.position = position;
    }
}
