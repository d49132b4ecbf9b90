//! Stable-fluids solver on a periodic square grid.
//!
//! Feeds the density texture; the display pass only ever sees `densities()`.

use std::mem;
use std::ops::{Index, IndexMut};

use glam::Vec2;
use ndarray::Array2;

use crate::field::DensityField;

/// Gauss–Seidel sweeps per diffuse / pressure solve.
const SOLVER_ITERATIONS: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cell {
    pub density: f32,
    pub velocity: Vec2,
}

/// Grids are indexed `[[x, y]]`.
#[derive(Debug, Clone)]
pub struct Fluid {
    pub diffusion: f32,
    pub viscosity: f32,
    pub size: usize,
    cells: Array2<Cell>,
    prev: Array2<Cell>,
    // Scratch for projection.
    divergence: Array2<f32>,
    pressure: Array2<f32>,
}

impl Fluid {
    pub fn new(diffusion: f32, viscosity: f32, size: usize) -> Self {
        assert!(size > 0, "fluid grid must be non-empty");
        let shape = (size, size);
        Self {
            diffusion,
            viscosity,
            size,
            cells: Array2::default(shape),
            prev: Array2::default(shape),
            divergence: Array2::zeros(shape),
            pressure: Array2::zeros(shape),
        }
    }

    /// Advance the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.diffuse(dt);
        self.project();
        self.advect(dt);
        self.project();
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
        self.prev.fill(Cell::default());
    }

    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    /// Densities in texture order: row-major, row 0 = grid y 0.
    pub fn densities(&self) -> impl Iterator<Item = f32> + '_ {
        // The transposed view walks y-major, x fastest.
        self.cells.t().into_iter().map(|c| c.density)
    }

    pub fn total_density(&self) -> f32 {
        self.cells.iter().map(|c| c.density).sum()
    }

    pub fn to_field(&self) -> DensityField {
        DensityField::from_array(self.cells.t().map(|c| c.density))
    }

    fn diffuse(&mut self, dt: f32) {
        mem::swap(&mut self.cells, &mut self.prev);

        let area = (self.size * self.size) as f32;
        let a_density = dt * self.diffusion * area;
        let a_velocity = dt * self.viscosity * area;

        for _ in 0..SOLVER_ITERATIONS {
            for y in 0..self.size {
                for x in 0..self.size {
                    let (i, j) = (x as isize, y as isize);
                    let l = wrapped(&self.cells, i - 1, j);
                    let r = wrapped(&self.cells, i + 1, j);
                    let d = wrapped(&self.cells, i, j - 1);
                    let u = wrapped(&self.cells, i, j + 1);
                    let p = self.prev[[x, y]];

                    let cell = &mut self.cells[[x, y]];
                    cell.density = (p.density
                        + a_density * (l.density + r.density + d.density + u.density))
                        / (1.0 + 4.0 * a_density);
                    cell.velocity = (p.velocity
                        + a_velocity * (l.velocity + r.velocity + d.velocity + u.velocity))
                        / (1.0 + 4.0 * a_velocity);
                }
            }
        }
    }

    fn project(&mut self) {
        let h = 1.0 / self.size as f32;

        let cells = &self.cells;
        for ((x, y), div) in self.divergence.indexed_iter_mut() {
            let (i, j) = (x as isize, y as isize);
            *div = -0.5
                * h
                * (wrapped(cells, i + 1, j).velocity.x - wrapped(cells, i - 1, j).velocity.x
                    + wrapped(cells, i, j + 1).velocity.y
                    - wrapped(cells, i, j - 1).velocity.y);
        }
        self.pressure.fill(0.0);

        for _ in 0..SOLVER_ITERATIONS {
            for y in 0..self.size {
                for x in 0..self.size {
                    let (i, j) = (x as isize, y as isize);
                    self.pressure[[x, y]] = 0.25
                        * (self.divergence[[x, y]]
                            + wrapped(&self.pressure, i - 1, j)
                            + wrapped(&self.pressure, i + 1, j)
                            + wrapped(&self.pressure, i, j - 1)
                            + wrapped(&self.pressure, i, j + 1));
                }
            }
        }

        let pressure = &self.pressure;
        for ((x, y), cell) in self.cells.indexed_iter_mut() {
            let (i, j) = (x as isize, y as isize);
            let gradient = Vec2::new(
                wrapped(pressure, i + 1, j) - wrapped(pressure, i - 1, j),
                wrapped(pressure, i, j + 1) - wrapped(pressure, i, j - 1),
            );
            cell.velocity -= 0.5 * gradient / h;
        }
    }

    fn advect(&mut self, dt: f32) {
        mem::swap(&mut self.cells, &mut self.prev);

        let dt_size = dt * self.size as f32;
        let prev = &self.prev;

        for ((x, y), cell) in self.cells.indexed_iter_mut() {
            let source = Vec2::new(x as f32, y as f32) - dt_size * prev[[x, y]].velocity;

            let left = source.x.floor() as isize;
            let bottom = source.y.floor() as isize;
            let s1 = source.x - left as f32;
            let s0 = 1.0 - s1;
            let t1 = source.y - bottom as f32;
            let t0 = 1.0 - t1;

            let bl = wrapped(prev, left, bottom);
            let br = wrapped(prev, left + 1, bottom);
            let tl = wrapped(prev, left, bottom + 1);
            let tr = wrapped(prev, left + 1, bottom + 1);

            *cell = Cell {
                density: s0 * (t0 * bl.density + t1 * tl.density)
                    + s1 * (t0 * br.density + t1 * tr.density),
                velocity: s0 * (t0 * bl.velocity + t1 * tl.velocity)
                    + s1 * (t0 * br.velocity + t1 * tr.velocity),
            };
        }
    }
}

/// Element of `grid` at `(i, j)` after wrapping both indices.
#[inline]
fn wrapped<T: Copy>(grid: &Array2<T>, i: isize, j: isize) -> T {
    let (width, height) = grid.dim();
    grid[[wrap_index(i, width), wrap_index(j, height)]]
}

/// Toroidal wrap of a signed grid index into `0..size`.
pub fn wrap_index(index: isize, size: usize) -> usize {
    index.rem_euclid(size as isize) as usize
}

impl Index<(isize, isize)> for Fluid {
    type Output = Cell;

    fn index(&self, (x, y): (isize, isize)) -> &Cell {
        &self.cells[[wrap_index(x, self.size), wrap_index(y, self.size)]]
    }
}

impl IndexMut<(isize, isize)> for Fluid {
    fn index_mut(&mut self, (x, y): (isize, isize)) -> &mut Cell {
        &mut self.cells[[wrap_index(x, self.size), wrap_index(y, self.size)]]
    }
}
