//! Region extraction from grid snapshots.
//!
//! Renderers pull axis-aligned boxes (typically one z-layer of a 3D grid)
//! out of history snapshots without copying whole grids.

use crate::automaton::grid::{Grid, Shape};

/// An axis-aligned box, half-open on every axis, in x, y, z order.
///
/// Coordinates are signed so callers can pass boxes that overhang the grid;
/// they are clamped on use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub min: [i64; 3],
    pub max: [i64; 3],
}

impl Region {
    pub fn new(min: [i64; 3], max: [i64; 3]) -> Self {
        Region { min, max }
    }

    /// The whole of `shape`.
    pub fn full(shape: &Shape) -> Self {
        Region {
            min: [0, 0, 0],
            max: [
                shape.width() as i64,
                shape.height() as i64,
                shape.depth() as i64,
            ],
        }
    }

    /// One z-layer of `shape`.
    pub fn layer(shape: &Shape, z: usize) -> Self {
        let mut region = Self::full(shape);
        region.min[2] = z as i64;
        region.max[2] = z as i64 + 1;
        region
    }

    /// Clamp to `shape`, returning `None` for an empty or inverted box.
    fn clamp(&self, shape: &Shape) -> Option<([usize; 3], [usize; 3])> {
        let extents = [shape.width(), shape.height(), shape.depth()];
        let mut min = [0usize; 3];
        let mut max = [0usize; 3];
        for axis in 0..3 {
            let extent = extents[axis] as i64;
            min[axis] = self.min[axis].clamp(0, extent) as usize;
            max[axis] = self.max[axis].clamp(0, extent) as usize;
            if min[axis] >= max[axis] {
                return None;
            }
        }
        Some((min, max))
    }

    /// Number of cells the box covers after clamping to `shape`.
    pub fn volume(&self, shape: &Shape) -> usize {
        self.clamp(shape)
            .map_or(0, |(min, max)| (0..3).map(|a| max[a] - min[a]).product())
    }
}

/// Copy a region of `grid` into `out_buf`.
///
/// The buffer is filled in z,y,x order (z changes slowest, x changes fastest).
///
/// # Returns
/// Number of cells written, or 0 if the region is empty or the buffer is too small.
pub fn extract_region(grid: &Grid, region: Region, out_buf: &mut [u8]) -> usize {
    let shape = grid.shape();
    let Some((min, max)) = region.clamp(shape) else {
        return 0;
    };

    let total_size = region.volume(shape);
    if out_buf.len() < total_size {
        return 0;
    }

    let run = max[0] - min[0];
    let mut offset = 0;
    for z in min[2]..max[2] {
        for y in min[1]..max[1] {
            let start = shape.index_of(z, y, min[0]);
            out_buf[offset..offset + run].copy_from_slice(&grid.cells()[start..start + run]);
            offset += run;
        }
    }

    offset
}

impl Grid {
    /// Copy one z-layer of a 3D grid as a 2D grid. `None` if `z` is out of range.
    ///
    /// For a 2D grid, layer 0 is the grid itself.
    pub fn layer(&self, z: usize) -> Option<Grid> {
        let shape = self.shape();
        if z >= shape.depth() {
            return None;
        }
        let region = Region::layer(shape, z);
        let mut cells = vec![0; region.volume(shape)];
        extract_region(self, region, &mut cells);
        let layer_shape = Shape::new_2d(shape.height(), shape.width()).ok()?;
        Grid::from_cells(layer_shape, cells).ok()
    }
}
