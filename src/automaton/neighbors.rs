//! Neighbor counting by kernel correlation.
//!
//! Each non-zero kernel offset contributes one whole-grid shifted add of a
//! 0/1 mask, processed as contiguous x-runs rather than per-cell neighborhood
//! scans. Every cell sees exactly the same boundary treatment.

use crate::automaton::grid::{Grid, Shape};
use crate::automaton::kernel::{Kernel, Offset};
use crate::error::ConfigError;

/// How neighbors beyond the grid edge are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Boundary {
    /// Opposite edges are adjacent; indices wrap modulo the extent.
    Toroidal,
    /// Cells outside the grid contribute nothing.
    #[default]
    Fixed,
}

/// Weighted count of neighbors holding `code`, one entry per cell in z, y, x order.
///
/// Fails if the kernel and grid dimensionality differ.
pub fn neighbor_counts(
    grid: &Grid,
    kernel: &Kernel,
    boundary: Boundary,
    code: u8,
) -> Result<Vec<u32>, ConfigError> {
    kernel.check_shape(grid.shape())?;
    Ok(count_code(grid, kernel, boundary, code))
}

/// Neighbor counts for every code in `0..states`, one layer per code.
pub fn neighbor_counts_by_state(
    grid: &Grid,
    kernel: &Kernel,
    boundary: Boundary,
    states: u8,
) -> Result<Vec<Vec<u32>>, ConfigError> {
    kernel.check_shape(grid.shape())?;
    Ok((0..states)
        .map(|code| count_code(grid, kernel, boundary, code))
        .collect())
}

/// Count without re-checking dimensionality. Callers validate once up front.
pub(crate) fn count_code(grid: &Grid, kernel: &Kernel, boundary: Boundary, code: u8) -> Vec<u32> {
    let mask: Vec<u32> = grid
        .cells()
        .iter()
        .map(|&c| u32::from(c == code))
        .collect();
    correlate(&mask, grid.shape(), kernel, boundary)
}

/// `out[c] = sum over offsets o of weight(o) * mask[c + o]`.
fn correlate(mask: &[u32], shape: &Shape, kernel: &Kernel, boundary: Boundary) -> Vec<u32> {
    let mut out = vec![0u32; mask.len()];
    for offset in kernel.offsets() {
        shifted_add(&mut out, mask, shape, offset, boundary);
    }
    out
}

fn shifted_add(dst: &mut [u32], src: &[u32], shape: &Shape, offset: Offset, boundary: Boundary) {
    let width = shape.width();
    let weight = u32::from(offset.weight);

    for z in 0..shape.depth() {
        let Some(sz) = resolve(z, offset.dz, shape.depth(), boundary) else {
            continue;
        };
        for y in 0..shape.height() {
            let Some(sy) = resolve(y, offset.dy, shape.height(), boundary) else {
                continue;
            };
            let dst_start = shape.index_of(z, y, 0);
            let src_start = shape.index_of(sz, sy, 0);
            add_row(
                &mut dst[dst_start..dst_start + width],
                &src[src_start..src_start + width],
                offset.dx,
                weight,
                boundary,
            );
        }
    }
}

/// Source index along one axis, or `None` when it falls outside a fixed edge.
#[inline]
fn resolve(i: usize, delta: isize, extent: usize, boundary: Boundary) -> Option<usize> {
    let j = i as isize + delta;
    match boundary {
        Boundary::Toroidal => Some(j.rem_euclid(extent as isize) as usize),
        Boundary::Fixed => (0..extent as isize).contains(&j).then_some(j as usize),
    }
}

/// `dst[x] += weight * src[x + dx]` over one row.
fn add_row(dst: &mut [u32], src: &[u32], dx: isize, weight: u32, boundary: Boundary) {
    let width = dst.len();
    match boundary {
        Boundary::Toroidal => {
            let s = dx.rem_euclid(width as isize) as usize;
            accumulate(&mut dst[..width - s], &src[s..], weight);
            accumulate(&mut dst[width - s..], &src[..s], weight);
        }
        Boundary::Fixed => {
            let s = dx.unsigned_abs();
            if s >= width {
                return;
            }
            if dx >= 0 {
                accumulate(&mut dst[..width - s], &src[s..], weight);
            } else {
                accumulate(&mut dst[s..], &src[..width - s], weight);
            }
        }
    }
}

#[inline]
fn accumulate(dst: &mut [u32], src: &[u32], weight: u32) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d += weight * s;
    }
}
