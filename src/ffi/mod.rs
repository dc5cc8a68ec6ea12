//! C FFI layer for render front ends.
//!
//! This module exports C ABI functions over a Life automaton so scripts that
//! draw frames can create, step and read snapshots without linking Rust.
//! All functions are marked with `#[no_mangle]` and use `extern "C"`.
//!
//! The actual logic is in the `automaton` module. These functions are thin wrappers
//! that handle null checks, pointer safety, and C-to-Rust conversions.

pub mod grid;
pub mod lifecycle;
pub mod region;

use crate::automaton::{Boundary, CellularAutomaton, Kernel, Shape};
use crate::rules::LifeRule;

pub use grid::{la_get_cell, la_history_len, la_step};
pub use lifecycle::{la_create, la_create_from_cells, la_destroy, la_get_generation};
pub use region::la_extract_region;

/// The automaton behind every FFI handle.
pub type LifeAutomaton = CellularAutomaton<LifeRule>;

/// Shape, kernel and rule for C-side dimensions.
///
/// A depth of 1 gives a 2D B3/S23 grid; anything deeper gives 3D B4/S4.
/// Returns `None` for non-positive extents.
fn life_setup(width: i16, height: i16, depth: i16) -> Option<(Shape, Kernel, LifeRule)> {
    if width <= 0 || height <= 0 || depth <= 0 {
        return None;
    }
    let (width, height, depth) = (width as usize, height as usize, depth as usize);
    if depth == 1 {
        Some((Shape::new_2d(height, width).ok()?, Kernel::moore_2d(), LifeRule::conway()))
    } else {
        Some((
            Shape::new_3d(depth, height, width).ok()?,
            Kernel::moore_3d(),
            LifeRule::life_3d(),
        ))
    }
}

fn boundary_from(toroidal: u8) -> Boundary {
    if toroidal != 0 {
        Boundary::Toroidal
    } else {
        Boundary::Fixed
    }
}
