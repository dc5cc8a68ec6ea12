//! Automaton creation, destruction, and generation queries.

use std::slice;

use tracing::warn;

use super::{boundary_from, life_setup, LifeAutomaton};
use crate::automaton::{CellularAutomaton, Grid};
use crate::config::AutomatonConfig;

/// Creates a Life automaton with a random initial grid and returns an opaque pointer.
///
/// A `depth` of 1 gives a 2D B3/S23 grid, anything deeper a 3D B4/S4 grid.
/// Cells start alive with probability `density`, drawn from `seed`.
///
/// # Returns
/// A pointer to a new automaton, or null if the dimensions or density are invalid.
///
/// # Safety
/// The returned pointer must eventually be freed with `la_destroy()`.
#[no_mangle]
pub extern "C" fn la_create(
    width: i16,
    height: i16,
    depth: i16,
    toroidal: u8,
    seed: u64,
    density: f64,
) -> *mut LifeAutomaton {
    let Some((shape, kernel, rule)) = life_setup(width, height, depth) else {
        return std::ptr::null_mut();
    };
    let config = AutomatonConfig::new(seed).with_boundary(boundary_from(toroidal));

    let automaton = rule
        .with_initial_density(density)
        .and_then(|rule| CellularAutomaton::from_rule(rule, shape, kernel, config));
    match automaton {
        Ok(automaton) => Box::into_raw(Box::new(automaton)),
        Err(error) => {
            warn!(%error, "la_create rejected configuration");
            std::ptr::null_mut()
        }
    }
}

/// Creates a Life automaton from caller-supplied initial cells.
///
/// # Layout
/// `cells` is read in z,y,x order (z changes slowest, x changes fastest),
/// matching `la_extract_region`. Input values are normalized: 0 = dead,
/// non-zero = alive.
///
/// # Safety
/// - `cells` must point to at least `len` readable bytes, or be null
/// - The returned pointer must eventually be freed with `la_destroy()`
///
/// # Returns
/// A pointer to a new automaton, or null if `cells` is null or `len` does
/// not equal `width * height * depth`.
#[no_mangle]
pub unsafe extern "C" fn la_create_from_cells(
    width: i16,
    height: i16,
    depth: i16,
    toroidal: u8,
    cells: *const u8,
    len: usize,
) -> *mut LifeAutomaton {
    if cells.is_null() {
        return std::ptr::null_mut();
    }
    let Some((shape, kernel, rule)) = life_setup(width, height, depth) else {
        return std::ptr::null_mut();
    };

    let input = slice::from_raw_parts(cells, len);
    let normalized = input.iter().map(|&c| u8::from(c != 0)).collect();
    let config = AutomatonConfig::default().with_boundary(boundary_from(toroidal));

    let automaton = Grid::from_cells(shape, normalized)
        .and_then(|grid| CellularAutomaton::new(grid, kernel, rule, config));
    match automaton {
        Ok(automaton) => Box::into_raw(Box::new(automaton)),
        Err(error) => {
            warn!(%error, "la_create_from_cells rejected input");
            std::ptr::null_mut()
        }
    }
}

/// Destroys an automaton and frees its memory.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `la_create*()`, or null
/// - `ptr` must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn la_destroy(ptr: *mut LifeAutomaton) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}

/// Gets the number of completed steps.
///
/// # Safety
/// - `ptr` must be a valid pointer to an automaton, or null
///
/// # Returns
/// The generation counter, or 0 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn la_get_generation(ptr: *const LifeAutomaton) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).generation()
}
