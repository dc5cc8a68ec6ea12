//! Stepping and cell access.

use tracing::warn;

use super::LifeAutomaton;

/// Advances the automaton by `count` generations.
///
/// # Safety
/// - `ptr` must be a valid pointer to an automaton, or null
///
/// # Returns
/// 0 on success, 1 on null pointer, 2 if a step failed. Steps completed
/// before a failure are kept.
#[no_mangle]
pub unsafe extern "C" fn la_step(ptr: *mut LifeAutomaton, count: u32) -> i32 {
    if ptr.is_null() {
        return 1;
    }

    let automaton = &mut *ptr;
    match automaton.step_n(count as usize) {
        Ok(_) => 0,
        Err(error) => {
            warn!(%error, "la_step failed");
            2
        }
    }
}

/// Gets the state of a cell in the current grid (0 = dead, 1 = alive).
///
/// For a 2D automaton only `z = 0` is in bounds.
///
/// # Safety
/// - `ptr` must be a valid pointer to an automaton, or null
///
/// # Returns
/// 0 if out of bounds, null pointer, or dead; 1 if alive.
#[no_mangle]
pub unsafe extern "C" fn la_get_cell(ptr: *const LifeAutomaton, x: i16, y: i16, z: i16) -> u8 {
    if ptr.is_null() {
        return 0;
    }

    let automaton = &*ptr;
    let shape = automaton.shape();
    if !shape.in_bounds(z as isize, y as isize, x as isize) {
        return 0;
    }

    let idx = shape.index_of(z as usize, y as usize, x as usize);
    automaton.grid().cells()[idx]
}

/// Gets the number of stored snapshots, including the initial grid.
///
/// # Safety
/// - `ptr` must be a valid pointer to an automaton, or null
///
/// # Returns
/// The history length, or 0 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn la_history_len(ptr: *const LifeAutomaton) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).history().len() as u64
}
