//! Snapshot extraction FFI functions.

use super::LifeAutomaton;
use crate::automaton::{self, Region};

/// Copies a rectangular region of one history snapshot into a flat output buffer.
///
/// `generation` selects the snapshot (0 is the initial grid). The box is
/// half-open and clamped to the grid.
///
/// # Layout
/// The buffer is filled in z,y,x order (z changes slowest, x changes fastest).
/// This matches the layout read by `la_create_from_cells`.
///
/// # Safety
/// - `ptr` must be a valid pointer to an automaton, or null
/// - `out_buf` must point to at least `buf_len` writable bytes, or be null
///
/// # Returns
/// Number of bytes written, or 0 on error (null pointer, unknown generation,
/// empty box, or buffer too small).
#[no_mangle]
pub unsafe extern "C" fn la_extract_region(
    ptr: *const LifeAutomaton,
    generation: u64,
    out_buf: *mut u8,
    buf_len: usize,
    min_x: i16,
    min_y: i16,
    min_z: i16,
    max_x: i16,
    max_y: i16,
    max_z: i16,
) -> u64 {
    if ptr.is_null() || out_buf.is_null() {
        return 0;
    }

    let automaton = &*ptr;
    let Some(snapshot) = usize::try_from(generation)
        .ok()
        .and_then(|g| automaton.history().get(g))
    else {
        return 0;
    };

    let region = Region::new(
        [min_x as i64, min_y as i64, min_z as i64],
        [max_x as i64, max_y as i64, max_z as i64],
    );
    let buf_slice = std::slice::from_raw_parts_mut(out_buf, buf_len);
    automaton::extract_region(snapshot, region, buf_slice) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::{grid, lifecycle};
    use std::ptr;

    #[test]
    fn test_extract_region() {
        unsafe {
            let mut cells = vec![0u8; 512];
            cells[2 * 64 + 2 * 8 + 2] = 1;
            cells[2 * 64 + 2 * 8 + 3] = 1;
            let automaton = lifecycle::la_create_from_cells(8, 8, 8, 0, cells.as_ptr(), 512);

            let mut buffer = vec![0u8; 64];
            let bytes =
                la_extract_region(automaton, 0, buffer.as_mut_ptr(), 64, 2, 2, 2, 6, 6, 6);

            assert_eq!(bytes, 64);
            assert_eq!(buffer[0], 1);
            assert_eq!(buffer[1], 1);

            lifecycle::la_destroy(automaton);
        }
    }

    #[test]
    fn test_extract_past_generation() {
        unsafe {
            // Vertical blinker on a 5x5 plane
            let mut cells = vec![0u8; 25];
            for y in 1..4 {
                cells[y * 5 + 2] = 1;
            }
            let automaton = lifecycle::la_create_from_cells(5, 5, 1, 0, cells.as_ptr(), 25);
            assert_eq!(grid::la_step(automaton, 1), 0);

            let mut before = vec![0u8; 25];
            let mut after = vec![0u8; 25];
            assert_eq!(
                la_extract_region(automaton, 0, before.as_mut_ptr(), 25, 0, 0, 0, 5, 5, 1),
                25
            );
            assert_eq!(
                la_extract_region(automaton, 1, after.as_mut_ptr(), 25, 0, 0, 0, 5, 5, 1),
                25
            );
            assert_eq!(before, cells);
            assert_eq!(&after[10..15], &[0, 1, 1, 1, 0]);

            // Not produced yet
            assert_eq!(
                la_extract_region(automaton, 2, after.as_mut_ptr(), 25, 0, 0, 0, 5, 5, 1),
                0
            );

            lifecycle::la_destroy(automaton);
        }
    }

    #[test]
    fn test_small_buffer() {
        unsafe {
            let automaton = lifecycle::la_create(4, 4, 4, 0, 3, 0.5);
            let mut buffer = vec![0u8; 8];
            assert_eq!(
                la_extract_region(automaton, 0, buffer.as_mut_ptr(), 8, 0, 0, 0, 4, 4, 4),
                0
            );
            lifecycle::la_destroy(automaton);
        }
    }

    #[test]
    fn test_null_pointer_handling() {
        unsafe {
            let mut buffer = vec![0u8; 64];

            assert_eq!(
                la_extract_region(ptr::null(), 0, buffer.as_mut_ptr(), 64, 0, 0, 0, 4, 4, 4),
                0
            );
            let automaton = lifecycle::la_create(4, 4, 4, 0, 3, 0.5);
            assert_eq!(
                la_extract_region(automaton, 0, ptr::null_mut(), 64, 0, 0, 0, 4, 4, 4),
                0
            );
            lifecycle::la_destroy(automaton);
        }
    }
}
