//! Core automaton logic and grid operations.
//!
//! This module contains the grid, kernels, neighbor counting and the stepping
//! engine. The FFI layer in `ffi/` and the ensemble runner call into it.

pub mod grid;
pub mod kernel;
pub mod neighbors;
pub mod region;
pub mod stepping;

pub use grid::{Dimension, Grid, Shape};
pub use kernel::{Kernel, Neighborhood, Offset};
pub use neighbors::{neighbor_counts, neighbor_counts_by_state, Boundary};
pub use region::{extract_region, Region};
pub use stepping::{CellularAutomaton, Phase};
