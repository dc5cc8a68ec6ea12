//! Neighborhood kernels.
//!
//! A kernel is a 3x3 (2D) or 3x3x3 (3D) weight mask centered on the cell being
//! updated. The center weight is always 0: a cell is never its own neighbor.

use crate::automaton::grid::{Dimension, Shape};
use crate::error::ConfigError;

/// Side length of every kernel.
pub const KERNEL_SIDE: usize = 3;

/// Which adjacent cells count as neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Neighborhood {
    /// Every adjacent cell including diagonals (8 in 2D, 26 in 3D).
    Moore,
    /// Axis-aligned adjacent cells only (4 in 2D, 6 in 3D).
    VonNeumann,
}

impl Neighborhood {
    fn includes(self, dz: isize, dy: isize, dx: isize) -> bool {
        if dz == 0 && dy == 0 && dx == 0 {
            return false;
        }
        match self {
            Neighborhood::Moore => true,
            Neighborhood::VonNeumann => dz.abs() + dy.abs() + dx.abs() == 1,
        }
    }
}

/// A neighbor offset in z, y, x order together with its weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub dz: isize,
    pub dy: isize,
    pub dx: isize,
    pub weight: u8,
}

/// Fixed weight mask over a cell's neighborhood.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "KernelParts")
)]
pub struct Kernel {
    dimension: Dimension,
    weights: Vec<u8>,
}

impl Kernel {
    /// Build a unit-weight kernel for the given neighborhood.
    pub fn new(dimension: Dimension, neighborhood: Neighborhood) -> Self {
        let layers = Self::layer_range(dimension);
        let mut weights = Vec::with_capacity(Self::weight_count(dimension));
        for dz in layers {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    weights.push(u8::from(neighborhood.includes(dz, dy, dx)));
                }
            }
        }
        Kernel { dimension, weights }
    }

    /// Build a kernel from a rank (2 or 3) and neighborhood.
    pub fn for_rank(rank: usize, neighborhood: Neighborhood) -> Result<Self, ConfigError> {
        Ok(Self::new(Dimension::from_rank(rank)?, neighborhood))
    }

    pub fn moore_2d() -> Self {
        Self::new(Dimension::Two, Neighborhood::Moore)
    }

    pub fn von_neumann_2d() -> Self {
        Self::new(Dimension::Two, Neighborhood::VonNeumann)
    }

    pub fn moore_3d() -> Self {
        Self::new(Dimension::Three, Neighborhood::Moore)
    }

    pub fn von_neumann_3d() -> Self {
        Self::new(Dimension::Three, Neighborhood::VonNeumann)
    }

    /// Build a kernel from explicit weights in z, y, x order.
    pub fn from_weights(dimension: Dimension, weights: Vec<u8>) -> Result<Self, ConfigError> {
        let expected = Self::weight_count(dimension);
        if weights.len() != expected {
            return Err(ConfigError::KernelSize {
                dimension,
                expected,
                got: weights.len(),
            });
        }
        let center = weights[expected / 2];
        if center != 0 {
            return Err(ConfigError::KernelCenter(center));
        }
        Ok(Kernel { dimension, weights })
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Raw weights in z, y, x order.
    pub fn weights(&self) -> &[u8] {
        &self.weights
    }

    /// Weight at an offset, 0 outside the footprint.
    pub fn weight(&self, dz: isize, dy: isize, dx: isize) -> u8 {
        let layers = Self::layer_range(self.dimension);
        let in_footprint = |d: isize| (-1..=1).contains(&d);
        if !in_footprint(dy) || !in_footprint(dx) || !layers.contains(&dz) {
            return 0;
        }
        let side = KERNEL_SIDE as isize;
        let layer = dz - *layers.start();
        self.weights[(layer * side * side + (dy + 1) * side + (dx + 1)) as usize]
    }

    /// Sum of all weights.
    pub fn weight_sum(&self) -> u32 {
        self.weights.iter().map(|&w| u32::from(w)).sum()
    }

    /// Non-zero offsets with their weights.
    pub fn offsets(&self) -> Vec<Offset> {
        let mut offsets = Vec::new();
        for dz in Self::layer_range(self.dimension) {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let weight = self.weight(dz, dy, dx);
                    if weight != 0 {
                        offsets.push(Offset { dz, dy, dx, weight });
                    }
                }
            }
        }
        offsets
    }

    /// Fail unless the kernel can be applied to a grid of `shape`.
    pub fn check_shape(&self, shape: &Shape) -> Result<(), ConfigError> {
        if self.dimension != shape.dimension() {
            return Err(ConfigError::DimensionMismatch {
                kernel: self.dimension,
                grid: shape.dimension(),
            });
        }
        Ok(())
    }

    fn weight_count(dimension: Dimension) -> usize {
        KERNEL_SIDE.pow(dimension.rank() as u32)
    }

    fn layer_range(dimension: Dimension) -> std::ops::RangeInclusive<isize> {
        match dimension {
            Dimension::Two => 0..=0,
            Dimension::Three => -1..=1,
        }
    }
}

/// Unvalidated wire form of a [`Kernel`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct KernelParts {
    dimension: Dimension,
    weights: Vec<u8>,
}

#[cfg(feature = "serde")]
impl TryFrom<KernelParts> for Kernel {
    type Error = ConfigError;

    fn try_from(parts: KernelParts) -> Result<Self, ConfigError> {
        Kernel::from_weights(parts.dimension, parts.weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moore_2d_matches_mask() {
        assert_eq!(Kernel::moore_2d().weights(), &[1, 1, 1, 1, 0, 1, 1, 1, 1]);
        assert_eq!(Kernel::moore_2d().weight_sum(), 8);
    }

    #[test]
    fn test_von_neumann_2d_matches_mask() {
        assert_eq!(
            Kernel::von_neumann_2d().weights(),
            &[0, 1, 0, 1, 0, 1, 0, 1, 0]
        );
        assert_eq!(Kernel::von_neumann_2d().weight_sum(), 4);
    }

    #[test]
    fn test_3d_neighbor_counts() {
        let moore = Kernel::moore_3d();
        assert_eq!(moore.weights().len(), 27);
        assert_eq!(moore.weight_sum(), 26);
        assert_eq!(moore.weight(0, 0, 0), 0);
        assert_eq!(moore.weight(-1, -1, -1), 1);

        let von_neumann = Kernel::von_neumann_3d();
        assert_eq!(von_neumann.weight_sum(), 6);
        assert_eq!(von_neumann.weight(1, 0, 0), 1);
        assert_eq!(von_neumann.weight(1, 1, 0), 0);
    }

    #[test]
    fn test_2d_kernel_has_no_depth() {
        let kernel = Kernel::moore_2d();
        assert_eq!(kernel.weight(1, 0, 1), 0);
        assert!(kernel.offsets().iter().all(|o| o.dz == 0));
        assert_eq!(kernel.offsets().len(), 8);
    }

    #[test]
    fn test_for_rank_rejects_unsupported() {
        assert_eq!(
            Kernel::for_rank(4, Neighborhood::Moore),
            Err(ConfigError::UnsupportedRank(4))
        );
        assert_eq!(
            Kernel::for_rank(3, Neighborhood::VonNeumann),
            Ok(Kernel::von_neumann_3d())
        );
    }

    #[test]
    fn test_from_weights_validation() {
        assert_eq!(
            Kernel::from_weights(Dimension::Two, vec![1; 8]),
            Err(ConfigError::KernelSize {
                dimension: Dimension::Two,
                expected: 9,
                got: 8
            })
        );
        assert_eq!(
            Kernel::from_weights(Dimension::Two, vec![1; 9]),
            Err(ConfigError::KernelCenter(1))
        );

        let weighted =
            Kernel::from_weights(Dimension::Two, vec![1, 2, 1, 2, 0, 2, 1, 2, 1]).unwrap();
        assert_eq!(weighted.weight_sum(), 12);
        assert_eq!(weighted.weight(-1, 0, 0), 0);
        assert_eq!(weighted.weight(0, -1, 0), 2);
    }

    #[test]
    fn test_check_shape() {
        let volume = Shape::new_3d(4, 4, 4).unwrap();
        assert_eq!(
            Kernel::moore_2d().check_shape(&volume),
            Err(ConfigError::DimensionMismatch {
                kernel: Dimension::Two,
                grid: Dimension::Three
            })
        );
        assert!(Kernel::moore_3d().check_shape(&volume).is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_kernel_serde_validates() {
        let kernel = Kernel::von_neumann_3d();
        let json = serde_json::to_string(&kernel).unwrap();
        assert_eq!(serde_json::from_str::<Kernel>(&json).unwrap(), kernel);

        let short = r#"{"dimension":"Two","weights":[1,1,1]}"#;
        assert!(serde_json::from_str::<Kernel>(short).is_err(), "short mask must be rejected");

        let centered = r#"{"dimension":"Two","weights":[1,1,1,1,1,1,1,1,1]}"#;
        assert!(serde_json::from_str::<Kernel>(centered).is_err(), "self weight must be rejected");
    }
}
