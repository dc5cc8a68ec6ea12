//! Grid shapes, cell storage and index helpers.

use std::fmt;

use crate::error::ConfigError;

/// Dimensionality of a grid or kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dimension {
    /// Planar grid, `(height, width)`.
    Two,
    /// Volumetric grid, `(depth, height, width)`.
    Three,
}

impl Dimension {
    /// Map a rank (number of axes) to a dimension.
    pub fn from_rank(rank: usize) -> Result<Self, ConfigError> {
        match rank {
            2 => Ok(Dimension::Two),
            3 => Ok(Dimension::Three),
            other => Err(ConfigError::UnsupportedRank(other)),
        }
    }

    /// Number of axes.
    pub fn rank(self) -> usize {
        match self {
            Dimension::Two => 2,
            Dimension::Three => 3,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.rank())
    }
}

/// Extents of a grid.
///
/// Cells are laid out z-major, then y, then x (x changes fastest). A 2D shape
/// is stored with a depth of 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<usize>", into = "Vec<usize>")
)]
pub struct Shape {
    dimension: Dimension,
    depth: usize,
    height: usize,
    width: usize,
}

impl Shape {
    /// A 2D shape.
    pub fn new_2d(height: usize, width: usize) -> Result<Self, ConfigError> {
        Self::from_extents(&[height, width])
    }

    /// A 3D shape.
    pub fn new_3d(depth: usize, height: usize, width: usize) -> Result<Self, ConfigError> {
        Self::from_extents(&[depth, height, width])
    }

    /// Build a shape from extents in `[depth,] height, width` order.
    pub fn from_extents(extents: &[usize]) -> Result<Self, ConfigError> {
        let dimension = Dimension::from_rank(extents.len())?;
        if let Some(axis) = extents.iter().position(|&e| e == 0) {
            return Err(ConfigError::EmptyExtent { axis });
        }

        let (depth, height, width) = match *extents {
            [height, width] => (1, height, width),
            [depth, height, width] => (depth, height, width),
            _ => unreachable!("rank checked above"),
        };

        Ok(Shape {
            dimension,
            depth,
            height,
            width,
        })
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Extents in the order the shape was built with.
    pub fn extents(&self) -> Vec<usize> {
        match self.dimension {
            Dimension::Two => vec![self.height, self.width],
            Dimension::Three => vec![self.depth, self.height, self.width],
        }
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.depth * self.height * self.width
    }

    /// Always false: every extent is positive.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calculate the linear index for a z, y, x coordinate.
    #[inline]
    pub fn index_of(&self, z: usize, y: usize, x: usize) -> usize {
        z * self.height * self.width + y * self.width + x
    }

    /// Inverse of [`Shape::index_of`].
    #[inline]
    pub fn coords_of(&self, index: usize) -> (usize, usize, usize) {
        let plane = self.height * self.width;
        (index / plane, (index % plane) / self.width, index % self.width)
    }

    /// Check if signed z, y, x coordinates are within bounds.
    #[inline]
    pub fn in_bounds(&self, z: isize, y: isize, x: isize) -> bool {
        z >= 0
            && (z as usize) < self.depth
            && y >= 0
            && (y as usize) < self.height
            && x >= 0
            && (x as usize) < self.width
    }

    /// Linear index of a coordinate given in `[depth,] height, width` order.
    ///
    /// Returns `None` when the coordinate has the wrong rank or is out of bounds.
    pub fn index(&self, coord: &[usize]) -> Option<usize> {
        let (z, y, x) = match (self.dimension, coord) {
            (Dimension::Two, &[y, x]) => (0, y, x),
            (Dimension::Three, &[z, y, x]) => (z, y, x),
            _ => return None,
        };
        if z < self.depth && y < self.height && x < self.width {
            Some(self.index_of(z, y, x))
        } else {
            None
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dimension {
            Dimension::Two => write!(f, "{}x{}", self.height, self.width),
            Dimension::Three => write!(f, "{}x{}x{}", self.depth, self.height, self.width),
        }
    }
}

impl TryFrom<Vec<usize>> for Shape {
    type Error = ConfigError;

    fn try_from(extents: Vec<usize>) -> Result<Self, ConfigError> {
        Shape::from_extents(&extents)
    }
}

impl From<Shape> for Vec<usize> {
    fn from(shape: Shape) -> Self {
        shape.extents()
    }
}

/// A fixed-shape array of cell codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    shape: Shape,
    cells: Vec<u8>,
}

impl Grid {
    /// A grid with every cell set to code 0.
    pub fn new(shape: Shape) -> Self {
        Self::filled(shape, 0)
    }

    /// A grid with every cell set to `code`.
    pub fn filled(shape: Shape, code: u8) -> Self {
        let cells = vec![code; shape.len()];
        Grid { shape, cells }
    }

    /// Wrap an existing buffer laid out in z, y, x order.
    pub fn from_cells(shape: Shape, cells: Vec<u8>) -> Result<Self, ConfigError> {
        if cells.len() != shape.len() {
            return Err(ConfigError::CellCount {
                expected: shape.len(),
                got: cells.len(),
            });
        }
        Ok(Grid { shape, cells })
    }

    /// Build a 2D grid from equally sized rows.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, ConfigError> {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let shape = Shape::new_2d(rows.len(), width)?;
        let cells: Vec<u8> = rows
            .iter()
            .flat_map(|row| row.as_ref().iter().copied())
            .collect();
        Self::from_cells(shape, cells)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Cells in z, y, x order.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get the code at a coordinate, `None` if out of bounds.
    pub fn get(&self, coord: &[usize]) -> Option<u8> {
        self.shape.index(coord).map(|idx| self.cells[idx])
    }

    /// Set the code at a coordinate. Returns false if out of bounds.
    pub fn set(&mut self, coord: &[usize], code: u8) -> bool {
        match self.shape.index(coord) {
            Some(idx) => {
                self.cells[idx] = code;
                true
            }
            None => false,
        }
    }

    /// Number of cells holding `code`.
    pub fn count(&self, code: u8) -> usize {
        self.cells.iter().filter(|&&c| c == code).count()
    }

    /// Build a same-shaped grid by mapping every cell, stopping at the first error.
    ///
    /// The closure receives the linear index and the current code.
    pub fn try_map<E, F>(&self, mut f: F) -> Result<Grid, E>
    where
        F: FnMut(usize, u8) -> Result<u8, E>,
    {
        let cells = self
            .cells
            .iter()
            .enumerate()
            .map(|(idx, &code)| f(idx, code))
            .collect::<Result<Vec<u8>, E>>()?;
        Ok(Grid {
            shape: self.shape.clone(),
            cells,
        })
    }

    /// Cyclically shift the grid by `offset` (in `[depth,] height, width` order).
    ///
    /// The cell at `c` moves to `c + offset`, wrapping at every edge.
    pub fn rolled(&self, offset: &[isize]) -> Grid {
        let (dz, dy, dx) = match *offset {
            [dy, dx] => (0, dy, dx),
            [dz, dy, dx] => (dz, dy, dx),
            _ => (0, 0, 0),
        };
        let shape = &self.shape;
        let wrap = |i: usize, d: isize, extent: usize| {
            (i as isize + d).rem_euclid(extent as isize) as usize
        };

        let mut cells = vec![0; self.cells.len()];
        for (idx, &code) in self.cells.iter().enumerate() {
            let (z, y, x) = shape.coords_of(idx);
            let target = shape.index_of(
                wrap(z, dz, shape.depth),
                wrap(y, dy, shape.height),
                wrap(x, dx, shape.width),
            );
            cells[target] = code;
        }
        Grid {
            shape: shape.clone(),
            cells,
        }
    }
}
