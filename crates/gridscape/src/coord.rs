//! Cell coordinates and linear index mapping.
//!
//! Grid cells are addressed either by a 3D coordinate or by a linear index
//! into the cell array. The mapping is row-major with x varying fastest, and
//! is bijective over the grid dimensions.

use serde::{Deserialize, Serialize};

/// Integer coordinate of a cell within a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    /// Cell index along the X axis
    pub x: i32,
    /// Cell index along the Y axis
    pub y: i32,
    /// Cell index along the Z axis
    pub z: i32,
}

impl CellCoord {
    /// Create a new cell coordinate.
    #[must_use]
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Offset this coordinate by the given deltas.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Cell counts per axis for a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDims {
    /// Cell count along the X axis
    pub x: usize,
    /// Cell count along the Y axis
    pub y: usize,
    /// Cell count along the Z axis
    pub z: usize,
}

impl GridDims {
    /// Create new grid dimensions.
    #[must_use]
    pub fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.x * self.y * self.z
    }

    /// Whether the grid holds no cells at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }

    /// Check whether a coordinate lies within these dimensions.
    #[must_use]
    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.z >= 0
            && (coord.x as usize) < self.x
            && (coord.y as usize) < self.y
            && (coord.z as usize) < self.z
    }

    /// Map a coordinate to its linear index (x fastest-varying).
    ///
    /// Returns `None` for coordinates outside the dimensions.
    #[must_use]
    pub fn linear_index(&self, coord: CellCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let (x, y, z) = (coord.x as usize, coord.y as usize, coord.z as usize);
        Some(x + self.x * (y + self.y * z))
    }

    /// Map a linear index back to its coordinate.
    ///
    /// The inverse of [`GridDims::linear_index`] for all valid indices.
    ///
    /// # Panics
    /// Panics if `index >= cell_count()`.
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn coord_of(&self, index: usize) -> CellCoord {
        assert!(index < self.cell_count(), "index {index} out of range");
        let x = index % self.x;
        let y = (index / self.x) % self.y;
        let z = index / (self.x * self.y);
        CellCoord::new(x as i32, y as i32, z as i32)
    }
}
