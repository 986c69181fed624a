//! The uniform voxel grid and its builder.
//!
//! A [`Grid`] covers a bounded region with equally sized cells. Each cell is
//! tagged at build time with static occupancy (cell center inside any static
//! geometry bounds), the dynamic objects near its center, and an open
//! property bag seeded with the standard walkability/cover/terrain keys.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::coord::{CellCoord, GridDims};
use crate::value::Value;
use crate::world::{DynamicObject, ObjectId, StaticGeometry};

/// Property key: whether the cell can be stood in (`!static_occupancy`).
pub const PROP_IS_WALKABLE: &str = "isWalkable";
/// Property key: whether the cell offers cover (`static_occupancy`).
pub const PROP_HAS_COVER: &str = "hasCover";
/// Property key: terrain classification of the cell.
pub const PROP_TERRAIN_TYPE: &str = "terrainType";

/// Errors from grid construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// The requested region has a non-positive size component.
    #[error("invalid region size {size:?}: all components must be positive")]
    InvalidRegion {
        /// The offending size
        size: Vec3,
    },
    /// The requested cell size is not positive.
    #[error("invalid cell size {cell_size}: must be positive")]
    InvalidCellSize {
        /// The offending cell size
        cell_size: f32,
    },
}

/// Configuration for building a grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Center of the voxelized region
    pub region_center: Vec3,
    /// Full extents of the voxelized region
    pub region_size: Vec3,
    /// Edge length of each cubic cell
    pub cell_size: f32,
    /// Explicit cell counts; takes precedence over size-driven counts
    pub dims_override: Option<GridDims>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            region_center: Vec3::ZERO,
            region_size: Vec3::splat(10.0),
            cell_size: 1.0,
            dims_override: None,
        }
    }
}

impl GridConfig {
    /// Create a config with default region and cell size.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the region center and size.
    #[must_use]
    pub fn with_region(mut self, center: Vec3, size: Vec3) -> Self {
        self.region_center = center;
        self.region_size = size;
        self
    }

    /// Set the cell size.
    #[must_use]
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Override the cell counts per axis.
    #[must_use]
    pub fn with_dims(mut self, dims: GridDims) -> Self {
        self.dims_override = Some(dims);
        self
    }
}

/// One voxel of the grid.
///
/// Created during grid construction and immutable afterwards, except for the
/// runtime collections cleared by [`Grid::clear_runtime_state`] at teardown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    /// World-space position of the voxel center
    pub position: Vec3,
    /// Coordinate of this cell within the grid
    pub coord: CellCoord,
    /// Whether the cell center falls inside any static geometry
    pub static_occupancy: bool,
    /// Dynamic objects whose position is within one cell size of the center
    pub dynamic_occupants: Vec<ObjectId>,
    /// Open property bag; always carries the standard keys
    pub properties: BTreeMap<String, Value>,
}

impl Cell {
    /// Whether the cell is considered walkable.
    #[must_use]
    pub fn is_walkable(&self) -> bool {
        self.properties
            .get(PROP_IS_WALKABLE)
            .and_then(Value::as_bool)
            .unwrap_or(!self.static_occupancy)
    }

    /// Whether the cell is considered to offer cover.
    #[must_use]
    pub fn has_cover(&self) -> bool {
        self.properties
            .get(PROP_HAS_COVER)
            .and_then(Value::as_bool)
            .unwrap_or(self.static_occupancy)
    }

    /// Look up a property by key.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// Summary counts for a built grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridStats {
    /// Total number of cells
    pub cell_count: usize,
    /// Cells whose center is inside static geometry
    pub occupied_count: usize,
    /// Total cell-to-object occupancy links
    pub occupant_links: usize,
}

/// A uniform voxel grid over a world region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    cell_size: f32,
    origin: Vec3,
    dims: GridDims,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid from a configuration and a frozen geometry snapshot.
    ///
    /// Cell counts per axis are `ceil(region_size / cell_size)` unless
    /// `dims_override` is set, in which case the override wins (including a
    /// zero-cell override, which yields a valid empty grid). Cell centers sit
    /// at `origin + (coord + 0.5) * cell_size`.
    ///
    /// # Errors
    /// [`GridError::InvalidRegion`] if any region size component is not
    /// positive; [`GridError::InvalidCellSize`] if the cell size is not
    /// positive. Both are rejected before any allocation.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn build(
        config: &GridConfig,
        statics: &[StaticGeometry],
        dynamics: &[DynamicObject],
    ) -> Result<Self, GridError> {
        let size = config.region_size;
        if size.x <= 0.0 || size.y <= 0.0 || size.z <= 0.0 {
            return Err(GridError::InvalidRegion { size });
        }
        if config.cell_size <= 0.0 {
            return Err(GridError::InvalidCellSize {
                cell_size: config.cell_size,
            });
        }

        let dims = config.dims_override.unwrap_or_else(|| {
            GridDims::new(
                (size.x / config.cell_size).ceil() as usize,
                (size.y / config.cell_size).ceil() as usize,
                (size.z / config.cell_size).ceil() as usize,
            )
        });
        let origin = config.region_center - size * 0.5;

        let mut cells = Vec::with_capacity(dims.cell_count());
        for index in 0..dims.cell_count() {
            let coord = dims.coord_of(index);
            let position = origin
                + Vec3::new(
                    (coord.x as f32 + 0.5) * config.cell_size,
                    (coord.y as f32 + 0.5) * config.cell_size,
                    (coord.z as f32 + 0.5) * config.cell_size,
                );

            // First matching geometry wins; no accumulation across overlaps.
            let blocker = statics.iter().find(|geo| geo.bounds.contains(position));
            let static_occupancy = blocker.is_some();

            let dynamic_occupants: Vec<ObjectId> = dynamics
                .iter()
                .filter(|obj| obj.position.distance(position) <= config.cell_size)
                .map(|obj| obj.id)
                .collect();

            let terrain = blocker.map_or("open", |geo| {
                if geo.kind.is_empty() {
                    "obstacle"
                } else {
                    geo.kind.as_str()
                }
            });

            let mut properties = BTreeMap::new();
            properties.insert(PROP_IS_WALKABLE.to_string(), Value::Bool(!static_occupancy));
            properties.insert(PROP_HAS_COVER.to_string(), Value::Bool(static_occupancy));
            properties.insert(PROP_TERRAIN_TYPE.to_string(), Value::from(terrain));

            cells.push(Cell {
                position,
                coord,
                static_occupancy,
                dynamic_occupants,
                properties,
            });
        }

        debug!(
            cells = cells.len(),
            dims_x = dims.x,
            dims_y = dims.y,
            dims_z = dims.z,
            cell_size = config.cell_size,
            "grid built"
        );

        Ok(Self {
            cell_size: config.cell_size,
            origin,
            dims,
            cells,
        })
    }

    /// Edge length of each cell.
    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// World-space minimum corner of the grid.
    #[must_use]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Cell counts per axis.
    #[must_use]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells in grid iteration order (x fastest-varying).
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at a linear index.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Cell at a coordinate.
    #[must_use]
    pub fn cell_at(&self, coord: CellCoord) -> Option<&Cell> {
        self.dims.linear_index(coord).map(|i| &self.cells[i])
    }

    /// Coordinate of the cell containing a world position, if any.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn world_to_coord(&self, position: Vec3) -> Option<CellCoord> {
        let rel = (position - self.origin) / self.cell_size;
        let coord = CellCoord::new(
            rel.x.floor() as i32,
            rel.y.floor() as i32,
            rel.z.floor() as i32,
        );
        self.dims.contains(coord).then_some(coord)
    }

    /// Summary counts.
    #[must_use]
    pub fn stats(&self) -> GridStats {
        GridStats {
            cell_count: self.cells.len(),
            occupied_count: self.cells.iter().filter(|c| c.static_occupancy).count(),
            occupant_links: self.cells.iter().map(|c| c.dynamic_occupants.len()).sum(),
        }
    }

    /// Clear per-cell runtime collections.
    ///
    /// Part of the environment teardown contract: occupant lists and property
    /// bags are emptied so stale references cannot outlive their snapshot.
    pub fn clear_runtime_state(&mut self) {
        for cell in &mut self.cells {
            cell.dynamic_occupants.clear();
            cell.properties.clear();
        }
    }
}
