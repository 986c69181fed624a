//! Environment snapshots and their build configuration.
//!
//! An [`EnvironmentSnapshot`] is the frozen aggregate every query runs
//! against: the voxel grid plus the static geometry and dynamic objects
//! captured at build time. Snapshots are immutable until torn down; the
//! engine replaces them wholesale and never mutates one across calls.

use std::time::SystemTime;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use gridscape::{
    DynamicObject, Grid, GridConfig, GridDims, ObjectId, StaticGeometry, WorldSource,
};

use crate::error::EqsError;
use crate::fingerprint;

/// Configuration for an environment build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Scene identity override; defaults to the world source's scene name
    pub scene_override: Option<String>,
    /// Capture collidable static geometry
    pub include_static_geometry: bool,
    /// Capture dynamic objects
    pub include_dynamic_objects: bool,
    /// Restrict captured dynamic objects to these type tags
    pub dynamic_tag_filter: Option<Vec<String>>,
    /// Edge length of grid cells
    pub cell_size: f32,
    /// Explicit grid dimensions; takes precedence over cell-size-driven counts
    pub dims_override: Option<GridDims>,
    /// Center of the voxelized region
    pub region_center: Vec3,
    /// Full extents of the voxelized region (all components must be positive)
    pub region_size: Vec3,
    /// Rebuild even when the configuration hash matches the live snapshot
    pub force_reinitialize: bool,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            scene_override: None,
            include_static_geometry: true,
            include_dynamic_objects: true,
            dynamic_tag_filter: None,
            cell_size: 1.0,
            dims_override: None,
            region_center: Vec3::ZERO,
            region_size: Vec3::splat(10.0),
            force_reinitialize: false,
        }
    }
}

impl EnvironmentConfig {
    /// Create a default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the voxelized region.
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

    /// Override grid dimensions.
    #[must_use]
    pub fn with_dims(mut self, dims: GridDims) -> Self {
        self.dims_override = Some(dims);
        self
    }

    /// Restrict dynamic capture to the given type tags.
    #[must_use]
    pub fn with_tag_filter<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dynamic_tag_filter = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Force a rebuild even on a configuration-hash match.
    #[must_use]
    pub fn forced(mut self) -> Self {
        self.force_reinitialize = true;
        self
    }

    /// Validate grid parameters without building anything.
    ///
    /// # Errors
    /// [`EqsError::InvalidRegion`] / [`EqsError::InvalidCellSize`] for
    /// non-positive region components or cell size.
    pub fn validate(&self) -> Result<(), EqsError> {
        let size = self.region_size;
        if size.x <= 0.0 || size.y <= 0.0 || size.z <= 0.0 {
            return Err(EqsError::InvalidRegion { size });
        }
        if self.cell_size <= 0.0 {
            return Err(EqsError::InvalidCellSize {
                cell_size: self.cell_size,
            });
        }
        Ok(())
    }

    fn grid_config(&self) -> GridConfig {
        GridConfig {
            region_center: self.region_center,
            region_size: self.region_size,
            cell_size: self.cell_size,
            dims_override: self.dims_override,
        }
    }
}

/// Summary of a live environment, returned by initialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    /// Scene the snapshot was captured from
    pub scene_name: String,
    /// Grid dimensions
    pub dims: GridDims,
    /// Grid cell size
    pub cell_size: f32,
    /// Total cell count
    pub cell_count: usize,
    /// Captured static geometry count
    pub static_count: usize,
    /// Captured dynamic object count
    pub dynamic_count: usize,
    /// Stable content fingerprint of the snapshot
    pub content_hash: u64,
    /// Whether this call was served from the live snapshot without a rebuild
    pub cache_hit: bool,
}

/// The frozen world aggregate queries execute against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    /// Scene the snapshot was captured from
    pub scene_name: String,
    /// The voxel grid
    pub grid: Grid,
    /// Captured static geometry
    pub static_geometry: Vec<StaticGeometry>,
    /// Captured dynamic objects
    pub dynamic_objects: Vec<DynamicObject>,
    /// Stable content fingerprint (scene, grid shape, object identities)
    pub content_hash: u64,
    /// Fingerprint of the configuration that produced this snapshot
    pub config_hash: u64,
    /// Wall-clock build time; informational, not part of any hash
    pub built_at: SystemTime,
}

impl EnvironmentSnapshot {
    /// Build a snapshot from a world source.
    ///
    /// # Errors
    /// Propagates grid construction failures ([`EqsError::InvalidRegion`],
    /// [`EqsError::InvalidCellSize`]). No partially built snapshot is ever
    /// observable: the value is only produced on full success.
    pub fn build(
        world: &dyn WorldSource,
        config: &EnvironmentConfig,
        scene_name: String,
        config_hash: u64,
    ) -> Result<Self, EqsError> {
        let static_geometry: Vec<StaticGeometry> = if config.include_static_geometry {
            world.static_geometry().to_vec()
        } else {
            Vec::new()
        };
        let dynamic_objects: Vec<DynamicObject> = if config.include_dynamic_objects {
            world.dynamic_objects(config.dynamic_tag_filter.as_deref())
        } else {
            Vec::new()
        };

        let grid = Grid::build(&config.grid_config(), &static_geometry, &dynamic_objects)?;
        let content_hash =
            fingerprint::content_fingerprint(&scene_name, &grid, &static_geometry, &dynamic_objects);

        debug!(
            scene = %scene_name,
            cells = grid.cell_count(),
            statics = static_geometry.len(),
            dynamics = dynamic_objects.len(),
            content_hash,
            "environment snapshot built"
        );

        Ok(Self {
            scene_name,
            grid,
            static_geometry,
            dynamic_objects,
            content_hash,
            config_hash,
            built_at: SystemTime::now(),
        })
    }

    /// Summarize this snapshot.
    #[must_use]
    pub fn info(&self, cache_hit: bool) -> EnvironmentInfo {
        EnvironmentInfo {
            scene_name: self.scene_name.clone(),
            dims: self.grid.dims(),
            cell_size: self.grid.cell_size(),
            cell_count: self.grid.cell_count(),
            static_count: self.static_geometry.len(),
            dynamic_count: self.dynamic_objects.len(),
            content_hash: self.content_hash,
            cache_hit,
        }
    }

    /// Look up a captured dynamic object by id.
    #[must_use]
    pub fn find_dynamic(&self, id: ObjectId) -> Option<&DynamicObject> {
        self.dynamic_objects.iter().find(|obj| obj.id == id)
    }

    /// Release per-cell runtime state before the snapshot is replaced.
    ///
    /// Occupant lists and property bags are cleared so no stale references
    /// survive into the next environment.
    pub fn teardown(&mut self) {
        debug!(scene = %self.scene_name, "environment snapshot torn down");
        self.grid.clear_runtime_state();
        self.static_geometry.clear();
        self.dynamic_objects.clear();
    }
}
