//! The engine handle: environment lifecycle plus query execution.
//!
//! [`Engine`] is a caller-owned handle, not process-wide state. It holds the
//! world source, the single live environment snapshot, and the result cache.
//! The snapshot slot follows a many-readers / exclusive-replace discipline:
//! queries hold a read lock for their (short, synchronous) duration, and
//! initialization takes the write lock to tear down and replace the snapshot
//! wholesale — a query can never observe a half-replaced environment.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{debug, info};

use gridscape::WorldSource;

use crate::cache::ResultCache;
use crate::environment::{EnvironmentConfig, EnvironmentInfo, EnvironmentSnapshot};
use crate::error::EqsError;
use crate::executor;
use crate::query::{Query, QueryResult};

/// The environment query engine.
pub struct Engine {
    world: Arc<dyn WorldSource>,
    snapshot: RwLock<Option<EnvironmentSnapshot>>,
    cache: Mutex<ResultCache>,
    rebuilds: AtomicU64,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("scene", &self.world.scene_name())
            .field("has_environment", &self.has_environment())
            .field("rebuilds", &self.rebuilds.load(Ordering::Relaxed))
            .finish()
    }
}

impl Engine {
    /// Create an engine over a world source. No environment exists until
    /// [`Engine::initialize_environment`] succeeds.
    #[must_use]
    pub fn new(world: Arc<dyn WorldSource>) -> Self {
        Self {
            world,
            snapshot: RwLock::new(None),
            cache: Mutex::new(ResultCache::new()),
            rebuilds: AtomicU64::new(0),
        }
    }

    /// Initialize (or re-initialize) the environment.
    ///
    /// When a live snapshot's configuration hash matches and
    /// `force_reinitialize` is off, the call is a cache hit: the live
    /// snapshot is returned untouched, with no teardown and no rebuild.
    /// Otherwise the old snapshot is fully torn down and replaced.
    ///
    /// # Errors
    /// [`EqsError::InvalidRegion`] / [`EqsError::InvalidCellSize`] for bad
    /// grid parameters. Configuration errors are rejected before anything
    /// is mutated, so a live environment survives them; a failure later in
    /// the build leaves the engine with no environment rather than a
    /// half-built one.
    pub fn initialize_environment(
        &self,
        config: &EnvironmentConfig,
    ) -> Result<EnvironmentInfo, EqsError> {
        config.validate()?;

        let scene = config
            .scene_override
            .clone()
            .unwrap_or_else(|| self.world.scene_name().to_string());
        let config_hash = crate::fingerprint::config_fingerprint(&scene, config);

        // Fast path: matching live snapshot under the read lock.
        if !config.force_reinitialize {
            let guard = self
                .snapshot
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(snap) = guard.as_ref() {
                if snap.config_hash == config_hash {
                    debug!(scene = %scene, config_hash, "environment cache hit");
                    return Ok(snap.info(true));
                }
            }
        }

        let mut slot = self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        // Re-check under the write lock: another initializer may have won.
        if !config.force_reinitialize {
            if let Some(snap) = slot.as_ref() {
                if snap.config_hash == config_hash {
                    return Ok(snap.info(true));
                }
            }
        }

        // Tear down the previous environment completely before rebuilding.
        if let Some(mut old) = slot.take() {
            old.teardown();
            self.cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clear();
        }

        // The slot is empty here: if the build fails, the engine is left in
        // a clean "no environment" state.
        let snap = EnvironmentSnapshot::build(self.world.as_ref(), config, scene.clone(), config_hash)?;
        self.rebuilds.fetch_add(1, Ordering::Relaxed);
        let env_info = snap.info(false);
        *slot = Some(snap);

        info!(
            scene = %scene,
            cells = env_info.cell_count,
            statics = env_info.static_count,
            dynamics = env_info.dynamic_count,
            "environment initialized"
        );
        Ok(env_info)
    }

    /// Execute a query against the live environment.
    ///
    /// Always returns a structured result: with no environment the result is
    /// an immediate failure telling the caller to initialize, and the grid
    /// is never touched. The result is stored in the last-result cache
    /// before it is returned.
    pub fn perform_query(&self, query: &Query) -> QueryResult {
        let result = {
            let guard = self
                .snapshot
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            match guard.as_ref() {
                None => QueryResult::failure(&query.id, executor::NOT_INITIALIZED, 0.0),
                Some(snap) => executor::execute(query, snap, self.world.as_ref()),
            }
        };

        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .store(result.clone());
        result
    }

    /// The latest cached result for a query id, for visualization consumers.
    #[must_use]
    pub fn last_result(&self, query_id: &str) -> Option<QueryResult> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(query_id)
            .cloned()
    }

    /// Tear down the environment and flush the result cache.
    pub fn clear_environment(&self) {
        let mut slot = self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(mut old) = slot.take() {
            old.teardown();
        }
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Whether a live environment exists.
    #[must_use]
    pub fn has_environment(&self) -> bool {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Summary of the live environment, if any.
    #[must_use]
    pub fn snapshot_info(&self) -> Option<EnvironmentInfo> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|snap| snap.info(true))
    }

    /// Number of full rebuilds performed. Cache hits do not count.
    #[must_use]
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds.load(Ordering::Relaxed)
    }
}
