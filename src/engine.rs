//! Engine facade: lifecycle, the update lock, and the public entry points

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use geo::MultiPolygon;
use geojson::FeatureCollection;
use log::{error, info, warn};

use crate::{
    Error,
    config::EngineConfig,
    coverage::{self, CoverageState, CoverageSummary, NetworkFilter},
    index::SegmentIndex,
    loading,
    matching::{self, MatchStats},
    model::{StreetNetwork, TripRoute},
    snapshot,
};

/// The street coverage engine.
///
/// Owns the immutable network, the spatial index over it, and the mutable
/// coverage state. An existing engine is always ready for reads; mutating
/// entry points hold the exclusive half of a reader-writer lock for their
/// whole duration, so one logical writer runs at a time and readers see
/// either the previous or the updated state, never a partial one.
pub struct CoverageEngine {
    config: EngineConfig,
    network: StreetNetwork,
    index: SegmentIndex,
    state: RwLock<CoverageState>,
}

impl CoverageEngine {
    /// Builds an engine from the configured snapshot when present and valid,
    /// falling back to a full rebuild from the source network.
    ///
    /// After a rebuild the snapshot is written back on a best-effort basis;
    /// a write failure is logged and does not fail initialization.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLoad`] when neither a usable snapshot nor a
    /// usable source network exists. This is fatal; there is nothing to
    /// track coverage against.
    pub fn initialize(config: EngineConfig) -> Result<Self, Error> {
        info!("Initializing coverage engine");

        if let Some(snapshot_path) = &config.snapshot_path {
            if snapshot_path.exists() {
                match snapshot::load(snapshot_path) {
                    Ok((network, state)) => {
                        let index = SegmentIndex::build(network.segments());
                        return Ok(Self {
                            config,
                            network,
                            index,
                            state: RwLock::new(state),
                        });
                    }
                    Err(e) => warn!("{e}; rebuilding from source network"),
                }
            }
        }

        let streets = loading::load_street_network(&config.network_path)?;
        let network = StreetNetwork::from_streets(streets)?;
        let engine = Self::with_network(network, config);
        engine.persist_best_effort(&engine.read_state());
        Ok(engine)
    }

    /// Builds an engine around an already-constructed network, with empty
    /// coverage state. Useful when the caller assembles streets itself.
    pub fn with_network(network: StreetNetwork, config: EngineConfig) -> Self {
        let index = SegmentIndex::build(network.segments());
        info!(
            "Coverage engine ready: {} streets, {} segments, tolerance {}",
            network.streets().len(),
            network.segments().len(),
            config.tolerance
        );
        Self {
            config,
            network,
            index,
            state: RwLock::new(CoverageState::new()),
        }
    }

    /// Matches a batch of trip routes and unions the result into the
    /// traveled set, then persists on a best-effort basis.
    ///
    /// Matching parallelizes across routes inside the update lock. Invalid
    /// routes are skipped and counted, never failing the batch; submitting
    /// the same routes again is a no-op.
    pub fn submit_routes(&self, routes: &[TripRoute]) -> MatchStats {
        if routes.is_empty() {
            warn!("No routes submitted");
            return MatchStats::default();
        }
        info!("Updating coverage with {} routes", routes.len());

        let mut state = self.write_state();
        let outcome = matching::match_batch(
            &self.network,
            &self.index,
            routes,
            self.config.tolerance,
            self.config.chunk_size,
        );
        let newly_traveled = state.mark_traveled(
            outcome
                .positions
                .iter()
                .map(|&pos| self.network.segment(pos).id.as_str()),
        );

        info!(
            "Coverage update done: {} routes matched, {} skipped, {} segments newly traveled, {} traveled total",
            outcome.processed,
            outcome.skipped,
            newly_traveled,
            state.len()
        );
        self.persist_best_effort(&state);

        MatchStats {
            routes_processed: outcome.processed,
            routes_skipped: outcome.skipped,
            segments_matched: outcome.positions.len(),
            newly_traveled,
        }
    }

    /// Coverage statistics over the whole network.
    pub fn coverage(&self) -> CoverageSummary {
        coverage::calculate(&self.network, &self.read_state())
    }

    /// Coverage statistics restricted to segments intersecting `boundary`.
    /// A plain `Polygon` converts with `MultiPolygon::from`.
    pub fn coverage_within(&self, boundary: &MultiPolygon<f64>) -> CoverageSummary {
        coverage::calculate_within(&self.network, &self.read_state(), boundary)
    }

    /// Clears the traveled set and persists the cleared state.
    pub fn reset(&self) {
        info!("Resetting coverage state");
        let mut state = self.write_state();
        state.reset();
        self.persist_best_effort(&state);
    }

    /// Street-level GeoJSON view for rendering.
    pub fn export_network(
        &self,
        filter: NetworkFilter,
        boundary: Option<&MultiPolygon<f64>>,
    ) -> FeatureCollection {
        coverage::streets_geojson(&self.network, &self.read_state(), filter, boundary)
    }

    /// Segment-level GeoJSON view for rendering.
    pub fn export_segments(
        &self,
        filter: NetworkFilter,
        boundary: Option<&MultiPolygon<f64>>,
    ) -> FeatureCollection {
        coverage::segments_geojson(&self.network, &self.read_state(), filter, boundary)
    }

    /// Writes the snapshot now, surfacing the error the best-effort saves
    /// only log. A no-op when no snapshot path is configured.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PersistenceWrite`] when the snapshot cannot be
    /// written; in-memory state is unaffected.
    pub fn save_snapshot(&self) -> Result<(), Error> {
        match &self.config.snapshot_path {
            Some(path) => snapshot::save(path, &self.network, &self.read_state()),
            None => Ok(()),
        }
    }

    pub fn network(&self) -> &StreetNetwork {
        &self.network
    }

    pub fn is_traveled(&self, segment_id: &str) -> bool {
        self.read_state().is_traveled(segment_id)
    }

    fn persist_best_effort(&self, state: &CoverageState) {
        let Some(path) = &self.config.snapshot_path else {
            return;
        };
        if let Err(e) = snapshot::save(path, &self.network, state) {
            error!("Coverage state not persisted, staying in memory: {e}");
        }
    }

    // Lock poisoning only happens when a panicking thread held the guard;
    // the traveled set is always internally consistent (single extend/clear
    // calls), so the state is still usable.
    fn read_state(&self) -> RwLockReadGuard<'_, CoverageState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CoverageState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
