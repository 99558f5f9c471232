//! Engine configuration

use std::path::PathBuf;

use crate::{DEFAULT_CHUNK_SIZE, DEFAULT_SNAP_TOLERANCE};

/// Configuration for building a [`CoverageEngine`](crate::CoverageEngine).
///
/// The snap tolerance is the maximum distance, in the coordinate units of
/// the network (degrees for WGS84 sources), at which a trip polyline is
/// considered to have traveled a segment. The source data's history used
/// values between 1e-8 and 1e-5; this is deliberately a tunable parameter
/// rather than a constant.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Path to the street network GeoJSON feature collection
    pub network_path: PathBuf,
    /// Optional snapshot file; when present and valid it is loaded instead
    /// of reprocessing the network, and updates are persisted back to it
    pub snapshot_path: Option<PathBuf>,
    /// Maximum trip-to-segment distance counted as traveled
    pub tolerance: f64,
    /// Number of trip routes matched per parallel batch
    pub chunk_size: usize,
}

impl EngineConfig {
    pub fn new(network_path: impl Into<PathBuf>) -> Self {
        Self {
            network_path: network_path.into(),
            snapshot_path: None,
            tolerance: DEFAULT_SNAP_TOLERANCE,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    #[must_use]
    pub fn with_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }
}
