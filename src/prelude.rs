pub use crate::{DEFAULT_CHUNK_SIZE, DEFAULT_SNAP_TOLERANCE};

// Re-export key components
pub use crate::config::EngineConfig;
pub use crate::engine::CoverageEngine;
pub use crate::error::Error;

pub use crate::coverage::{CoverageState, CoverageSummary, NetworkFilter};
pub use crate::loading::{load_boundary, load_street_network, route_from_feature};
pub use crate::matching::MatchStats;
pub use crate::model::{Segment, Street, StreetNetwork, TripRoute};
