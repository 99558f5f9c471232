//! Traveled-segment state and derived coverage statistics

pub mod export;
pub mod state;
pub mod summary;

pub use export::{NetworkFilter, segments_geojson, streets_geojson};
pub use state::CoverageState;
pub use summary::{CoverageSummary, calculate, calculate_within};
