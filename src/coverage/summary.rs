//! Aggregation of coverage state into percentages and counts

use geo::{Intersects, MultiPolygon};
use hashbrown::HashSet;
use serde::Serialize;

use crate::{coverage::CoverageState, model::StreetNetwork};

/// Aggregate coverage statistics.
///
/// A street counts as traveled when at least one of its segments is
/// traveled; the percentage is segment-based.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageSummary {
    pub coverage_percentage: f64,
    pub total_streets: usize,
    pub traveled_streets: usize,
    pub total_segments: usize,
    pub traveled_segments: usize,
}

impl CoverageSummary {
    fn empty() -> Self {
        Self {
            coverage_percentage: 0.0,
            total_streets: 0,
            traveled_streets: 0,
            total_segments: 0,
            traveled_segments: 0,
        }
    }
}

/// Coverage over the whole network.
pub fn calculate(network: &StreetNetwork, state: &CoverageState) -> CoverageSummary {
    let traveled_streets: HashSet<&str> = network
        .segments()
        .iter()
        .filter(|segment| state.is_traveled(&segment.id))
        .map(|segment| segment.street_id.as_str())
        .collect();

    summarize(
        network.streets().len(),
        traveled_streets.len(),
        network.segments().len(),
        state.len(),
    )
}

/// Coverage restricted to segments intersecting `boundary`.
///
/// Both numerator and denominator shrink to the boundary view: a street half
/// inside the boundary participates only through its intersecting segments,
/// and its street-level counts use those segments alone.
pub fn calculate_within(
    network: &StreetNetwork,
    state: &CoverageState,
    boundary: &MultiPolygon<f64>,
) -> CoverageSummary {
    let mut total_segments = 0usize;
    let mut traveled_segments = 0usize;
    let mut streets: HashSet<&str> = HashSet::new();
    let mut traveled_streets: HashSet<&str> = HashSet::new();

    for segment in network.segments() {
        if !segment.line.intersects(boundary) {
            continue;
        }
        total_segments += 1;
        streets.insert(segment.street_id.as_str());
        if state.is_traveled(&segment.id) {
            traveled_segments += 1;
            traveled_streets.insert(segment.street_id.as_str());
        }
    }

    summarize(
        streets.len(),
        traveled_streets.len(),
        total_segments,
        traveled_segments,
    )
}

#[allow(clippy::cast_precision_loss)]
fn summarize(
    total_streets: usize,
    traveled_streets: usize,
    total_segments: usize,
    traveled_segments: usize,
) -> CoverageSummary {
    if total_segments == 0 {
        return CoverageSummary::empty();
    }
    CoverageSummary {
        coverage_percentage: (traveled_segments as f64 / total_segments as f64) * 100.0,
        total_streets,
        traveled_streets,
        total_segments,
        traveled_segments,
    }
}
