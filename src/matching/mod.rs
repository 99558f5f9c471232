//! Tolerance-based matching of trip geometries against the segment store

use geo::{BoundingRect, Distance, Euclidean, Line, LineString, Point};
use hashbrown::HashSet;
use log::{debug, warn};
use rayon::prelude::*;

use crate::{Error, index::SegmentIndex, model::{StreetNetwork, TripRoute}};

/// Counters for one `submit_routes` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStats {
    /// Routes that went through matching
    pub routes_processed: usize,
    /// Routes skipped for invalid or degenerate geometry
    pub routes_skipped: usize,
    /// Distinct segments matched by this batch, traveled or not
    pub segments_matched: usize,
    /// Segments this batch marked traveled for the first time
    pub newly_traveled: usize,
}

pub(crate) struct BatchOutcome {
    pub positions: HashSet<usize>,
    pub processed: usize,
    pub skipped: usize,
}

/// Matches one trip geometry, returning positions of all segments lying
/// within `tolerance` of the trip polyline.
///
/// Candidates come from the spatial index; each is confirmed with an exact
/// distance test. A segment counts as traveled only when the whole of it is
/// inside the trip's tolerance corridor, checked at its endpoints and
/// midpoint. Minimum distance alone would mark a neighboring segment that
/// the trip merely touches at a shared street vertex.
///
/// # Errors
///
/// Returns [`Error::InvalidGeometry`] for trips with fewer than two points.
pub fn match_route(
    network: &StreetNetwork,
    index: &SegmentIndex,
    geometry: &LineString<f64>,
    tolerance: f64,
) -> Result<HashSet<usize>, Error> {
    if geometry.0.len() < 2 {
        return Err(Error::InvalidGeometry(format!(
            "trip has {} points, need at least 2",
            geometry.0.len()
        )));
    }
    let rect = geometry
        .bounding_rect()
        .ok_or_else(|| Error::InvalidGeometry("trip has no bounding box".to_string()))?;

    let matched = index
        .query(&rect, tolerance)
        .filter(|&pos| within_tolerance(geometry, &network.segment(pos).line, tolerance))
        .collect();
    Ok(matched)
}

/// Matches many routes, chunked for memory bounding and parallelized with
/// rayon inside each chunk.
///
/// Per-route failures are logged and counted, never aborting the batch.
/// Results are unioned, so neither route order nor chunk boundaries affect
/// the outcome, and resubmitting a route is a no-op.
pub(crate) fn match_batch(
    network: &StreetNetwork,
    index: &SegmentIndex,
    routes: &[TripRoute],
    tolerance: f64,
    chunk_size: usize,
) -> BatchOutcome {
    let chunk_size = chunk_size.max(1);
    let mut positions = HashSet::new();
    let mut processed = 0usize;
    let mut skipped = 0usize;

    for chunk in routes.chunks(chunk_size) {
        let results: Vec<Result<HashSet<usize>, Error>> = chunk
            .par_iter()
            .map(|route| match_route(network, index, &route.geometry, tolerance))
            .collect();

        for (route, result) in chunk.iter().zip(results) {
            match result {
                Ok(matched) => {
                    positions.extend(matched);
                    processed += 1;
                }
                Err(e) => {
                    warn!("Skipping {}: {e}", route.describe());
                    skipped += 1;
                }
            }
        }
        debug!(
            "Chunk of {} routes matched, {} distinct segments so far",
            chunk.len(),
            positions.len()
        );
    }

    BatchOutcome {
        positions,
        processed,
        skipped,
    }
}

fn within_tolerance(trip: &LineString<f64>, segment: &Line<f64>, tolerance: f64) -> bool {
    let midpoint = Point::new(
        (segment.start.x + segment.end.x) / 2.0,
        (segment.start.y + segment.end.y) / 2.0,
    );
    [Point::from(segment.start), Point::from(segment.end), midpoint]
        .iter()
        .all(|point| Euclidean.distance(point, trip) <= tolerance)
}

#[cfg(test)]
mod tests {
    use geo::{MultiLineString, line_string};

    use super::*;
    use crate::model::Street;

    fn one_street_network() -> (StreetNetwork, SegmentIndex) {
        let street = Street::new(
            "1",
            MultiLineString(vec![line_string![
                (x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 2.0, y: 0.0)
            ]]),
        );
        let network = StreetNetwork::from_streets(vec![street]).unwrap();
        let index = SegmentIndex::build(network.segments());
        (network, index)
    }

    #[test]
    fn exact_overlap_matches_only_that_segment() {
        let (network, index) = one_street_network();
        let trip = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)];

        let matched = match_route(&network, &index, &trip, 0.0).unwrap();
        let ids: Vec<&str> = matched.iter().map(|&p| network.segment(p).id.as_str()).collect();
        assert_eq!(ids, vec!["1_0"]);
    }

    #[test]
    fn distant_trip_matches_nothing() {
        let (network, index) = one_street_network();
        let trip = line_string![(x: 0.0, y: 5.0), (x: 2.0, y: 5.0)];

        let matched = match_route(&network, &index, &trip, 1e-7).unwrap();
        assert!(matched.is_empty());
    }

    #[test]
    fn nearby_trip_matches_within_tolerance() {
        let (network, index) = one_street_network();
        // Parallel to the street, offset by 0.5
        let trip = line_string![(x: 0.0, y: 0.5), (x: 2.0, y: 0.5)];

        assert!(match_route(&network, &index, &trip, 0.4).unwrap().is_empty());
        assert_eq!(match_route(&network, &index, &trip, 0.6).unwrap().len(), 2);
    }

    #[test]
    fn degenerate_routes_do_not_abort_the_batch() {
        let (network, index) = one_street_network();
        let routes = vec![
            TripRoute::new(line_string![(x: 0.0, y: 0.0)]).with_id("bad"),
            TripRoute::new(line_string![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0)]).with_id("good"),
        ];

        let outcome = match_batch(&network, &index, &routes, 0.0, 10_000);
        assert_eq!(outcome.processed, 1);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.positions.len(), 2);
    }

    #[test]
    fn chunk_boundaries_do_not_change_results() {
        let (network, index) = one_street_network();
        let routes: Vec<TripRoute> = (0..5)
            .map(|_| TripRoute::new(line_string![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0)]))
            .collect();

        let whole = match_batch(&network, &index, &routes, 0.0, 10_000);
        let chunked = match_batch(&network, &index, &routes, 0.0, 2);
        assert_eq!(whole.positions, chunked.positions);
    }
}
