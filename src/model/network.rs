//! Segment store: decomposition of streets into atomic segments

use geo::Line;
use hashbrown::HashMap;
use log::{info, warn};

use crate::{Error, model::components::{Segment, Street}};

/// The immutable street network: every source street plus its decomposition
/// into two-point segments.
///
/// Built once at startup (or restored verbatim from a snapshot) and never
/// mutated afterwards. The spatial index holds positions into `segments`
/// and must be rebuilt whenever the network is rebuilt.
#[derive(Debug)]
pub struct StreetNetwork {
    streets: Vec<Street>,
    segments: Vec<Segment>,
    street_pos: HashMap<String, usize>,
}

impl StreetNetwork {
    /// Decomposes `streets` into segments.
    ///
    /// A chain with N vertices yields exactly N-1 segments whose ordered
    /// concatenation reproduces the chain's vertex sequence. Chains with
    /// fewer than two vertices yield nothing and are logged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLoad`] when `streets` is empty.
    pub fn from_streets(streets: Vec<Street>) -> Result<Self, Error> {
        if streets.is_empty() {
            return Err(Error::DataLoad(
                "street collection is empty, nothing to segment".to_string(),
            ));
        }

        let mut segments = Vec::new();
        for street in &streets {
            segment_street(street, &mut segments);
        }

        info!(
            "Street network built: {} streets, {} segments",
            streets.len(),
            segments.len()
        );

        Ok(Self::assemble(streets, segments))
    }

    /// Reassembles a network from already-segmented parts, as restored from
    /// a snapshot. No re-segmentation happens; the caller is responsible for
    /// the parts belonging together.
    pub fn from_parts(streets: Vec<Street>, segments: Vec<Segment>) -> Self {
        Self::assemble(streets, segments)
    }

    fn assemble(streets: Vec<Street>, segments: Vec<Segment>) -> Self {
        let street_pos = streets
            .iter()
            .enumerate()
            .map(|(pos, s)| (s.street_id.clone(), pos))
            .collect();
        Self {
            streets,
            segments,
            street_pos,
        }
    }

    pub fn streets(&self) -> &[Street] {
        &self.streets
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, pos: usize) -> &Segment {
        &self.segments[pos]
    }

    pub fn street_by_id(&self, street_id: &str) -> Option<&Street> {
        self.street_pos.get(street_id).map(|&pos| &self.streets[pos])
    }
}

fn segment_street(street: &Street, out: &mut Vec<Segment>) {
    let single_chain = street.is_single_chain();
    for (part, chain) in street.geometry.0.iter().enumerate() {
        if chain.0.len() < 2 {
            warn!(
                "Street {} part {} has fewer than two vertices, skipping",
                street.street_id, part
            );
            continue;
        }
        for (i, pair) in chain.0.windows(2).enumerate() {
            let id = if single_chain {
                format!("{}_{}", street.street_id, i)
            } else {
                format!("{}_{}_{}", street.street_id, part, i)
            };
            out.push(Segment {
                id,
                street_id: street.street_id.clone(),
                line: Line::new(pair[0], pair[1]),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use geo::{LineString, MultiLineString, line_string};

    use super::*;

    fn street(id: &str, chains: Vec<LineString<f64>>) -> Street {
        Street::new(id, MultiLineString(chains))
    }

    #[test]
    fn n_vertices_yield_n_minus_one_segments() {
        let s = street("1", vec![line_string![
            (x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 1.0)
        ]]);
        let network = StreetNetwork::from_streets(vec![s]).unwrap();

        assert_eq!(network.segments().len(), 3);
        assert_eq!(network.segment(0).id, "1_0");
        assert_eq!(network.segment(2).id, "1_2");
    }

    #[test]
    fn segment_concatenation_reproduces_polyline() {
        let original = line_string![
            (x: -97.1, y: 31.5), (x: -97.2, y: 31.6), (x: -97.3, y: 31.55), (x: -97.4, y: 31.7)
        ];
        let s = street("main", vec![original.clone()]);
        let network = StreetNetwork::from_streets(vec![s]).unwrap();

        let mut rebuilt = vec![network.segment(0).start()];
        for segment in network.segments() {
            rebuilt.push(segment.end());
        }
        assert_eq!(rebuilt, original.0);
    }

    #[test]
    fn multi_part_streets_fold_part_into_segment_id() {
        let s = street(
            "7",
            vec![
                line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)],
                line_string![(x: 5.0, y: 0.0), (x: 6.0, y: 0.0), (x: 7.0, y: 0.0)],
            ],
        );
        let network = StreetNetwork::from_streets(vec![s]).unwrap();

        let ids: Vec<_> = network.segments().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["7_0_0", "7_1_0", "7_1_1"]);
        assert!(network.street_by_id("7").is_some());
        assert!(network.street_by_id("8").is_none());
    }

    #[test]
    fn degenerate_chain_yields_no_segments() {
        let s = street("p", vec![LineString::new(vec![geo::coord! { x: 0.0, y: 0.0 }])]);
        let other = street("q", vec![line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)]]);
        let network = StreetNetwork::from_streets(vec![s, other]).unwrap();

        assert_eq!(network.segments().len(), 1);
        assert_eq!(network.segment(0).street_id, "q");
    }

    #[test]
    fn empty_street_collection_is_a_load_error() {
        assert!(matches!(
            StreetNetwork::from_streets(Vec::new()),
            Err(Error::DataLoad(_))
        ));
    }
}
