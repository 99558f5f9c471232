//! Bounding-box spatial index over street segments

use geo::{BoundingRect, Rect};
use rstar::{AABB, RTree, RTreeObject};

use crate::model::Segment;

/// A segment's bounding box with its position in the segment store,
/// for R-tree queries
#[derive(Debug, Clone, Copy)]
pub struct IndexedSegment {
    pub pos: usize,
    min: [f64; 2],
    max: [f64; 2],
}

impl RTreeObject for IndexedSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

/// R-tree over segment bounding boxes.
///
/// Queries are over-approximate by design: they return every segment whose
/// box intersects the (tolerance-grown) query box, and the matcher filters
/// with an exact distance test. Holds positions into the segment store, so
/// it must be rebuilt whenever the store is rebuilt.
#[derive(Debug)]
pub struct SegmentIndex {
    tree: RTree<IndexedSegment>,
}

impl SegmentIndex {
    pub fn build(segments: &[Segment]) -> Self {
        let indexed: Vec<IndexedSegment> = segments
            .iter()
            .enumerate()
            .map(|(pos, segment)| {
                let rect = segment.line.bounding_rect();
                IndexedSegment {
                    pos,
                    min: [rect.min().x, rect.min().y],
                    max: [rect.max().x, rect.max().y],
                }
            })
            .collect();
        Self {
            tree: RTree::bulk_load(indexed),
        }
    }

    /// Positions of all segments whose bounding box intersects `rect` grown
    /// by `tolerance` on every side.
    ///
    /// Growing the query box keeps segments that are within tolerance of the
    /// trip but whose boxes do not touch the trip's box; candidates must be
    /// exhaustive for the matcher to be correct.
    pub fn query(&self, rect: &Rect<f64>, tolerance: f64) -> impl Iterator<Item = usize> + '_ {
        let envelope = AABB::from_corners(
            [rect.min().x - tolerance, rect.min().y - tolerance],
            [rect.max().x + tolerance, rect.max().y + tolerance],
        );
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|indexed| indexed.pos)
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
