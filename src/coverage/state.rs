//! The mutable set of traveled segment identifiers

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

/// The set of segment ids considered traveled.
///
/// Mutated only additively by route matching; the only removal is a full
/// [`reset`](CoverageState::reset). Marking is idempotent, so resubmitting
/// a trip never changes the state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoverageState {
    traveled: HashSet<String>,
}

impl CoverageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            traveled: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Unions `segment_ids` into the traveled set, returning how many were
    /// not already present.
    pub fn mark_traveled<I, S>(&mut self, segment_ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.traveled.len();
        self.traveled.extend(segment_ids.into_iter().map(Into::into));
        self.traveled.len() - before
    }

    pub fn is_traveled(&self, segment_id: &str) -> bool {
        self.traveled.contains(segment_id)
    }

    pub fn reset(&mut self) {
        self.traveled.clear();
    }

    pub fn len(&self) -> usize {
        self.traveled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traveled.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.traveled.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marking_is_idempotent() {
        let mut state = CoverageState::new();
        assert_eq!(state.mark_traveled(["1_0", "1_1"]), 2);
        assert_eq!(state.mark_traveled(["1_0", "1_1"]), 0);
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn reset_clears_everything() {
        let mut state = CoverageState::from_ids(["1_0", "2_3"]);
        state.reset();
        assert!(state.is_empty());
        assert!(!state.is_traveled("1_0"));
    }
}
