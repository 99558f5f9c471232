//! Street network components - streets, segments, and trip routes

use chrono::{DateTime, Utc};
use geo::{Line, LineString, MultiLineString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// One source road feature.
///
/// The geometry is normalized to a `MultiLineString`: single-chain sources
/// become a one-part multi. Streets are created once at load time and never
/// mutated; editing the network requires a full reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Street {
    /// Stable identifier, taken from the source or derived from the
    /// feature index when the source carries none
    pub street_id: String,
    /// Display name, when the source has one
    pub name: Option<String>,
    /// Remaining source properties, passed through unmodified
    #[serde(default)]
    pub properties: Map<String, JsonValue>,
    /// One or more vertex chains
    pub geometry: MultiLineString<f64>,
}

impl Street {
    pub fn new(street_id: impl Into<String>, geometry: MultiLineString<f64>) -> Self {
        Self {
            street_id: street_id.into(),
            name: None,
            properties: Map::new(),
            geometry,
        }
    }

    /// True when the source geometry was a plain `LineString`
    pub fn is_single_chain(&self) -> bool {
        self.geometry.0.len() == 1
    }
}

/// One straight-line edge between two consecutive vertices of a street.
///
/// Segments are the unit of "traveled" tracking. Ids are deterministic:
/// `"{street_id}_{i}"` for single-chain streets and
/// `"{street_id}_{part}_{i}"` when the street has multiple chains, with
/// `i` the zero-based edge index within the chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    /// Owning street (many segments to one street)
    pub street_id: String,
    pub line: Line<f64>,
}

impl Segment {
    pub fn start(&self) -> geo::Coord<f64> {
        self.line.start
    }

    pub fn end(&self) -> geo::Coord<f64> {
        self.line.end
    }
}

/// A single trip geometry submitted for matching.
///
/// The id and timestamp are used only for logging; the engine persists the
/// trip's effect on coverage state, never the trip itself.
#[derive(Debug, Clone)]
pub struct TripRoute {
    pub id: Option<String>,
    pub recorded_at: Option<DateTime<Utc>>,
    pub geometry: LineString<f64>,
}

impl TripRoute {
    pub fn new(geometry: LineString<f64>) -> Self {
        Self {
            id: None,
            recorded_at: None,
            geometry,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_recorded_at(mut self, at: DateTime<Utc>) -> Self {
        self.recorded_at = Some(at);
        self
    }

    /// Label used in log messages for this trip
    pub fn describe(&self) -> String {
        match (&self.id, &self.recorded_at) {
            (Some(id), _) => id.clone(),
            (None, Some(at)) => format!("trip@{}", at.to_rfc3339()),
            (None, None) => "anonymous trip".to_string(),
        }
    }
}
