//! Read-only GeoJSON views of the network for rendering

use geo::{Intersects, LineString, MultiPolygon};
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, Value as JsonValue, json};

use crate::{
    coverage::CoverageState,
    model::{Segment, Street, StreetNetwork},
};

/// Display color for traveled features
pub const TRAVELED_COLOR: &str = "#00ff00";
/// Display color for untraveled features
pub const UNTRAVELED_COLOR: &str = "#ff0000";

/// Which features an export keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFilter {
    All,
    Traveled,
    Untraveled,
}

impl NetworkFilter {
    fn keeps(self, traveled: bool) -> bool {
        match self {
            Self::All => true,
            Self::Traveled => traveled,
            Self::Untraveled => !traveled,
        }
    }
}

/// Per-segment view, one feature per segment with `segment_id`, `street_id`,
/// `traveled`, and a display color. This is the view the map renderer colors
/// street-by-street progress from.
pub fn segments_geojson(
    network: &StreetNetwork,
    state: &CoverageState,
    filter: NetworkFilter,
    boundary: Option<&MultiPolygon<f64>>,
) -> FeatureCollection {
    let features = network
        .segments()
        .iter()
        .filter(|segment| match boundary {
            Some(boundary) => segment.line.intersects(boundary),
            None => true,
        })
        .filter_map(|segment| {
            let traveled = state.is_traveled(&segment.id);
            filter.keeps(traveled).then(|| segment_feature(segment, traveled))
        })
        .collect();

    FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    }
}

/// Per-street view with the source properties passed through, each feature
/// tagged `traveled` (any segment traveled) and a display color.
pub fn streets_geojson(
    network: &StreetNetwork,
    state: &CoverageState,
    filter: NetworkFilter,
    boundary: Option<&MultiPolygon<f64>>,
) -> FeatureCollection {
    let traveled_streets = traveled_street_ids(network, state);

    let features = network
        .streets()
        .iter()
        .filter(|street| match boundary {
            Some(boundary) => street.geometry.intersects(boundary),
            None => true,
        })
        .filter_map(|street| {
            let traveled = traveled_streets.contains(street.street_id.as_str());
            filter.keeps(traveled).then(|| street_feature(street, traveled))
        })
        .collect();

    FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    }
}

fn traveled_street_ids<'a>(
    network: &'a StreetNetwork,
    state: &CoverageState,
) -> hashbrown::HashSet<&'a str> {
    network
        .segments()
        .iter()
        .filter(|segment| state.is_traveled(&segment.id))
        .map(|segment| segment.street_id.as_str())
        .collect()
}

fn segment_feature(segment: &Segment, traveled: bool) -> Feature {
    let mut properties = Map::new();
    properties.insert("segment_id".to_string(), json!(segment.id));
    properties.insert("street_id".to_string(), json!(segment.street_id));
    properties.insert("traveled".to_string(), json!(traveled));
    properties.insert("color".to_string(), json!(color_of(traveled)));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::from(&LineString::from(segment.line)))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn street_feature(street: &Street, traveled: bool) -> Feature {
    let mut properties = street.properties.clone();
    properties.insert("street_id".to_string(), json!(street.street_id));
    if let Some(name) = &street.name {
        properties.insert("name".to_string(), JsonValue::String(name.clone()));
    }
    properties.insert("traveled".to_string(), json!(traveled));
    properties.insert("color".to_string(), json!(color_of(traveled)));

    // Single-chain streets re-emit the plain LineString they were loaded as
    let geometry = if street.is_single_chain() {
        Value::from(&street.geometry.0[0])
    } else {
        Value::from(&street.geometry)
    };

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geometry)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn color_of(traveled: bool) -> &'static str {
    if traveled { TRAVELED_COLOR } else { UNTRAVELED_COLOR }
}
