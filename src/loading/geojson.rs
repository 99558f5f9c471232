//! GeoJSON parsing and the typed geometry ingestion boundary
//!
//! Source data is taken as WGS84 longitude/latitude, which RFC 7946 mandates
//! for GeoJSON; no reprojection is performed.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use geo::{Coord, LineString, MultiLineString, MultiPolygon, Polygon};
use geojson::{Feature, GeoJson, Value};
use log::{info, warn};

use crate::{Error, model::{Street, TripRoute}};

/// Reads a street network feature collection.
///
/// Features without a `street_id` property get one derived from their index.
/// Only line geometries are usable as streets; features with other geometry
/// types are skipped with a warning, matching how the original data set
/// mixes annotation points into the street file.
///
/// # Errors
///
/// Returns [`Error::DataLoad`] when the file is unreadable, not a GeoJSON
/// feature collection, or yields zero streets.
pub fn load_street_network(path: &Path) -> Result<Vec<Street>, Error> {
    let collection = read_feature_collection(path)?;
    let total = collection.features.len();

    let mut streets = Vec::with_capacity(total);
    let mut skipped = 0usize;
    for (index, feature) in collection.features.into_iter().enumerate() {
        match street_from_feature(feature, index)? {
            Some(street) => streets.push(street),
            None => skipped += 1,
        }
    }

    if streets.is_empty() {
        return Err(Error::DataLoad(format!(
            "{} contains no line features usable as streets",
            path.display()
        )));
    }
    if skipped > 0 {
        warn!(
            "Skipped {skipped} of {total} features in {} (no line geometry)",
            path.display()
        );
    }
    info!("Loaded {} streets from {}", streets.len(), path.display());

    Ok(streets)
}

/// Reads a boundary file into a single multi-polygon.
///
/// Boundary files may carry the region limits as several polygon features;
/// they are merged into one `MultiPolygon` the way the original merged them
/// with a union.
///
/// # Errors
///
/// Returns [`Error::DataLoad`] when the file is unreadable or contains no
/// polygon features.
pub fn load_boundary(path: &Path) -> Result<MultiPolygon<f64>, Error> {
    let collection = read_feature_collection(path)?;

    let mut polygons = Vec::new();
    for feature in collection.features {
        let Some(geometry) = feature.geometry else {
            continue;
        };
        match geometry.value {
            Value::Polygon(rings) => polygons.push(polygon_of(&rings)?),
            Value::MultiPolygon(parts) => {
                for rings in &parts {
                    polygons.push(polygon_of(rings)?);
                }
            }
            _ => {}
        }
    }

    if polygons.is_empty() {
        return Err(Error::DataLoad(format!(
            "{} contains no polygon features usable as a boundary",
            path.display()
        )));
    }

    Ok(MultiPolygon(polygons))
}

/// Validates a trip feature at the ingestion boundary.
///
/// Only `LineString` geometries with at least two positions are accepted;
/// anything else is an [`Error::InvalidGeometry`] the caller is expected to
/// log and skip.
pub fn route_from_feature(feature: &Feature) -> Result<TripRoute, Error> {
    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| Error::InvalidGeometry("trip feature has no geometry".to_string()))?;

    let line = match &geometry.value {
        Value::LineString(positions) => line_string_of(positions)?,
        other => {
            return Err(Error::InvalidGeometry(format!(
                "trip geometry must be a LineString, got {}",
                other.type_name()
            )));
        }
    };
    if line.0.len() < 2 {
        return Err(Error::InvalidGeometry(
            "trip geometry has fewer than two points".to_string(),
        ));
    }

    let mut route = TripRoute::new(line);
    if let Some(id) = trip_identity(feature) {
        route = route.with_id(id);
    }
    if let Some(at) = trip_timestamp(feature) {
        route = route.with_recorded_at(at);
    }
    Ok(route)
}

fn read_feature_collection(path: &Path) -> Result<geojson::FeatureCollection, Error> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::DataLoad(format!("cannot read {}: {e}", path.display())))?;
    let geojson: GeoJson = raw
        .parse()
        .map_err(|e| Error::DataLoad(format!("cannot parse {}: {e}", path.display())))?;
    match geojson {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        _ => Err(Error::DataLoad(format!(
            "{} is not a GeoJSON FeatureCollection",
            path.display()
        ))),
    }
}

fn street_from_feature(feature: Feature, index: usize) -> Result<Option<Street>, Error> {
    let Some(geometry) = feature.geometry else {
        return Ok(None);
    };
    let chains = match geometry.value {
        Value::LineString(positions) => vec![line_string_of(&positions)?],
        Value::MultiLineString(parts) => parts
            .iter()
            .map(|positions| line_string_of(positions))
            .collect::<Result<Vec<_>, _>>()?,
        _ => return Ok(None),
    };

    let mut properties = feature.properties.unwrap_or_default();
    let street_id = match properties.remove("street_id") {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => index.to_string(),
    };
    let name = match properties.remove("name") {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    };

    Ok(Some(Street {
        street_id,
        name,
        properties,
        geometry: MultiLineString(chains),
    }))
}

fn trip_identity(feature: &Feature) -> Option<String> {
    if let Some(id) = &feature.id {
        return Some(match id {
            geojson::feature::Id::String(s) => s.clone(),
            geojson::feature::Id::Number(n) => n.to_string(),
        });
    }
    feature
        .property("trip_id")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn trip_timestamp(feature: &Feature) -> Option<DateTime<Utc>> {
    feature
        .property("timestamp")
        .and_then(|v| v.as_str())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn line_string_of(positions: &[Vec<f64>]) -> Result<LineString<f64>, Error> {
    positions
        .iter()
        .map(|position| coord_of(position))
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}

fn polygon_of(rings: &[Vec<Vec<f64>>]) -> Result<Polygon<f64>, Error> {
    let mut iter = rings.iter();
    let exterior = iter
        .next()
        .ok_or_else(|| Error::GeoJson("polygon has no exterior ring".to_string()))?;
    let exterior = line_string_of(exterior)?;
    let interiors = iter
        .map(|ring| line_string_of(ring))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn coord_of(position: &[f64]) -> Result<Coord<f64>, Error> {
    if position.len() < 2 {
        return Err(Error::GeoJson(format!(
            "position has {} coordinates, expected at least 2",
            position.len()
        )));
    }
    Ok(Coord {
        x: position[0],
        y: position[1],
    })
}
