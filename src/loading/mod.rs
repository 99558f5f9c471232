//! Loading of street networks, boundaries, and trip features from GeoJSON

mod geojson;

pub use geojson::{load_boundary, load_street_network, route_from_feature};
