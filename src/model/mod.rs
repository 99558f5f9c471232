//! Street network model
//!
//! Contains the street and segment types and the segment store built
//! from a source feature collection.

pub mod components;
pub mod network;

pub use components::{Segment, Street, TripRoute};
pub use network::StreetNetwork;
