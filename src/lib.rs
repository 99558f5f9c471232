//! Street coverage engine
//!
//! Tracks which streets in a region have been driven. A street network is
//! decomposed into atomic two-point segments, indexed by bounding box, and
//! trip geometries are matched against it within a configurable snap
//! tolerance; the resulting traveled set persists across restarts through a
//! versioned snapshot.
//!
//! The crate is a library embedded by an ingestion/web layer: trips arrive
//! already cleaned as line geometries, and exports are plain GeoJSON for a
//! map renderer. The engine never fetches data itself.

pub mod config;
pub mod coverage;
pub mod engine;
mod error;
pub mod index;
pub mod loading;
pub mod matching;
pub mod model;
pub mod prelude;
pub mod snapshot;

pub use config::EngineConfig;
pub use engine::CoverageEngine;
pub use error::Error;

/// Default maximum trip-to-segment distance counted as traveled, in the
/// coordinate units of the network (degrees for WGS84 sources).
///
/// Roughly a centimeter at the equator. Deployments with noisier GPS input
/// that skips map matching upstream want this several orders of magnitude
/// larger; tune it through [`EngineConfig::tolerance`].
pub const DEFAULT_SNAP_TOLERANCE: f64 = 1e-7;

/// Default number of trip routes matched per parallel batch. Chunking only
/// bounds memory; results are identical for any chunk size.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;
