//! Versioned snapshot of the network, its segments, and the traveled set
//!
//! One self-describing JSON artifact per deployment region. The source
//! project went through pickle, JSON-in-JSON, and YAML-on-binary snapshot
//! formats; this settles on a single versioned format for good.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    coverage::CoverageState,
    model::{Segment, Street, StreetNetwork},
};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    streets: Vec<Street>,
    segments: Vec<Segment>,
    traveled: Vec<String>,
}

/// Serializes the network and traveled set to `path`.
///
/// Writes a sibling temp file and renames it into place, so a crash can
/// never leave a half-written snapshot that [`load`] would take for valid.
///
/// # Errors
///
/// Returns [`Error::PersistenceWrite`]; callers treat this as non-fatal
/// since the in-memory state stays authoritative.
pub fn save(path: &Path, network: &StreetNetwork, state: &CoverageState) -> Result<(), Error> {
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        streets: network.streets().to_vec(),
        segments: network.segments().to_vec(),
        traveled: state.iter().map(str::to_string).collect(),
    };
    let payload =
        serde_json::to_vec(&snapshot).map_err(|e| Error::PersistenceWrite(e.to_string()))?;

    let tmp = temp_path(path);
    fs::write(&tmp, payload)
        .map_err(|e| Error::PersistenceWrite(format!("cannot write {}: {e}", tmp.display())))?;
    fs::rename(&tmp, path)
        .map_err(|e| Error::PersistenceWrite(format!("cannot rename into {}: {e}", path.display())))?;

    info!(
        "Snapshot saved to {}: {} streets, {} segments, {} traveled",
        path.display(),
        network.streets().len(),
        network.segments().len(),
        state.len()
    );
    Ok(())
}

/// Restores a network and traveled set from `path`.
///
/// # Errors
///
/// Returns [`Error::SnapshotCorrupt`] when the file is missing, unparsable,
/// of a different version, or empty; callers treat any of these as a cache
/// miss and rebuild from the source network.
pub fn load(path: &Path) -> Result<(StreetNetwork, CoverageState), Error> {
    let raw = fs::read(path)
        .map_err(|e| Error::SnapshotCorrupt(format!("cannot read {}: {e}", path.display())))?;
    let snapshot: Snapshot = serde_json::from_slice(&raw)
        .map_err(|e| Error::SnapshotCorrupt(format!("cannot parse {}: {e}", path.display())))?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(Error::SnapshotCorrupt(format!(
            "version {} does not match expected {SNAPSHOT_VERSION}",
            snapshot.version
        )));
    }
    if snapshot.streets.is_empty() || snapshot.segments.is_empty() {
        return Err(Error::SnapshotCorrupt(
            "snapshot has no streets or no segments".to_string(),
        ));
    }

    info!(
        "Loaded snapshot from {}: {} streets, {} segments, {} traveled",
        path.display(),
        snapshot.streets.len(),
        snapshot.segments.len(),
        snapshot.traveled.len()
    );

    let network = StreetNetwork::from_parts(snapshot.streets, snapshot.segments);
    let state = CoverageState::from_ids(snapshot.traveled);
    Ok((network, state))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut buf = path.as_os_str().to_os_string();
    buf.push(".tmp");
    PathBuf::from(buf)
}
