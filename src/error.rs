use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load street network: {0}")]
    DataLoad(String),
    #[error("Snapshot unusable: {0}")]
    SnapshotCorrupt(String),
    #[error("Invalid trip geometry: {0}")]
    InvalidGeometry(String),
    #[error("Failed to persist snapshot: {0}")]
    PersistenceWrite(String),
    #[error("GeoJSON error: {0}")]
    GeoJson(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
