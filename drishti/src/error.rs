//! Error types for drishti

use crate::extraction::FeatureKind;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// drishti error types
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// A feature model parameter was read before being set
    #[error("Configuration error: parameter `{0}` was never set")]
    Configuration(&'static str),

    /// Collinear or coincident lines in an intersection computation
    #[error("Degenerate geometry: {0}")]
    GeometryDegeneracy(&'static str),

    /// An extractor task failed while processing a scan
    #[error("{kind} extraction failed: {reason}")]
    ExtractionFailure {
        /// Extractor that failed
        kind: FeatureKind,
        /// Failure description
        reason: String,
    },

    /// Scan violates the beam-count or finiteness contract
    #[error("Malformed scan: {0}")]
    MalformedScan(String),

    /// Feature model file could not be read or parsed
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// Worker threads could not be started
    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::ModelLoad(e.to_string())
    }
}
