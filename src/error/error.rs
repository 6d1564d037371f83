use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type PrepResult<T> = Result<T, PrepError>;

/// Everything that can go wrong while preparing a dataset.
///
/// `Configuration` is raised before any file is touched and is safe to fix and
/// retry. `MissingData` voids the whole load call: no partial set is returned,
/// since a skipped sample would shift every later image/label pair.
#[derive(Debug, Error)]
pub enum PrepError {
    #[error("invalid configuration: {reason}")]
    Configuration { reason: String },

    #[error("no image data for index {index} ({})", .path.display())]
    MissingData { index: usize, path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PrepError {
    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        PrepError::Configuration { reason: reason.into() }
    }

    /// Index of the sample that failed to decode, if this is a missing-data error.
    pub fn missing_index(&self) -> Option<usize> {
        match self {
            PrepError::MissingData { index, .. } => Some(*index),
            _ => None,
        }
    }
}
