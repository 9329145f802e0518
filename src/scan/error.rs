//! Scan errors.

use thiserror::Error;

use crate::storage::StorageError;

/// Result type for scans.
pub type ScanResult<T> = Result<T, ScanError>;

/// Scan errors. Everything that reaches this type aborts the scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

impl ScanError {
    /// the storage error underneath, if any
    pub fn storage(&self) -> Option<&StorageError> {
        match self {
            ScanError::Storage(e) => Some(e),
            ScanError::Serialization(_) | ScanError::Output(_) => None,
        }
    }
}
