use contrack_core::StoreError;
use thiserror::Error;

/// Errors that abort a tracker operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("Required sheet is missing: {0}")]
    MissingSheet(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid entry in {cell}: {message}")]
    InvalidEntry { cell: String, message: String },
}
