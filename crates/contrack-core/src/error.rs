use thiserror::Error;

/// Errors raised by a [`SheetStore`](crate::SheetStore)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Sheet name already exists: {0}")]
    SheetNameExists(String),

    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    #[error("Row {row} is out of range for sheet {sheet}")]
    RowOutOfRange { sheet: String, row: u32 },
}
