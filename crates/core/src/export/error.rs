//! Export error types.

use thiserror::Error;

/// Errors raised while building the ledger workbook.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The spreadsheet writer rejected a cell or failed to serialize.
    #[error("workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    /// More rows than a worksheet can hold.
    #[error("too many rows for one worksheet: {0}")]
    TooManyRows(usize),
}

impl From<ExportError> for nsgd_shared::AppError {
    fn from(err: ExportError) -> Self {
        Self::Internal(err.to_string())
    }
}
