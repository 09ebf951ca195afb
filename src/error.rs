use thiserror::Error;

/// Convenience result type for workbook conversion operations.
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Error type returned by the normalizer, the ID assigner and the prep extractor.
///
/// Only whole-file problems surface as errors. Row- and sheet-level problems are skipped and
/// reported to a [`crate::ingestion::ConversionObserver`] instead.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The input workbook could not be opened or a sheet could not be read.
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// The output workbook could not be built or saved.
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// JSON serialization of the output failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A sheet this operation cannot run without is absent from the workbook.
    #[error("sheet '{sheet}' not found in workbook")]
    SheetMissing { sheet: String },

    /// The sheet does not have the expected shape (no header row, missing column, ...).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },
}
