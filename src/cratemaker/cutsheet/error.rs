use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur while the
/// tool enumerates, decodes, or aggregates cutsheets.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading a candidate file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when a layout override cannot be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The scan root cannot be opened or enumerated. Fatal to the whole scan.
    #[error("cannot read directory {path}: {source}")]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The candidate file is not a readable spreadsheet container.
    #[error("Excel read error: {0}")]
    Decode(#[from] calamine::XlsxError),

    /// The workbook decodes but lacks the expected sheet or marker.
    #[error("not a cutsheet: {0}")]
    TemplateMismatch(String),

    /// The data region never terminates within the configured row limit.
    #[error("sheet '{sheet}' has no empty part number row within {limit} data rows")]
    MalformedTemplate { sheet: String, limit: u32 },

    /// A data row lacks a numeric cell its category requires.
    #[error("row {row} column {column}: {reason}")]
    CorruptRow {
        row: u32,
        column: u32,
        reason: String,
    },

    /// Raised when a layout override contains inconsistent settings.
    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input path not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
