//! Error types for the facturas-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the facturas library.
#[derive(Error, Debug)]
pub enum FacturasError {
    /// Vision-model extraction error.
    #[error("extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// Snapshot merge error.
    #[error("merge error: {0}")]
    Merge(#[from] MergeError),

    /// Record flattening error.
    #[error("flatten error: {0}")]
    Flatten(#[from] FlattenError),

    /// Report emission error.
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// JSON serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors from the vision-model extraction adapter.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The image file could not be read.
    #[error("failed to read image {path}: {source}")]
    Image {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Transport-level request failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The response carried no choices.
    #[error("empty response from model")]
    EmptyResponse,

    /// The response content was not the expected JSON payload.
    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    /// No API key in the environment.
    #[error("OPENAI_API_KEY not set")]
    MissingApiKey,
}

/// Errors while merging cached result files into one snapshot.
///
/// Any of these fails the whole merge; there is no partial recovery.
#[derive(Error, Debug)]
pub enum MergeError {
    /// A cached result file could not be read.
    #[error("failed to read result file {path}: {source}")]
    ReadEntry {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A cached result file held invalid JSON.
    #[error("corrupt result file {path}: {source}")]
    ParseEntry {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The merged snapshot file could not be replaced or written.
    #[error("failed to write merged snapshot {path}: {source}")]
    WriteSnapshot {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors while flattening a merged snapshot into records.
#[derive(Error, Debug)]
pub enum FlattenError {
    /// A product entry inside a present product list had no name.
    #[error("product entry {index} of invoice {record:?} has no product name")]
    MissingProductName { record: String, index: usize },
}

/// Errors while emitting the spreadsheet report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Workbook construction or save failure.
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Filesystem failure around the report file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the facturas library.
pub type Result<T> = std::result::Result<T, FacturasError>;
