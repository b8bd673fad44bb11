use std::path::PathBuf;
use thiserror::Error;

/// The main error type for labelcensus operations.
#[derive(Debug, Error)]
pub enum CensusError {
    #[error("Invalid dataset root {path}: {message}")]
    InvalidRoot { path: PathBuf, message: String },

    #[error("Failed to parse XML from {path}: {message}")]
    XmlParse { path: PathBuf, message: String },

    #[error("Failed to parse JSON from {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected JSON structure in {path}: {message}")]
    JsonShape { path: PathBuf, message: String },

    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8")]
    NotUtf8 { path: PathBuf },

    #[error("Failed to read class names from {path}: {source}")]
    ClassNamesRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write CSV export to {path}: {source}")]
    CsvExport {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write report JSON: {source}")]
    ReportJsonWrite {
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported output format: {0}")]
    UnsupportedOutput(String),
}
