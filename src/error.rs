use std::path::PathBuf;
use thiserror::Error;

/// Rejected file or field selection. The previous selection stays in place.
#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("Please select up to {max} files only.")]
    TooManyFiles { count: usize, max: usize },

    #[error("Unsupported file type: {file_name} (accepted: PDF, JPG, JPEG, PNG)")]
    UnsupportedFileType { file_name: String },

    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("File too large: {file_name} ({size} bytes, max {max} bytes)")]
    FileTooLarge { file_name: String, size: u64, max: u64 },

    #[error("Unknown field: {id}")]
    UnknownField { id: String },
}

/// Failure of a single call to the extraction endpoint.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to process {file_name}: {status_text}")]
    Remote {
        file_name: String,
        status: u16,
        status_text: String,
    },

    #[error("Failed to process {file_name}: {message}")]
    Network { file_name: String, message: String },

    #[error("Failed to process {file_name}: invalid response ({message})")]
    InvalidResponse { file_name: String, message: String },

    #[error("Could not read {file_name}: {source}")]
    Io {
        file_name: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Excel export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("No files selected.")]
    NoFiles,

    #[error("Please select at least one field to extract.")]
    NoFieldsSelected,

    #[error("Files are already being processed.")]
    AlreadyProcessing,

    #[error("No extraction results to export.")]
    NoResults,

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
