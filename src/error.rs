//! Error types for the report pipeline
//!
//! Unrecognized wording is never an error: the parsers fall back to defaults.
//! Only structurally invalid requests are rejected, everything else here is an
//! internal failure surfaced with its category and a readable message.

use thiserror::Error;

/// Main error type for report generation
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Empty command: describe the report you want to generate")]
    EmptyInput,

    #[error("Unsupported {kind}: '{value}'")]
    Unsupported { kind: &'static str, value: String },

    #[error("Data source error: {0}")]
    DataSource(#[from] rusqlite::Error),

    #[error("Malformed rows in '{title}': {message}")]
    MalformedRows { title: String, message: String },

    #[error("Failed to render '{title}' as {format}: {message}")]
    Render {
        title: String,
        format: &'static str,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ReportError {
    /// Build a rendering failure for the given report title and format
    pub fn render(title: &str, format: &'static str, message: impl ToString) -> Self {
        ReportError::Render {
            title: title.to_string(),
            format,
            message: message.to_string(),
        }
    }

    /// Whether the request itself was invalid, as opposed to an internal failure
    pub fn is_rejection(&self) -> bool {
        matches!(self, ReportError::EmptyInput | ReportError::Unsupported { .. })
    }

    /// Short, stable label for the failure category
    pub fn category(&self) -> &'static str {
        match self {
            ReportError::EmptyInput | ReportError::Unsupported { .. } => "validation",
            ReportError::DataSource(_) => "data_source",
            ReportError::MalformedRows { .. } | ReportError::Render { .. } => "render",
            ReportError::Serialization(_) => "serialization",
            ReportError::Io(_) => "io",
            ReportError::Config(_) => "config",
        }
    }
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;
