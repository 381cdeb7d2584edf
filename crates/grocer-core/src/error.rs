//! Error types module
//!
//! All failures the workflow can report are unified under [`AppError`]. Each
//! variant describes itself through [`ErrorMetadata`] so front-ends can decide
//! what to show the user and how loudly to log it without matching on
//! variants themselves.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like network failures
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "UNSUPPORTED_FILE_TYPE")
    fn error_code(&self) -> &'static str;

    /// Whether the user can retry the same action
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the user
    fn suggested_action(&self) -> Option<&'static str>;

    /// User-facing message (may differ from the internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unsupported file type: {content_type} (allowed: {allowed:?})")]
    UnsupportedFileType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Empty file: {0}")]
    EmptyFile(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No file selected")]
    NoFileSelected,

    #[error("Cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: String,
    },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("API request failed with status {status}: {body}")]
    ApiStatus { status: u16, body: String },

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Image conversion error: {0}")]
    Conversion(String),

    #[error("Failed to save receipt: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl AppError {
    /// True for failures at the network boundary (transport, status, body).
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            AppError::Transport(_) | AppError::ApiStatus { .. } | AppError::InvalidResponse(_)
        )
    }
}

/// Static metadata for each variant: (error_code, recoverable, suggested_action, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (&'static str, bool, Option<&'static str>, LogLevel) {
    match err {
        AppError::UnsupportedFileType { .. } => (
            "UNSUPPORTED_FILE_TYPE",
            true,
            Some("Choose a JPG, PNG or HEIC image"),
            LogLevel::Debug,
        ),
        AppError::EmptyFile(_) => (
            "EMPTY_FILE",
            true,
            Some("Choose a non-empty image"),
            LogLevel::Debug,
        ),
        AppError::InvalidInput(_) => (
            "INVALID_INPUT",
            true,
            Some("Check the input and try again"),
            LogLevel::Debug,
        ),
        AppError::NoFileSelected => (
            "NO_FILE_SELECTED",
            true,
            Some("Select a receipt image first"),
            LogLevel::Debug,
        ),
        AppError::InvalidState { .. } => ("INVALID_STATE", true, None, LogLevel::Debug),
        AppError::Transport(_) => (
            "NETWORK_ERROR",
            true,
            Some("Check your connection and parse again"),
            LogLevel::Warn,
        ),
        AppError::ApiStatus { .. } => (
            "API_ERROR",
            true,
            Some("Parse the receipt again"),
            LogLevel::Warn,
        ),
        AppError::InvalidResponse(_) => (
            "INVALID_RESPONSE",
            true,
            Some("Parse the receipt again"),
            LogLevel::Warn,
        ),
        AppError::Cancelled => ("CANCELLED", true, None, LogLevel::Debug),
        AppError::Conversion(_) => ("CONVERSION_ERROR", true, None, LogLevel::Warn),
        AppError::Persistence(_) => (
            "PERSISTENCE_ERROR",
            true,
            Some("Save the receipt again"),
            LogLevel::Error,
        ),
        AppError::Config(_) => (
            "CONFIG_ERROR",
            false,
            Some("Check the environment configuration"),
            LogLevel::Error,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => {
            ("INTERNAL_ERROR", false, None, LogLevel::Error)
        }
    }
}

impl ErrorMetadata for AppError {
    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).1
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            AppError::UnsupportedFileType { .. } => {
                "Please upload a valid image file (JPG, PNG, HEIC)".to_string()
            }
            AppError::EmptyFile(name) => format!("{} is empty", name),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::NoFileSelected => "Please select a file first.".to_string(),
            AppError::InvalidState { operation, state } => {
                format!("Cannot {} while {}", operation, state)
            }
            AppError::Transport(_) | AppError::ApiStatus { .. } | AppError::InvalidResponse(_) => {
                "An unexpected error occurred.".to_string()
            }
            AppError::Cancelled => "The request was cancelled.".to_string(),
            AppError::Conversion(_) => "Could not convert the image for display.".to_string(),
            AppError::Persistence(_) => "Failed to save the receipt.".to_string(),
            AppError::Config(msg) => msg.clone(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "An internal error occurred.".to_string()
            }
        }
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }
}
