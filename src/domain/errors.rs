//! Domain error types
//!
//! This module defines the error hierarchy for Cartaz. Pipeline-level failures
//! use [`AppError`]; failures that only affect a single poster in a batch use
//! [`RenderError`] so the batch can skip the item and report it.

use thiserror::Error;

/// Main Cartaz error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors (bad style, empty batch, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Spreadsheet / product list import errors
    #[error("Import error: {0}")]
    Import(String),

    /// A single poster failed to render outside of a batch
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// PDF or archive assembly errors (abort the whole export)
    #[error("Assembly error: {0}")]
    Assembly(String),

    /// Remote storage / campaign table errors
    #[error("Remote sync error: {0}")]
    Remote(#[from] RemoteError),

    /// The export was cancelled before completion
    #[error("Export cancelled: {0}")]
    Cancelled(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Per-poster failures
///
/// These never abort a batch on their own; the coordinator records them in the
/// export summary next to the product that caused them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    /// No product data was available for this slot
    #[error("No product data available for item {index}")]
    MissingProduct { index: usize },

    /// The product record cannot be laid out
    #[error("Invalid product: {0}")]
    InvalidProduct(String),

    /// A banner or background image was not loaded before capture
    #[error("Image asset not loaded: {0}")]
    AssetUnavailable(String),

    /// The configured font could not be used
    #[error("Font error: {0}")]
    Font(String),

    /// Bitmap encoding failed
    #[error("Image encoding failed: {0}")]
    Encode(String),
}

/// Remote sync errors
///
/// Errors that occur when talking to object storage or the campaign table.
/// They do not expose the HTTP client's types.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Remote sync is not configured
    #[error("Remote sync is not configured")]
    NotConfigured,

    /// Failed to reach the remote service
    #[error("Failed to connect to remote service: {0}")]
    ConnectionFailed(String),

    /// The artifact exceeds the upload limit
    #[error("Payload too large: {size_bytes} bytes exceeds limit of {limit_bytes} bytes")]
    PayloadTooLarge { size_bytes: usize, limit_bytes: usize },

    /// Upload was rejected
    #[error("Upload failed: {status} - {message}")]
    UploadFailed { status: u16, message: String },

    /// Campaign insert was rejected
    #[error("Failed to insert campaign record: {status} - {message}")]
    InsertFailed { status: u16, message: String },

    /// Campaign listing failed
    #[error("Failed to list campaigns: {status} - {message}")]
    QueryFailed { status: u16, message: String },

    /// Campaign deletion failed
    #[error("Failed to delete campaign: {status} - {message}")]
    DeleteFailed { status: u16, message: String },

    /// Campaign not found
    #[error("Campaign not found: {0}")]
    NotFound(String),

    /// Invalid response from server
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        AppError::Assembly(format!("Archive error: {err}"))
    }
}

impl From<calamine::Error> for AppError {
    fn from(err: calamine::Error) -> Self {
        AppError::Import(err.to_string())
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        RemoteError::ConnectionFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_render_error_conversion() {
        let render_err = RenderError::MissingProduct { index: 3 };
        let app_err: AppError = render_err.into();
        assert!(matches!(app_err, AppError::Render(_)));
        assert!(app_err.to_string().contains("item 3"));
    }

    #[test]
    fn test_remote_error_conversion() {
        let remote_err = RemoteError::PayloadTooLarge {
            size_bytes: 10,
            limit_bytes: 5,
        };
        let app_err: AppError = remote_err.into();
        assert!(matches!(app_err, AppError::Remote(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_err: AppError = json_err.into();
        assert!(matches!(app_err, AppError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let app_err: AppError = toml_err.into();
        assert!(matches!(app_err, AppError::Configuration(_)));
        assert!(app_err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_app_error_implements_std_error() {
        let err = AppError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
