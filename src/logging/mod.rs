//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - human-readable console output on stderr
//! - JSON file logs with daily, hourly or no rotation
//! - level from the CLI or config, overridable with `RUST_LOG`
//!
//! # Example
//!
//! ```no_run
//! use cartaz::logging::init_logging;
//! use cartaz::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(products = 12, "Starting batch export");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use cartaz::log_error_with_context;
/// use cartaz::domain::AppError;
///
/// let error = AppError::Import("sheet is empty".to_string());
/// log_error_with_context!(&error, "Failed to import products");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
