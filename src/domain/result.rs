//! Result type alias for Cartaz

use super::errors::AppError;

/// Result type alias for Cartaz operations
///
/// # Examples
///
/// ```
/// use cartaz::domain::result::Result;
/// use cartaz::domain::errors::AppError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(AppError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, AppError>;
