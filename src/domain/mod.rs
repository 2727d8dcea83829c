//! Domain models and types for Cartaz.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Poster inputs** ([`ProductRecord`], [`StyleConfig`])
//! - **Published campaigns** ([`SharedCampaign`], [`PublishRequest`])
//! - **Error types** ([`AppError`], [`RenderError`], [`RemoteError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible pipeline operations return [`Result<T, AppError>`]; failures
//! scoped to one poster use [`RenderError`] so a batch can skip and report them:
//!
//! ```rust
//! use cartaz::domain::{AppError, RenderError, Result};
//!
//! fn example() -> Result<()> {
//!     Err(RenderError::MissingProduct { index: 0 })?
//! }
//!
//! assert!(matches!(example(), Err(AppError::Render(_))));
//! ```

pub mod campaign;
pub mod errors;
pub mod product;
pub mod result;
pub mod style;

pub use campaign::{PublishRequest, SharedCampaign};
pub use errors::{AppError, RemoteError, RenderError};
pub use product::ProductRecord;
pub use result::Result;
pub use style::{
    Dimensions, ElementKey, FactoryType, Offset, Orientation, PageSize, StyleConfig,
};
