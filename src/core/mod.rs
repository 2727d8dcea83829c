//! Core business logic for Cartaz.
//!
//! # Modules
//!
//! - [`render`] - Template renderer: product + style to a positioned element tree
//! - [`raster`] - Rasterizer: element tree to PNG/JPEG bytes
//! - [`assemble`] - PDF pages, ZIP archives and safe file names
//! - [`export`] - Single and batch export orchestration
//!
//! # Export Workflow
//!
//! 1. **Render**: lay out one poster per product
//! 2. **Rasterize**: paint it at the export scale
//! 3. **Assemble**: wrap the bitmap in a PDF page; batches add a per-product PDF
//!    to the archive and a page to the combined document
//! 4. **Report**: build the export summary
//!
//! # Example
//!
//! ```rust,no_run
//! use cartaz::config::ExportConfig;
//! use cartaz::core::export::ExportCoordinator;
//! use cartaz::core::raster::ImageRasterizer;
//! use cartaz::domain::{ProductRecord, StyleConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> cartaz::domain::Result<()> {
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let coordinator = ExportCoordinator::new(
//!     ExportConfig::default(),
//!     Arc::new(ImageRasterizer::new()),
//!     shutdown_rx,
//! );
//!
//! let products = vec![ProductRecord::new("Arroz", "9,99", "Kg")];
//! let outcome = coordinator
//!     .run_batch(&products, &StyleConfig::default(), None)
//!     .await?;
//!
//! println!("Succeeded: {}", outcome.summary.succeeded);
//! # Ok(())
//! # }
//! ```

pub mod assemble;
pub mod export;
pub mod raster;
pub mod render;
