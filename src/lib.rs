// Cartaz - Retail poster export pipeline
// Copyright (c) 2025 Cartaz Contributors
// Licensed under the MIT License

//! # Cartaz - Retail Poster Export Pipeline
//!
//! Cartaz turns a list of products (name, price, unit, promotional details)
//! into print-ready price posters. It lays each poster out from a shared style,
//! rasterizes it, and assembles single PDFs, PNGs or a ZIP bundle of per-product
//! PDFs plus one combined document. Bundles can be published to object storage
//! as a campaign with an expiry date and an optional scheduled release.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (render, raster, assemble, export)
//! - [`adapters`] - External integrations (spreadsheets, assets, remote sync)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cartaz::adapters::import_products;
//! use cartaz::config::load_config;
//! use cartaz::core::export::ExportCoordinator;
//! use cartaz::core::raster::ImageRasterizer;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("cartaz.toml")?;
//!     let products = import_products("ofertas.xlsx")?;
//!
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     let coordinator = ExportCoordinator::new(
//!         config.export.clone(),
//!         Arc::new(ImageRasterizer::new()),
//!         shutdown_rx,
//!     );
//!
//!     let outcome = coordinator.run_batch(&products, &config.style, None).await?;
//!     if let Some(artifact) = outcome.artifact {
//!         std::fs::write(&artifact.filename, &artifact.bytes)?;
//!     }
//!     println!("Exported {} of {}", outcome.summary.succeeded, outcome.summary.total);
//!     Ok(())
//! }
//! ```
//!
//! ## Batch Failures
//!
//! A product that cannot be rendered is skipped and listed in the
//! [`core::export::ExportSummary`]; the rest of the batch still ships. Failures
//! writing the PDF or archive abort the batch.
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`domain::Result`], whose error is
//! [`domain::AppError`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
