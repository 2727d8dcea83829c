//! External system integrations for Cartaz.
//!
//! - [`spreadsheet`] - product lists from xlsx/ods/json files
//! - [`assets`] - banner and background images from disk or HTTP
//! - [`remote`] - object storage and the shared campaign table
//!
//! Remote services sit behind traits so the hosted backend can be swapped for
//! an in-memory one:
//!
//! ```rust
//! use cartaz::adapters::remote::{CampaignStore, InMemoryRemote};
//!
//! # async fn example() -> cartaz::domain::Result<()> {
//! let remote = InMemoryRemote::new();
//! assert!(remote.list_all().await?.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod remote;
pub mod spreadsheet;

pub use spreadsheet::import_products;
