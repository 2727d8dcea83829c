//! Configuration management for Cartaz.
//!
//! Cartaz reads a single TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `CARTAZ_<SECTION>_<KEY>` overrides
//! - Default values for every optional setting
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [style]
//! page_size = "a4"
//! orientation = "portrait"
//!
//! [style.colors]
//! price = "#cc0000"
//!
//! [export]
//! output_dir = "./output"
//! large_batch_threshold = 50
//!
//! [remote]
//! url = "https://your-project.supabase.co"
//! key = "${CARTAZ_REMOTE_KEY}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{ApplicationConfig, CartazConfig, ExportConfig, LoggingConfig, RemoteConfig};
pub use secret::{secret_string, SecretString, SecretValue};
