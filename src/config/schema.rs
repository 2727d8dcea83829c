//! Configuration schema types
//!
//! This module defines the structure of `cartaz.toml`.

use crate::config::SecretString;
use crate::domain::StyleConfig;
use serde::{Deserialize, Serialize};

/// Main Cartaz configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section is optional; a missing `[remote]` section disables publishing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartazConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Default poster style for every export
    #[serde(default)]
    pub style: StyleConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Object storage and campaign table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CartazConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.style.validate()?;
        self.export.validate()?;
        if let Some(ref remote) = self.remote {
            remote.validate()?;
        }
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (render and assemble, but never upload or write files)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory exports are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Raster scale for one-poster exports (lossless)
    #[serde(default = "default_single_scale")]
    pub single_scale: f32,

    /// Raster scale for batch exports
    #[serde(default = "default_batch_scale")]
    pub batch_scale: f32,

    /// JPEG quality for batch exports
    #[serde(default = "default_batch_quality")]
    pub batch_quality: u8,

    /// Batches with more posters than this use the reduced profile
    #[serde(default = "default_large_batch_threshold")]
    pub large_batch_threshold: usize,

    /// Raster scale for large batches
    #[serde(default = "default_large_batch_scale")]
    pub large_batch_scale: f32,

    /// JPEG quality for large batches
    #[serde(default = "default_large_batch_quality")]
    pub large_batch_quality: u8,

    /// Pause between batch items in milliseconds (0 only yields)
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,

    /// Name of the all-pages document inside archives
    #[serde(default = "default_combined_file_name")]
    pub combined_file_name: String,

    /// Archive names are `{archive_prefix}_{label}.zip`
    #[serde(default = "default_archive_prefix")]
    pub archive_prefix: String,

    /// Maximum length of a per-poster file stem
    #[serde(default = "default_max_filename_len")]
    pub max_filename_len: usize,

    /// TrueType/OpenType font for poster text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_path: Option<String>,

    /// Timeout for fetching remote banner/background images
    #[serde(default = "default_asset_timeout_seconds")]
    pub asset_timeout_seconds: u64,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        for (label, scale) in [
            ("single_scale", self.single_scale),
            ("batch_scale", self.batch_scale),
            ("large_batch_scale", self.large_batch_scale),
        ] {
            if !(scale > 0.0 && scale <= 4.0) {
                return Err(format!(
                    "export.{label} must be greater than 0 and at most 4, got {scale}"
                ));
            }
        }

        for (label, quality) in [
            ("batch_quality", self.batch_quality),
            ("large_batch_quality", self.large_batch_quality),
        ] {
            if !(1..=100).contains(&quality) {
                return Err(format!(
                    "export.{label} must be between 1 and 100, got {quality}"
                ));
            }
        }

        if self.large_batch_threshold == 0 {
            return Err("export.large_batch_threshold must be > 0".to_string());
        }

        if !(8..=200).contains(&self.max_filename_len) {
            return Err(format!(
                "export.max_filename_len must be between 8 and 200, got {}",
                self.max_filename_len
            ));
        }

        if !self.combined_file_name.ends_with(".pdf")
            || self.combined_file_name.contains(['/', '\\'])
        {
            return Err(format!(
                "export.combined_file_name must be a plain .pdf file name, got '{}'",
                self.combined_file_name
            ));
        }

        if self.archive_prefix.is_empty() || self.archive_prefix.contains(['/', '\\']) {
            return Err("export.archive_prefix must be a non-empty file name prefix".to_string());
        }

        if self.output_dir.is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            single_scale: default_single_scale(),
            batch_scale: default_batch_scale(),
            batch_quality: default_batch_quality(),
            large_batch_threshold: default_large_batch_threshold(),
            large_batch_scale: default_large_batch_scale(),
            large_batch_quality: default_large_batch_quality(),
            pause_ms: default_pause_ms(),
            combined_file_name: default_combined_file_name(),
            archive_prefix: default_archive_prefix(),
            max_filename_len: default_max_filename_len(),
            font_path: None,
            asset_timeout_seconds: default_asset_timeout_seconds(),
        }
    }
}

/// Object storage and campaign table (Supabase)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Project URL (`https://<project>.supabase.co`)
    pub url: String,

    /// Service key
    /// Stored securely in memory and automatically zeroized on drop
    pub key: SecretString,

    /// Storage bucket for exported files
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Campaign table
    #[serde(default = "default_table")]
    pub table: String,

    /// Uploads above this size are rejected before any request is made
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl RemoteConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.url.is_empty() {
            return Err("remote.url cannot be empty".to_string());
        }

        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err("remote.url must start with http:// or https://".to_string());
        }

        if self.key.expose_secret().is_empty() {
            return Err("remote.key cannot be empty".to_string());
        }

        if self.bucket.is_empty() {
            return Err("remote.bucket cannot be empty".to_string());
        }

        if self.table.is_empty() {
            return Err("remote.table cannot be empty".to_string());
        }

        if self.max_upload_mb == 0 || self.max_upload_mb > 5000 {
            return Err(format!(
                "remote.max_upload_mb must be between 1 and 5000, got {}",
                self.max_upload_mb
            ));
        }

        Ok(())
    }

    /// Upload limit in bytes
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> String {
    "./output".to_string()
}

fn default_single_scale() -> f32 {
    2.0
}

fn default_batch_scale() -> f32 {
    1.5
}

fn default_batch_quality() -> u8 {
    85
}

fn default_large_batch_threshold() -> usize {
    50
}

fn default_large_batch_scale() -> f32 {
    1.0
}

fn default_large_batch_quality() -> u8 {
    70
}

fn default_pause_ms() -> u64 {
    20
}

fn default_combined_file_name() -> String {
    "Ofertas_Todas_Paginas.pdf".to_string()
}

fn default_archive_prefix() -> String {
    "Cartazes".to_string()
}

fn default_max_filename_len() -> usize {
    50
}

fn default_asset_timeout_seconds() -> u64 {
    30
}

fn default_bucket() -> String {
    "cartazes".to_string()
}

fn default_table() -> String {
    "shared_files".to_string()
}

fn default_max_upload_mb() -> usize {
    50
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
