//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Cartaz configuration file.

use crate::config::load_config;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading also runs validation
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let style = &config.style;
        let dimensions = style.dimensions();

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!(
            "  Page: {:?} {:?} ({}x{} px)",
            style.page_size, style.orientation, dimensions.width, dimensions.height
        );
        println!("  Layout: {:?}", style.factory_type);
        println!("  Show Old Price: {}", style.show_old_price);
        for image in style.images.iter() {
            println!("  Image: {image}");
        }
        println!("  Output Directory: {}", config.export.output_dir);
        println!(
            "  Batch Profile: scale {} / quality {} (above {} products: scale {} / quality {})",
            config.export.batch_scale,
            config.export.batch_quality,
            config.export.large_batch_threshold,
            config.export.large_batch_scale,
            config.export.large_batch_quality
        );

        let mut exit_code = 0;
        match &config.export.font_path {
            Some(font) if Path::new(font).exists() => println!("  Font: {font}"),
            Some(font) => {
                println!("  ❌ Font not found: {font}");
                exit_code = 2;
            }
            None => println!("  Font: none (text drawn as placeholder bars)"),
        }

        match &config.remote {
            Some(remote) => {
                println!("  Remote: {} (bucket {}, table {})", remote.url, remote.bucket, remote.table);
                println!("  Upload Limit: {} MB", remote.max_upload_mb);
            }
            None => println!("  Remote: not configured"),
        }
        println!();

        Ok(exit_code)
    }
}
