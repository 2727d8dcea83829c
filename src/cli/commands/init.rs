//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "cartaz.toml")]
    pub output: String,

    /// Include every setting with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Cartaz configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your store's style", self.output);
                println!("  2. Point export.font_path at a TTF/OTF font");
                println!("  3. To publish campaigns, create a .env file with:");
                println!("     - CARTAZ_REMOTE_URL=https://<project>.supabase.co");
                println!("     - CARTAZ_REMOTE_KEY=<service key>");
                println!("  4. Validate configuration: cartaz validate-config");
                println!("  5. Run export: cartaz export --input ofertas.xlsx");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Cartaz Configuration File
# Retail poster export pipeline

[application]
log_level = "info"
dry_run = false

[style]
page_size = "a4"        # a3 | a4 | a5 | letter
orientation = "portrait" # portrait | landscape
factory_type = "standard" # standard | mega

[export]
output_dir = "./output"
# font_path = "./fonts/Roboto-Bold.ttf"

# [remote]
# url = "${CARTAZ_REMOTE_URL}"
# key = "${CARTAZ_REMOTE_KEY}"

[logging]
local_enabled = true
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with every setting documented
    fn generate_config_with_examples() -> String {
        r##"# Cartaz Configuration File
# Retail poster export pipeline
#
# Values can reference environment variables with ${VAR_NAME}, and most
# settings can be overridden with CARTAZ_<SECTION>_<KEY>, for example
# CARTAZ_EXPORT_OUTPUT_DIR=/tmp/cartazes.

[application]
# Log level: trace, debug, info, warn, error
log_level = "info"

# Dry run: campaigns are published to an in-memory backend
dry_run = false

[style]
# Paper size: a3, a4, a5, letter
page_size = "a4"

# portrait or landscape
orientation = "portrait"

# standard: unit price poster
# mega: bundle offer ("LEVE 3 UN"), needs a quantity per product
factory_type = "standard"

# Strike-through previous price when the product has one
show_old_price = true

# Used when no background image is set
background_color = "#ffffff"

[style.colors]
name = "#000000"
price = "#cc0000"

[style.images]
# File paths (relative to this file) or http(s) URLs
# banner = "./assets/banner.png"
# background = "https://cdn.example.com/fundo.jpg"

[style.scale]
# Font scale factors in percent
name = 100
price = 100
limit = 100

# Per-element pixel offsets on top of the default layout.
# Elements: banner, name, subtitle, old_price, price, unit, offer, limit, footer
# [style.positions.price]
# x = 0
# y = -20

[export]
output_dir = "./output"

# Font used for poster text; without one, text is drawn as placeholder bars
# font_path = "./fonts/Roboto-Bold.ttf"

# Raster scale for single exports and batches
single_scale = 2.0
batch_scale = 1.5
batch_quality = 85

# Batches above this size use the reduced profile below
large_batch_threshold = 50
large_batch_scale = 1.0
large_batch_quality = 70

# Pause between posters in milliseconds (0 only yields)
pause_ms = 20

combined_file_name = "Ofertas_Todas_Paginas.pdf"
archive_prefix = "Cartazes"
max_filename_len = 50
asset_timeout_seconds = 30

[remote]
url = "${CARTAZ_REMOTE_URL}"
key = "${CARTAZ_REMOTE_KEY}"
bucket = "cartazes"
table = "shared_files"
max_upload_mb = 50
timeout_seconds = 60

[logging]
local_enabled = true
local_path = "./logs"
# daily, hourly or never
local_rotation = "daily"
"##
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "cartaz.toml".to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "cartaz.toml");
        assert!(!args.with_examples);
        assert!(!args.force);
    }

    #[test]
    fn test_generate_minimal_config_parses() {
        let contents = InitArgs::generate_minimal_config();
        assert!(contents.contains("[application]"));

        let config = parse_config(&contents).unwrap();
        assert!(config.remote.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generate_config_with_examples() {
        let contents = InitArgs::generate_config_with_examples();
        assert!(contents.contains("# Cartaz Configuration File"));
        assert!(contents.contains("large_batch_threshold"));
        assert!(contents.contains("[style.positions.price]"));
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cartaz.toml");
        std::fs::write(&path, "existing").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "existing");
    }
}
