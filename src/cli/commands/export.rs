//! Export command implementation
//!
//! This module implements the `export` command: import a product list, render
//! posters, write the artifact locally and optionally publish it as a campaign.

use crate::adapters::assets::AssetLoader;
use crate::adapters::import_products;
use crate::adapters::remote::create_remote;
use crate::cli::{exit_code, exit_code_for};
use crate::config::{load_config, CartazConfig};
use crate::core::assemble::ExportArtifact;
use crate::core::export::{ExportCoordinator, ExportSummary, ProgressCallback, SingleFormat};
use crate::core::raster::ImageRasterizer;
use crate::domain::{AppError, ProductRecord, PublishRequest};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Product list (xlsx, xls, ods or json)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output directory (overrides export.output_dir)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export only the first product as a single file
    #[arg(long)]
    pub single: bool,

    /// Single export format (pdf or png)
    #[arg(long, default_value = "pdf", requires = "single")]
    pub format: SingleFormat,

    /// Label used in the archive name (defaults to the input file name)
    #[arg(long)]
    pub label: Option<String>,

    /// Publish the artifact as a shared campaign
    #[arg(long)]
    pub publish: bool,

    /// Campaign title
    #[arg(long, requires = "publish")]
    pub title: Option<String>,

    /// Last day the campaign is visible (YYYY-MM-DD)
    #[arg(long, requires = "publish")]
    pub expiry: Option<NaiveDate>,

    /// Scheduled release time (RFC 3339)
    #[arg(long, requires = "publish")]
    pub release: Option<DateTime<Utc>>,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run mode - publish to an in-memory backend instead of the remote
    #[arg(long)]
    pub dry_run: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input.display(), "Starting export command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(exit_code::CONFIGURATION);
            }
        };

        if let Some(output) = &self.output {
            config.export.output_dir = output.to_string_lossy().to_string();
        }

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(exit_code::CONFIGURATION);
        }

        let mut publish_request = match self.publish_request(&config) {
            Ok(request) => request,
            Err(e) => {
                eprintln!("{e}");
                return Ok(exit_code::CONFIGURATION);
            }
        };

        let products = match import_products(&self.input) {
            Ok(products) if products.is_empty() => {
                eprintln!("No products found in {}", self.input.display());
                return Ok(exit_code::IMPORT);
            }
            Ok(products) => products,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to import products");
                eprintln!("Failed to import products: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        if let Some(request) = publish_request.as_mut() {
            request.products = products.clone();
        }

        if config.application.dry_run {
            println!("🔍 DRY RUN MODE - Nothing will be sent to the remote service");
            println!();
        }

        if publish_request.is_some() && !self.yes && !config.application.dry_run {
            println!("Export Configuration:");
            println!("  Products: {}", products.len());
            println!("  Page: {:?} {:?}", config.style.page_size, config.style.orientation);
            println!("  Output: {}", config.export.output_dir);
            println!("  Publish: yes");
            println!();
            print!("Proceed with export and publish? [y/N]: ");
            std::io::stdout().flush()?;

            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Export cancelled.");
                return Ok(exit_code::SUCCESS);
            }
        }

        let coordinator = match self.coordinator(&config, config_path, shutdown_signal).await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to prepare export");
                eprintln!("Failed to prepare export: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        println!("🚀 Exporting {} poster(s)...", if self.single { 1 } else { products.len() });

        let (artifact, summary) = if self.single {
            match self.run_single(&coordinator, &config, &products).await {
                Ok(artifact) => (Some(artifact), None),
                Err(e) => {
                    tracing::error!(error = %e, "Single export failed");
                    eprintln!("Export failed: {e}");
                    return Ok(exit_code_for(&e));
                }
            }
        } else {
            let progress: ProgressCallback = Box::new(|percent| {
                eprint!("\r  Progress: {percent:>3}%");
                if percent == 100 {
                    eprintln!();
                }
            });
            match coordinator
                .run_batch(&products, &config.style, Some(progress))
                .await
            {
                Ok(outcome) => (outcome.artifact, Some(outcome.summary)),
                Err(e) => {
                    tracing::error!(error = %e, "Batch export failed");
                    eprintln!();
                    eprintln!("Export failed: {e}");
                    return Ok(exit_code_for(&e));
                }
            }
        };

        if let Some(summary) = &summary {
            print_summary(summary);
        }

        let Some(artifact) = artifact else {
            return Ok(match &summary {
                Some(s) if s.interrupted => {
                    println!("⚠️  Export interrupted. No file was written.");
                    exit_code::INTERRUPTED
                }
                _ => {
                    println!("❌ No poster could be rendered. No file was written.");
                    exit_code::FATAL
                }
            });
        };

        let path = match write_artifact(&config.export.output_dir, &artifact).await {
            Ok(path) => path,
            Err(e) => {
                tracing::error!(error = %e, "Failed to write artifact");
                eprintln!("Failed to write {}: {e}", artifact.filename);
                return Ok(exit_code::FATAL);
            }
        };
        println!("💾 Saved {} ({} bytes)", path.display(), artifact.size());

        if let Some(request) = publish_request {
            let backend = match create_remote(&config) {
                Ok(backend) => backend,
                Err(e) => {
                    eprintln!("Publishing unavailable: {e}");
                    eprintln!("   The exported file is kept at {}", path.display());
                    return Ok(exit_code_for(&e));
                }
            };

            match backend.publisher().publish(&artifact, request).await {
                Ok(campaign) => {
                    println!("📤 Published campaign '{}' ({})", campaign.title, campaign.id);
                    println!("   {}", campaign.file_url);
                }
                Err(e) => {
                    crate::log_error_with_context!(&e, "Failed to publish campaign");
                    eprintln!("Failed to publish: {e}");
                    eprintln!("   The exported file is kept at {}", path.display());
                    return Ok(exit_code_for(&e));
                }
            }
        }

        let exit_code = match &summary {
            Some(s) if s.is_partial() => {
                println!("⚠️  Export completed with skipped products");
                exit_code::PARTIAL
            }
            _ => {
                println!("✅ Export completed successfully!");
                exit_code::SUCCESS
            }
        };

        Ok(exit_code)
    }

    fn publish_request(
        &self,
        config: &CartazConfig,
    ) -> std::result::Result<Option<PublishRequest>, String> {
        if !self.publish {
            return Ok(None);
        }
        let title = self
            .title
            .clone()
            .ok_or("--publish requires --title")?;
        let expiry_date = self.expiry.ok_or("--publish requires --expiry")?;

        let request = PublishRequest {
            title,
            expiry_date,
            release_date: self.release,
            products: Vec::new(),
            design: config.style.clone(),
        };
        request.validate(Utc::now().date_naive())?;
        Ok(Some(request))
    }

    async fn coordinator(
        &self,
        config: &CartazConfig,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> crate::domain::Result<ExportCoordinator> {
        let rasterizer = match &config.export.font_path {
            Some(font) => ImageRasterizer::with_font_file(font)?,
            None => {
                tracing::warn!("No export.font_path configured; text is drawn as placeholder bars");
                ImageRasterizer::new()
            }
        };

        let base_dir = Path::new(config_path)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let loader = AssetLoader::new(
            base_dir,
            Duration::from_secs(config.export.asset_timeout_seconds),
        )?;
        let assets = loader.load(config.style.images.iter()).await?;

        Ok(
            ExportCoordinator::new(config.export.clone(), Arc::new(rasterizer), shutdown_signal)
                .with_assets(assets)
                .with_label(self.label()),
        )
    }

    async fn run_single(
        &self,
        coordinator: &ExportCoordinator,
        config: &CartazConfig,
        products: &[ProductRecord],
    ) -> crate::domain::Result<ExportArtifact> {
        if products.len() > 1 {
            tracing::warn!(
                products = products.len(),
                "Single export uses only the first product"
            );
        }
        let product = products
            .first()
            .ok_or_else(|| AppError::Validation("no products to export".to_string()))?;
        coordinator
            .export_single(product, &config.style, self.format)
            .await
    }

    fn label(&self) -> String {
        self.label.clone().unwrap_or_else(|| {
            self.input
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "export".to_string())
        })
    }
}

async fn write_artifact(output_dir: &str, artifact: &ExportArtifact) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(output_dir).await?;
    let path = Path::new(output_dir).join(&artifact.filename);
    tokio::fs::write(&path, &artifact.bytes).await?;
    tracing::info!(
        path = %path.display(),
        bytes = artifact.size(),
        sha256 = %artifact.sha256,
        "Artifact written"
    );
    Ok(path)
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("📊 Export Summary:");
    println!("  Total Products: {}", summary.total);
    println!("  Exported: {}", summary.succeeded);
    println!("  Skipped: {}", summary.failed);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!("  Success Rate: {:.2}%", summary.success_rate());
    if summary.quality_downgraded {
        println!("  Image quality was reduced for this large batch");
    }
    println!();

    if !summary.failures.is_empty() {
        println!("⚠️  Skipped products:");
        for failure in summary.failures.iter().take(10) {
            let name = if failure.product.trim().is_empty() {
                "(sem nome)"
            } else {
                failure.product.as_str()
            };
            println!("  - #{} {}: {}", failure.index + 1, name, failure.reason);
        }
        if summary.failures.len() > 10 {
            println!("  ... and {} more", summary.failures.len() - 10);
        }
        println!();
    }
}
