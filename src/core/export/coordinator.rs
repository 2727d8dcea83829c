//! Export coordinator - main orchestrator for the export process
//!
//! Products are processed one at a time, in input order: render, rasterize,
//! then add to the archive. A product that cannot be rendered is skipped and
//! reported; an assembly failure aborts the whole export.

use super::batch::{BatchResult, BatchState};
use super::progress::{ProgressCallback, ProgressTracker};
use super::summary::ExportSummary;
use crate::adapters::assets::AssetCache;
use crate::config::ExportConfig;
use crate::core::assemble::{
    archive_file_name, sanitize_file_stem, ArchiveBuilder, ArtifactKind, ExportArtifact,
    PdfDocument,
};
use crate::core::raster::{RasterOptions, RasterizedPage, Rasterizer};
use crate::core::render::{check_renderable, render};
use crate::domain::{AppError, ProductRecord, RenderError, Result, StyleConfig};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Output format of a one-poster export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SingleFormat {
    #[default]
    Pdf,
    Png,
}

impl FromStr for SingleFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(SingleFormat::Pdf),
            "png" => Ok(SingleFormat::Png),
            other => Err(format!("Invalid format '{other}'. Must be pdf or png")),
        }
    }
}

impl fmt::Display for SingleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SingleFormat::Pdf => write!(f, "pdf"),
            SingleFormat::Png => write!(f, "png"),
        }
    }
}

/// Result of a batch export
#[derive(Debug)]
pub struct BatchOutcome {
    /// `None` when the batch was cancelled or every product failed
    pub artifact: Option<ExportArtifact>,
    pub summary: ExportSummary,
}

/// Export coordinator
pub struct ExportCoordinator {
    config: ExportConfig,
    rasterizer: Arc<dyn Rasterizer>,
    assets: AssetCache,
    label: String,
    shutdown: watch::Receiver<bool>,
    state: watch::Sender<BatchState>,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    ///
    /// The export stops between items once `shutdown` turns true.
    pub fn new(
        config: ExportConfig,
        rasterizer: Arc<dyn Rasterizer>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            config,
            rasterizer,
            assets: AssetCache::new(),
            label: "export".to_string(),
            shutdown,
            state: watch::Sender::new(BatchState::Idle),
        }
    }

    /// Images preloaded for the style's banner and background
    pub fn with_assets(mut self, assets: AssetCache) -> Self {
        self.assets = assets;
        self
    }

    /// Label used in the archive file name
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    fn is_cancelled(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Current state of the running (or last) batch
    pub fn state(&self) -> BatchState {
        *self.state.borrow()
    }

    /// Follows state changes while a batch runs
    pub fn subscribe_state(&self) -> watch::Receiver<BatchState> {
        self.state.subscribe()
    }

    fn enter(&self, summary: &mut ExportSummary, state: BatchState) {
        summary.state = state;
        self.state.send_replace(state);
    }

    /// Exports one poster as a PDF page or a PNG
    pub async fn export_single(
        &self,
        product: &ProductRecord,
        style: &StyleConfig,
        format: SingleFormat,
    ) -> Result<ExportArtifact> {
        style.validate().map_err(AppError::Validation)?;
        if self.is_cancelled() {
            return Err(AppError::Cancelled(
                "shutdown requested before export".to_string(),
            ));
        }

        let start = Instant::now();
        let options = RasterOptions::single(&self.config);
        let page = self.process_item(0, product, style, &options).await?;
        let stem = sanitize_file_stem(&product.name, self.config.max_filename_len);

        let artifact = match format {
            SingleFormat::Pdf => {
                let mut document = PdfDocument::new(style.page_size, style.orientation);
                document.add_page(&page)?;
                ExportArtifact::new(
                    format!("{stem}.pdf"),
                    document.finish()?,
                    ArtifactKind::Document { page_count: 1 },
                    document.sources(),
                )
            }
            SingleFormat::Png => ExportArtifact::new(
                format!("{stem}.png"),
                page.bytes,
                ArtifactKind::Image {
                    width: page.width,
                    height: page.height,
                },
                vec![0],
            ),
        };

        tracing::info!(
            product = %product.name,
            format = %format,
            file = %artifact.filename,
            bytes = artifact.size(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Exported single poster"
        );

        Ok(artifact)
    }

    /// Exports a batch as a ZIP archive
    ///
    /// The archive holds one PDF per rendered product plus a combined document
    /// with one page per rendered product, in input order. `progress` is called
    /// after every item.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty product list or an invalid
    /// style, and [`AppError::Assembly`] if the PDF or archive cannot be written.
    pub async fn run_batch(
        &self,
        products: &[ProductRecord],
        style: &StyleConfig,
        mut progress: Option<ProgressCallback>,
    ) -> Result<BatchOutcome> {
        if products.is_empty() {
            return Err(AppError::Validation("no products to export".to_string()));
        }
        style.validate().map_err(AppError::Validation)?;

        let start = Instant::now();
        let total = products.len();
        let mut summary = ExportSummary::new(total);

        let (options, downgraded) = RasterOptions::batch(&self.config, total);
        summary.quality_downgraded = downgraded;
        if downgraded {
            tracing::warn!(
                products = total,
                threshold = self.config.large_batch_threshold,
                scale = options.scale,
                quality = self.config.large_batch_quality,
                "Large batch: exporting with reduced image quality"
            );
        }

        tracing::info!(products = total, label = %self.label, "Starting batch export");

        let mut archive = ArchiveBuilder::new(
            style.page_size,
            style.orientation,
            self.config.combined_file_name.clone(),
            self.config.max_filename_len,
        );
        let mut tracker = ProgressTracker::new(total);
        let mut result = BatchResult::new();

        for (index, product) in products.iter().enumerate() {
            if self.is_cancelled() {
                tracing::warn!(
                    processed = index,
                    total = total,
                    "Shutdown requested, stopping batch"
                );
                summary.record(&result);
                self.enter(&mut summary, BatchState::Cancelled);
                summary.interrupted = true;
                let summary = summary.with_duration(start.elapsed());
                summary.log_summary();
                return Ok(BatchOutcome {
                    artifact: None,
                    summary,
                });
            }

            self.enter(&mut summary, BatchState::Running { index });
            tracing::debug!(
                index = index,
                product = %product.name,
                state = %summary.state,
                "Processing poster"
            );

            match self.process_item(index, product, style, &options).await {
                Ok(page) => {
                    let file_name = archive.add(&page).map_err(|e| {
                        tracing::error!(index = index, product = %product.name, error = %e, "Assembly failed");
                        self.enter(&mut summary, BatchState::Failed);
                        e
                    })?;
                    tracing::debug!(
                        index = index,
                        product = %product.name,
                        file = %file_name,
                        bytes = page.bytes.len(),
                        "Poster added"
                    );
                    result.add_success(index, product.name.clone(), file_name);
                }
                Err(e) => {
                    tracing::warn!(index = index, product = %product.name, error = %e, "Skipping poster");
                    result.add_failure(index, product.name.clone(), e);
                }
            }

            let percent = tracker.advance();
            if let Some(callback) = progress.as_mut() {
                callback(percent);
            }

            self.pause().await;
        }

        summary.record(&result);
        self.enter(&mut summary, BatchState::Finalizing);
        tracing::debug!(
            state = %summary.state,
            pages = archive.len(),
            "Writing archive"
        );

        if archive.is_empty() {
            self.enter(&mut summary, BatchState::Failed);
            let summary = summary.with_duration(start.elapsed());
            summary.log_summary();
            return Ok(BatchOutcome {
                artifact: None,
                summary,
            });
        }

        let archive_name = archive_file_name(
            &self.config.archive_prefix,
            &self.label,
            self.config.max_filename_len,
        );
        let artifact = match archive.finish(archive_name) {
            Ok(artifact) => artifact,
            Err(e) => {
                self.enter(&mut summary, BatchState::Failed);
                return Err(e);
            }
        };

        self.enter(&mut summary, BatchState::Done);
        summary.artifact_name = Some(artifact.filename.clone());
        summary.artifact_bytes = Some(artifact.size());
        let summary = summary.with_duration(start.elapsed());
        summary.log_summary();

        Ok(BatchOutcome {
            artifact: Some(artifact),
            summary,
        })
    }

    async fn process_item(
        &self,
        index: usize,
        product: &ProductRecord,
        style: &StyleConfig,
        options: &RasterOptions,
    ) -> std::result::Result<RasterizedPage, RenderError> {
        check_renderable(product, style)?;
        let target = render(Some(product), style, style.dimensions())
            .ok_or(RenderError::MissingProduct { index })?;
        let page = self
            .rasterizer
            .rasterize(&target, options, &self.assets)
            .await?;
        Ok(page.for_product(index, product.name.clone()))
    }

    async fn pause(&self) {
        if self.config.pause_ms == 0 {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(Duration::from_millis(self.config.pause_ms)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::raster::{Encoding, ImageRasterizer};
    use crate::core::render::RenderTarget;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Keeps the raster options of every call
    #[derive(Default)]
    struct RecordingRasterizer {
        inner: ImageRasterizer,
        calls: Mutex<Vec<RasterOptions>>,
    }

    #[async_trait]
    impl Rasterizer for RecordingRasterizer {
        async fn rasterize(
            &self,
            target: &RenderTarget,
            options: &RasterOptions,
            assets: &AssetCache,
        ) -> std::result::Result<RasterizedPage, RenderError> {
            self.calls.lock().unwrap().push(*options);
            self.inner.rasterize(target, options, assets).await
        }
    }

    fn products(count: usize) -> Vec<ProductRecord> {
        (0..count)
            .map(|i| ProductRecord::new(format!("Item {i}"), "1,99", "Un"))
            .collect()
    }

    async fn run_with_threshold(count: usize) -> (ExportSummary, Vec<RasterOptions>) {
        let (_tx, rx) = watch::channel(false);
        let rasterizer = Arc::new(RecordingRasterizer::default());
        let config = ExportConfig {
            large_batch_threshold: 2,
            large_batch_quality: 40,
            ..config()
        };

        let outcome = ExportCoordinator::new(config, rasterizer.clone(), rx)
            .run_batch(&products(count), &StyleConfig::default(), None)
            .await
            .unwrap();

        let calls = rasterizer.calls.lock().unwrap().clone();
        (outcome.summary, calls)
    }

    fn config() -> ExportConfig {
        ExportConfig {
            single_scale: 0.25,
            batch_scale: 0.2,
            large_batch_scale: 0.1,
            pause_ms: 0,
            ..ExportConfig::default()
        }
    }

    fn coordinator(shutdown: watch::Receiver<bool>) -> ExportCoordinator {
        ExportCoordinator::new(config(), Arc::new(ImageRasterizer::new()), shutdown)
            .with_label("teste")
    }

    #[test]
    fn test_single_format_from_str() {
        assert_eq!("PNG".parse::<SingleFormat>().unwrap(), SingleFormat::Png);
        assert!("gif".parse::<SingleFormat>().is_err());
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected() {
        let (_tx, rx) = watch::channel(false);
        let result = coordinator(rx)
            .run_batch(&[], &StyleConfig::default(), None)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        let products = vec![ProductRecord::new("Arroz", "9,99", "Kg")];

        let outcome = coordinator(rx)
            .run_batch(&products, &StyleConfig::default(), None)
            .await
            .unwrap();

        assert!(outcome.artifact.is_none());
        assert!(outcome.summary.interrupted);
        assert_eq!(outcome.summary.state, BatchState::Cancelled);
    }

    #[tokio::test]
    async fn test_batch_above_threshold_uses_reduced_profile() {
        let (summary, calls) = run_with_threshold(3).await;

        assert!(summary.quality_downgraded);
        assert_eq!(summary.succeeded, 3);
        assert_eq!(calls.len(), 3);
        for options in &calls {
            assert_eq!(options.encoding, Encoding::Jpeg { quality: 40 });
            assert_eq!(options.scale, 0.1);
        }
    }

    #[tokio::test]
    async fn test_batch_at_threshold_keeps_batch_profile() {
        let (summary, calls) = run_with_threshold(2).await;

        assert!(!summary.quality_downgraded);
        assert_eq!(calls.len(), 2);
        for options in &calls {
            assert_eq!(options.encoding, Encoding::Jpeg { quality: 85 });
            assert_eq!(options.scale, 0.2);
        }
    }

    #[tokio::test]
    async fn test_state_follows_batch() {
        let (_tx, rx) = watch::channel(false);
        let coordinator = coordinator(rx);
        assert_eq!(coordinator.state(), BatchState::Idle);

        let states = coordinator.subscribe_state();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let progress: ProgressCallback =
            Box::new(move |_| sink.lock().unwrap().push(*states.borrow()));

        let outcome = coordinator
            .run_batch(&products(2), &StyleConfig::default(), Some(progress))
            .await
            .unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                BatchState::Running { index: 0 },
                BatchState::Running { index: 1 }
            ]
        );
        assert_eq!(outcome.summary.state, BatchState::Done);
        assert_eq!(coordinator.state(), BatchState::Done);
    }

    #[tokio::test]
    async fn test_single_png_export() {
        let (_tx, rx) = watch::channel(false);
        let product = ProductRecord::new("Pão Francês", "14,90", "Kg");

        let artifact = coordinator(rx)
            .export_single(&product, &StyleConfig::default(), SingleFormat::Png)
            .await
            .unwrap();

        assert_eq!(artifact.filename, "pao_frances.png");
        assert_eq!(artifact.content_type(), "image/png");
        assert_eq!(artifact.kind, ArtifactKind::Image { width: 199, height: 281 });
    }

    #[tokio::test]
    async fn test_single_export_rejects_blank_name() {
        let (_tx, rx) = watch::channel(false);
        let product = ProductRecord::new("  ", "1,00", "Un");

        let result = coordinator(rx)
            .export_single(&product, &StyleConfig::default(), SingleFormat::Pdf)
            .await;

        assert!(matches!(
            result,
            Err(AppError::Render(RenderError::InvalidProduct(_)))
        ));
    }
}
