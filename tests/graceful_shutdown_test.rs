//! Integration tests for cancellation and per-item failure handling
//!
//! These tests verify that:
//! - A shutdown signal stops a batch between items and produces no artifact
//! - A poster that fails to rasterize is skipped and reported
//! - A batch where every poster fails produces no artifact

use async_trait::async_trait;
use cartaz::adapters::assets::AssetCache;
use cartaz::config::ExportConfig;
use cartaz::core::assemble::ArtifactKind;
use cartaz::core::export::{BatchState, ExportCoordinator};
use cartaz::core::raster::{ImageRasterizer, RasterOptions, RasterizedPage, Rasterizer};
use cartaz::core::render::RenderTarget;
use cartaz::domain::{ElementKey, ProductRecord, RenderError, StyleConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

fn config() -> ExportConfig {
    ExportConfig {
        single_scale: 0.2,
        batch_scale: 0.2,
        large_batch_scale: 0.1,
        pause_ms: 0,
        ..ExportConfig::default()
    }
}

fn products(names: &[&str]) -> Vec<ProductRecord> {
    names
        .iter()
        .map(|name| ProductRecord::new(*name, "3,99", "Un"))
        .collect()
}

/// Fails every poster whose name contains "QUEBRADO"
struct FlakyRasterizer {
    inner: ImageRasterizer,
}

#[async_trait]
impl Rasterizer for FlakyRasterizer {
    async fn rasterize(
        &self,
        target: &RenderTarget,
        options: &RasterOptions,
        assets: &AssetCache,
    ) -> Result<RasterizedPage, RenderError> {
        let name = target.texts_for(ElementKey::Name).join(" ");
        if name.contains("QUEBRADO") {
            return Err(RenderError::Encode("encoder exploded".to_string()));
        }
        self.inner.rasterize(target, options, assets).await
    }
}

/// Requests shutdown after a fixed number of posters
struct StoppingRasterizer {
    inner: ImageRasterizer,
    stop_after: usize,
    calls: AtomicUsize,
    shutdown: watch::Sender<bool>,
}

#[async_trait]
impl Rasterizer for StoppingRasterizer {
    async fn rasterize(
        &self,
        target: &RenderTarget,
        options: &RasterOptions,
        assets: &AssetCache,
    ) -> Result<RasterizedPage, RenderError> {
        let page = self.inner.rasterize(target, options, assets).await;
        if self.calls.fetch_add(1, Ordering::SeqCst) + 1 == self.stop_after {
            let _ = self.shutdown.send(true);
        }
        page
    }
}

#[tokio::test]
async fn test_failed_posters_are_skipped_and_reported() {
    let (_tx, rx) = watch::channel(false);
    let rasterizer = Arc::new(FlakyRasterizer {
        inner: ImageRasterizer::new(),
    });
    let coordinator = ExportCoordinator::new(config(), rasterizer, rx);
    let batch = products(&["Arroz", "Feijão quebrado", "Leite", "Café"]);

    let outcome = coordinator
        .run_batch(&batch, &StyleConfig::default(), None)
        .await
        .unwrap();

    let summary = &outcome.summary;
    assert_eq!(summary.state, BatchState::Done);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.failed, 1);
    assert!(summary.is_partial());
    assert_eq!(summary.failures[0].index, 1);
    assert_eq!(summary.failures[0].product, "Feijão quebrado");
    assert_eq!(
        summary.failures[0].reason,
        RenderError::Encode("encoder exploded".to_string())
    );

    let artifact = outcome.artifact.unwrap();
    assert_eq!(artifact.sources, vec![0, 2, 3]);
    assert!(matches!(
        artifact.kind,
        ArtifactKind::Archive { combined_pages: 3, .. }
    ));
}

#[tokio::test]
async fn test_invalid_product_is_skipped() {
    let (_tx, rx) = watch::channel(false);
    let coordinator = ExportCoordinator::new(config(), Arc::new(ImageRasterizer::new()), rx);
    let mut batch = products(&["Arroz", "Leite"]);
    batch.insert(1, ProductRecord::new("", "1,00", "Un"));

    let outcome = coordinator
        .run_batch(&batch, &StyleConfig::default(), None)
        .await
        .unwrap();

    assert_eq!(outcome.summary.failed, 1);
    assert!(matches!(
        outcome.summary.failures[0].reason,
        RenderError::InvalidProduct(_)
    ));
    assert_eq!(outcome.artifact.unwrap().sources, vec![0, 2]);
}

#[tokio::test]
async fn test_all_failures_produce_no_artifact() {
    let (_tx, rx) = watch::channel(false);
    let rasterizer = Arc::new(FlakyRasterizer {
        inner: ImageRasterizer::new(),
    });
    let coordinator = ExportCoordinator::new(config(), rasterizer, rx);

    let outcome = coordinator
        .run_batch(&products(&["quebrado 1", "quebrado 2"]), &StyleConfig::default(), None)
        .await
        .unwrap();

    assert!(outcome.artifact.is_none());
    assert_eq!(outcome.summary.state, BatchState::Failed);
    assert_eq!(outcome.summary.failed, 2);
}

#[tokio::test]
async fn test_shutdown_stops_batch_between_items() {
    let (tx, rx) = watch::channel(false);
    let rasterizer = Arc::new(StoppingRasterizer {
        inner: ImageRasterizer::new(),
        stop_after: 2,
        calls: AtomicUsize::new(0),
        shutdown: tx,
    });
    let coordinator = ExportCoordinator::new(config(), rasterizer.clone(), rx);
    let batch = products(&["A", "B", "C", "D", "E"]);

    let outcome = coordinator
        .run_batch(&batch, &StyleConfig::default(), None)
        .await
        .unwrap();

    assert!(outcome.artifact.is_none());
    assert!(outcome.summary.interrupted);
    assert_eq!(outcome.summary.state, BatchState::Cancelled);
    assert_eq!(outcome.summary.succeeded, 2);
    assert_eq!(rasterizer.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_shutdown_signal_propagation() {
    let (shutdown_tx, shutdown_rx1) = watch::channel(false);
    let shutdown_rx2 = shutdown_rx1.clone();

    assert!(!*shutdown_rx1.borrow());
    assert!(!*shutdown_rx2.borrow());

    shutdown_tx.send(true).unwrap();

    assert!(*shutdown_rx1.borrow());
    assert!(*shutdown_rx2.borrow());
}
