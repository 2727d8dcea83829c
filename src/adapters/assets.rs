//! Banner and background images
//!
//! Images referenced by a style are fetched once, before any poster is
//! captured, and shared by every item of the batch.

use crate::domain::{AppError, Result};
use image::DynamicImage;
use reqwest::Client;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Decoded images keyed by their reference (path or URL)
#[derive(Debug, Clone, Default)]
pub struct AssetCache {
    images: HashMap<String, Arc<DynamicImage>>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reference: impl Into<String>, image: DynamicImage) {
        self.images.insert(reference.into(), Arc::new(image));
    }

    pub fn get(&self, reference: &str) -> Option<Arc<DynamicImage>> {
        self.images.get(reference).cloned()
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.images.contains_key(reference)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Loads image references from disk or over HTTP(S)
///
/// Relative paths are resolved against `base_dir`.
#[derive(Debug, Clone)]
pub struct AssetLoader {
    client: Client,
    base_dir: PathBuf,
}

impl AssetLoader {
    pub fn new(base_dir: impl Into<PathBuf>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_dir: base_dir.into(),
        })
    }

    /// Loads every reference into a cache
    ///
    /// Fails on the first image that cannot be fetched or decoded, so an
    /// export never starts with a missing banner.
    pub async fn load<'a>(&self, references: impl IntoIterator<Item = &'a str>) -> Result<AssetCache> {
        let mut cache = AssetCache::new();

        for reference in references {
            if cache.contains(reference) {
                continue;
            }
            let bytes = if is_remote(reference) {
                self.fetch(reference).await?
            } else {
                let path = self.resolve(reference);
                tokio::fs::read(&path).await.map_err(|e| {
                    AppError::Validation(format!(
                        "Image '{}' could not be read: {e}",
                        path.display()
                    ))
                })?
            };

            let image = image::load_from_memory(&bytes).map_err(|e| {
                AppError::Validation(format!("Image '{reference}' could not be decoded: {e}"))
            })?;

            tracing::debug!(
                reference = %reference,
                width = image.width(),
                height = image.height(),
                "Loaded image asset"
            );
            cache.insert(reference, image);
        }

        Ok(cache)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Validation(format!("Image '{url}' could not be fetched: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Validation(format!(
                "Image '{url}' could not be fetched: HTTP {status}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Image '{url}' could not be fetched: {e}")))?;
        Ok(bytes.to_vec())
    }

    fn resolve(&self, reference: &str) -> PathBuf {
        let path = Path::new(reference);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn png_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        let image = RgbImage::from_pixel(3, 2, Rgb([10, 20, 30]));
        image
            .write_with_encoder(image::codecs::png::PngEncoder::new(&mut bytes))
            .unwrap();
        bytes
    }

    #[tokio::test]
    async fn test_load_relative_path() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("banner.png"), png_bytes()).unwrap();

        let loader = AssetLoader::new(dir.path(), Duration::from_secs(5)).unwrap();
        let cache = loader.load(["banner.png", "banner.png"]).await.unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("banner.png").unwrap().width(), 3);
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let loader = AssetLoader::new(dir.path(), Duration::from_secs(5)).unwrap();

        let result = loader.load(["missing.png"]).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_load_over_http() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/banner.png")
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body(png_bytes())
            .create_async()
            .await;

        let url = format!("{}/banner.png", server.url());
        let loader = AssetLoader::new(".", Duration::from_secs(5)).unwrap();
        let cache = loader.load([url.as_str()]).await.unwrap();

        mock.assert_async().await;
        assert!(cache.contains(&url));
    }

    #[tokio::test]
    async fn test_http_error_fails() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/gone.png")
            .with_status(404)
            .create_async()
            .await;

        let url = format!("{}/gone.png", server.url());
        let loader = AssetLoader::new(".", Duration::from_secs(5)).unwrap();
        assert!(loader.load([url.as_str()]).await.is_err());
    }
}
