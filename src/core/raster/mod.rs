//! Rasterization
//!
//! A [`Rasterizer`] turns a [`RenderTarget`] into an encoded bitmap. It is an
//! injected strategy: the coordinator only sees the trait, and tests can swap
//! in a rasterizer that fails on purpose.
//!
//! All banner and background images must be present in the [`AssetCache`]
//! before capture. A missing image is reported as
//! [`RenderError::AssetUnavailable`], never drawn as a blank area.

pub mod bitmap;
pub mod options;

use crate::adapters::assets::AssetCache;
use crate::core::render::RenderTarget;
use crate::domain::RenderError;
use async_trait::async_trait;

pub use bitmap::ImageRasterizer;
pub use options::{Encoding, RasterOptions};

/// An encoded bitmap of one poster
#[derive(Debug, Clone, PartialEq)]
pub struct RasterizedPage {
    pub bytes: Vec<u8>,
    pub encoding: Encoding,
    /// Pixel width
    pub width: u32,
    /// Pixel height
    pub height: u32,
    /// Position of the source product in the input list
    pub index: usize,
    /// Name of the source product
    pub product: String,
}

impl RasterizedPage {
    /// Tags the page with the product it was rendered from
    pub fn for_product(mut self, index: usize, product: impl Into<String>) -> Self {
        self.index = index;
        self.product = product.into();
        self
    }
}

/// Converts render targets into bitmaps
#[async_trait]
pub trait Rasterizer: Send + Sync {
    /// Rasterizes one render target
    async fn rasterize(
        &self,
        target: &RenderTarget,
        options: &RasterOptions,
        assets: &AssetCache,
    ) -> Result<RasterizedPage, RenderError>;
}
