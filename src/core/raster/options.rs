//! Raster resolution and encoding profiles

use crate::config::ExportConfig;

/// Bitmap encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Lossless
    Png,
    /// Lossy, quality 1..=100
    Jpeg { quality: u8 },
}

impl Encoding {
    /// MIME type of the encoded bytes
    pub fn content_type(&self) -> &'static str {
        match self {
            Encoding::Png => "image/png",
            Encoding::Jpeg { .. } => "image/jpeg",
        }
    }

    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Encoding::Png => "png",
            Encoding::Jpeg { .. } => "jpg",
        }
    }
}

/// How a render target is turned into a bitmap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    /// Output pixels per canvas pixel
    pub scale: f32,
    pub encoding: Encoding,
}

impl RasterOptions {
    /// Profile for a one-poster export
    pub fn single(config: &ExportConfig) -> Self {
        Self {
            scale: config.single_scale,
            encoding: Encoding::Png,
        }
    }

    /// Profile for a batch of `count` posters
    ///
    /// Batches above the large batch threshold get the reduced profile. The
    /// second value is true when that downgrade applies.
    pub fn batch(config: &ExportConfig, count: usize) -> (Self, bool) {
        if count > config.large_batch_threshold {
            (
                Self {
                    scale: config.large_batch_scale,
                    encoding: Encoding::Jpeg {
                        quality: config.large_batch_quality,
                    },
                },
                true,
            )
        } else {
            (
                Self {
                    scale: config.batch_scale,
                    encoding: Encoding::Jpeg {
                        quality: config.batch_quality,
                    },
                },
                false,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_profile_is_lossless() {
        let options = RasterOptions::single(&ExportConfig::default());
        assert_eq!(options.encoding, Encoding::Png);
        assert_eq!(options.scale, 2.0);
    }

    #[test]
    fn test_batch_profile_downgrades_past_threshold() {
        let config = ExportConfig::default();

        let (normal, downgraded) = RasterOptions::batch(&config, 50);
        assert!(!downgraded);
        assert_eq!(normal.encoding, Encoding::Jpeg { quality: 85 });
        assert_eq!(normal.scale, 1.5);

        let (reduced, downgraded) = RasterOptions::batch(&config, 51);
        assert!(downgraded);
        assert_eq!(reduced.encoding, Encoding::Jpeg { quality: 70 });
        assert_eq!(reduced.scale, 1.0);
    }
}
