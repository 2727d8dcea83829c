//! Campaign publishing
//!
//! Publishing uploads an export artifact and records a campaign row pointing at
//! it. The artifact is only borrowed: whatever happens remotely, the caller
//! still holds the local bytes.

use super::traits::{CampaignStore, ObjectStorage};
use crate::core::assemble::ExportArtifact;
use crate::domain::{AppError, PublishRequest, RemoteError, Result, SharedCampaign};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

/// Uploads artifacts and records them as campaigns
pub struct CampaignPublisher {
    storage: Arc<dyn ObjectStorage>,
    store: Arc<dyn CampaignStore>,
    max_upload_bytes: usize,
}

impl CampaignPublisher {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        store: Arc<dyn CampaignStore>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            storage,
            store,
            max_upload_bytes,
        }
    }

    /// Publishes an artifact as a new campaign
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the request metadata is invalid
    /// - [`RemoteError::PayloadTooLarge`] if the artifact exceeds the upload
    ///   limit; no request is made in that case
    /// - any upload or insert error from the backend
    pub async fn publish(
        &self,
        artifact: &ExportArtifact,
        request: PublishRequest,
    ) -> Result<SharedCampaign> {
        request
            .validate(Utc::now().date_naive())
            .map_err(AppError::Validation)?;

        let size = artifact.size();
        if size > self.max_upload_bytes {
            return Err(RemoteError::PayloadTooLarge {
                size_bytes: size,
                limit_bytes: self.max_upload_bytes,
            }
            .into());
        }

        let start = Instant::now();
        let file_url = self
            .storage
            .upload(
                artifact.bytes.clone(),
                &artifact.filename,
                artifact.content_type(),
            )
            .await?;

        let campaign = request.into_campaign(file_url);
        let stored = self.store.insert(&campaign).await.map_err(|e| {
            tracing::error!(
                file_url = %campaign.file_url,
                error = %e,
                "Upload succeeded but the campaign row was not stored"
            );
            e
        })?;

        tracing::info!(
            id = %stored.id,
            title = %stored.title,
            expiry = %stored.expiry_date,
            file = %artifact.filename,
            bytes = size,
            sha256 = %artifact.sha256,
            duration_ms = start.elapsed().as_millis() as u64,
            "Campaign published"
        );

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::remote::InMemoryRemote;
    use crate::core::assemble::ArtifactKind;
    use crate::domain::{ProductRecord, StyleConfig};
    use chrono::Duration;

    fn artifact(size: usize) -> ExportArtifact {
        ExportArtifact::new(
            "Cartazes_semana.zip".to_string(),
            vec![0u8; size],
            ArtifactKind::Archive {
                entries: vec!["arroz.pdf".to_string(), "todas.pdf".to_string()],
                combined_pages: 1,
            },
            vec![0],
        )
    }

    fn request() -> PublishRequest {
        PublishRequest {
            title: "Ofertas da semana".to_string(),
            expiry_date: Utc::now().date_naive() + Duration::days(7),
            release_date: None,
            products: vec![ProductRecord::new("Arroz", "9,99", "Kg")],
            design: StyleConfig::default(),
        }
    }

    fn publisher(remote: &Arc<InMemoryRemote>, limit: usize) -> CampaignPublisher {
        CampaignPublisher::new(remote.clone(), remote.clone(), limit)
    }

    #[tokio::test]
    async fn test_publish_uploads_and_records() {
        let remote = Arc::new(InMemoryRemote::new());
        let artifact = artifact(16);

        let campaign = publisher(&remote, 1024)
            .publish(&artifact, request())
            .await
            .unwrap();

        let stored = remote.object(&campaign.file_url).unwrap();
        assert_eq!(stored.bytes.len(), 16);
        assert_eq!(stored.content_type, "application/zip");
        assert_eq!(campaign.products.len(), 1);
        assert_eq!(remote.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_oversized_artifact_is_rejected_before_upload() {
        let remote = Arc::new(InMemoryRemote::new());
        let artifact = artifact(2048);

        let err = publisher(&remote, 1024)
            .publish(&artifact, request())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Remote(RemoteError::PayloadTooLarge {
                size_bytes: 2048,
                limit_bytes: 1024
            })
        ));
        assert!(remote.object_paths().is_empty());
        assert_eq!(artifact.size(), 2048);
    }

    #[tokio::test]
    async fn test_expired_request_is_rejected() {
        let remote = Arc::new(InMemoryRemote::new());
        let mut expired = request();
        expired.expiry_date = Utc::now().date_naive() - Duration::days(1);

        let err = publisher(&remote, 1024)
            .publish(&artifact(4), expired)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(remote.object_paths().is_empty());
    }
}
