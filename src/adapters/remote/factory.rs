//! Remote backend factory

use super::memory::InMemoryRemote;
use super::publisher::CampaignPublisher;
use super::supabase::SupabaseClient;
use super::traits::{CampaignStore, ObjectStorage};
use crate::config::CartazConfig;
use crate::domain::{RemoteError, Result};
use std::sync::Arc;

/// Upload limit used by dry runs without a `[remote]` section
const DRY_RUN_UPLOAD_LIMIT: usize = 50 * 1024 * 1024;

/// Storage and campaign table for one configuration
#[derive(Clone)]
pub struct RemoteBackend {
    pub storage: Arc<dyn ObjectStorage>,
    pub store: Arc<dyn CampaignStore>,
    pub max_upload_bytes: usize,
}

impl RemoteBackend {
    pub fn publisher(&self) -> CampaignPublisher {
        CampaignPublisher::new(
            self.storage.clone(),
            self.store.clone(),
            self.max_upload_bytes,
        )
    }
}

/// Create the remote backend for a configuration
///
/// Dry runs get an [`InMemoryRemote`]; otherwise the `[remote]` section selects
/// the Supabase project.
///
/// # Errors
///
/// Returns [`RemoteError::NotConfigured`] if there is no `[remote]` section and
/// this is not a dry run.
pub fn create_remote(config: &CartazConfig) -> Result<RemoteBackend> {
    if config.application.dry_run {
        tracing::info!("Dry run: using in-memory remote backend");
        let remote = Arc::new(InMemoryRemote::new());
        return Ok(RemoteBackend {
            storage: remote.clone(),
            store: remote,
            max_upload_bytes: config
                .remote
                .as_ref()
                .map(|r| r.max_upload_bytes())
                .unwrap_or(DRY_RUN_UPLOAD_LIMIT),
        });
    }

    let remote_config = config.remote.as_ref().ok_or(RemoteError::NotConfigured)?;

    tracing::info!(url = %remote_config.url, bucket = %remote_config.bucket, "Creating Supabase client");
    let client = Arc::new(SupabaseClient::new(remote_config.clone())?);

    Ok(RemoteBackend {
        storage: client.clone(),
        store: client,
        max_upload_bytes: remote_config.max_upload_bytes(),
    })
}
