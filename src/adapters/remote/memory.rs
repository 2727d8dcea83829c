//! In-memory remote backend
//!
//! Holds uploads and campaign rows in process memory. Used for dry runs and
//! tests; nothing survives the process.

use super::traits::{CampaignStore, ObjectStorage};
use crate::domain::{RemoteError, Result, SharedCampaign};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Stored upload
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Object storage and campaign table kept in memory
#[derive(Debug, Default)]
pub struct InMemoryRemote {
    objects: Mutex<HashMap<String, StoredObject>>,
    campaigns: Mutex<Vec<SharedCampaign>>,
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Object paths uploaded so far
    pub fn object_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.objects().keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Looks up an upload by the URL [`ObjectStorage::upload`] returned
    pub fn object(&self, url: &str) -> Option<StoredObject> {
        let path = url.strip_prefix("memory://")?;
        self.objects().get(path).cloned()
    }

    fn objects(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredObject>> {
        self.objects.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn campaigns(&self) -> std::sync::MutexGuard<'_, Vec<SharedCampaign>> {
        self.campaigns.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn newest_first(mut campaigns: Vec<SharedCampaign>) -> Vec<SharedCampaign> {
        campaigns.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        campaigns
    }
}

#[async_trait]
impl ObjectStorage for InMemoryRemote {
    async fn upload(&self, bytes: Vec<u8>, filename: &str, content_type: &str) -> Result<String> {
        let path = format!("{}-{}", Uuid::new_v4(), filename);
        tracing::debug!(path = %path, bytes = bytes.len(), "Storing upload in memory");
        self.objects().insert(
            path.clone(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("memory://{path}"))
    }
}

#[async_trait]
impl CampaignStore for InMemoryRemote {
    async fn insert(&self, campaign: &SharedCampaign) -> Result<SharedCampaign> {
        let mut stored = campaign.clone();
        stored.created_at.get_or_insert_with(Utc::now);
        self.campaigns().push(stored.clone());
        Ok(stored)
    }

    async fn list_visible(
        &self,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Vec<SharedCampaign>> {
        let visible = self
            .campaigns()
            .iter()
            .filter(|c| c.is_visible(today, now))
            .cloned()
            .collect();
        Ok(Self::newest_first(visible))
    }

    async fn list_all(&self) -> Result<Vec<SharedCampaign>> {
        Ok(Self::newest_first(self.campaigns().clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut campaigns = self.campaigns();
        let before = campaigns.len();
        campaigns.retain(|c| c.id != id);
        if campaigns.len() == before {
            return Err(RemoteError::NotFound(id.to_string()).into());
        }
        Ok(())
    }
}
