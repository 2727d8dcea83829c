//! Remote sync traits
//!
//! Publishing needs two services: object storage for the exported file and a
//! table of campaign rows pointing at it. Both sit behind traits so the CLI can
//! swap the hosted backend for the in-memory one in dry runs and tests.

use crate::domain::{Result, SharedCampaign};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Object storage for exported files
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Uploads a file and returns its public URL
    ///
    /// Each upload gets a unique object path, so uploading the same file name
    /// twice never overwrites an earlier object.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::RemoteError::UploadFailed`] if the service rejects the
    /// upload.
    async fn upload(&self, bytes: Vec<u8>, filename: &str, content_type: &str) -> Result<String>;
}

/// Table of published campaigns
#[async_trait]
pub trait CampaignStore: Send + Sync {
    /// Stores a new campaign row and returns it as persisted
    async fn insert(&self, campaign: &SharedCampaign) -> Result<SharedCampaign>;

    /// Campaigns a store should see right now, newest first
    ///
    /// Expired campaigns and campaigns scheduled for later are left out.
    async fn list_visible(&self, today: NaiveDate, now: DateTime<Utc>)
        -> Result<Vec<SharedCampaign>>;

    /// Every campaign, newest first
    async fn list_all(&self) -> Result<Vec<SharedCampaign>>;

    /// Removes a campaign row
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::RemoteError::NotFound`] if no row has this id.
    async fn delete(&self, id: Uuid) -> Result<()>;
}
