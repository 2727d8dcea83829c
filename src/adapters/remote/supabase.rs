//! Supabase backend
//!
//! Talks to the Supabase storage and PostgREST HTTP APIs directly:
//!
//! - files go to `POST {url}/storage/v1/object/{bucket}/{path}` and are served
//!   from `{url}/storage/v1/object/public/{bucket}/{path}`
//! - campaign rows live in `{url}/rest/v1/{table}`
//!
//! Every request carries the service key both as `apikey` and as a bearer token.

use super::traits::{CampaignStore, ObjectStorage};
use crate::config::RemoteConfig;
use crate::domain::{AppError, RemoteError, Result, SharedCampaign};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use secrecy::ExposeSecret;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

/// HTTP client for a Supabase project
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    config: RemoteConfig,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.base_url)
            .field("bucket", &self.config.bucket)
            .field("table", &self.config.table)
            .finish()
    }
}

impl SupabaseClient {
    /// Creates a client for the configured project
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::ConnectionFailed`] if the HTTP client cannot be built.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(RemoteError::from)?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            config,
        })
    }

    /// Public URL of a stored object
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.config.bucket, path
        )
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.config.table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let key: &str = self.config.key.expose_secret().as_ref();
        request
            .header("apikey", key)
            .header("Authorization", format!("Bearer {key}"))
    }

    async fn list(&self, filters: &[(&str, String)]) -> Result<Vec<SharedCampaign>> {
        let mut url = Url::parse(&self.table_url())
            .map_err(|e| AppError::Configuration(format!("Invalid remote URL: {e}")))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", "*");
            for (column, filter) in filters {
                query.append_pair(column, filter);
            }
            query.append_pair("order", "created_at.desc");
        }

        tracing::debug!(url = %url, "Listing campaigns");

        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .map_err(RemoteError::from)?;
        let response = check_status(response, |status, message| RemoteError::QueryFailed {
            status,
            message,
        })
        .await?;

        let campaigns = response
            .json::<Vec<SharedCampaign>>()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;
        Ok(campaigns)
    }
}

/// Maps a non-success response to a [`RemoteError`] carrying its body
async fn check_status(
    response: Response,
    to_error: impl FnOnce(u16, String) -> RemoteError,
) -> std::result::Result<Response, RemoteError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    Err(to_error(status, message))
}

#[async_trait]
impl ObjectStorage for SupabaseClient {
    async fn upload(&self, bytes: Vec<u8>, filename: &str, content_type: &str) -> Result<String> {
        let path = format!("{}-{}", Uuid::new_v4(), filename);
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.config.bucket, path
        );
        let size = bytes.len();

        tracing::info!(
            bucket = %self.config.bucket,
            path = %path,
            bytes = size,
            "Uploading file"
        );

        let response = self
            .authorized(self.client.post(&url))
            .header("Content-Type", content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await
            .map_err(RemoteError::from)?;
        check_status(response, |status, message| RemoteError::UploadFailed {
            status,
            message,
        })
        .await?;

        Ok(self.public_url(&path))
    }
}

#[async_trait]
impl CampaignStore for SupabaseClient {
    async fn insert(&self, campaign: &SharedCampaign) -> Result<SharedCampaign> {
        let response = self
            .authorized(self.client.post(self.table_url()))
            .header("Prefer", "return=representation")
            .json(campaign)
            .send()
            .await
            .map_err(RemoteError::from)?;
        let response = check_status(response, |status, message| RemoteError::InsertFailed {
            status,
            message,
        })
        .await?;

        let mut rows = response
            .json::<Vec<SharedCampaign>>()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;
        if rows.is_empty() {
            return Err(RemoteError::InvalidResponse(
                "insert returned no campaign row".to_string(),
            )
            .into());
        }

        let stored = rows.swap_remove(0);
        tracing::info!(id = %stored.id, title = %stored.title, "Campaign stored");
        Ok(stored)
    }

    async fn list_visible(
        &self,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Vec<SharedCampaign>> {
        let campaigns = self
            .list(&[("expiry_date", format!("gte.{}", today.format("%Y-%m-%d")))])
            .await?;
        Ok(campaigns
            .into_iter()
            .filter(|c| c.is_visible(today, now))
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<SharedCampaign>> {
        self.list(&[]).await
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut url = Url::parse(&self.table_url())
            .map_err(|e| AppError::Configuration(format!("Invalid remote URL: {e}")))?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));

        let response = self
            .authorized(self.client.delete(url))
            .header("Prefer", "return=representation")
            .send()
            .await
            .map_err(RemoteError::from)?;
        let response = check_status(response, |status, message| RemoteError::DeleteFailed {
            status,
            message,
        })
        .await?;

        let deleted = response
            .json::<Vec<serde_json::Value>>()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;
        if deleted.is_empty() {
            return Err(RemoteError::NotFound(id.to_string()).into());
        }

        tracing::info!(id = %id, "Campaign deleted");
        Ok(())
    }
}
