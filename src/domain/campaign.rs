//! Shared campaigns
//!
//! A campaign is a published export: a public file URL paired with the product
//! and style snapshots that produced it, visible to stores until it expires.

use super::product::ProductRecord;
use super::style::StyleConfig;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted campaign row
///
/// Field names match the `shared_files` table columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedCampaign {
    pub id: Uuid,

    pub title: String,

    /// Last day the campaign is visible (inclusive)
    pub expiry_date: NaiveDate,

    /// Scheduled publication time; visible immediately when absent
    #[serde(default)]
    pub release_date: Option<DateTime<Utc>>,

    pub file_url: String,

    #[serde(rename = "products_json", default)]
    pub products: Vec<ProductRecord>,

    #[serde(rename = "design_json")]
    pub design: StyleConfig,

    /// Set by the store on insert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl SharedCampaign {
    /// Returns true if a store should see this campaign
    ///
    /// A campaign is visible from its release time (if any) up to and including
    /// its expiry date.
    pub fn is_visible(&self, today: NaiveDate, now: DateTime<Utc>) -> bool {
        self.expiry_date >= today && self.is_released(now)
    }

    /// Returns true once the scheduled release time has passed
    pub fn is_released(&self, now: DateTime<Utc>) -> bool {
        self.release_date.map(|release| release <= now).unwrap_or(true)
    }
}

/// Metadata supplied by the admin when publishing
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub title: String,
    pub expiry_date: NaiveDate,
    pub release_date: Option<DateTime<Utc>>,
    pub products: Vec<ProductRecord>,
    pub design: StyleConfig,
}

impl PublishRequest {
    /// Validates publish metadata against the current date
    pub fn validate(&self, today: NaiveDate) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("campaign title cannot be empty".to_string());
        }
        if self.expiry_date < today {
            return Err(format!(
                "campaign expiry date {} is in the past",
                self.expiry_date
            ));
        }
        if let Some(release) = self.release_date {
            if release.date_naive() > self.expiry_date {
                return Err(format!(
                    "campaign release {} is after its expiry date {}",
                    release, self.expiry_date
                ));
            }
        }
        Ok(())
    }

    /// Builds the persisted row for an uploaded file
    pub fn into_campaign(self, file_url: String) -> SharedCampaign {
        SharedCampaign {
            id: Uuid::new_v4(),
            title: self.title,
            expiry_date: self.expiry_date,
            release_date: self.release_date,
            file_url,
            products: self.products,
            design: self.design,
            created_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn campaign(expiry: NaiveDate, release: Option<DateTime<Utc>>) -> SharedCampaign {
        SharedCampaign {
            id: Uuid::new_v4(),
            title: "Ofertas".to_string(),
            expiry_date: expiry,
            release_date: release,
            file_url: "https://example.com/a.zip".to_string(),
            products: vec![],
            design: StyleConfig::default(),
            created_at: None,
        }
    }

    #[test]
    fn test_visibility_by_expiry() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();

        assert!(!campaign(NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(), None).is_visible(today, now));
        assert!(campaign(today, None).is_visible(today, now));
        assert!(campaign(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(), None).is_visible(today, now));
    }

    #[test]
    fn test_visibility_waits_for_release() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2025, 3, 10, 18, 0, 0).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();

        assert!(!campaign(expiry, Some(later)).is_visible(today, now));
        assert!(campaign(expiry, Some(now)).is_visible(today, now));
    }

    #[test]
    fn test_publish_request_validation() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let request = PublishRequest {
            title: "Semana".to_string(),
            expiry_date: NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
            release_date: None,
            products: vec![],
            design: StyleConfig::default(),
        };
        assert!(request.validate(today).is_err());
    }

    #[test]
    fn test_serializes_table_columns() {
        let row = campaign(NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(), None);
        let json = serde_json::to_value(&row).unwrap();

        assert_eq!(json["expiry_date"], "2025-03-20");
        assert!(json.get("products_json").is_some());
        assert!(json.get("design_json").is_some());
        assert!(json.get("created_at").is_none());
    }
}
