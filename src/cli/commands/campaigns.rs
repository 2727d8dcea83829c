//! Campaigns command implementation
//!
//! Lists and deletes published campaigns in the shared campaign table.

use crate::adapters::remote::{create_remote, CampaignStore};
use crate::cli::{exit_code, exit_code_for};
use crate::config::load_config;
use crate::domain::SharedCampaign;
use chrono::Utc;
use clap::{Args, Subcommand};
use std::io::Write;
use uuid::Uuid;

/// Arguments for the campaigns command
#[derive(Args, Debug)]
pub struct CampaignsArgs {
    #[command(subcommand)]
    pub command: CampaignsCommand,
}

/// Campaign operations
#[derive(Subcommand, Debug)]
pub enum CampaignsCommand {
    /// List campaigns visible to stores right now
    List {
        /// Include expired and not yet released campaigns
        #[arg(long)]
        all: bool,

        /// Print the rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a campaign by id
    Delete {
        id: Uuid,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl CampaignsArgs {
    /// Execute the campaigns command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(exit_code::CONFIGURATION);
            }
        };

        let backend = match create_remote(&config) {
            Ok(backend) => backend,
            Err(e) => {
                eprintln!("Remote service unavailable: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        match &self.command {
            CampaignsCommand::List { all, json } => {
                list(backend.store.as_ref(), *all, *json).await
            }
            CampaignsCommand::Delete { id, yes } => {
                delete(backend.store.as_ref(), *id, *yes).await
            }
        }
    }
}

async fn list(store: &dyn CampaignStore, all: bool, json: bool) -> anyhow::Result<i32> {
    let now = Utc::now();
    let result = if all {
        store.list_all().await
    } else {
        store.list_visible(now.date_naive(), now).await
    };

    let campaigns = match result {
        Ok(campaigns) => campaigns,
        Err(e) => {
            tracing::error!(error = %e, "Failed to list campaigns");
            eprintln!("Failed to list campaigns: {e}");
            return Ok(exit_code_for(&e));
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&campaigns)?);
        return Ok(exit_code::SUCCESS);
    }

    if campaigns.is_empty() {
        println!("No campaigns found.");
        return Ok(exit_code::SUCCESS);
    }

    println!("📋 Campaigns ({}):", campaigns.len());
    for campaign in &campaigns {
        println!("{}", describe(campaign, now));
    }
    Ok(exit_code::SUCCESS)
}

async fn delete(store: &dyn CampaignStore, id: Uuid, yes: bool) -> anyhow::Result<i32> {
    if !yes {
        print!("Delete campaign {id}? [y/N]: ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Nothing deleted.");
            return Ok(exit_code::SUCCESS);
        }
    }

    match store.delete(id).await {
        Ok(()) => {
            println!("🗑️  Campaign {id} deleted");
            Ok(exit_code::SUCCESS)
        }
        Err(e) => {
            tracing::error!(id = %id, error = %e, "Failed to delete campaign");
            eprintln!("Failed to delete campaign: {e}");
            Ok(exit_code_for(&e))
        }
    }
}

fn describe(campaign: &SharedCampaign, now: chrono::DateTime<Utc>) -> String {
    let status = if campaign.expiry_date < now.date_naive() {
        "expired"
    } else if !campaign.is_released(now) {
        "scheduled"
    } else {
        "live"
    };
    format!(
        "  {}  {:<30}  until {}  [{}]  {} product(s)\n      {}",
        campaign.id,
        campaign.title,
        campaign.expiry_date,
        status,
        campaign.products.len(),
        campaign.file_url
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::remote::InMemoryRemote;
    use crate::domain::StyleConfig;
    use chrono::{Duration, TimeZone};

    fn campaign(expiry: chrono::NaiveDate, release: Option<chrono::DateTime<Utc>>) -> SharedCampaign {
        SharedCampaign {
            id: Uuid::new_v4(),
            title: "Ofertas".to_string(),
            expiry_date: expiry,
            release_date: release,
            file_url: "memory://a.zip".to_string(),
            products: vec![],
            design: StyleConfig::default(),
            created_at: None,
        }
    }

    #[test]
    fn test_describe_status() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let today = now.date_naive();

        assert!(describe(&campaign(today, None), now).contains("[live]"));
        assert!(describe(&campaign(today - Duration::days(1), None), now).contains("[expired]"));
        assert!(describe(
            &campaign(today + Duration::days(5), Some(now + Duration::hours(2))),
            now
        )
        .contains("[scheduled]"));
    }

    #[tokio::test]
    async fn test_delete_with_yes() {
        let remote = InMemoryRemote::new();
        let stored = remote
            .insert(&campaign(Utc::now().date_naive(), None))
            .await
            .unwrap();

        assert_eq!(delete(&remote, stored.id, true).await.unwrap(), 0);
        assert_eq!(delete(&remote, stored.id, true).await.unwrap(), 4);
    }
}
