use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use shopsense_core::config::LoadOptions;
use shopsense_core::errors::ApplicationError;
use shopsense_core::prompts::{CampaignKind, CampaignUser, PromptBuilder, TemplateResponder};
use shopsense_core::ranking::ProductRanker;

use super::input::{load_catalog, read_json};
use super::prompt::SEASONAL_CANDIDATES;
use super::{load_config, respond, CommandResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CampaignKindArg {
    Personalized,
    Seasonal,
}

#[derive(Clone, Debug)]
pub struct CampaignRequest {
    pub users: PathBuf,
    pub segment: String,
    pub kind: CampaignKindArg,
    pub email_type: String,
    pub season: Option<String>,
    pub catalog: Option<PathBuf>,
}

pub fn run(
    options: &LoadOptions,
    request: &CampaignRequest,
    generated_at: DateTime<Utc>,
) -> CommandResult {
    respond("campaign", || {
        let config = load_config(options)?;
        let builder = PromptBuilder::new(config.marketing.email_templates.clone())?;
        let users: Vec<CampaignUser> = read_json(&request.users, "users")?;

        let kind = match request.kind {
            CampaignKindArg::Personalized => {
                CampaignKind::Personalized { email_type: request.email_type.clone() }
            }
            CampaignKindArg::Seasonal => {
                let season = request.season.clone().ok_or_else(|| {
                    ApplicationError::Input(
                        "--season is required for seasonal campaigns".to_string(),
                    )
                })?;
                let products = match &request.catalog {
                    Some(path) => {
                        let catalog = load_catalog(path)?;
                        ProductRanker::new()
                            .search_text(&season, &catalog, SEASONAL_CANDIDATES)
                            .into_iter()
                            .map(|scored| scored.product)
                            .collect()
                    }
                    None => Vec::new(),
                };
                CampaignKind::Seasonal { season, products }
            }
        };

        let campaign = builder.campaign(
            &users,
            &request.segment,
            &kind,
            &TemplateResponder::new(),
            generated_at,
        )?;
        Ok(CommandResult::with_data(
            "campaign",
            format!(
                "generated {} {} emails for segment {}",
                campaign.emails.len(),
                campaign.campaign_type,
                campaign.segment
            ),
            campaign,
        ))
    })
}
