use std::path::PathBuf;

use clap::ValueEnum;
use serde::Serialize;
use shopsense_core::config::LoadOptions;
use shopsense_core::domain::product::{Catalog, ProductSummary};
use shopsense_core::errors::ApplicationError;
use shopsense_core::prompts::{
    CartItem, CategoryPreference, PromptBuilder, ReplyKind, TemplateResponder, UserProfile,
};
use shopsense_core::ranking::{ProductRanker, ScoredProduct};

use super::input::{load_catalog, read_json};
use super::{load_config, respond, CommandResult};

/// Products matched for a season before the prompt trims its featured list.
pub(crate) const SEASONAL_CANDIDATES: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    Personalized,
    Recommendation,
    AbandonedCart,
    Seasonal,
    Generic,
}

impl PromptKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personalized => "personalized",
            Self::Recommendation => "recommendation",
            Self::AbandonedCart => "abandoned_cart",
            Self::Seasonal => "seasonal",
            Self::Generic => "generic",
        }
    }
}

#[derive(Clone, Debug)]
pub struct PromptRequest {
    pub kind: PromptKind,
    pub email_type: String,
    pub profile: Option<PathBuf>,
    pub preferences: Option<PathBuf>,
    pub cart: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub season: Option<String>,
}

#[derive(Debug, Serialize)]
struct PromptOutput {
    kind: PromptKind,
    prompt: String,
    reply_kind: &'static str,
    reply: String,
}

pub fn run(options: &LoadOptions, request: &PromptRequest) -> CommandResult {
    respond("prompt", || {
        let config = load_config(options)?;
        let builder = PromptBuilder::new(config.marketing.email_templates.clone())?;
        let max_products = config.recommendation.max_recommendations;

        let prompt = match request.kind {
            PromptKind::Personalized => {
                let profile: UserProfile = match &request.profile {
                    Some(path) => read_json(path, "profile")?,
                    None => UserProfile::default(),
                };
                builder.personalized_email(&profile, &request.email_type)?
            }
            PromptKind::Recommendation => {
                let preferences: Vec<CategoryPreference> = match &request.preferences {
                    Some(path) => read_json(path, "preferences")?,
                    None => Vec::new(),
                };
                let products = catalog_products(request, |catalog| {
                    ProductRanker::new().popular(catalog, None, max_products)
                })?;
                if products.is_empty() {
                    builder.generic_email("recommendation")?
                } else {
                    builder.recommendation_email(&preferences, &products)?
                }
            }
            PromptKind::AbandonedCart => {
                let items: Vec<CartItem> = match &request.cart {
                    Some(path) => read_json(path, "cart")?,
                    None => Vec::new(),
                };
                if items.is_empty() {
                    builder.generic_email("abandoned_cart")?
                } else {
                    builder.abandoned_cart_email(&items)?
                }
            }
            PromptKind::Seasonal => {
                let season = request.season.as_deref().ok_or_else(|| {
                    ApplicationError::Input("--season is required for seasonal prompts".to_string())
                })?;
                let products = catalog_products(request, |catalog| {
                    ProductRanker::new().search_text(season, catalog, SEASONAL_CANDIDATES)
                })?;
                builder.seasonal_email(season, &products)?
            }
            PromptKind::Generic => builder.generic_email(&request.email_type)?,
        };

        let reply_kind = ReplyKind::for_prompt(&prompt);
        let reply = TemplateResponder::new().respond(&prompt);
        Ok(CommandResult::with_data(
            "prompt",
            format!("rendered {} prompt", request.kind.as_str()),
            PromptOutput { kind: request.kind, prompt, reply_kind: reply_kind.as_str(), reply },
        ))
    })
}

fn catalog_products(
    request: &PromptRequest,
    select: impl FnOnce(&Catalog) -> Vec<ScoredProduct>,
) -> Result<Vec<ProductSummary>, ApplicationError> {
    let Some(path) = &request.catalog else {
        return Ok(Vec::new());
    };
    let catalog = load_catalog(path)?;
    Ok(select(&catalog).into_iter().map(|scored| scored.product).collect())
}
