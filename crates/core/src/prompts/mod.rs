//! Marketing prompt construction and an offline template responder.

mod builder;
mod campaign;
mod responder;
mod types;

pub use campaign::{
    Campaign, CampaignEmail, CampaignKind, CampaignUser, ALL_SEGMENTS, CAMPAIGN_USER_LIMIT,
};
pub use builder::{default_email_templates, escape_quotes, PromptBuilder, SEASONAL_PRODUCT_LIMIT};
pub use responder::{ReplyKind, TemplateResponder};
pub use types::{CartItem, CategoryPreference, UserProfile};
