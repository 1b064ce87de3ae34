//! Campaign fan-out: one rendered email per user in a segment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::builder::PromptBuilder;
use super::responder::TemplateResponder;
use super::types::UserProfile;
use crate::domain::product::ProductSummary;
use crate::errors::ApplicationError;

/// Segment name that matches every user.
pub const ALL_SEGMENTS: &str = "all";
/// Users addressed by a single campaign run.
pub const CAMPAIGN_USER_LIMIT: usize = 100;

/// A campaign recipient and the history used to personalise their email.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CampaignUser {
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub segment: Option<String>,
    #[serde(flatten)]
    pub profile: UserProfile,
}

impl CampaignUser {
    pub fn in_segment(&self, segment: &str) -> bool {
        segment == ALL_SEGMENTS || self.segment.as_deref() == Some(segment)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CampaignKind {
    /// A personalised email of the given type for each user.
    Personalized { email_type: String },
    /// The same seasonal email for every user, featuring `products`.
    Seasonal { season: String, products: Vec<ProductSummary> },
}

impl CampaignKind {
    pub fn campaign_type(&self) -> String {
        match self {
            Self::Personalized { email_type } => email_type.clone(),
            Self::Seasonal { season, .. } => format!("seasonal_{season}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CampaignEmail {
    pub user_id: String,
    pub email: String,
    pub prompt: String,
    pub content: String,
    pub campaign_type: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub segment: String,
    pub campaign_type: String,
    pub emails: Vec<CampaignEmail>,
}

impl PromptBuilder {
    /// Renders one email per user in `segment`, at most [`CAMPAIGN_USER_LIMIT`],
    /// and drafts its content with `responder`.
    pub fn campaign(
        &self,
        users: &[CampaignUser],
        segment: &str,
        kind: &CampaignKind,
        responder: &TemplateResponder,
        generated_at: DateTime<Utc>,
    ) -> Result<Campaign, ApplicationError> {
        let campaign_type = kind.campaign_type();

        let emails = users
            .iter()
            .filter(|user| user.in_segment(segment))
            .take(CAMPAIGN_USER_LIMIT)
            .map(|user| {
                let prompt = match kind {
                    CampaignKind::Personalized { email_type } => {
                        self.personalized_email(&user.profile, email_type)?
                    }
                    CampaignKind::Seasonal { season, products } => {
                        self.seasonal_email(season, products)?
                    }
                };
                Ok(CampaignEmail {
                    user_id: user.user_id.clone(),
                    email: user.email.clone(),
                    content: responder.respond(&prompt),
                    prompt,
                    campaign_type: campaign_type.clone(),
                    generated_at,
                })
            })
            .collect::<Result<Vec<_>, ApplicationError>>()?;

        info!(
            event_name = "prompts.campaign.generated",
            segment,
            campaign_type = %campaign_type,
            emails = emails.len(),
            "campaign generated"
        );

        Ok(Campaign { segment: segment.to_owned(), campaign_type, emails })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::{CampaignKind, CampaignUser, CAMPAIGN_USER_LIMIT};
    use crate::domain::product::fixtures::product;
    use crate::prompts::{PromptBuilder, TemplateResponder, UserProfile};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).single().expect("valid timestamp")
    }

    fn user(id: &str, segment: Option<&str>, first_name: &str) -> CampaignUser {
        CampaignUser {
            user_id: id.to_owned(),
            email: format!("{id}@example.com"),
            segment: segment.map(str::to_owned),
            profile: UserProfile { first_name: Some(first_name.to_owned()), ..UserProfile::default() },
        }
    }

    fn builder() -> PromptBuilder {
        PromptBuilder::with_default_templates().expect("default templates compile")
    }

    #[test]
    fn personalized_campaign_only_reaches_the_segment() {
        let users = vec![
            user("u-1", Some("active"), "Ada"),
            user("u-2", Some("inactive"), "Grace"),
            user("u-3", Some("active"), "Linus"),
        ];
        let kind = CampaignKind::Personalized { email_type: "welcome".to_owned() };
        let campaign = builder()
            .campaign(&users, "active", &kind, &TemplateResponder::new(), now())
            .expect("campaign renders");

        let ids: Vec<&str> = campaign.emails.iter().map(|email| email.user_id.as_str()).collect();
        assert_eq!(ids, vec!["u-1", "u-3"]);
        assert_eq!(campaign.campaign_type, "welcome");
        assert!(campaign.emails[0].prompt.contains("Ada"));
        assert!(campaign.emails[1].prompt.contains("Linus"));
        assert!(campaign.emails.iter().all(|email| !email.content.is_empty()
            && email.email.ends_with("@example.com")
            && email.generated_at == now()));
    }

    #[test]
    fn all_segment_skips_the_filter() {
        let users = vec![user("u-1", Some("active"), "Ada"), user("u-2", None, "Grace")];
        let kind = CampaignKind::Personalized { email_type: "newsletter".to_owned() };
        let campaign = builder()
            .campaign(&users, "all", &kind, &TemplateResponder::new(), now())
            .expect("campaign renders");
        assert_eq!(campaign.emails.len(), 2);
    }

    #[test]
    fn seasonal_campaign_shares_one_prompt_and_tags_the_season() {
        let users = vec![user("u-1", None, "Ada"), user("u-2", None, "Grace")];
        let kind = CampaignKind::Seasonal {
            season: "summer".to_owned(),
            products: vec![product("P1", "clothing", 20.0, 4.5, 3)],
        };
        let campaign = builder()
            .campaign(&users, "all", &kind, &TemplateResponder::new(), now())
            .expect("campaign renders");

        assert_eq!(campaign.campaign_type, "seasonal_summer");
        assert_eq!(campaign.emails.len(), 2);
        assert_eq!(campaign.emails[0].prompt, campaign.emails[1].prompt);
        assert!(campaign.emails[0].prompt.contains("summer"));
        assert!(campaign.emails.iter().all(|email| email.campaign_type == "seasonal_summer"));
    }

    #[test]
    fn campaign_is_capped_at_user_limit() {
        let users: Vec<CampaignUser> =
            (0..CAMPAIGN_USER_LIMIT + 5).map(|index| user(&format!("u-{index}"), None, "Ada")).collect();
        let kind = CampaignKind::Personalized { email_type: "newsletter".to_owned() };
        let campaign = builder()
            .campaign(&users, "all", &kind, &TemplateResponder::new(), now())
            .expect("campaign renders");
        assert_eq!(campaign.emails.len(), CAMPAIGN_USER_LIMIT);
    }

    #[test]
    fn users_deserialize_with_flattened_profile() {
        let json = r#"{"user_id": "u-9", "email": "u9@example.com", "segment": "vip",
            "first_name": "Ada", "total_orders": 4}"#;
        let parsed: CampaignUser = serde_json::from_str(json).expect("valid campaign user");
        assert_eq!(parsed.profile.first_name.as_deref(), Some("Ada"));
        assert_eq!(parsed.profile.total_orders, 4);
        assert!(parsed.in_segment("vip"));
        assert!(!parsed.in_segment("new"));
    }
}
