use tracing::debug;

const PROMPT_EXCERPT_CHARS: usize = 100;

const MARKETING_REPLY: &str = "Dear Valued Customer,

We're excited to share some amazing products that we think you'll love!
Based on your preferences, we've curated a special selection just for you.

Don't miss out on these incredible deals - shop now and enjoy exclusive discounts!

Best regards,
Your E-Commerce Team";

const REVIEW_REPLY: &str = "Customer Review Summary:

Overall Rating: 4.5/5
Key Points:
- Excellent product quality
- Great value for money
- Fast delivery
- Highly recommended

Areas for improvement: None identified";

const RECOMMENDATION_REPLY: &str = "Personalized Recommendations:

Based on your browsing history and preferences, we recommend:
1. Wireless Bluetooth Headphones - Perfect for your music needs
2. Smart Fitness Watch - Great for tracking your workouts
3. Organic Cotton T-Shirt - Comfortable and eco-friendly

These products match your style and previous purchases!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplyKind {
    Marketing,
    ReviewSummary,
    Recommendation,
    Generic,
}

impl ReplyKind {
    /// First matching keyword wins: marketing, then review, then recommendation.
    pub fn for_prompt(prompt: &str) -> Self {
        let lowered = prompt.to_lowercase();
        if lowered.contains("marketing") {
            Self::Marketing
        } else if lowered.contains("review") {
            Self::ReviewSummary
        } else if lowered.contains("recommendation") {
            Self::Recommendation
        } else {
            Self::Generic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Marketing => "marketing",
            Self::ReviewSummary => "review_summary",
            Self::Recommendation => "recommendation",
            Self::Generic => "generic",
        }
    }
}

/// Offline stand-in for the text-generation service: answers with canned copy.
#[derive(Clone, Copy, Debug, Default)]
pub struct TemplateResponder;

impl TemplateResponder {
    pub fn new() -> Self {
        Self
    }

    pub fn respond(&self, prompt: &str) -> String {
        let kind = ReplyKind::for_prompt(prompt);
        debug!(event_name = "prompts.responder.reply", kind = kind.as_str(), "canned reply");
        match kind {
            ReplyKind::Marketing => MARKETING_REPLY.to_owned(),
            ReplyKind::ReviewSummary => REVIEW_REPLY.to_owned(),
            ReplyKind::Recommendation => RECOMMENDATION_REPLY.to_owned(),
            ReplyKind::Generic => {
                let excerpt: String = prompt.chars().take(PROMPT_EXCERPT_CHARS).collect();
                format!(
                    "Thank you for your inquiry about: {excerpt}...\n\n\
                     We're here to help you find exactly what you're looking for.\n\
                     Please let us know if you need any additional assistance!"
                )
            }
        }
    }
}
