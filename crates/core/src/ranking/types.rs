use serde::{Deserialize, Serialize};

use crate::domain::product::ProductSummary;

/// Strategy that produced a ranked product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingTier {
    Embedding,
    Category,
    Popular,
    TextMatch,
    CrossCategory,
}

impl RankingTier {
    /// Score assigned when the tier does not compute one.
    pub fn fixed_score(&self) -> Option<f64> {
        match self {
            Self::Embedding => None,
            Self::Category => Some(0.6),
            Self::Popular => Some(0.5),
            Self::TextMatch => Some(0.8),
            Self::CrossCategory => Some(0.7),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Embedding => "embedding",
            Self::Category => "category",
            Self::Popular => "popular",
            Self::TextMatch => "text_match",
            Self::CrossCategory => "cross_category",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredProduct {
    pub product: ProductSummary,
    pub score: f64,
    pub tier: RankingTier,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstitutionReason {
    OutOfStock,
    Price,
    Other,
}

impl std::str::FromStr for SubstitutionReason {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "out_of_stock" => Ok(Self::OutOfStock),
            "price" => Ok(Self::Price),
            "other" => Ok(Self::Other),
            other => Err(format!(
                "unsupported substitution reason `{other}` (expected out_of_stock|price|other)"
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Substitution {
    pub candidate: ScoredProduct,
    pub reason: SubstitutionReason,
    pub explanation: String,
}
