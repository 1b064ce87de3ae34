use serde::{Deserialize, Serialize};

use super::lexicon::CategoryKeywords;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: String,
    pub score: f64,
}

/// Keyword-hit classifier over a caller-supplied category list.
#[derive(Clone, Debug, Default)]
pub struct TextClassifier {
    keywords: CategoryKeywords,
}

impl TextClassifier {
    pub fn new(keywords: CategoryKeywords) -> Self {
        Self { keywords }
    }

    /// Scores come back in the order `categories` were given and sum to 1 when any
    /// keyword matched, otherwise every score is 0.
    pub fn classify(&self, text: &str, categories: &[String]) -> Vec<CategoryScore> {
        let lowered = text.to_lowercase();
        let raw: Vec<f64> = categories
            .iter()
            .map(|category| {
                let keywords = self.keywords.keywords_for(category);
                if keywords.is_empty() {
                    return 0.0;
                }
                let hits = keywords.iter().filter(|keyword| lowered.contains(keyword.as_str())).count();
                hits as f64 / keywords.len() as f64
            })
            .collect();

        let total: f64 = raw.iter().sum();
        let denominator = if total > 0.0 { total } else { 1.0 };

        categories
            .iter()
            .zip(raw)
            .map(|(category, score)| CategoryScore { category: category.clone(), score: score / denominator })
            .collect()
    }
}
