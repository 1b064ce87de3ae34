use serde::{Deserialize, Serialize};

use super::lexicon::SentimentLexicon;

pub const NEUTRAL_CONFIDENCE: f64 = 0.5;
pub const MAX_CONFIDENCE: f64 = 0.9;
const CONFIDENCE_STEP: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub positive_score: u32,
    pub negative_score: u32,
    pub text_length: usize,
}

/// Keyword polarity classifier.
///
/// Each lexicon word counts once when it appears anywhere in the lower-cased
/// text, so "great" also matches inside "greatest".
#[derive(Clone, Debug, Default)]
pub struct SentimentAnalyzer {
    lexicon: SentimentLexicon,
}

impl SentimentAnalyzer {
    pub fn new(lexicon: SentimentLexicon) -> Self {
        Self { lexicon }
    }

    pub fn analyze(&self, text: &str) -> SentimentResult {
        let lowered = text.to_lowercase();
        let positive_score = count_present(&self.lexicon.positive, &lowered);
        let negative_score = count_present(&self.lexicon.negative, &lowered);

        let (sentiment, confidence) = match positive_score.cmp(&negative_score) {
            std::cmp::Ordering::Greater => {
                (Sentiment::Positive, margin_confidence(positive_score - negative_score))
            }
            std::cmp::Ordering::Less => {
                (Sentiment::Negative, margin_confidence(negative_score - positive_score))
            }
            std::cmp::Ordering::Equal => (Sentiment::Neutral, NEUTRAL_CONFIDENCE),
        };

        SentimentResult {
            sentiment,
            confidence,
            positive_score,
            negative_score,
            text_length: text.chars().count(),
        }
    }
}

fn count_present(words: &[String], text: &str) -> u32 {
    words.iter().filter(|word| !word.is_empty() && text.contains(word.as_str())).count() as u32
}

fn margin_confidence(margin: u32) -> f64 {
    (NEUTRAL_CONFIDENCE + CONFIDENCE_STEP * f64::from(margin)).min(MAX_CONFIDENCE)
}

#[cfg(test)]
mod tests {
    use super::{Sentiment, SentimentAnalyzer, MAX_CONFIDENCE, NEUTRAL_CONFIDENCE};
    use crate::text::lexicon::SentimentLexicon;

    fn close(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    #[test]
    fn two_positive_words_give_point_seven() {
        let result = SentimentAnalyzer::default().analyze("This product is great and amazing!");

        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(result.positive_score, 2);
        assert_eq!(result.negative_score, 0);
        assert!(close(result.confidence, 0.7));
        assert_eq!(result.text_length, 34);
    }

    #[test]
    fn empty_text_is_neutral() {
        let result = SentimentAnalyzer::default().analyze("");

        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert_eq!(result.positive_score, 0);
        assert_eq!(result.negative_score, 0);
        assert!(close(result.confidence, NEUTRAL_CONFIDENCE));
        assert_eq!(result.text_length, 0);
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let result = SentimentAnalyzer::default().analyze("TERRIBLE, the WORST, just Awful");
        assert_eq!(result.sentiment, Sentiment::Negative);
        assert_eq!(result.negative_score, 3);
        assert!(close(result.confidence, 0.8));
    }

    #[test]
    fn repeated_word_counts_once() {
        let result = SentimentAnalyzer::default().analyze("good good good");
        assert_eq!(result.positive_score, 1);
    }

    #[test]
    fn balanced_counts_are_neutral() {
        let result = SentimentAnalyzer::default().analyze("great screen, poor battery");
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert!(close(result.confidence, NEUTRAL_CONFIDENCE));
    }

    #[test]
    fn confidence_stays_within_bounds() {
        let analyzer = SentimentAnalyzer::default();
        let samples = [
            "",
            "good great excellent amazing love perfect wonderful fantastic",
            "bad terrible awful hate worst disappointing poor horrible",
            "it arrived on tuesday",
            "great but bad",
        ];
        for sample in samples {
            let result = analyzer.analyze(sample);
            assert!(result.confidence >= NEUTRAL_CONFIDENCE && result.confidence <= MAX_CONFIDENCE);
            match result.sentiment {
                Sentiment::Positive => assert!(result.positive_score > result.negative_score),
                Sentiment::Negative => assert!(result.negative_score > result.positive_score),
                Sentiment::Neutral => assert_eq!(result.positive_score, result.negative_score),
            }
        }
    }

    #[test]
    fn custom_lexicon_replaces_builtin_words() {
        let analyzer = SentimentAnalyzer::new(SentimentLexicon::new(
            vec!["superb".to_owned()],
            vec!["meh".to_owned()],
        ));
        let result = analyzer.analyze("Superb sound, great price");
        assert_eq!(result.positive_score, 1);
        assert_eq!(result.sentiment.as_str(), "positive");
    }
}
