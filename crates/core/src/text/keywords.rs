use std::collections::HashMap;

use super::lexicon::StopWords;

pub const DEFAULT_MAX_KEYWORDS: usize = 10;
const MIN_KEYWORD_CHARS: usize = 3;

/// Frequency-ranked keyword extraction over word tokens.
#[derive(Clone, Debug, Default)]
pub struct KeywordExtractor {
    stop_words: StopWords,
}

impl KeywordExtractor {
    pub fn new(stop_words: StopWords) -> Self {
        Self { stop_words }
    }

    /// Most frequent keywords first; ties keep the order in which words first appeared.
    pub fn extract(&self, text: &str, max_keywords: usize) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for token in tokenize(&lowered) {
            if token.chars().count() < MIN_KEYWORD_CHARS || self.stop_words.contains(token) {
                continue;
            }
            match positions.get(token) {
                Some(&index) => counts[index].1 += 1,
                None => {
                    positions.insert(token.to_owned(), counts.len());
                    counts.push((token.to_owned(), 1));
                }
            }
        }

        counts.sort_by(|left, right| right.1.cmp(&left.1));
        counts.into_iter().take(max_keywords).map(|(word, _)| word).collect()
    }
}

pub(crate) fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|ch: char| !(ch.is_alphanumeric() || ch == '_')).filter(|token| !token.is_empty())
}
