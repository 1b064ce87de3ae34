//! Word lists used by the text heuristics.
//!
//! The constants are the built-in tables; every heuristic takes an owned copy so
//! callers (and tests) can swap in their own lists through config.

use std::collections::{HashMap, HashSet};

pub const POSITIVE_WORDS: &[&str] =
    &["good", "great", "excellent", "amazing", "love", "perfect", "wonderful", "fantastic"];

pub const NEGATIVE_WORDS: &[&str] =
    &["bad", "terrible", "awful", "hate", "worst", "disappointing", "poor", "horrible"];

pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "may", "might", "can", "this", "that", "these", "those", "i",
    "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them",
];

pub const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("electronics", &["electronic", "device", "tech", "computer", "phone", "laptop"]),
    ("clothing", &["clothing", "shirt", "dress", "pants", "fashion", "wear"]),
    ("home_garden", &["home", "garden", "kitchen", "furniture", "decor"]),
    ("sports_outdoors", &["sport", "outdoor", "fitness", "exercise", "athletic"]),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentimentLexicon {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl Default for SentimentLexicon {
    fn default() -> Self {
        Self { positive: owned(POSITIVE_WORDS), negative: owned(NEGATIVE_WORDS) }
    }
}

impl SentimentLexicon {
    pub fn new(positive: Vec<String>, negative: Vec<String>) -> Self {
        Self { positive: lowercase(positive), negative: lowercase(negative) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StopWords(HashSet<String>);

impl Default for StopWords {
    fn default() -> Self {
        Self(STOP_WORDS.iter().map(|word| (*word).to_owned()).collect())
    }
}

impl StopWords {
    pub fn new(words: impl IntoIterator<Item = String>) -> Self {
        Self(words.into_iter().map(|word| word.to_lowercase()).collect())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryKeywords(HashMap<String, Vec<String>>);

impl Default for CategoryKeywords {
    fn default() -> Self {
        Self(
            CATEGORY_KEYWORDS
                .iter()
                .map(|(category, keywords)| ((*category).to_owned(), owned(keywords)))
                .collect(),
        )
    }
}

impl CategoryKeywords {
    pub fn new(map: HashMap<String, Vec<String>>) -> Self {
        Self(map.into_iter().map(|(category, words)| (category.to_lowercase(), lowercase(words))).collect())
    }

    /// Known category names in sorted order.
    pub fn categories(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Keywords for a category; unknown categories match on their own name.
    pub fn keywords_for(&self, category: &str) -> Vec<String> {
        let key = category.to_lowercase();
        match self.0.get(&key) {
            Some(keywords) => keywords.clone(),
            None => vec![key],
        }
    }
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|word| (*word).to_owned()).collect()
}

fn lowercase(words: Vec<String>) -> Vec<String> {
    words.into_iter().map(|word| word.to_lowercase()).collect()
}
