//! Local text heuristics: sentiment, keywords, summaries and category hints.

pub mod classify;
pub mod keywords;
pub mod lexicon;
pub mod sentiment;
pub mod summary;

pub use classify::{CategoryScore, TextClassifier};
pub use keywords::{KeywordExtractor, DEFAULT_MAX_KEYWORDS};
pub use lexicon::{CategoryKeywords, SentimentLexicon, StopWords};
pub use sentiment::{Sentiment, SentimentAnalyzer, SentimentResult};
pub use summary::{summarize, DEFAULT_SUMMARY_LENGTH};
