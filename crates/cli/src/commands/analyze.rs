use serde::Serialize;
use shopsense_core::config::LoadOptions;
use shopsense_core::embedding::PseudoEmbedder;
use shopsense_core::text::{
    summarize as summarize_text, CategoryKeywords, KeywordExtractor, SentimentAnalyzer,
    TextClassifier,
};

use super::{load_config, respond, CommandResult};

/// Leading components shown unless the full vector is requested.
const EMBEDDING_PREVIEW_LEN: usize = 8;

pub fn sentiment(options: &LoadOptions, text: &str) -> CommandResult {
    respond("sentiment", || {
        let config = load_config(options)?;
        let analyzer = SentimentAnalyzer::new(config.text.sentiment_lexicon());
        let result = analyzer.analyze(text);
        Ok(CommandResult::with_data(
            "sentiment",
            format!("sentiment is {}", result.sentiment.as_str()),
            result,
        ))
    })
}

pub fn keywords(options: &LoadOptions, text: &str, max_keywords: usize) -> CommandResult {
    respond("keywords", || {
        let config = load_config(options)?;
        let keywords = KeywordExtractor::new(config.text.stop_words()).extract(text, max_keywords);
        Ok(CommandResult::with_data(
            "keywords",
            format!("extracted {} keywords", keywords.len()),
            keywords,
        ))
    })
}

pub fn summarize(text: &str, max_length: usize) -> CommandResult {
    let summary = summarize_text(text, max_length);
    CommandResult::with_data(
        "summarize",
        format!("summary has {} characters", summary.chars().count()),
        summary,
    )
}

/// Scores `text` against `categories`, or every known category when none are given.
pub fn classify(text: &str, categories: &[String]) -> CommandResult {
    let keywords = CategoryKeywords::default();
    let categories =
        if categories.is_empty() { keywords.categories() } else { categories.to_vec() };
    let scores = TextClassifier::new(keywords).classify(text, &categories);
    let best = scores
        .iter()
        .filter(|score| score.score > 0.0)
        .max_by(|left, right| left.score.total_cmp(&right.score))
        .map(|score| score.category.clone());
    let message = match best {
        Some(category) => format!("best match is {category}"),
        None => "no category keywords matched".to_string(),
    };
    CommandResult::with_data("classify", message, scores)
}

#[derive(Debug, Serialize)]
struct EmbeddingOutput {
    dimension: usize,
    norm: f64,
    truncated: bool,
    values: Vec<f64>,
}

pub fn embed(options: &LoadOptions, text: &str, full: bool) -> CommandResult {
    respond("embed", || {
        let config = load_config(options)?;
        let vector = PseudoEmbedder::new(config.embedding.dimension).embed(text);
        let shown = if full { vector.dimension() } else { EMBEDDING_PREVIEW_LEN };
        let values: Vec<f64> = vector.values().iter().take(shown).copied().collect();
        let output = EmbeddingOutput {
            dimension: vector.dimension(),
            norm: vector.norm(),
            truncated: values.len() < vector.dimension(),
            values,
        };
        Ok(CommandResult::with_data(
            "embed",
            format!("embedded text into {} dimensions", output.dimension),
            output,
        ))
    })
}
