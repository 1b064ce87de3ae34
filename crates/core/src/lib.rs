pub mod config;
pub mod domain;
pub mod embedding;
pub mod errors;
pub mod forecast;
pub mod prompts;
pub mod ranking;
pub mod text;

pub use domain::product::{Catalog, ProductId, ProductSummary};
pub use domain::series::{Observation, TimeSeries};
pub use embedding::{EmbeddingIndex, EmbeddingVector, PseudoEmbedder};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use forecast::{
    ForecastPoint, ForecastReport, ForecastSubject, Forecaster, InventoryForecast, TrendAnalysis,
    TrendDirection,
};
pub use prompts::{PromptBuilder, TemplateResponder};
pub use ranking::{ProductRanker, RankingTier, ScoredProduct, Substitution, SubstitutionReason};
pub use text::{KeywordExtractor, Sentiment, SentimentAnalyzer, SentimentResult, TextClassifier};
