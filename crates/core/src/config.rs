use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::embedding::{DEFAULT_BATCH_SIZE, DEFAULT_DIMENSION};
use crate::forecast::{
    DEFAULT_FORECAST_PERIODS, DEFAULT_INVENTORY_HORIZON_DAYS, DEFAULT_TREND_WINDOW_DAYS,
    MAX_FORECAST_DAYS,
};
use crate::prompts::default_email_templates;
use crate::ranking::DEFAULT_SIMILAR_TOP_K;
use crate::text::{SentimentLexicon, StopWords};

pub const CONFIG_FILE_NAME: &str = "shopsense.toml";
pub const NESTED_CONFIG_FILE: &str = "config/shopsense.toml";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub warehouse: WarehouseConfig,
    pub embedding: EmbeddingConfig,
    pub recommendation: RecommendationConfig,
    pub forecasting: ForecastingConfig,
    pub text: TextConfig,
    pub marketing: MarketingConfig,
    pub logging: LoggingConfig,
}

/// Where catalog, review and sales tables live.
#[derive(Clone, Debug)]
pub struct WarehouseConfig {
    pub project_id: Option<String>,
    pub dataset: String,
    pub location: String,
    pub service_account_key: Option<SecretString>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbeddingConfig {
    pub dimension: usize,
    pub batch_size: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecommendationConfig {
    pub max_recommendations: usize,
    pub similarity_threshold: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForecastingConfig {
    pub default_periods: u32,
    pub inventory_horizon_days: u32,
    pub trend_window_days: u32,
}

/// Optional replacements for the built-in word lists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextConfig {
    pub positive_words: Option<Vec<String>>,
    pub negative_words: Option<Vec<String>>,
    pub stop_words: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarketingConfig {
    pub email_templates: BTreeMap<String, String>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub warehouse_project_id: Option<String>,
    pub embedding_dimension: Option<usize>,
    pub forecast_periods: Option<u32>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            warehouse: WarehouseConfig {
                project_id: None,
                dataset: "ecommerce_intelligence".to_string(),
                location: "US".to_string(),
                service_account_key: None,
            },
            embedding: EmbeddingConfig {
                dimension: DEFAULT_DIMENSION,
                batch_size: DEFAULT_BATCH_SIZE,
            },
            recommendation: RecommendationConfig {
                max_recommendations: DEFAULT_SIMILAR_TOP_K,
                similarity_threshold: 0.8,
            },
            forecasting: ForecastingConfig {
                default_periods: DEFAULT_FORECAST_PERIODS,
                inventory_horizon_days: DEFAULT_INVENTORY_HORIZON_DAYS,
                trend_window_days: DEFAULT_TREND_WINDOW_DAYS,
            },
            text: TextConfig::default(),
            marketing: MarketingConfig { email_templates: default_email_templates() },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl TextConfig {
    pub fn sentiment_lexicon(&self) -> SentimentLexicon {
        match (&self.positive_words, &self.negative_words) {
            (None, None) => SentimentLexicon::default(),
            (positive, negative) => {
                let defaults = SentimentLexicon::default();
                SentimentLexicon::new(
                    positive.clone().unwrap_or(defaults.positive),
                    negative.clone().unwrap_or(defaults.negative),
                )
            }
        }
    }

    pub fn stop_words(&self) -> StopWords {
        match &self.stop_words {
            Some(words) => StopWords::new(words.iter().cloned()),
            None => StopWords::default(),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(warehouse) = patch.warehouse {
            if let Some(project_id) = warehouse.project_id {
                self.warehouse.project_id = Some(project_id);
            }
            if let Some(dataset) = warehouse.dataset {
                self.warehouse.dataset = dataset;
            }
            if let Some(location) = warehouse.location {
                self.warehouse.location = location;
            }
            if let Some(key) = warehouse.service_account_key {
                self.warehouse.service_account_key = Some(SecretString::from(key));
            }
        }

        if let Some(embedding) = patch.embedding {
            if let Some(dimension) = embedding.dimension {
                self.embedding.dimension = dimension;
            }
            if let Some(batch_size) = embedding.batch_size {
                self.embedding.batch_size = batch_size;
            }
        }

        if let Some(recommendation) = patch.recommendation {
            if let Some(max_recommendations) = recommendation.max_recommendations {
                self.recommendation.max_recommendations = max_recommendations;
            }
            if let Some(similarity_threshold) = recommendation.similarity_threshold {
                self.recommendation.similarity_threshold = similarity_threshold;
            }
        }

        if let Some(forecasting) = patch.forecasting {
            if let Some(default_periods) = forecasting.default_periods {
                self.forecasting.default_periods = default_periods;
            }
            if let Some(horizon) = forecasting.inventory_horizon_days {
                self.forecasting.inventory_horizon_days = horizon;
            }
            if let Some(window) = forecasting.trend_window_days {
                self.forecasting.trend_window_days = window;
            }
        }

        if let Some(text) = patch.text {
            if text.positive_words.is_some() {
                self.text.positive_words = text.positive_words;
            }
            if text.negative_words.is_some() {
                self.text.negative_words = text.negative_words;
            }
            if text.stop_words.is_some() {
                self.text.stop_words = text.stop_words;
            }
        }

        if let Some(marketing) = patch.marketing {
            if let Some(templates) = marketing.email_templates {
                self.marketing.email_templates.extend(templates);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("SHOPSENSE_WAREHOUSE_PROJECT_ID") {
            self.warehouse.project_id = Some(value);
        }
        if let Some(value) = read_env("SHOPSENSE_WAREHOUSE_DATASET") {
            self.warehouse.dataset = value;
        }
        if let Some(value) = read_env("SHOPSENSE_WAREHOUSE_LOCATION") {
            self.warehouse.location = value;
        }
        if let Some(value) = read_env("SHOPSENSE_WAREHOUSE_SERVICE_ACCOUNT_KEY") {
            self.warehouse.service_account_key = Some(SecretString::from(value));
        }

        if let Some(value) = read_env("SHOPSENSE_EMBEDDING_DIMENSION") {
            self.embedding.dimension = parse_usize("SHOPSENSE_EMBEDDING_DIMENSION", &value)?;
        }
        if let Some(value) = read_env("SHOPSENSE_EMBEDDING_BATCH_SIZE") {
            self.embedding.batch_size = parse_usize("SHOPSENSE_EMBEDDING_BATCH_SIZE", &value)?;
        }

        if let Some(value) = read_env("SHOPSENSE_RECOMMENDATION_MAX_RECOMMENDATIONS") {
            self.recommendation.max_recommendations =
                parse_usize("SHOPSENSE_RECOMMENDATION_MAX_RECOMMENDATIONS", &value)?;
        }
        if let Some(value) = read_env("SHOPSENSE_RECOMMENDATION_SIMILARITY_THRESHOLD") {
            self.recommendation.similarity_threshold =
                parse_f64("SHOPSENSE_RECOMMENDATION_SIMILARITY_THRESHOLD", &value)?;
        }

        if let Some(value) = read_env("SHOPSENSE_FORECASTING_DEFAULT_PERIODS") {
            self.forecasting.default_periods =
                parse_u32("SHOPSENSE_FORECASTING_DEFAULT_PERIODS", &value)?;
        }
        if let Some(value) = read_env("SHOPSENSE_FORECASTING_INVENTORY_HORIZON_DAYS") {
            self.forecasting.inventory_horizon_days =
                parse_u32("SHOPSENSE_FORECASTING_INVENTORY_HORIZON_DAYS", &value)?;
        }
        if let Some(value) = read_env("SHOPSENSE_FORECASTING_TREND_WINDOW_DAYS") {
            self.forecasting.trend_window_days =
                parse_u32("SHOPSENSE_FORECASTING_TREND_WINDOW_DAYS", &value)?;
        }

        let log_level =
            read_env("SHOPSENSE_LOGGING_LEVEL").or_else(|| read_env("SHOPSENSE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("SHOPSENSE_LOGGING_FORMAT").or_else(|| read_env("SHOPSENSE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        if let Some(project_id) = overrides.warehouse_project_id {
            self.warehouse.project_id = Some(project_id);
        }
        if let Some(dimension) = overrides.embedding_dimension {
            self.embedding.dimension = dimension;
        }
        if let Some(periods) = overrides.forecast_periods {
            self.forecasting.default_periods = periods;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_warehouse(&self.warehouse)?;
        validate_embedding(&self.embedding)?;
        validate_recommendation(&self.recommendation)?;
        validate_forecasting(&self.forecasting)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(CONFIG_FILE_NAME), PathBuf::from(NESTED_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_warehouse(warehouse: &WarehouseConfig) -> Result<(), ConfigError> {
    let dataset = warehouse.dataset.trim();
    let valid_dataset =
        !dataset.is_empty() && dataset.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    if !valid_dataset {
        return Err(ConfigError::Validation(
            "warehouse.dataset must be non-empty and contain only letters, digits, or `_`"
                .to_string(),
        ));
    }

    if warehouse.location.trim().is_empty() {
        return Err(ConfigError::Validation("warehouse.location must not be empty".to_string()));
    }

    if let Some(project_id) = &warehouse.project_id {
        if project_id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "warehouse.project_id must not be blank when set".to_string(),
            ));
        }
    }

    let blank_key = warehouse
        .service_account_key
        .as_ref()
        .map(|key| key.expose_secret().trim().is_empty())
        .unwrap_or(false);
    if blank_key {
        return Err(ConfigError::Validation(
            "warehouse.service_account_key must not be blank when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_embedding(embedding: &EmbeddingConfig) -> Result<(), ConfigError> {
    if embedding.dimension == 0 {
        return Err(ConfigError::Validation(
            "embedding.dimension must be greater than zero".to_string(),
        ));
    }
    if embedding.batch_size == 0 {
        return Err(ConfigError::Validation(
            "embedding.batch_size must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn validate_recommendation(recommendation: &RecommendationConfig) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&recommendation.similarity_threshold) {
        return Err(ConfigError::Validation(
            "recommendation.similarity_threshold must be in range 0.0..=1.0".to_string(),
        ));
    }
    if recommendation.max_recommendations == 0 {
        return Err(ConfigError::Validation(
            "recommendation.max_recommendations must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn validate_forecasting(forecasting: &ForecastingConfig) -> Result<(), ConfigError> {
    let in_range = |days: u32| (1..=MAX_FORECAST_DAYS).contains(&days);
    if !in_range(forecasting.default_periods) {
        return Err(ConfigError::Validation(format!(
            "forecasting.default_periods must be in range 1..={MAX_FORECAST_DAYS}"
        )));
    }
    if !in_range(forecasting.inventory_horizon_days) {
        return Err(ConfigError::Validation(format!(
            "forecasting.inventory_horizon_days must be in range 1..={MAX_FORECAST_DAYS}"
        )));
    }
    if !in_range(forecasting.trend_window_days) {
        return Err(ConfigError::Validation(format!(
            "forecasting.trend_window_days must be in range 1..={MAX_FORECAST_DAYS}"
        )));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn invalid_override(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnvOverride { key: key.to_string(), value: value.to_string() }
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse::<u32>().map_err(|_| invalid_override(key, value))
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| invalid_override(key, value))
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse::<f64>().map_err(|_| invalid_override(key, value))
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    warehouse: Option<WarehousePatch>,
    embedding: Option<EmbeddingPatch>,
    recommendation: Option<RecommendationPatch>,
    forecasting: Option<ForecastingPatch>,
    text: Option<TextPatch>,
    marketing: Option<MarketingPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct WarehousePatch {
    project_id: Option<String>,
    dataset: Option<String>,
    location: Option<String>,
    service_account_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EmbeddingPatch {
    dimension: Option<usize>,
    batch_size: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct RecommendationPatch {
    max_recommendations: Option<usize>,
    similarity_threshold: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ForecastingPatch {
    default_periods: Option<u32>,
    inventory_horizon_days: Option<u32>,
    trend_window_days: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct TextPatch {
    positive_words: Option<Vec<String>>,
    negative_words: Option<Vec<String>>,
    stop_words: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct MarketingPatch {
    email_templates: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
