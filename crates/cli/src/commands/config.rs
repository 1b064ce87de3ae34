use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use shopsense_core::config::{AppConfig, LoadOptions, CONFIG_FILE_NAME, NESTED_CONFIG_FILE};
use toml::Value;

use super::{load_config, respond, CommandResult};

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: &'static str,
    value: String,
    source: String,
}

struct SourceLookup {
    doc: Option<Value>,
    path: Option<PathBuf>,
}

impl SourceLookup {
    fn new(options: &LoadOptions) -> Self {
        let path = detect_config_path(options.config_path.as_deref());
        let doc = load_config_file_doc(path.as_deref());
        Self { doc, path }
    }

    fn entry(&self, key: &'static str, env_keys: &[&str], value: String) -> ConfigEntry {
        ConfigEntry { key, value, source: self.source(key, env_keys) }
    }

    fn source(&self, key_path: &str, env_keys: &[&str]) -> String {
        if let Some(env_key) = env_keys.iter().find(|env_key| env::var_os(env_key).is_some()) {
            return format!("env ({env_key})");
        }

        if let Some(doc) = &self.doc {
            if contains_path(doc, key_path) {
                let file_path = self
                    .path
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "config file".to_string());
                return format!("file ({file_path})");
            }
        }

        "default".to_string()
    }
}

pub fn run(options: &LoadOptions) -> CommandResult {
    respond("config", || {
        let config = load_config(options)?;
        let entries = entries(&config, &SourceLookup::new(options));
        Ok(CommandResult::with_data(
            "config",
            "effective config (source precedence: env > file > default)",
            entries,
        ))
    })
}

fn entries(config: &AppConfig, lookup: &SourceLookup) -> Vec<ConfigEntry> {
    let warehouse = &config.warehouse;
    let mut entries = vec![
        lookup.entry(
            "warehouse.project_id",
            &["SHOPSENSE_WAREHOUSE_PROJECT_ID"],
            warehouse.project_id.clone().unwrap_or_else(|| "<unset>".to_string()),
        ),
        lookup.entry(
            "warehouse.dataset",
            &["SHOPSENSE_WAREHOUSE_DATASET"],
            warehouse.dataset.clone(),
        ),
        lookup.entry(
            "warehouse.location",
            &["SHOPSENSE_WAREHOUSE_LOCATION"],
            warehouse.location.clone(),
        ),
        lookup.entry(
            "warehouse.service_account_key",
            &["SHOPSENSE_WAREHOUSE_SERVICE_ACCOUNT_KEY"],
            redact_secret(warehouse.service_account_key.as_ref()),
        ),
        lookup.entry(
            "embedding.dimension",
            &["SHOPSENSE_EMBEDDING_DIMENSION"],
            config.embedding.dimension.to_string(),
        ),
        lookup.entry(
            "embedding.batch_size",
            &["SHOPSENSE_EMBEDDING_BATCH_SIZE"],
            config.embedding.batch_size.to_string(),
        ),
        lookup.entry(
            "recommendation.max_recommendations",
            &["SHOPSENSE_RECOMMENDATION_MAX_RECOMMENDATIONS"],
            config.recommendation.max_recommendations.to_string(),
        ),
        lookup.entry(
            "recommendation.similarity_threshold",
            &["SHOPSENSE_RECOMMENDATION_SIMILARITY_THRESHOLD"],
            config.recommendation.similarity_threshold.to_string(),
        ),
        lookup.entry(
            "forecasting.default_periods",
            &["SHOPSENSE_FORECASTING_DEFAULT_PERIODS"],
            config.forecasting.default_periods.to_string(),
        ),
        lookup.entry(
            "forecasting.inventory_horizon_days",
            &["SHOPSENSE_FORECASTING_INVENTORY_HORIZON_DAYS"],
            config.forecasting.inventory_horizon_days.to_string(),
        ),
        lookup.entry(
            "forecasting.trend_window_days",
            &["SHOPSENSE_FORECASTING_TREND_WINDOW_DAYS"],
            config.forecasting.trend_window_days.to_string(),
        ),
        lookup.entry(
            "marketing.email_templates",
            &[],
            config.marketing.email_templates.keys().cloned().collect::<Vec<_>>().join(","),
        ),
        lookup.entry(
            "logging.level",
            &["SHOPSENSE_LOGGING_LEVEL", "SHOPSENSE_LOG_LEVEL"],
            config.logging.level.clone(),
        ),
        lookup.entry(
            "logging.format",
            &["SHOPSENSE_LOGGING_FORMAT", "SHOPSENSE_LOG_FORMAT"],
            format!("{:?}", config.logging.format).to_lowercase(),
        ),
    ];

    for (key, words) in [
        ("text.positive_words", &config.text.positive_words),
        ("text.negative_words", &config.text.negative_words),
        ("text.stop_words", &config.text.stop_words),
    ] {
        let value = match words {
            Some(words) => format!("{} custom words", words.len()),
            None => "built-in".to_string(),
        };
        entries.push(lookup.entry(key, &[], value));
    }

    entries
}

fn detect_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }

    [PathBuf::from(CONFIG_FILE_NAME), PathBuf::from(NESTED_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

/// Shows at most the first four characters of a secret.
fn redact_secret(secret: Option<&SecretString>) -> String {
    let Some(secret) = secret else {
        return "<unset>".to_string();
    };
    let exposed = secret.expose_secret().trim();
    if exposed.chars().count() <= 8 {
        return "<redacted>".to_string();
    }
    let prefix: String = exposed.chars().take(4).collect();
    format!("{prefix}***")
}
