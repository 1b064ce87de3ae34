use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use chrono::{TimeZone, Utc};
use serde_json::Value;
use shopsense_cli::commands::campaign::{CampaignKindArg, CampaignRequest};
use shopsense_cli::commands::prompt::{PromptKind, PromptRequest};
use shopsense_cli::commands::{analyze, campaign, config, doctor, forecast, prompt, recommend};
use shopsense_cli::execute_args;
use shopsense_core::config::LoadOptions;
use shopsense_core::forecast::ForecastSubject;
use shopsense_core::ranking::SubstitutionReason;
use shopsense_core::text::DEFAULT_MAX_KEYWORDS;
use tempfile::TempDir;

const USERS: &str = r#"[
  {"user_id": "u-1", "email": "ada@example.com", "segment": "vip", "first_name": "Ada", "total_orders": 12, "avg_order_value": 140.0},
  {"user_id": "u-2", "email": "grace@example.com", "segment": "new", "first_name": "Grace"},
  {"user_id": "u-3", "email": "linus@example.com", "segment": "vip", "first_name": "Linus", "total_orders": 7}
]"#;

const CATALOG: &str = r#"[
  {"id": "p-1", "name": "Trail Runner Shoe", "description": "lightweight running shoe", "category": "sports_outdoors", "brand": "Stride", "price": 89.0, "rating": 4.4, "stock_quantity": 12},
  {"id": "p-2", "name": "Road Runner Shoe", "description": "cushioned running shoe", "category": "sports_outdoors", "brand": "Stride", "price": 79.0, "rating": 4.6, "stock_quantity": 4},
  {"id": "p-3", "name": "Camping Tent", "description": "two person tent for summer trips", "category": "sports_outdoors", "brand": "Ridge", "price": 149.0, "rating": 4.1, "stock_quantity": 0},
  {"id": "p-4", "name": "Wireless Headphones", "description": "noise cancelling headphones", "category": "electronics", "brand": "Sonic", "price": 199.0, "rating": 4.8, "stock_quantity": 7},
  {"id": "p-5", "name": "Summer Dress", "description": "light cotton summer dress", "category": "clothing", "brand": "Bloom", "price": 49.0, "rating": 4.2, "stock_quantity": 20}
]"#;

fn fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn flat_series(days: u32, value: f64) -> String {
    let rows: Vec<String> = (1..=days)
        .map(|day| format!("{{\"date\": \"2024-03-{day:02}\", \"value\": {value}}}"))
        .collect();
    format!("[{}]", rows.join(","))
}

fn origin() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 8, 0, 0, 0).single().expect("valid timestamp")
}

#[test]
fn sentiment_returns_positive_envelope() {
    with_env(&[], || {
        let result = analyze::sentiment(&LoadOptions::default(), "Great phone, I love it");
        assert_eq!(result.exit_code, 0, "expected successful sentiment run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "sentiment");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["sentiment"], "positive");
        assert_eq!(payload["data"]["positive_score"], 2);
    });
}

#[test]
fn sentiment_uses_lexicon_from_config_file() {
    with_env(&[], || {
        let dir = TempDir::new().expect("tempdir");
        let config_path = fixture(
            &dir,
            "shopsense.toml",
            "[text]\npositive_words = [\"sturdy\"]\nnegative_words = [\"flimsy\"]\n",
        );
        let result = execute_args([
            "shopsense",
            "--config",
            config_path.to_str().expect("utf-8 path"),
            "sentiment",
            "great but flimsy",
        ])
        .expect("arguments parse");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["sentiment"], "negative");
    });
}

#[test]
fn classify_defaults_to_every_known_category() {
    let result = analyze::classify("a new laptop and phone", &[]);
    assert_eq!(result.exit_code, 0);

    let payload = parse_payload(&result.output);
    let scores = payload["data"].as_array().expect("score array");
    assert_eq!(scores.len(), 4);
    assert_eq!(payload["message"], "best match is electronics");
}

#[test]
fn embed_previews_configured_dimension() {
    with_env(&[("SHOPSENSE_EMBEDDING_DIMENSION", "16")], || {
        let result = analyze::embed(&LoadOptions::default(), "headphones", false);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["dimension"], 16);
        assert_eq!(payload["data"]["truncated"], true);
        assert_eq!(payload["data"]["values"].as_array().map(Vec::len), Some(8));
    });
}

#[test]
fn similar_falls_back_to_in_stock_category_peers() {
    with_env(&[], || {
        let dir = TempDir::new().expect("tempdir");
        let catalog = fixture(&dir, "catalog.json", CATALOG);

        let result = recommend::similar(&LoadOptions::default(), &catalog, "p-1", None, false);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let results = payload["data"]["results"].as_array().expect("result array");
        assert_eq!(results.len(), 1, "out-of-stock tent and the target itself are excluded");
        assert_eq!(results[0]["product"]["id"], "p-2");
        assert_eq!(results[0]["tier"], "category");
        assert_eq!(payload["data"]["above_threshold"], 0);
    });
}

#[test]
fn similar_with_unknown_product_uses_popular_products() {
    with_env(&[], || {
        let dir = TempDir::new().expect("tempdir");
        let catalog = fixture(&dir, "catalog.json", CATALOG);

        let result = recommend::similar(&LoadOptions::default(), &catalog, "missing", Some(2), false);
        let payload = parse_payload(&result.output);
        let results = payload["data"]["results"].as_array().expect("result array");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["product"]["id"], "p-4");
        assert_eq!(results[0]["tier"], "popular");
    });
}

#[test]
fn substitutes_for_unknown_product_is_domain_error() {
    with_env(&[], || {
        let dir = TempDir::new().expect("tempdir");
        let catalog = fixture(&dir, "catalog.json", CATALOG);

        let result = recommend::substitutes(
            &LoadOptions::default(),
            &catalog,
            "missing",
            SubstitutionReason::OutOfStock,
        );
        assert_eq!(result.exit_code, 3);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "domain");
        let message = payload["message"].as_str().expect("message string");
        assert!(message.contains("correlation_id"), "message should carry a correlation id");
    });
}

#[test]
fn search_reports_unreadable_catalog_as_input_error() {
    let result = recommend::search(&PathBuf::from("/nonexistent/catalog.json"), "shoe", None);
    assert_eq!(result.exit_code, 3);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["error_class"], "input");
}

#[test]
fn forecast_of_empty_series_uses_default_method() {
    with_env(&[], || {
        let dir = TempDir::new().expect("tempdir");
        let series = fixture(&dir, "series.json", "[]");

        let result = forecast::forecast(
            &LoadOptions::default(),
            &series,
            ForecastSubject::Revenue,
            Some(5),
            origin(),
        );
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["method"], "default");
        assert_eq!(payload["data"]["confidence_level"], 0.5);
        let predictions = payload["data"]["predictions"].as_array().expect("predictions");
        assert_eq!(predictions.len(), 5);
        assert_eq!(predictions[0]["value"], 1000.0);
    });
}

#[test]
fn forecast_periods_default_from_env() {
    with_env(&[("SHOPSENSE_FORECASTING_DEFAULT_PERIODS", "3")], || {
        let dir = TempDir::new().expect("tempdir");
        let series = fixture(&dir, "series.json", &flat_series(7, 4.0));

        let result =
            forecast::forecast(&LoadOptions::default(), &series, ForecastSubject::Product, None, origin());
        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["forecast_periods"], 3);
        assert_eq!(payload["data"]["method"], "moving_average");
    });
}

#[test]
fn inventory_reports_stockout_day() {
    with_env(&[], || {
        let dir = TempDir::new().expect("tempdir");
        let series = fixture(&dir, "series.json", &flat_series(7, 10.0));

        let result = forecast::inventory(&LoadOptions::default(), &series, 25, Some(10), origin());
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["stockout_day"], 3);
        assert_eq!(payload["data"]["cumulative_demand"], 100.0);
        assert_eq!(payload["data"]["recommended_reorder_quantity"], 75.0);
        assert_eq!(payload["message"], "stock runs out on day 3");
    });
}

#[test]
fn out_of_order_series_is_rejected_as_input() {
    with_env(&[], || {
        let dir = TempDir::new().expect("tempdir");
        let series = fixture(
            &dir,
            "series.json",
            r#"[{"date": "2024-03-02", "value": 1.0}, {"date": "2024-03-01", "value": 2.0}]"#,
        );

        let result = forecast::trend(&LoadOptions::default(), &series, origin());
        assert_eq!(result.exit_code, 3);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "trend");
        assert_eq!(payload["error_class"], "input");
    });
}

#[test]
fn invalid_env_config_returns_config_failure() {
    with_env(&[("SHOPSENSE_RECOMMENDATION_SIMILARITY_THRESHOLD", "1.5")], || {
        let result = analyze::sentiment(&LoadOptions::default(), "good");
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn abandoned_cart_prompt_renders_items_and_reply() {
    with_env(&[], || {
        let dir = TempDir::new().expect("tempdir");
        let cart = fixture(
            &dir,
            "cart.json",
            r#"[{"name": "Trail Runner Shoe", "price": 89.0, "quantity": 2}]"#,
        );
        let request = PromptRequest {
            kind: PromptKind::AbandonedCart,
            email_type: "reminder".to_string(),
            profile: None,
            preferences: None,
            cart: Some(cart),
            catalog: None,
            season: None,
        };

        let result = prompt::run(&LoadOptions::default(), &request);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["kind"], "abandoned_cart");
        let rendered = payload["data"]["prompt"].as_str().expect("prompt string");
        assert!(rendered.contains("Trail Runner Shoe"));
        assert_eq!(payload["data"]["reply_kind"], "generic");
    });
}

#[test]
fn seasonal_prompt_without_season_is_input_error() {
    with_env(&[], || {
        let request = PromptRequest {
            kind: PromptKind::Seasonal,
            email_type: "newsletter".to_string(),
            profile: None,
            preferences: None,
            cart: None,
            catalog: None,
            season: None,
        };

        let result = prompt::run(&LoadOptions::default(), &request);
        assert_eq!(result.exit_code, 3);
        assert_eq!(parse_payload(&result.output)["error_class"], "input");
    });
}

#[test]
fn config_reports_env_source_and_redacts_key() {
    with_env(
        &[
            ("SHOPSENSE_WAREHOUSE_DATASET", "shop_data"),
            ("SHOPSENSE_WAREHOUSE_SERVICE_ACCOUNT_KEY", "sa-key-1234567890"),
        ],
        || {
            let result = config::run(&LoadOptions::default());
            assert_eq!(result.exit_code, 0);

            let payload = parse_payload(&result.output);
            let entries = payload["data"].as_array().expect("entry array");
            let entry = |key: &str| {
                entries
                    .iter()
                    .find(|entry| entry["key"] == key)
                    .cloned()
                    .unwrap_or_else(|| panic!("missing config entry {key}"))
            };

            assert_eq!(entry("warehouse.dataset")["value"], "shop_data");
            assert_eq!(
                entry("warehouse.dataset")["source"],
                "env (SHOPSENSE_WAREHOUSE_DATASET)"
            );
            assert_eq!(entry("warehouse.service_account_key")["value"], "sa-k***");
            assert_eq!(entry("embedding.dimension")["source"], "default");
        },
    );
}

#[test]
fn doctor_json_passes_with_defaults() {
    with_env(&[], || {
        let result = doctor::run(&LoadOptions::default(), true);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["overall_status"], "pass");
        let checks = payload["checks"].as_array().expect("check array");
        let names: Vec<&str> = checks.iter().filter_map(|check| check["name"].as_str()).collect();
        assert_eq!(names, vec!["config_validation", "prompt_templates", "embedding_self_check"]);
    });
}

#[test]
fn doctor_skips_dependent_checks_when_config_fails() {
    with_env(&[("SHOPSENSE_EMBEDDING_DIMENSION", "0")], || {
        let result = doctor::run(&LoadOptions::default(), true);
        assert_eq!(result.exit_code, 1);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["overall_status"], "fail");
        assert_eq!(payload["checks"][0]["status"], "fail");
        assert_eq!(payload["checks"][1]["status"], "skipped");
        assert_eq!(payload["checks"][2]["status"], "skipped");
    });
}

#[test]
fn cli_rejects_unknown_substitution_reason() {
    let error = execute_args([
        "shopsense",
        "substitutes",
        "--catalog",
        "catalog.json",
        "--product",
        "p-1",
        "--reason",
        "cheaper",
    ])
    .expect_err("unknown reason should not parse");
    assert!(error.to_string().contains("unsupported substitution reason"));
}

#[test]
fn keywords_without_max_uses_default_limit() {
    with_env(&[], || {
        let text = "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima";
        let result = execute_args(["shopsense", "keywords", text]).expect("arguments parse");
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let keywords = payload["data"].as_array().expect("keyword array");
        assert_eq!(keywords.len(), DEFAULT_MAX_KEYWORDS);
        assert_eq!(keywords[0], "alpha");
    });
}

#[test]
fn forecast_rejects_out_of_range_periods_before_forecasting() {
    with_env(&[], || {
        let dir = TempDir::new().expect("tempdir");
        let series = fixture(&dir, "series.json", &flat_series(7, 4.0));
        let result = execute_args([
            "shopsense",
            "forecast",
            "--series",
            series.to_str().expect("utf-8 path"),
            "--periods",
            "100000000",
        ])
        .expect("arguments parse");
        assert_eq!(result.exit_code, 3);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "forecast");
        assert_eq!(payload["error_class"], "input");
        assert!(payload["message"].as_str().expect("message").contains("--periods"));
    });
}

#[test]
fn inventory_rejects_zero_horizon() {
    with_env(&[], || {
        let dir = TempDir::new().expect("tempdir");
        let series = fixture(&dir, "series.json", &flat_series(7, 4.0));

        let result = forecast::inventory(&LoadOptions::default(), &series, 10, Some(0), origin());
        assert_eq!(result.exit_code, 3);
        assert_eq!(parse_payload(&result.output)["error_class"], "input");
    });
}

#[test]
fn personalized_campaign_targets_only_the_segment() {
    with_env(&[], || {
        let dir = TempDir::new().expect("tempdir");
        let users = fixture(&dir, "users.json", USERS);
        let result = execute_args([
            "shopsense",
            "campaign",
            "--users",
            users.to_str().expect("utf-8 path"),
            "--segment",
            "vip",
            "--kind",
            "personalized",
            "--email-type",
            "welcome",
        ])
        .expect("arguments parse");
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "campaign");
        assert_eq!(payload["data"]["segment"], "vip");
        assert_eq!(payload["data"]["campaign_type"], "welcome");
        let emails = payload["data"]["emails"].as_array().expect("email array");
        assert_eq!(emails.len(), 2);
        assert_eq!(emails[0]["email"], "ada@example.com");
        assert_eq!(emails[1]["user_id"], "u-3");
        assert!(emails[0]["prompt"].as_str().expect("prompt").contains("Ada"));
        assert!(!emails[0]["content"].as_str().expect("content").is_empty());
    });
}

#[test]
fn seasonal_campaign_features_in_stock_season_products() {
    with_env(&[], || {
        let dir = TempDir::new().expect("tempdir");
        let request = CampaignRequest {
            users: fixture(&dir, "users.json", USERS),
            segment: "all".to_string(),
            kind: CampaignKindArg::Seasonal,
            email_type: "newsletter".to_string(),
            season: Some("summer".to_string()),
            catalog: Some(fixture(&dir, "catalog.json", CATALOG)),
        };

        let result = campaign::run(&LoadOptions::default(), &request, origin());
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["campaign_type"], "seasonal_summer");
        let emails = payload["data"]["emails"].as_array().expect("email array");
        assert_eq!(emails.len(), 3);
        let rendered = emails[0]["prompt"].as_str().expect("prompt");
        assert!(rendered.contains("Summer Dress"));
        assert!(!rendered.contains("Camping Tent"), "out-of-stock products are not featured");
        assert_eq!(emails[2]["campaign_type"], "seasonal_summer");
    });
}

#[test]
fn seasonal_campaign_without_season_is_input_error() {
    with_env(&[], || {
        let dir = TempDir::new().expect("tempdir");
        let request = CampaignRequest {
            users: fixture(&dir, "users.json", USERS),
            segment: "all".to_string(),
            kind: CampaignKindArg::Seasonal,
            email_type: "newsletter".to_string(),
            season: None,
            catalog: None,
        };

        let result = campaign::run(&LoadOptions::default(), &request, origin());
        assert_eq!(result.exit_code, 3);
        assert_eq!(parse_payload(&result.output)["error_class"], "input");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "SHOPSENSE_WAREHOUSE_PROJECT_ID",
        "SHOPSENSE_WAREHOUSE_DATASET",
        "SHOPSENSE_WAREHOUSE_LOCATION",
        "SHOPSENSE_WAREHOUSE_SERVICE_ACCOUNT_KEY",
        "SHOPSENSE_EMBEDDING_DIMENSION",
        "SHOPSENSE_EMBEDDING_BATCH_SIZE",
        "SHOPSENSE_RECOMMENDATION_MAX_RECOMMENDATIONS",
        "SHOPSENSE_RECOMMENDATION_SIMILARITY_THRESHOLD",
        "SHOPSENSE_FORECASTING_DEFAULT_PERIODS",
        "SHOPSENSE_FORECASTING_INVENTORY_HORIZON_DAYS",
        "SHOPSENSE_FORECASTING_TREND_WINDOW_DAYS",
        "SHOPSENSE_LOGGING_LEVEL",
        "SHOPSENSE_LOGGING_FORMAT",
        "SHOPSENSE_LOG_LEVEL",
        "SHOPSENSE_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
