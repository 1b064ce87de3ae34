use serde::Serialize;
use shopsense_core::config::{AppConfig, LoadOptions};
use shopsense_core::embedding::PseudoEmbedder;
use shopsense_core::prompts::PromptBuilder;

use super::{CommandResult, EXIT_FAILURE, EXIT_OK};

const SELF_CHECK_TEXT: &str = "wireless noise cancelling headphones";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

impl DoctorCheck {
    fn skipped(name: &'static str) -> Self {
        Self {
            name,
            status: CheckStatus::Skipped,
            details: "skipped because configuration did not load".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(options: &LoadOptions, json_output: bool) -> CommandResult {
    let report = build_report(options);
    let exit_code =
        if report.overall_status == CheckStatus::Pass { EXIT_OK } else { EXIT_FAILURE };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report(options: &LoadOptions) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(options.clone()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_prompt_templates(&config));
            checks.push(check_embedding(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck::skipped("prompt_templates"));
            checks.push(DoctorCheck::skipped("embedding_self_check"));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_prompt_templates(config: &AppConfig) -> DoctorCheck {
    match PromptBuilder::new(config.marketing.email_templates.clone()) {
        Ok(builder) => DoctorCheck {
            name: "prompt_templates",
            status: CheckStatus::Pass,
            details: format!("compiled email templates: {}", builder.template_names().join(", ")),
        },
        Err(error) => DoctorCheck {
            name: "prompt_templates",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn check_embedding(config: &AppConfig) -> DoctorCheck {
    let dimension = config.embedding.dimension;
    let embedder = PseudoEmbedder::new(dimension);
    let first = embedder.embed(SELF_CHECK_TEXT);
    let second = embedder.embed(SELF_CHECK_TEXT);

    if first.dimension() != dimension {
        return DoctorCheck {
            name: "embedding_self_check",
            status: CheckStatus::Fail,
            details: format!("expected {dimension} dimensions, got {}", first.dimension()),
        };
    }
    if first != second {
        return DoctorCheck {
            name: "embedding_self_check",
            status: CheckStatus::Fail,
            details: "embedding is not deterministic".to_string(),
        };
    }

    DoctorCheck {
        name: "embedding_self_check",
        status: CheckStatus::Pass,
        details: format!("deterministic {dimension}-dimension embedding"),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
