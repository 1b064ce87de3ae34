pub mod analyze;
pub mod campaign;
pub mod config;
pub mod doctor;
pub mod forecast;
pub mod input;
pub mod prompt;
pub mod recommend;

use serde::Serialize;
use serde_json::Value;
use shopsense_core::config::{AppConfig, LoadOptions};
use shopsense_core::errors::{ApplicationError, InterfaceError};
use tracing::warn;
use uuid::Uuid;

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_INPUT: u8 = 3;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: None,
        };
        Self { exit_code: EXIT_OK, output: serialize_payload(payload) }
    }

    pub fn with_data(command: &str, message: impl Into<String>, data: impl Serialize) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(data) => data,
            Err(error) => {
                return Self::failure(command, "serialization", error.to_string(), EXIT_FAILURE)
            }
        };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: Some(data),
        };
        Self { exit_code: EXIT_OK, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Maps an application error onto the envelope with a fresh correlation id.
    pub fn from_error(command: &str, error: ApplicationError) -> Self {
        let (error_class, exit_code) = match &error {
            ApplicationError::Domain(_) => ("domain", EXIT_INPUT),
            ApplicationError::Input(_) => ("input", EXIT_INPUT),
            ApplicationError::Configuration(_) => ("config_validation", EXIT_CONFIG),
            ApplicationError::Template(_) => ("template", EXIT_FAILURE),
        };
        let interface = error.into_interface(Uuid::new_v4().to_string());
        let detail = match &interface {
            InterfaceError::BadRequest { message, .. } | InterfaceError::Internal { message, .. } => {
                message.clone()
            }
        };
        warn!(
            event_name = "cli.command.failed",
            command,
            error_class,
            correlation_id = interface.correlation_id(),
            detail = %detail,
            "command failed"
        );
        Self::failure(
            command,
            error_class,
            format!(
                "{} {detail} (correlation_id: {})",
                interface.user_message(),
                interface.correlation_id()
            ),
            exit_code,
        )
    }
}

/// Runs a command body, turning its error into the failure envelope.
pub fn respond(
    command: &str,
    body: impl FnOnce() -> Result<CommandResult, ApplicationError>,
) -> CommandResult {
    body().unwrap_or_else(|error| CommandResult::from_error(command, error))
}

pub fn load_config(options: &LoadOptions) -> Result<AppConfig, ApplicationError> {
    AppConfig::load(options.clone()).map_err(|error| ApplicationError::Configuration(error.to_string()))
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\",\"data\":null}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
