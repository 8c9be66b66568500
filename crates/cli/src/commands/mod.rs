pub mod config;
pub mod export;
pub mod plan;

use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rollout_core::{ApplicationError, InputError, InterfaceError};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const EXIT_CONFIG_FAILURE: u8 = 2;
pub const EXIT_INPUT_FAILURE: u8 = 3;
pub const EXIT_EXPORT_FAILURE: u8 = 4;

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
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
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
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Maps an application failure onto its error class and exit code.
    pub fn from_error(command: &str, error: ApplicationError) -> Self {
        let (error_class, exit_code) = match &error {
            ApplicationError::Configuration(_) => ("config_validation", EXIT_CONFIG_FAILURE),
            ApplicationError::Input(_) => ("invalid_input", EXIT_INPUT_FAILURE),
            ApplicationError::Export(_) => ("export_failed", EXIT_EXPORT_FAILURE),
        };

        let interface = error.into_interface(correlation_id(command));
        let detail = match &interface {
            InterfaceError::BadRequest { message, .. }
            | InterfaceError::Internal { message, .. } => message.as_str(),
        };
        let message = format!(
            "{} {detail} (correlation_id: {})",
            interface.user_message(),
            interface.correlation_id()
        );

        Self::failure(command, error_class, message, exit_code)
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

fn correlation_id(command: &str) -> String {
    format!("{command}-{}", Utc::now().timestamp_millis())
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let raw = fs::read_to_string(path).map_err(|error| InputError::Unreadable {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;

    serde_json::from_str(&raw).map_err(|error| InputError::Malformed {
        path: path.to_path_buf(),
        message: error.to_string(),
    })
}

/// `--now` accepts an RFC 3339 timestamp or a bare date (midnight UTC); absent
/// means the current time.
pub(crate) fn parse_now(raw: Option<&str>) -> Result<DateTime<Utc>, InputError> {
    let Some(raw) = raw.map(str::trim) else {
        return Ok(Utc::now());
    };

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| InputError::InvalidArgument {
            argument: "--now".to_string(),
            message: format!("`{raw}` is neither RFC 3339 nor YYYY-MM-DD"),
        })
}
