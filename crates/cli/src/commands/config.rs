use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rollout_core::config::{resolve_config_path, AppConfig, LoadOptions, LogFormat};
use rollout_core::ApplicationError;
use serde::Serialize;
use toml::Value;

use super::CommandResult;

const COMMAND: &str = "config";

#[derive(Debug, Serialize)]
struct ConfigReport {
    command: &'static str,
    status: &'static str,
    source_precedence: &'static str,
    config_file: Option<String>,
    fields: Vec<ConfigField>,
}

#[derive(Debug, Serialize)]
struct ConfigField {
    key: &'static str,
    value: String,
    source: String,
}

pub fn run(options: &LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error(COMMAND, ApplicationError::from(error)),
    };

    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let overrides = &options.overrides;
    let source = |key_path: &str, flag: Option<&str>, env_keys: &[&str]| {
        if let Some(flag) = flag {
            return format!("flag ({flag})");
        }
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let fields = vec![
        ConfigField {
            key: "planner.fallback_release_days",
            value: config.planner.fallback_release_days.to_string(),
            source: source(
                "planner.fallback_release_days",
                overrides.fallback_release_days.map(|_| "--fallback-release-days"),
                &["ROLLOUT_PLANNER_FALLBACK_RELEASE_DAYS"],
            ),
        },
        ConfigField {
            key: "export.output_dir",
            value: config.export.output_dir.display().to_string(),
            source: source(
                "export.output_dir",
                overrides.export_output_dir.as_ref().map(|_| "--output-dir"),
                &["ROLLOUT_EXPORT_OUTPUT_DIR"],
            ),
        },
        ConfigField {
            key: "logging.level",
            value: config.logging.level.clone(),
            source: source(
                "logging.level",
                overrides.log_level.as_ref().map(|_| "--log-level"),
                &["ROLLOUT_LOGGING_LEVEL", "ROLLOUT_LOG_LEVEL"],
            ),
        },
        ConfigField {
            key: "logging.format",
            value: format_name(config.logging.format).to_string(),
            source: source(
                "logging.format",
                overrides.log_format.map(|_| "--log-format"),
                &["ROLLOUT_LOGGING_FORMAT", "ROLLOUT_LOG_FORMAT"],
            ),
        },
    ];

    let report = ConfigReport {
        command: COMMAND,
        status: "ok",
        source_precedence: "flag > env > file > default",
        config_file: config_file_path.map(|path| path.display().to_string()),
        fields,
    };

    match serde_json::to_string_pretty(&report) {
        Ok(output) => CommandResult { exit_code: 0, output },
        Err(error) => CommandResult::failure(COMMAND, "serialization", error.to_string(), 1),
    }
}

fn format_name(format: LogFormat) -> &'static str {
    match format {
        LogFormat::Compact => "compact",
        LogFormat::Pretty => "pretty",
        LogFormat::Json => "json",
    }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    let env_hit = env_keys
        .iter()
        .find(|env_key| env::var(env_key).is_ok_and(|value| !value.trim().is_empty()));
    if let Some(env_key) = env_hit {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("config file"));
            return format!("file ({})", file_path.display());
        }
    }

    "default".to_string()
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
