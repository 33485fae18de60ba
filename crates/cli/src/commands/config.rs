use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use orientnet_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

use crate::commands::{CommandResult, EXIT_CONFIG};

struct Field {
    key: &'static str,
    env_keys: &'static [&'static str],
    value: String,
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                EXIT_CONFIG,
            );
        }
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in fields(&config) {
        let source = field_source(
            field.key,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key, &field.value, source));
    }

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn fields(config: &AppConfig) -> Vec<Field> {
    let client_secret = config
        .paypal
        .client_secret
        .as_ref()
        .map(|secret| redact_secret(secret.expose_secret()))
        .unwrap_or_else(|| "<unset>".to_string());

    vec![
        Field {
            key: "server.bind_address",
            env_keys: &["ORIENTNET_SERVER_BIND_ADDRESS"],
            value: config.server.bind_address.clone(),
        },
        Field {
            key: "server.port",
            env_keys: &["ORIENTNET_SERVER_PORT"],
            value: config.server.port.to_string(),
        },
        Field {
            key: "server.public_base_url",
            env_keys: &["ORIENTNET_SERVER_PUBLIC_BASE_URL"],
            value: config.server.public_base_url.clone(),
        },
        Field {
            key: "server.static_dir",
            env_keys: &["ORIENTNET_SERVER_STATIC_DIR"],
            value: display_path(config.server.static_dir.as_deref()),
        },
        Field {
            key: "catalog.path",
            env_keys: &["ORIENTNET_CATALOG_PATH"],
            value: config
                .catalog
                .path
                .as_deref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "<embedded>".to_string()),
        },
        Field {
            key: "pricing.exchange_rate",
            env_keys: &["ORIENTNET_PRICING_EXCHANGE_RATE", "ALL_PER_EUR"],
            value: config.pricing.exchange_rate.to_string(),
        },
        Field {
            key: "pricing.foreign_currency",
            env_keys: &["ORIENTNET_PRICING_FOREIGN_CURRENCY"],
            value: config.pricing.foreign_currency.clone(),
        },
        Field {
            key: "paypal.enabled",
            env_keys: &["ORIENTNET_PAYPAL_ENABLED"],
            value: config.paypal.enabled.to_string(),
        },
        Field {
            key: "paypal.environment",
            env_keys: &["ORIENTNET_PAYPAL_ENVIRONMENT"],
            value: format!("{:?}", config.paypal.environment),
        },
        Field {
            key: "paypal.client_id",
            env_keys: &["ORIENTNET_PAYPAL_CLIENT_ID"],
            value: config.paypal.client_id.clone().unwrap_or_else(|| "<unset>".to_string()),
        },
        Field {
            key: "paypal.client_secret",
            env_keys: &["ORIENTNET_PAYPAL_CLIENT_SECRET"],
            value: client_secret,
        },
        Field {
            key: "paypal.api_base_url",
            env_keys: &["ORIENTNET_PAYPAL_API_BASE_URL"],
            value: config.paypal.base_url().to_string(),
        },
        Field {
            key: "whatsapp.office_number",
            env_keys: &["ORIENTNET_WHATSAPP_OFFICE_NUMBER"],
            value: config.whatsapp.office_number.clone(),
        },
        Field {
            key: "logging.level",
            env_keys: &["ORIENTNET_LOGGING_LEVEL", "ORIENTNET_LOG_LEVEL"],
            value: config.logging.level.clone(),
        },
        Field {
            key: "logging.format",
            env_keys: &["ORIENTNET_LOGGING_FORMAT", "ORIENTNET_LOG_FORMAT"],
            value: format!("{:?}", config.logging.format),
        },
    ]
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("orientnet.toml"), PathBuf::from("config/orientnet.toml")]
        .into_iter()
        .find(|path| path.exists())
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
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
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

fn display_path(path: Option<&Path>) -> String {
    path.map(|path| path.display().to_string()).unwrap_or_else(|| "<unset>".to_string())
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

/// First four characters, then a mask.
fn redact_secret(secret: &str) -> String {
    let trimmed = secret.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if trimmed.chars().count() <= 8 {
        return "<redacted>".to_string();
    }
    let prefix: String = trimmed.chars().take(4).collect();
    format!("{prefix}***")
}
