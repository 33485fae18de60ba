use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub pricing: PricingConfig,
    pub paypal: PaypalConfig,
    pub whatsapp: WhatsappConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
    /// Origin used for PayPal return and cancel URLs.
    pub public_base_url: String,
    pub static_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Default)]
pub struct CatalogConfig {
    /// Plan content document; the embedded catalog is used when unset.
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct PricingConfig {
    /// Lek per unit of `foreign_currency`.
    pub exchange_rate: Decimal,
    pub foreign_currency: String,
}

#[derive(Clone, Debug)]
pub struct PaypalConfig {
    pub enabled: bool,
    pub environment: PaypalEnvironment,
    pub client_id: Option<String>,
    pub client_secret: Option<SecretString>,
    pub charge_currency: String,
    pub api_base_url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct WhatsappConfig {
    pub office_number: String,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaypalEnvironment {
    Sandbox,
    Live,
}

impl PaypalEnvironment {
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Sandbox => "https://api-m.sandbox.paypal.com",
            Self::Live => "https://api-m.paypal.com",
        }
    }
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
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub catalog_path: Option<PathBuf>,
    pub exchange_rate: Option<Decimal>,
    pub log_level: Option<String>,
    pub paypal_enabled: Option<bool>,
    pub paypal_environment: Option<PaypalEnvironment>,
    pub paypal_client_id: Option<String>,
    pub paypal_client_secret: Option<String>,
    pub paypal_api_base_url: Option<String>,
    pub public_base_url: Option<String>,
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
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 3000,
                graceful_shutdown_secs: 15,
                public_base_url: "http://localhost:3000".to_string(),
                static_dir: None,
            },
            catalog: CatalogConfig::default(),
            pricing: PricingConfig {
                exchange_rate: Decimal::from(100),
                foreign_currency: "EUR".to_string(),
            },
            paypal: PaypalConfig {
                enabled: false,
                environment: PaypalEnvironment::Sandbox,
                client_id: None,
                client_secret: None,
                charge_currency: "EUR".to_string(),
                api_base_url: None,
                timeout_secs: 20,
            },
            whatsapp: WhatsappConfig { office_number: "355686666419".to_string() },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl FromStr for PaypalEnvironment {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "live" => Ok(Self::Live),
            other => Err(ConfigError::Validation(format!(
                "unsupported paypal environment `{other}` (expected sandbox|live)"
            ))),
        }
    }
}

impl FromStr for LogFormat {
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

impl PaypalConfig {
    /// Explicit `api_base_url` wins over the environment's default host.
    pub fn base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(self.environment.base_url())
    }

    pub fn has_credentials(&self) -> bool {
        let id = self.client_id.as_deref().map(str::trim).unwrap_or("");
        let secret = self.client_secret.as_ref().map(|s| s.expose_secret().trim()).unwrap_or("");
        !id.is_empty() && !secret.is_empty()
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
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("orientnet.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
            if let Some(public_base_url) = server.public_base_url {
                self.server.public_base_url = public_base_url;
            }
            if let Some(static_dir) = server.static_dir {
                self.server.static_dir = Some(static_dir);
            }
        }

        if let Some(catalog) = patch.catalog {
            if let Some(path) = catalog.path {
                self.catalog.path = Some(path);
            }
        }

        if let Some(pricing) = patch.pricing {
            if let Some(exchange_rate) = pricing.exchange_rate {
                self.pricing.exchange_rate = exchange_rate;
            }
            if let Some(foreign_currency) = pricing.foreign_currency {
                self.pricing.foreign_currency = foreign_currency;
            }
        }

        if let Some(paypal) = patch.paypal {
            if let Some(enabled) = paypal.enabled {
                self.paypal.enabled = enabled;
            }
            if let Some(environment) = paypal.environment {
                self.paypal.environment = environment;
            }
            if let Some(client_id) = paypal.client_id {
                self.paypal.client_id = Some(client_id);
            }
            if let Some(client_secret) = paypal.client_secret {
                self.paypal.client_secret = Some(secret_value(client_secret));
            }
            if let Some(charge_currency) = paypal.charge_currency {
                self.paypal.charge_currency = charge_currency;
            }
            if let Some(api_base_url) = paypal.api_base_url {
                self.paypal.api_base_url = Some(api_base_url);
            }
            if let Some(timeout_secs) = paypal.timeout_secs {
                self.paypal.timeout_secs = timeout_secs;
            }
        }

        if let Some(whatsapp) = patch.whatsapp {
            if let Some(office_number) = whatsapp.office_number {
                self.whatsapp.office_number = office_number;
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
        if let Some(value) = read_env("ORIENTNET_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("ORIENTNET_SERVER_PORT") {
            self.server.port = parse_u16("ORIENTNET_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("ORIENTNET_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("ORIENTNET_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }
        if let Some(value) = read_env("ORIENTNET_SERVER_PUBLIC_BASE_URL") {
            self.server.public_base_url = value;
        }
        if let Some(value) = read_env("ORIENTNET_SERVER_STATIC_DIR") {
            self.server.static_dir = Some(PathBuf::from(value));
        }

        if let Some(value) = read_env("ORIENTNET_CATALOG_PATH") {
            self.catalog.path = Some(PathBuf::from(value));
        }

        let exchange_rate = ["ORIENTNET_PRICING_EXCHANGE_RATE", "ALL_PER_EUR"]
            .into_iter()
            .find_map(|key| read_env(key).map(|value| (key, value)));
        if let Some((key, value)) = exchange_rate {
            self.pricing.exchange_rate = parse_decimal(key, &value)?;
        }
        if let Some(value) = read_env("ORIENTNET_PRICING_FOREIGN_CURRENCY") {
            self.pricing.foreign_currency = value;
        }

        if let Some(value) = read_env("ORIENTNET_PAYPAL_ENABLED") {
            self.paypal.enabled = parse_bool("ORIENTNET_PAYPAL_ENABLED", &value)?;
        }
        if let Some(value) = read_env("ORIENTNET_PAYPAL_ENVIRONMENT") {
            self.paypal.environment = value.parse()?;
        }
        if let Some(value) = read_env("ORIENTNET_PAYPAL_CLIENT_ID") {
            self.paypal.client_id = Some(value);
        }
        if let Some(value) = read_env("ORIENTNET_PAYPAL_CLIENT_SECRET") {
            self.paypal.client_secret = Some(secret_value(value));
        }
        if let Some(value) = read_env("ORIENTNET_PAYPAL_CHARGE_CURRENCY") {
            self.paypal.charge_currency = value;
        }
        if let Some(value) = read_env("ORIENTNET_PAYPAL_API_BASE_URL") {
            self.paypal.api_base_url = Some(value);
        }
        if let Some(value) = read_env("ORIENTNET_PAYPAL_TIMEOUT_SECS") {
            self.paypal.timeout_secs = parse_u64("ORIENTNET_PAYPAL_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("ORIENTNET_WHATSAPP_OFFICE_NUMBER") {
            self.whatsapp.office_number = value;
        }

        let log_level =
            read_env("ORIENTNET_LOGGING_LEVEL").or_else(|| read_env("ORIENTNET_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("ORIENTNET_LOGGING_FORMAT").or_else(|| read_env("ORIENTNET_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(bind_address) = overrides.bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(public_base_url) = overrides.public_base_url {
            self.server.public_base_url = public_base_url;
        }
        if let Some(catalog_path) = overrides.catalog_path {
            self.catalog.path = Some(catalog_path);
        }
        if let Some(exchange_rate) = overrides.exchange_rate {
            self.pricing.exchange_rate = exchange_rate;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(enabled) = overrides.paypal_enabled {
            self.paypal.enabled = enabled;
        }
        if let Some(environment) = overrides.paypal_environment {
            self.paypal.environment = environment;
        }
        if let Some(client_id) = overrides.paypal_client_id {
            self.paypal.client_id = Some(client_id);
        }
        if let Some(client_secret) = overrides.paypal_client_secret {
            self.paypal.client_secret = Some(secret_value(client_secret));
        }
        if let Some(api_base_url) = overrides.paypal_api_base_url {
            self.paypal.api_base_url = Some(api_base_url);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_server(&self.server)?;
        validate_pricing(&self.pricing)?;
        validate_paypal(&self.paypal)?;
        if self.paypal.charge_currency != self.pricing.foreign_currency {
            return Err(ConfigError::Validation(format!(
                "paypal.charge_currency `{}` must match pricing.foreign_currency `{}`",
                self.paypal.charge_currency, self.pricing.foreign_currency
            )));
        }
        validate_whatsapp(&self.whatsapp)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("orientnet.toml"), PathBuf::from("config/orientnet.toml")]
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

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    let base_url = server.public_base_url.trim();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "server.public_base_url must start with http:// or https://".to_string(),
        ));
    }

    Ok(())
}

fn validate_pricing(pricing: &PricingConfig) -> Result<(), ConfigError> {
    if pricing.exchange_rate <= Decimal::ZERO {
        return Err(ConfigError::Validation(format!(
            "pricing.exchange_rate must be greater than zero (got {})",
            pricing.exchange_rate
        )));
    }

    if !is_currency_code(&pricing.foreign_currency) {
        return Err(ConfigError::Validation(format!(
            "pricing.foreign_currency must be a three-letter ISO currency code (got `{}`)",
            pricing.foreign_currency
        )));
    }

    Ok(())
}

fn validate_paypal(paypal: &PaypalConfig) -> Result<(), ConfigError> {
    if paypal.timeout_secs == 0 || paypal.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "paypal.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if !is_currency_code(&paypal.charge_currency) {
        return Err(ConfigError::Validation(format!(
            "paypal.charge_currency must be a three-letter ISO currency code (got `{}`)",
            paypal.charge_currency
        )));
    }

    if let Some(base_url) = &paypal.api_base_url {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "paypal.api_base_url must start with http:// or https://".to_string(),
            ));
        }
    }

    if paypal.enabled && !paypal.has_credentials() {
        return Err(ConfigError::Validation(
            "paypal.enabled is true but paypal.client_id or paypal.client_secret is missing. Get them from https://developer.paypal.com > Apps & Credentials".to_string(),
        ));
    }

    Ok(())
}

fn validate_whatsapp(whatsapp: &WhatsappConfig) -> Result<(), ConfigError> {
    let digits = whatsapp.office_number.chars().filter(char::is_ascii_digit).count();
    if digits < 8 {
        return Err(ConfigError::Validation(
            "whatsapp.office_number must be an international number with country code"
                .to_string(),
        ));
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

fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse::<bool>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_decimal(key: &str, value: &str) -> Result<Decimal, ConfigError> {
    Decimal::from_str(value.trim()).map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    server: Option<ServerPatch>,
    catalog: Option<CatalogPatch>,
    pricing: Option<PricingPatch>,
    paypal: Option<PaypalPatch>,
    whatsapp: Option<WhatsappPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
    public_base_url: Option<String>,
    static_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct PricingPatch {
    exchange_rate: Option<Decimal>,
    foreign_currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PaypalPatch {
    enabled: Option<bool>,
    environment: Option<PaypalEnvironment>,
    client_id: Option<String>,
    client_secret: Option<String>,
    charge_currency: Option<String>,
    api_base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct WhatsappPatch {
    office_number: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
