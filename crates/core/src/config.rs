use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub webhooks: WebhookConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub base_url: String,
    pub service_key: SecretString,
    pub table: String,
    pub window_size: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct WebhookConfig {
    pub jira_url: Option<String>,
    pub monday_url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Attribution headers some completion gateways expect.
    pub referer: Option<String>,
    pub title: Option<String>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
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

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub store_url: Option<String>,
    pub store_service_key: Option<String>,
    pub store_table: Option<String>,
    pub jira_url: Option<String>,
    pub monday_url: Option<String>,
    pub llm_model: Option<String>,
    pub log_level: Option<String>,
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
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                base_url: String::new(),
                service_key: String::new().into(),
                table: "BiddingDB".to_string(),
                window_size: 1000,
                timeout_secs: 30,
            },
            webhooks: WebhookConfig { jira_url: None, monday_url: None, timeout_secs: 10 },
            llm: LlmConfig {
                api_key: None,
                base_url: "https://openrouter.ai/api/v1".to_string(),
                model: "nvidia/llama-3.1-nemotron-ultra-253b-v1:free".to_string(),
                timeout_secs: 60,
                referer: None,
                title: None,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    store: Option<StorePatch>,
    webhooks: Option<WebhookPatch>,
    llm: Option<LlmPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct StorePatch {
    base_url: Option<String>,
    service_key: Option<String>,
    table: Option<String>,
    window_size: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct WebhookPatch {
    jira_url: Option<String>,
    monday_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmPatch {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
    referer: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<String>,
}

impl AppConfig {
    /// Loads configuration with source precedence: programmatic overrides >
    /// `BIDWATCH_*` environment > config file > defaults.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch)?;
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("bidwatch.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(store) = patch.store {
            if let Some(base_url) = store.base_url {
                self.store.base_url = base_url;
            }
            if let Some(service_key_value) = store.service_key {
                self.store.service_key = secret_value(service_key_value);
            }
            if let Some(table) = store.table {
                self.store.table = table;
            }
            if let Some(window_size) = store.window_size {
                self.store.window_size = window_size;
            }
            if let Some(timeout_secs) = store.timeout_secs {
                self.store.timeout_secs = timeout_secs;
            }
        }

        if let Some(webhooks) = patch.webhooks {
            if let Some(jira_url) = webhooks.jira_url {
                self.webhooks.jira_url = Some(jira_url);
            }
            if let Some(monday_url) = webhooks.monday_url {
                self.webhooks.monday_url = Some(monday_url);
            }
            if let Some(timeout_secs) = webhooks.timeout_secs {
                self.webhooks.timeout_secs = timeout_secs;
            }
        }

        if let Some(llm) = patch.llm {
            if let Some(api_key_value) = llm.api_key {
                self.llm.api_key = Some(secret_value(api_key_value));
            }
            if let Some(base_url) = llm.base_url {
                self.llm.base_url = base_url;
            }
            if let Some(model) = llm.model {
                self.llm.model = model;
            }
            if let Some(timeout_secs) = llm.timeout_secs {
                self.llm.timeout_secs = timeout_secs;
            }
            if let Some(referer) = llm.referer {
                self.llm.referer = Some(referer);
            }
            if let Some(title) = llm.title {
                self.llm.title = Some(title);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format.parse()?;
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("BIDWATCH_STORE_URL") {
            self.store.base_url = value;
        }
        if let Some(value) = read_env("BIDWATCH_STORE_SERVICE_KEY") {
            self.store.service_key = secret_value(value);
        }
        if let Some(value) = read_env("BIDWATCH_STORE_TABLE") {
            self.store.table = value;
        }
        if let Some(value) = read_env("BIDWATCH_STORE_WINDOW_SIZE") {
            self.store.window_size = parse_u32("BIDWATCH_STORE_WINDOW_SIZE", &value)?;
        }
        if let Some(value) = read_env("BIDWATCH_STORE_TIMEOUT_SECS") {
            self.store.timeout_secs = parse_u64("BIDWATCH_STORE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("BIDWATCH_WEBHOOK_JIRA_URL") {
            self.webhooks.jira_url = Some(value);
        }
        if let Some(value) = read_env("BIDWATCH_WEBHOOK_MONDAY_URL") {
            self.webhooks.monday_url = Some(value);
        }
        if let Some(value) = read_env("BIDWATCH_WEBHOOK_TIMEOUT_SECS") {
            self.webhooks.timeout_secs = parse_u64("BIDWATCH_WEBHOOK_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("BIDWATCH_LLM_API_KEY") {
            self.llm.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("BIDWATCH_LLM_BASE_URL") {
            self.llm.base_url = value;
        }
        if let Some(value) = read_env("BIDWATCH_LLM_MODEL") {
            self.llm.model = value;
        }
        if let Some(value) = read_env("BIDWATCH_LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = parse_u64("BIDWATCH_LLM_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("BIDWATCH_LLM_REFERER") {
            self.llm.referer = Some(value);
        }
        if let Some(value) = read_env("BIDWATCH_LLM_TITLE") {
            self.llm.title = Some(value);
        }

        let log_level =
            read_env("BIDWATCH_LOGGING_LEVEL").or_else(|| read_env("BIDWATCH_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("BIDWATCH_LOGGING_FORMAT").or_else(|| read_env("BIDWATCH_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(store_url) = overrides.store_url {
            self.store.base_url = store_url;
        }
        if let Some(store_service_key) = overrides.store_service_key {
            self.store.service_key = secret_value(store_service_key);
        }
        if let Some(store_table) = overrides.store_table {
            self.store.table = store_table;
        }
        if let Some(jira_url) = overrides.jira_url {
            self.webhooks.jira_url = Some(jira_url);
        }
        if let Some(monday_url) = overrides.monday_url {
            self.webhooks.monday_url = Some(monday_url);
        }
        if let Some(llm_model) = overrides.llm_model {
            self.llm.model = llm_model;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        use secrecy::ExposeSecret;

        if self.store.base_url.is_empty() {
            return Err(ConfigError::Validation(
                "store.base_url is required (set BIDWATCH_STORE_URL)".to_string(),
            ));
        }
        validate_http_url("store.base_url", &self.store.base_url)?;
        if self.store.service_key.expose_secret().is_empty() {
            return Err(ConfigError::Validation(
                "store.service_key is required (set BIDWATCH_STORE_SERVICE_KEY)".to_string(),
            ));
        }
        if self.store.table.is_empty() {
            return Err(ConfigError::Validation("store.table must not be empty".to_string()));
        }
        if self.store.window_size == 0 {
            return Err(ConfigError::Validation(
                "store.window_size must be at least 1".to_string(),
            ));
        }

        if let Some(jira_url) = &self.webhooks.jira_url {
            validate_http_url("webhooks.jira_url", jira_url)?;
        }
        if let Some(monday_url) = &self.webhooks.monday_url {
            validate_http_url("webhooks.monday_url", monday_url)?;
        }

        validate_http_url("llm.base_url", &self.llm.base_url)?;
        if self.llm.model.is_empty() {
            return Err(ConfigError::Validation("llm.model must not be empty".to_string()));
        }

        Ok(())
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{field} must be an http(s) URL, got `{value}`"
        )))
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }
    if let Some(from_env) = read_env("BIDWATCH_CONFIG_PATH") {
        let path = PathBuf::from(from_env);
        return path.exists().then_some(path);
    }
    let default = PathBuf::from("bidwatch.toml");
    default.exists().then_some(default)
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    toml::from_str(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use secrecy::ExposeSecret;

    use super::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};

    fn base_overrides() -> ConfigOverrides {
        ConfigOverrides {
            store_url: Some("https://example.supabase.co".to_string()),
            store_service_key: Some("service-key".to_string()),
            ..ConfigOverrides::default()
        }
    }

    #[test]
    fn defaults_carry_the_remote_table_contract() {
        let config = AppConfig::load(LoadOptions {
            overrides: base_overrides(),
            ..LoadOptions::default()
        })
        .expect("config loads with required overrides");

        assert_eq!(config.store.table, "BiddingDB");
        assert_eq!(config.store.window_size, 1000);
        assert_eq!(config.webhooks.timeout_secs, 10);
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn missing_store_url_fails_validation() {
        let result = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                store_service_key: Some("service-key".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });

        assert!(result.is_err(), "store.base_url must be required");
    }

    #[test]
    fn non_http_webhook_url_fails_validation() {
        let result = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                jira_url: Some("ftp://nope".to_string()),
                ..base_overrides()
            },
            ..LoadOptions::default()
        });

        assert!(result.is_err());
    }

    #[test]
    fn config_file_patch_applies_under_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            r#"
[store]
base_url = "https://example.supabase.co"
service_key = "file-key"
window_size = 250

[webhooks]
monday_url = "https://hooks.example.test/add-monday"

[logging]
format = "json"
"#
        )
        .expect("write config");

        let config = AppConfig::load(LoadOptions {
            config_path: Some(file.path().to_path_buf()),
            require_file: true,
            overrides: ConfigOverrides::default(),
        })
        .expect("config file loads");

        assert_eq!(config.store.window_size, 250);
        assert_eq!(config.store.service_key.expose_secret(), "file-key");
        assert_eq!(
            config.webhooks.monday_url.as_deref(),
            Some("https://hooks.example.test/add-monday")
        );
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            r#"
[store]
base_url = "https://file.supabase.co"
service_key = "file-key"
"#
        )
        .expect("write config");

        let config = AppConfig::load(LoadOptions {
            config_path: Some(file.path().to_path_buf()),
            require_file: true,
            overrides: base_overrides(),
        })
        .expect("config loads");

        assert_eq!(config.store.base_url, "https://example.supabase.co");
    }
}
