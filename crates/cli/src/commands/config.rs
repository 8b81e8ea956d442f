use secrecy::ExposeSecret;

use bidwatch_core::config::{AppConfig, LoadOptions, LogFormat};

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let unset = "<unset>".to_string();
    let lines = vec![
        "effective config (source precedence: env > file > default):".to_string(),
        render_line("store.base_url", &config.store.base_url),
        render_line("store.service_key", &redact_token(config.store.service_key.expose_secret())),
        render_line("store.table", &config.store.table),
        render_line("store.window_size", &config.store.window_size.to_string()),
        render_line("store.timeout_secs", &config.store.timeout_secs.to_string()),
        render_line("webhooks.jira_url", config.webhooks.jira_url.as_ref().unwrap_or(&unset)),
        render_line("webhooks.monday_url", config.webhooks.monday_url.as_ref().unwrap_or(&unset)),
        render_line("webhooks.timeout_secs", &config.webhooks.timeout_secs.to_string()),
        render_line(
            "llm.api_key",
            if config.llm.api_key.is_some() { "<redacted>" } else { "<unset>" },
        ),
        render_line("llm.base_url", &config.llm.base_url),
        render_line("llm.model", &config.llm.model),
        render_line("llm.timeout_secs", &config.llm.timeout_secs.to_string()),
        render_line("llm.referer", config.llm.referer.as_ref().unwrap_or(&unset)),
        render_line("llm.title", config.llm.title.as_ref().unwrap_or(&unset)),
        render_line("logging.level", &config.logging.level),
        render_line("logging.format", format_name(config.logging.format)),
    ];

    lines.join("\n")
}

fn render_line(key: &str, value: &str) -> String {
    format!("  {key} = {value}")
}

fn format_name(format: LogFormat) -> &'static str {
    match format {
        LogFormat::Compact => "compact",
        LogFormat::Pretty => "pretty",
        LogFormat::Json => "json",
    }
}

/// Keeps a short prefix so operators can tell keys apart without seeing
/// the secret.
fn redact_token(token: &str) -> String {
    if token.chars().count() <= 4 {
        "<redacted>".to_string()
    } else {
        let prefix: String = token.chars().take(4).collect();
        format!("{prefix}…<redacted>")
    }
}
