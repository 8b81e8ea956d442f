use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use bidwatch_core::config::LlmConfig;
use bidwatch_core::prompt::ChatMessage;

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Chat-completion client for OpenRouter-compatible gateways:
/// `POST <base>/chat/completions` with `{model, messages}`, reply text in
/// `choices[0].message.content`.
pub struct OpenRouterClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<SecretString>,
    referer: Option<String>,
    title: Option<String>,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: String,
}

impl OpenRouterClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .context("could not build completion HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            referer: config.referer.clone(),
            title: config.title.clone(),
        })
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut request = self
            .client
            .post(&url)
            .json(&CompletionRequest { model: &self.model, messages });

        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }
        if let Some(referer) = &self.referer {
            request = request.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.title {
            request = request.header("X-Title", title);
        }

        let response = request.send().await.context("model completion request failed")?;
        let status = response.status();
        if !status.is_success() {
            bail!("model completion rejected with status {}", status.as_u16());
        }

        let completion: CompletionResponse =
            response.json().await.context("could not decode model completion response")?;
        match completion.choices.into_iter().next() {
            Some(choice) => Ok(choice.message.content),
            None => bail!("model completion response contained no choices"),
        }
    }
}
