use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::DispatchError;

/// Wire payload both workflow systems accept.
#[derive(Clone, Debug, Serialize)]
pub struct ApprovalPayload {
    pub reference_number: String,
}

/// Seam for the outbound webhook POST, so the dispatcher can be exercised
/// without a network.
#[async_trait]
pub trait WebhookSender: Send + Sync {
    /// POSTs the payload as JSON and returns the HTTP status code.
    async fn post_approval(
        &self,
        endpoint: &str,
        payload: &ApprovalPayload,
    ) -> Result<u16, DispatchError>;
}

pub struct HttpWebhookSender {
    client: Client,
}

impl HttpWebhookSender {
    pub fn new(timeout_secs: u64) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .map_err(|error| DispatchError::Transport(error.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl WebhookSender for HttpWebhookSender {
    async fn post_approval(
        &self,
        endpoint: &str,
        payload: &ApprovalPayload,
    ) -> Result<u16, DispatchError> {
        let response = self
            .client
            .post(endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|error| DispatchError::Transport(error.to_string()))?;
        Ok(response.status().as_u16())
    }
}
