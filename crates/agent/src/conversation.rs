use tracing::warn;

use bidwatch_core::domain::record::BiddingRecord;
use bidwatch_core::prompt::{build_messages, ChatMessage};

use crate::llm::LlmClient;

/// One user's conversation with the bidding assistant. History only grows;
/// clearing it means starting a new session.
#[derive(Debug, Default)]
pub struct ChatSession {
    history: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// One linear request-response cycle: assemble the prompt from prior
    /// history plus record context, call the model, and append both the
    /// user turn and the reply. A failed call appends an error-describing
    /// assistant message instead of propagating.
    pub async fn send(
        &mut self,
        client: &dyn LlmClient,
        records: &[BiddingRecord],
        user_message: &str,
    ) -> ChatMessage {
        let messages = build_messages(&self.history, user_message, records);
        self.history.push(ChatMessage::user(user_message));

        let reply = match client.complete(&messages).await {
            Ok(content) => ChatMessage::assistant(content),
            Err(error) => {
                warn!(
                    event_name = "chat.completion_failed",
                    error = %error,
                    "model call failed; surfacing error in conversation"
                );
                ChatMessage::assistant(format!("Error: {error}"))
            }
        };

        self.history.push(reply.clone());
        reply
    }
}
