use serde::{Deserialize, Serialize};

use crate::domain::record::BiddingRecord;
use crate::present::format_budget;

/// Cap on how many records are summarized into the chat context, keeping
/// the prompt within the model's token budget.
pub const CONTEXT_SAMPLE_LIMIT: usize = 20;

pub const PERSONA: &str = "You are Bidwatch, a smart bidding assistant.";

const CONTEXT_PREAMBLE: &str = "Here are some current bidding opportunities:";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Renders up to [`CONTEXT_SAMPLE_LIMIT`] records into one-line summaries,
/// in input order, keeping only rows with both a reference and a title.
pub fn summarize_records(records: &[BiddingRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|record| {
            !record.reference_no.as_str().is_empty()
                && record.title.as_deref().is_some_and(|title| !title.is_empty())
        })
        .take(CONTEXT_SAMPLE_LIMIT)
        .map(|record| {
            format!(
                "ReferenceNo: {}, Title: {}, Entity: {}, Budget: {}, Summary: {}",
                record.reference_no,
                record.title.as_deref().unwrap_or_default(),
                record.entity.as_deref().unwrap_or_default(),
                format_budget(record.approved_budget),
                record.summary.as_deref().unwrap_or_default(),
            )
        })
        .collect()
}

/// Assembles the full message sequence for one chat turn: persona, prior
/// history in original order, record context, then the new user message.
pub fn build_messages(
    history: &[ChatMessage],
    user_message: &str,
    records: &[BiddingRecord],
) -> Vec<ChatMessage> {
    let summaries = summarize_records(records);

    let mut messages = Vec::with_capacity(history.len() + 3);
    messages.push(ChatMessage::system(PERSONA));
    messages.extend(history.iter().cloned());
    messages.push(ChatMessage::system(format!(
        "{CONTEXT_PREAMBLE}\n\n{}",
        summaries.join("\n")
    )));
    messages.push(ChatMessage::user(user_message));
    messages
}
