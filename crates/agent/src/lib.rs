pub mod conversation;
pub mod llm;

pub use conversation::ChatSession;
pub use llm::{LlmClient, OpenRouterClient};
