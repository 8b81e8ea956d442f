pub mod dispatcher;
pub mod sender;
pub mod target;

use thiserror::Error;

use bidwatch_store::StoreError;

pub use dispatcher::{ApprovalDispatcher, ApprovalOutcome};
pub use sender::{ApprovalPayload, HttpWebhookSender, WebhookSender};
pub use target::ApprovalTarget;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("approval target `{target}` has no endpoint configured")]
    MissingEndpoint { target: ApprovalTarget },
    /// The webhook answered with a non-200 status. No local state changed;
    /// the user may retry manually.
    #[error("webhook rejected the approval with status {status}")]
    Rejected { status: u16 },
    /// Connection or timeout failure before any HTTP status arrived.
    #[error("webhook transport failure: {0}")]
    Transport(String),
    /// The webhook accepted the approval but the store write-back failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
