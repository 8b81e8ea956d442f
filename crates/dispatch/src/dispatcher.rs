use tracing::{info, warn};
use uuid::Uuid;

use bidwatch_core::config::WebhookConfig;
use bidwatch_core::domain::record::ReferenceNo;
use bidwatch_store::{RecordGateway, RecordStore};

use crate::sender::{ApprovalPayload, WebhookSender};
use crate::target::ApprovalTarget;
use crate::DispatchError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApprovalOutcome {
    pub reference: ReferenceNo,
    pub target: ApprovalTarget,
    /// Whether the approval flag was written back to the record store.
    pub store_synced: bool,
}

/// Forwards an approved record to one external workflow system and, for
/// targets with local confirmation semantics, flips `isApproved` in the
/// store. Fire-once per user action; failures are reported, never retried.
pub struct ApprovalDispatcher<'a, S, W> {
    gateway: &'a RecordGateway<S>,
    sender: W,
    config: WebhookConfig,
}

impl<'a, S: RecordStore, W: WebhookSender> ApprovalDispatcher<'a, S, W> {
    pub fn new(gateway: &'a RecordGateway<S>, sender: W, config: WebhookConfig) -> Self {
        Self { gateway, sender, config }
    }

    pub async fn approve(
        &self,
        reference: &ReferenceNo,
        target: ApprovalTarget,
    ) -> Result<ApprovalOutcome, DispatchError> {
        let endpoint = target
            .endpoint(&self.config)
            .ok_or(DispatchError::MissingEndpoint { target })?;
        let correlation_id = Uuid::new_v4();
        let payload = ApprovalPayload { reference_number: reference.as_str().to_string() };

        info!(
            event_name = "dispatch.approval_sent",
            %correlation_id,
            reference = reference.as_str(),
            target = target.as_str(),
            "forwarding approval to workflow system"
        );
        let status = self.sender.post_approval(endpoint, &payload).await?;

        if status != 200 {
            warn!(
                event_name = "dispatch.approval_rejected",
                %correlation_id,
                reference = reference.as_str(),
                target = target.as_str(),
                status,
                "workflow system rejected the approval"
            );
            return Err(DispatchError::Rejected { status });
        }

        let store_synced = if target.requires_store_sync() {
            self.gateway.mark_approved(reference).await?;
            true
        } else {
            false
        };

        info!(
            event_name = "dispatch.approval_confirmed",
            %correlation_id,
            reference = reference.as_str(),
            target = target.as_str(),
            store_synced,
            "approval confirmed"
        );
        Ok(ApprovalOutcome { reference: reference.clone(), target, store_synced })
    }
}
