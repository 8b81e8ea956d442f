use std::sync::Mutex;

use async_trait::async_trait;

use bidwatch_core::config::WebhookConfig;
use bidwatch_core::domain::record::{BiddingRecord, ReferenceNo};
use bidwatch_dispatch::{
    ApprovalDispatcher, ApprovalPayload, ApprovalTarget, DispatchError, WebhookSender,
};
use bidwatch_store::{InMemoryRecordStore, RecordGateway};

/// Scripted sender: records every POST and answers with a fixed result.
struct ScriptedSender {
    response: Result<u16, String>,
    posts: Mutex<Vec<(String, String)>>,
}

impl ScriptedSender {
    fn returning(status: u16) -> Self {
        Self { response: Ok(status), posts: Mutex::new(Vec::new()) }
    }

    fn failing(message: &str) -> Self {
        Self { response: Err(message.to_string()), posts: Mutex::new(Vec::new()) }
    }

    fn posts(&self) -> Vec<(String, String)> {
        self.posts.lock().expect("sender lock poisoned").clone()
    }
}

#[async_trait]
impl WebhookSender for &ScriptedSender {
    async fn post_approval(
        &self,
        endpoint: &str,
        payload: &ApprovalPayload,
    ) -> Result<u16, DispatchError> {
        let body = serde_json::to_string(payload).expect("payload serializes");
        self.posts.lock().expect("sender lock poisoned").push((endpoint.to_string(), body));
        match &self.response {
            Ok(status) => Ok(*status),
            Err(message) => Err(DispatchError::Transport(message.clone())),
        }
    }
}

fn config() -> WebhookConfig {
    WebhookConfig {
        jira_url: Some("https://hooks.example.test/add-jira".to_string()),
        monday_url: Some("https://hooks.example.test/add-monday".to_string()),
        timeout_secs: 10,
    }
}

fn gateway_with_one_record() -> RecordGateway<InMemoryRecordStore> {
    RecordGateway::new(InMemoryRecordStore::new(vec![BiddingRecord::new("RFQ-001")]), 10)
}

#[tokio::test]
async fn jira_approval_posts_payload_and_syncs_the_store() {
    let gateway = gateway_with_one_record();
    let sender = ScriptedSender::returning(200);
    let dispatcher = ApprovalDispatcher::new(&gateway, &sender, config());
    let reference = ReferenceNo("RFQ-001".into());

    let outcome = dispatcher.approve(&reference, ApprovalTarget::Jira).await.expect("approved");

    assert!(outcome.store_synced);
    assert!(gateway.store().rows()[0].is_approved);

    let posts = sender.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].0, "https://hooks.example.test/add-jira");
    assert_eq!(posts[0].1, r#"{"reference_number":"RFQ-001"}"#);
}

#[tokio::test]
async fn monday_approval_performs_no_local_mutation() {
    let gateway = gateway_with_one_record();
    let sender = ScriptedSender::returning(200);
    let dispatcher = ApprovalDispatcher::new(&gateway, &sender, config());
    let reference = ReferenceNo("RFQ-001".into());

    let outcome = dispatcher.approve(&reference, ApprovalTarget::Monday).await.expect("sent");

    assert!(!outcome.store_synced);
    assert!(!gateway.store().rows()[0].is_approved);
}

#[tokio::test]
async fn webhook_rejection_reports_status_and_leaves_the_flag_unset() {
    let gateway = gateway_with_one_record();
    let sender = ScriptedSender::returning(404);
    let dispatcher = ApprovalDispatcher::new(&gateway, &sender, config());
    let reference = ReferenceNo("RFQ-001".into());

    let result = dispatcher.approve(&reference, ApprovalTarget::Jira).await;

    match result {
        Err(DispatchError::Rejected { status }) => assert_eq!(status, 404),
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(!gateway.store().rows()[0].is_approved);
}

#[tokio::test]
async fn transport_failure_is_distinct_from_rejection() {
    let gateway = gateway_with_one_record();
    let sender = ScriptedSender::failing("connection refused");
    let dispatcher = ApprovalDispatcher::new(&gateway, &sender, config());
    let reference = ReferenceNo("RFQ-001".into());

    let result = dispatcher.approve(&reference, ApprovalTarget::Jira).await;

    assert!(matches!(result, Err(DispatchError::Transport(_))));
    assert!(!gateway.store().rows()[0].is_approved);
}

#[tokio::test]
async fn unconfigured_target_is_reported_before_any_post() {
    let gateway = gateway_with_one_record();
    let sender = ScriptedSender::returning(200);
    let bare = WebhookConfig { jira_url: None, monday_url: None, timeout_secs: 10 };
    let dispatcher = ApprovalDispatcher::new(&gateway, &sender, bare);
    let reference = ReferenceNo("RFQ-001".into());

    let result = dispatcher.approve(&reference, ApprovalTarget::Jira).await;

    assert!(matches!(result, Err(DispatchError::MissingEndpoint { .. })));
    assert!(sender.posts().is_empty());
}

#[tokio::test]
async fn snapshot_is_invalidated_after_a_synced_approval() {
    let gateway = gateway_with_one_record();
    gateway.fetch_all().await.expect("initial snapshot");
    let sender = ScriptedSender::returning(200);
    let dispatcher = ApprovalDispatcher::new(&gateway, &sender, config());
    let reference = ReferenceNo("RFQ-001".into());

    dispatcher.approve(&reference, ApprovalTarget::Jira).await.expect("approved");
    let snapshot = gateway.fetch_all().await.expect("refetched snapshot");

    assert!(snapshot.records[0].is_approved);
}
