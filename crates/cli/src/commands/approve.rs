use bidwatch_core::domain::record::ReferenceNo;
use bidwatch_core::present::find_by_reference;
use bidwatch_dispatch::{ApprovalDispatcher, ApprovalTarget, DispatchError, HttpWebhookSender};

use super::{build_gateway, load_config, CommandResult, EXIT_CONFIG, EXIT_FAILURE};

pub async fn run(reference: &str, target: &str) -> CommandResult {
    let Some(target) = ApprovalTarget::parse(target) else {
        return CommandResult::failure(
            format!("unknown approval target `{target}` (expected jira|monday)"),
            EXIT_CONFIG,
        );
    };

    let config = match load_config() {
        Ok(config) => config,
        Err(result) => return result,
    };
    let gateway = match build_gateway(&config) {
        Ok(gateway) => gateway,
        Err(result) => return result,
    };

    // Resolve the record first so a typo'd reference is a lookup miss, not
    // a webhook call.
    let snapshot = match gateway.fetch_all().await {
        Ok(snapshot) => snapshot,
        Err(error) => {
            return CommandResult::failure(format!("could not fetch records: {error}"), EXIT_FAILURE)
        }
    };
    let record = match find_by_reference(&snapshot.records, reference) {
        Ok(record) => record.clone(),
        Err(error) => return CommandResult::failure(error.to_string(), EXIT_FAILURE),
    };

    let sender = match HttpWebhookSender::new(config.webhooks.timeout_secs) {
        Ok(sender) => sender,
        Err(error) => {
            return CommandResult::failure(
                format!("could not build webhook client: {error}"),
                EXIT_FAILURE,
            )
        }
    };
    let dispatcher = ApprovalDispatcher::new(&gateway, sender, config.webhooks.clone());
    let reference = ReferenceNo::from(reference);

    match dispatcher.approve(&reference, target).await {
        Ok(outcome) => {
            let title = record.title.as_deref().unwrap_or(reference.as_str());
            let synced = if outcome.store_synced { " (approval recorded in store)" } else { "" };
            CommandResult::ok(format!("Bidding '{title}' sent to {target}.{synced}"))
        }
        Err(DispatchError::Rejected { status }) => CommandResult::failure(
            format!("failed to send to {target}. Status code: {status}"),
            EXIT_FAILURE,
        ),
        Err(error) => CommandResult::failure(error.to_string(), EXIT_FAILURE),
    }
}
