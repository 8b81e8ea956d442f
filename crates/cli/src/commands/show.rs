use bidwatch_core::present::{find_by_reference, DetailView};

use super::{build_gateway, load_config, CommandResult, EXIT_FAILURE};

pub async fn run(reference: &str) -> CommandResult {
    let config = match load_config() {
        Ok(config) => config,
        Err(result) => return result,
    };
    let gateway = match build_gateway(&config) {
        Ok(gateway) => gateway,
        Err(result) => return result,
    };

    let snapshot = match gateway.fetch_all().await {
        Ok(snapshot) => snapshot,
        Err(error) => {
            return CommandResult::failure(format!("could not fetch records: {error}"), EXIT_FAILURE)
        }
    };

    match find_by_reference(&snapshot.records, reference) {
        Ok(record) => CommandResult::ok(DetailView::from_record(record).to_string()),
        Err(error) => CommandResult::failure(error.to_string(), EXIT_FAILURE),
    }
}
