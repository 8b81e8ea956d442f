use clap::Args;

use super::{build_gateway, load_config, CommandResult, FilterArgs, EXIT_FAILURE};

#[derive(Args, Clone, Debug, Default)]
pub struct CountArgs {
    #[command(flatten)]
    pub filters: FilterArgs,
}

pub async fn run(args: CountArgs) -> CommandResult {
    let config = match load_config() {
        Ok(config) => config,
        Err(result) => return result,
    };
    let gateway = match build_gateway(&config) {
        Ok(gateway) => gateway,
        Err(result) => return result,
    };

    match gateway.count_pending(&args.filters.to_filter_set()).await {
        Ok(count) => CommandResult::ok(count.to_string()),
        Err(error) => {
            CommandResult::failure(format!("could not count records: {error}"), EXIT_FAILURE)
        }
    }
}
