use clap::Args;

use bidwatch_core::filter::pending;
use bidwatch_core::present::table_view;

use super::{build_gateway, load_config, CommandResult, FilterArgs, EXIT_FAILURE};

pub const NO_DATA_WARNING: &str = "warning: no bidding records available";

#[derive(Args, Clone, Debug, Default)]
pub struct ListArgs {
    #[command(flatten)]
    pub filters: FilterArgs,
    #[arg(long, help = "Drop the cached snapshot and re-fetch the whole table")]
    pub refresh: bool,
}

pub async fn run(args: ListArgs) -> CommandResult {
    let config = match load_config() {
        Ok(config) => config,
        Err(result) => return result,
    };
    let gateway = match build_gateway(&config) {
        Ok(gateway) => gateway,
        Err(result) => return result,
    };

    let snapshot = if args.refresh { gateway.refresh().await } else { gateway.fetch_all().await };
    let snapshot = match snapshot {
        Ok(snapshot) => snapshot,
        Err(error) => {
            return CommandResult::failure(format!("could not fetch records: {error}"), EXIT_FAILURE)
        }
    };

    let open = pending(&snapshot.records);
    if open.is_empty() {
        return CommandResult::ok(NO_DATA_WARNING);
    }

    let filtered = args.filters.to_filter_set().apply(&open);
    let view = table_view(&filtered);

    let mut lines = vec![
        format!("Total pending records: {}", open.len()),
        format!("Filtered records: {}", filtered.len()),
        String::new(),
        view.columns.join("\t"),
    ];
    lines.extend(view.rows.iter().map(|row| row.join("\t")));
    CommandResult::ok(lines.join("\n"))
}
