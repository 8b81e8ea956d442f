pub mod approve;
pub mod chat;
pub mod config;
pub mod count;
pub mod doctor;
pub mod list;
pub mod show;

use clap::Args;

use bidwatch_core::config::{AppConfig, ConfigError, LoadOptions};
use bidwatch_core::filter::{FilterField, FilterSet, FilterValue};
use bidwatch_store::{RecordGateway, RestRecordStore};

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CONFIG: u8 = 2;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

impl CommandResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }

    pub fn failure(message: impl Into<String>, exit_code: u8) -> Self {
        Self { exit_code, output: format!("error: {}", message.into()) }
    }
}

/// Filter flags shared by `list` and `count`. Repeating a flag widens the
/// accepted set for that attribute (multi-select semantics).
#[derive(Args, Clone, Debug, Default)]
pub struct FilterArgs {
    #[arg(long, help = "Accept only these entities")]
    pub entity: Vec<String>,
    #[arg(long, help = "Accept only these categories")]
    pub category: Vec<String>,
    #[arg(long, help = "Accept only these statuses")]
    pub status: Vec<String>,
    #[arg(long, help = "Accept only these classifications")]
    pub classification: Vec<String>,
    #[arg(long = "type", help = "Accept only these types")]
    pub bid_type: Vec<String>,
}

impl FilterArgs {
    pub fn to_filter_set(&self) -> FilterSet {
        let mut filters = FilterSet::new();
        let pairs = [
            (FilterField::Entity, &self.entity),
            (FilterField::Category, &self.category),
            (FilterField::Status, &self.status),
            (FilterField::Classification, &self.classification),
            (FilterField::Type, &self.bid_type),
        ];
        for (field, values) in pairs {
            if !values.is_empty() {
                filters.insert(field, FilterValue::any(values.clone()));
            }
        }
        filters
    }
}

pub(crate) fn load_config() -> Result<AppConfig, CommandResult> {
    AppConfig::load(LoadOptions::default()).map_err(|error: ConfigError| {
        CommandResult::failure(format!("config validation failed: {error}"), EXIT_CONFIG)
    })
}

pub(crate) fn build_gateway(
    config: &AppConfig,
) -> Result<RecordGateway<RestRecordStore>, CommandResult> {
    let store = RestRecordStore::new(&config.store).map_err(|error| {
        CommandResult::failure(format!("could not build store client: {error}"), EXIT_FAILURE)
    })?;
    Ok(RecordGateway::new(store, config.store.window_size))
}

#[cfg(test)]
mod tests {
    use bidwatch_core::domain::record::BiddingRecord;

    use super::FilterArgs;

    #[test]
    fn no_flags_means_no_constraints() {
        assert!(FilterArgs::default().to_filter_set().is_empty());
    }

    #[test]
    fn repeated_flags_become_a_multi_select_constraint() {
        let args = FilterArgs {
            category: vec!["IT".to_string(), "Civil".to_string()],
            ..FilterArgs::default()
        };
        let filters = args.to_filter_set();

        let mut it_record = BiddingRecord::new("RFQ-001");
        it_record.category = Some("IT".to_string());
        let mut goods_record = BiddingRecord::new("RFQ-002");
        goods_record.category = Some("Goods".to_string());

        assert!(filters.matches(&it_record));
        assert!(!filters.matches(&goods_record));
    }
}
