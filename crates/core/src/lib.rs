pub mod config;
pub mod domain;
pub mod errors;
pub mod filter;
pub mod present;
pub mod prompt;

pub use domain::record::{BiddingRecord, ReferenceNo};
pub use errors::DomainError;
pub use filter::{pending, FilterField, FilterSet, FilterValue};
pub use present::{find_by_reference, format_budget, table_view, DetailView, TableView};
pub use prompt::{build_messages, ChatMessage, Role};
