pub mod gateway;
pub mod memory;
pub mod rest;

use async_trait::async_trait;
use thiserror::Error;

use bidwatch_core::domain::record::{BiddingRecord, ReferenceNo};
use bidwatch_core::filter::FilterSet;

pub use gateway::{RecordGateway, Snapshot};
pub use memory::InMemoryRecordStore;
pub use rest::RestRecordStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection, DNS, or timeout failure before an HTTP status arrived.
    #[error("store transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    /// The store answered, but refused the request.
    #[error("store rejected request with status {status}")]
    Rejected { status: u16 },
    #[error("could not decode store response: {0}")]
    Decode(String),
    #[error("invalid store URL: {0}")]
    InvalidUrl(String),
}

/// Access to the remote bidding table. Implementations must be
/// side-effect-free except for [`RecordStore::mark_approved`].
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// One fixed-size window of rows starting at `offset`, in store order.
    /// An empty result signals the end of the table.
    async fn fetch_window(&self, offset: u64, limit: u32)
        -> Result<Vec<BiddingRecord>, StoreError>;

    /// Exact count of unapproved rows matching the filter conjunction.
    /// Transfers no row bodies, so it stays cheap at any table size.
    async fn count_pending(&self, filters: &FilterSet) -> Result<u64, StoreError>;

    /// Flips `isApproved` to true for every row with this reference.
    /// Re-approving an already-approved record is a harmless no-op.
    async fn mark_approved(&self, reference: &ReferenceNo) -> Result<(), StoreError>;
}
