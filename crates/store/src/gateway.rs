use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use bidwatch_core::domain::record::{BiddingRecord, ReferenceNo};
use bidwatch_core::filter::FilterSet;

use crate::{RecordStore, StoreError};

/// Point-in-time copy of the full record store. Never partially refreshed:
/// a stale snapshot is replaced wholesale by re-fetching the table.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub records: Vec<BiddingRecord>,
    pub fetched_at: DateTime<Utc>,
}

/// Session-scoped gateway over a [`RecordStore`]. Fetches the whole table
/// in fixed-size windows and memoizes the result until an explicit
/// invalidation (user refresh, or an approval write-back).
pub struct RecordGateway<S> {
    store: S,
    window_size: u32,
    snapshot: Mutex<Option<Snapshot>>,
}

impl<S: RecordStore> RecordGateway<S> {
    pub fn new(store: S, window_size: u32) -> Self {
        Self { store, window_size: window_size.max(1), snapshot: Mutex::new(None) }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The cached snapshot, fetching it first if none is held.
    pub async fn fetch_all(&self) -> Result<Snapshot, StoreError> {
        let mut cached = self.snapshot.lock().await;
        if let Some(snapshot) = cached.as_ref() {
            debug!(
                event_name = "gateway.snapshot_hit",
                records = snapshot.records.len(),
                "serving cached snapshot"
            );
            return Ok(snapshot.clone());
        }

        let records = self.fetch_windows().await?;
        let snapshot = Snapshot { records, fetched_at: Utc::now() };
        info!(
            event_name = "gateway.snapshot_loaded",
            records = snapshot.records.len(),
            "full table snapshot loaded"
        );
        *cached = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// Drops the cached snapshot and fetches a fresh one.
    pub async fn refresh(&self) -> Result<Snapshot, StoreError> {
        self.invalidate().await;
        self.fetch_all().await
    }

    pub async fn invalidate(&self) {
        let mut cached = self.snapshot.lock().await;
        if cached.take().is_some() {
            debug!(event_name = "gateway.snapshot_invalidated", "cached snapshot dropped");
        }
    }

    pub async fn count_pending(&self, filters: &FilterSet) -> Result<u64, StoreError> {
        self.store.count_pending(filters).await
    }

    /// Approval write-back. Invalidates the snapshot so the next read
    /// reflects the flipped flag.
    pub async fn mark_approved(&self, reference: &ReferenceNo) -> Result<(), StoreError> {
        self.store.mark_approved(reference).await?;
        self.invalidate().await;
        Ok(())
    }

    /// Requests windows of `window_size` rows starting at offset 0,
    /// advancing by the window size, until a window comes back empty.
    async fn fetch_windows(&self) -> Result<Vec<BiddingRecord>, StoreError> {
        let mut records = Vec::new();
        let mut offset = 0u64;
        loop {
            let window = self.store.fetch_window(offset, self.window_size).await?;
            if window.is_empty() {
                break;
            }
            records.extend(window);
            offset += u64::from(self.window_size);
        }
        Ok(records)
    }
}
