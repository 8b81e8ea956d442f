use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use bidwatch_core::domain::record::{BiddingRecord, ReferenceNo};
use bidwatch_core::filter::FilterSet;

use crate::{RecordStore, StoreError};

/// In-memory [`RecordStore`] for tests: serves windows from a fixed row
/// set, records how many window requests were issued, and applies approval
/// writes to its own rows.
#[derive(Default)]
pub struct InMemoryRecordStore {
    rows: Mutex<Vec<BiddingRecord>>,
    window_requests: AtomicUsize,
    reject_approvals_with: Option<u16>,
}

impl InMemoryRecordStore {
    pub fn new(rows: Vec<BiddingRecord>) -> Self {
        Self { rows: Mutex::new(rows), ..Self::default() }
    }

    /// Makes every `mark_approved` call fail with this HTTP status.
    pub fn rejecting_approvals_with(mut self, status: u16) -> Self {
        self.reject_approvals_with = Some(status);
        self
    }

    pub fn window_requests(&self) -> usize {
        self.window_requests.load(Ordering::SeqCst)
    }

    pub fn rows(&self) -> Vec<BiddingRecord> {
        self.rows.lock().expect("store lock poisoned").clone()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn fetch_window(
        &self,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<BiddingRecord>, StoreError> {
        self.window_requests.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().expect("store lock poisoned");
        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(rows.len());
        let end = start.saturating_add(limit as usize).min(rows.len());
        Ok(rows[start..end].to_vec())
    }

    async fn count_pending(&self, filters: &FilterSet) -> Result<u64, StoreError> {
        let rows = self.rows.lock().expect("store lock poisoned");
        let count =
            rows.iter().filter(|row| !row.is_approved && filters.matches(row)).count();
        Ok(count as u64)
    }

    async fn mark_approved(&self, reference: &ReferenceNo) -> Result<(), StoreError> {
        if let Some(status) = self.reject_approvals_with {
            return Err(StoreError::Rejected { status });
        }
        let mut rows = self.rows.lock().expect("store lock poisoned");
        for row in rows.iter_mut().filter(|row| row.reference_no == *reference) {
            row.is_approved = true;
        }
        Ok(())
    }
}
