use bidwatch_core::domain::record::{BiddingRecord, ReferenceNo};
use bidwatch_core::filter::{FilterField, FilterSet, FilterValue};
use bidwatch_store::{InMemoryRecordStore, RecordGateway, RecordStore, StoreError};

fn rows(count: usize) -> Vec<BiddingRecord> {
    (0..count)
        .map(|i| {
            let mut record = BiddingRecord::new(format!("RFQ-{i:04}"));
            record.category = Some(if i % 2 == 0 { "IT" } else { "Civil" }.to_string());
            record
        })
        .collect()
}

#[tokio::test]
async fn windowed_fetch_issues_one_request_per_window_plus_terminator() {
    // 25 rows at window size 10: windows of 10, 10, 5, then the empty
    // window that terminates the loop.
    let gateway = RecordGateway::new(InMemoryRecordStore::new(rows(25)), 10);

    let snapshot = gateway.fetch_all().await.expect("fetch succeeds");

    assert_eq!(snapshot.records.len(), 25);
    assert_eq!(gateway.store().window_requests(), 4);
    assert_eq!(snapshot.records[0].reference_no, ReferenceNo("RFQ-0000".into()));
    assert_eq!(snapshot.records[24].reference_no, ReferenceNo("RFQ-0024".into()));
}

#[tokio::test]
async fn exact_window_multiple_still_ends_on_an_empty_window() {
    let gateway = RecordGateway::new(InMemoryRecordStore::new(rows(20)), 10);

    let snapshot = gateway.fetch_all().await.expect("fetch succeeds");

    assert_eq!(snapshot.records.len(), 20);
    assert_eq!(gateway.store().window_requests(), 3);
}

#[tokio::test]
async fn empty_table_needs_exactly_one_request() {
    let gateway = RecordGateway::new(InMemoryRecordStore::new(Vec::new()), 10);

    let snapshot = gateway.fetch_all().await.expect("fetch succeeds");

    assert!(snapshot.records.is_empty());
    assert_eq!(gateway.store().window_requests(), 1);
}

#[tokio::test]
async fn repeated_fetches_serve_the_cached_snapshot() {
    let gateway = RecordGateway::new(InMemoryRecordStore::new(rows(5)), 10);

    let first = gateway.fetch_all().await.expect("fetch succeeds");
    let second = gateway.fetch_all().await.expect("fetch succeeds");

    assert_eq!(first.records, second.records);
    assert_eq!(first.fetched_at, second.fetched_at);
    assert_eq!(gateway.store().window_requests(), 2, "only the first call hits the store");
}

#[tokio::test]
async fn refresh_drops_the_snapshot_and_refetches() {
    let gateway = RecordGateway::new(InMemoryRecordStore::new(rows(5)), 10);

    gateway.fetch_all().await.expect("fetch succeeds");
    gateway.refresh().await.expect("refresh succeeds");

    assert_eq!(gateway.store().window_requests(), 4);
}

#[tokio::test]
async fn approval_write_back_invalidates_the_snapshot() {
    let gateway = RecordGateway::new(InMemoryRecordStore::new(rows(5)), 10);

    gateway.fetch_all().await.expect("fetch succeeds");
    gateway
        .mark_approved(&ReferenceNo("RFQ-0001".into()))
        .await
        .expect("approval write succeeds");
    let snapshot = gateway.fetch_all().await.expect("fetch succeeds");

    let approved = snapshot
        .records
        .iter()
        .find(|record| record.reference_no.as_str() == "RFQ-0001")
        .expect("record present");
    assert!(approved.is_approved, "refetched snapshot reflects the write");
}

#[tokio::test]
async fn reapproving_an_approved_record_is_a_noop() {
    let mut seeded = rows(1);
    seeded[0].is_approved = true;
    let gateway = RecordGateway::new(InMemoryRecordStore::new(seeded), 10);
    let reference = ReferenceNo("RFQ-0000".into());

    gateway.mark_approved(&reference).await.expect("no error on re-approval");

    assert!(gateway.store().rows()[0].is_approved);
}

#[tokio::test]
async fn count_pending_applies_filters_and_excludes_approved_rows() {
    let mut seeded = rows(10);
    seeded[0].is_approved = true; // category IT
    let store = InMemoryRecordStore::new(seeded);

    let filters = FilterSet::new().with(FilterField::Category, FilterValue::one("IT"));
    let count = store.count_pending(&filters).await.expect("count succeeds");

    assert_eq!(count, 4, "five IT rows minus the approved one");
}

#[tokio::test]
async fn store_rejection_surfaces_the_numeric_status() {
    let store = InMemoryRecordStore::new(rows(1)).rejecting_approvals_with(404);

    let result = store.mark_approved(&ReferenceNo("RFQ-0000".into())).await;

    match result {
        Err(StoreError::Rejected { status }) => assert_eq!(status, 404),
        other => panic!("expected rejection, got {other:?}"),
    }
}
