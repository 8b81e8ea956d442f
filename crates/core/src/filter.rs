use std::collections::{BTreeMap, BTreeSet};

use crate::domain::record::BiddingRecord;

/// Sentinel selection value meaning "no constraint on this attribute".
pub const ALL_SENTINEL: &str = "All";

/// The attributes the review screens can filter on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterField {
    Entity,
    Category,
    Status,
    Classification,
    Type,
}

impl FilterField {
    pub const ALL: [FilterField; 5] = [
        FilterField::Entity,
        FilterField::Category,
        FilterField::Status,
        FilterField::Classification,
        FilterField::Type,
    ];

    /// Column name as it appears in the remote table.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Entity => "Entity",
            Self::Category => "category",
            Self::Status => "Status",
            Self::Classification => "Classification",
            Self::Type => "Type",
        }
    }

    fn value_of<'a>(&self, record: &'a BiddingRecord) -> Option<&'a str> {
        match self {
            Self::Entity => record.entity.as_deref(),
            Self::Category => record.category.as_deref(),
            Self::Status => record.status.as_deref(),
            Self::Classification => record.classification.as_deref(),
            Self::Type => record.bid_type.as_deref(),
        }
    }
}

impl std::fmt::Display for FilterField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// Accepted values for one attribute. The two product modes differ
/// (single-select vs multi-select), so both shapes are first-class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterValue {
    One(String),
    Any(BTreeSet<String>),
}

impl FilterValue {
    pub fn one(value: impl Into<String>) -> Self {
        Self::One(value.into())
    }

    pub fn any<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Any(values.into_iter().map(Into::into).collect())
    }

    /// An empty selection or the "All" sentinel imposes no constraint.
    pub fn is_unconstrained(&self) -> bool {
        match self {
            Self::One(value) => value.is_empty() || value == ALL_SENTINEL,
            Self::Any(values) => values.is_empty(),
        }
    }

    fn accepts(&self, candidate: &str) -> bool {
        match self {
            Self::One(value) => value == candidate,
            Self::Any(values) => values.contains(candidate),
        }
    }
}

/// Conjunction of per-attribute inclusion filters over a snapshot.
/// Applying a filter set never mutates the source collection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSet {
    constraints: BTreeMap<FilterField, FilterValue>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: FilterField, value: FilterValue) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: FilterField, value: FilterValue) {
        self.constraints.insert(field, value);
    }

    /// Constraints that actually narrow the result, in field order.
    pub fn active(&self) -> impl Iterator<Item = (FilterField, &FilterValue)> {
        self.constraints
            .iter()
            .filter(|(_, value)| !value.is_unconstrained())
            .map(|(field, value)| (*field, value))
    }

    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }

    pub fn matches(&self, record: &BiddingRecord) -> bool {
        self.active().all(|(field, value)| {
            field.value_of(record).is_some_and(|candidate| value.accepts(candidate))
        })
    }

    pub fn apply(&self, records: &[BiddingRecord]) -> Vec<BiddingRecord> {
        records.iter().filter(|record| self.matches(record)).cloned().collect()
    }
}

/// Sorted distinct non-null values present for one attribute, used to
/// populate selection controls from the unfiltered snapshot.
pub fn options(records: &[BiddingRecord], field: FilterField) -> Vec<String> {
    let distinct: BTreeSet<&str> =
        records.iter().filter_map(|record| field.value_of(record)).collect();
    distinct.into_iter().map(str::to_string).collect()
}

/// The standing dashboard view: records not yet approved.
pub fn pending(records: &[BiddingRecord]) -> Vec<BiddingRecord> {
    records.iter().filter(|record| !record.is_approved).cloned().collect()
}

#[cfg(test)]
mod tests {
    use crate::domain::record::BiddingRecord;

    use super::{options, pending, FilterField, FilterSet, FilterValue};

    fn record(reference: &str, category: &str, entity: &str) -> BiddingRecord {
        let mut record = BiddingRecord::new(reference);
        record.category = Some(category.to_string());
        record.entity = Some(entity.to_string());
        record
    }

    fn sample() -> Vec<BiddingRecord> {
        vec![
            record("RFQ-001", "IT", "DepEd"),
            record("RFQ-002", "Civil", "DPWH"),
            record("RFQ-003", "IT", "DOH"),
        ]
    }

    #[test]
    fn empty_filter_set_returns_input_unchanged() {
        let records = sample();
        let filtered = FilterSet::new().apply(&records);
        assert_eq!(filtered, records);
    }

    #[test]
    fn category_filter_keeps_only_matching_records() {
        let records = sample();
        let filters =
            FilterSet::new().with(FilterField::Category, FilterValue::one("IT"));

        let filtered = filters.apply(&records);

        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.category.as_deref() == Some("IT")));
    }

    #[test]
    fn conjunction_requires_every_active_constraint() {
        let records = sample();
        let filters = FilterSet::new()
            .with(FilterField::Category, FilterValue::one("IT"))
            .with(FilterField::Entity, FilterValue::any(["DOH"]));

        let filtered = filters.apply(&records);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].reference_no.as_str(), "RFQ-003");
    }

    #[test]
    fn result_is_subset_of_input() {
        let records = sample();
        let filters =
            FilterSet::new().with(FilterField::Entity, FilterValue::any(["DepEd", "DPWH"]));

        let filtered = filters.apply(&records);

        assert!(filtered.iter().all(|r| records.contains(r)));
        assert_eq!(records.len(), 3, "source collection is never mutated");
    }

    #[test]
    fn all_sentinel_and_empty_selection_impose_no_constraint() {
        let records = sample();
        let filters = FilterSet::new()
            .with(FilterField::Category, FilterValue::one("All"))
            .with(FilterField::Status, FilterValue::any(Vec::<String>::new()));

        assert!(filters.is_empty());
        assert_eq!(filters.apply(&records), records);
    }

    #[test]
    fn records_missing_the_attribute_fail_an_active_constraint() {
        let mut no_category = BiddingRecord::new("RFQ-010");
        no_category.entity = Some("DOST".to_string());
        let records = vec![no_category];

        let filters =
            FilterSet::new().with(FilterField::Category, FilterValue::one("IT"));
        assert!(filters.apply(&records).is_empty());
    }

    #[test]
    fn options_are_sorted_distinct_non_null_values() {
        let records = sample();
        assert_eq!(options(&records, FilterField::Category), vec!["Civil", "IT"]);
        assert_eq!(options(&records, FilterField::Status), Vec::<String>::new());
    }

    #[test]
    fn pending_excludes_approved_records() {
        let mut records = sample();
        records[1].is_approved = true;

        let open = pending(&records);

        assert_eq!(open.len(), 2);
        assert!(open.iter().all(|r| !r.is_approved));
    }
}
