use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Unique key of a bidding opportunity, assigned by the upstream crawler.
///
/// Uniqueness is a data-quality assumption, not a storage guarantee: the
/// remote table carries no constraint, so lookups resolve duplicates
/// first-match-wins.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceNo(pub String);

impl ReferenceNo {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReferenceNo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReferenceNo {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One row of the remote bidding table. Field renames mirror the column
/// names the crawler writes; everything except `ReferenceNo` is nullable
/// because the crawler fills columns opportunistically.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiddingRecord {
    #[serde(rename = "ReferenceNo")]
    pub reference_no: ReferenceNo,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Entity")]
    pub entity: Option<String>,
    #[serde(rename = "category")]
    pub category: Option<String>,
    #[serde(rename = "Classification")]
    pub classification: Option<String>,
    #[serde(rename = "Status")]
    pub status: Option<String>,
    #[serde(rename = "Type")]
    pub bid_type: Option<String>,
    #[serde(rename = "Summary")]
    pub summary: Option<String>,
    #[serde(rename = "PageURL")]
    pub page_url: Option<String>,
    #[serde(rename = "PublishDate")]
    pub publish_date: Option<String>,
    #[serde(rename = "ClosingDate")]
    pub closing_date: Option<String>,
    /// Approved Budget for the Contract. Some crawler versions wrote the
    /// long column name, so both are accepted on decode.
    #[serde(rename = "ABC", alias = "ApprovedBudget")]
    pub approved_budget: Option<Decimal>,
    #[serde(rename = "REQT_LIST")]
    pub requirements: Option<serde_json::Value>,
    /// The only field this system ever mutates, and only false -> true.
    #[serde(rename = "isApproved", default)]
    pub is_approved: bool,
    // System columns; accepted on decode, excluded from every view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl BiddingRecord {
    pub fn new(reference_no: impl Into<String>) -> Self {
        Self {
            reference_no: ReferenceNo(reference_no.into()),
            title: None,
            entity: None,
            category: None,
            classification: None,
            status: None,
            bid_type: None,
            summary: None,
            page_url: None,
            publish_date: None,
            closing_date: None,
            approved_budget: None,
            requirements: None,
            is_approved: false,
            id: None,
            created_at: None,
        }
    }
}
