use rust_decimal::Decimal;

use crate::domain::record::BiddingRecord;
use crate::errors::DomainError;

pub const CURRENCY_SYMBOL: &str = "₱";
pub const NOT_AVAILABLE: &str = "N/A";

/// Columns in the order the remote table serializes them, minus nothing.
pub const SCHEMA_COLUMNS: [&str; 14] = [
    "ReferenceNo",
    "Title",
    "Entity",
    "category",
    "Classification",
    "Status",
    "Type",
    "Summary",
    "PageURL",
    "PublishDate",
    "ClosingDate",
    "ABC",
    "REQT_LIST",
    "isApproved",
];

/// Fields placed first in the table view, in this order.
pub const PINNED_COLUMNS: [&str; 5] = ["ReferenceNo", "ABC", "category", "Type", "REQT_LIST"];

/// Internal storage columns never shown to reviewers.
pub const HIDDEN_COLUMNS: [&str; 2] = ["id", "created_at"];

/// Display-ready table: pinned columns first, internal columns dropped,
/// budget rendered as currency, structured fields flattened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Renders a budget as `₱ 1,234,567.89`, or `N/A` when the crawler found
/// no approved budget on the source page.
pub fn format_budget(budget: Option<Decimal>) -> String {
    match budget {
        Some(value) => format!("{CURRENCY_SYMBOL} {}", group_thousands(value)),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn group_thousands(value: Decimal) -> String {
    let fixed = format!("{:.2}", value.round_dp(2));
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer.to_string(), fraction.to_string()),
        None => (fixed, "00".to_string()),
    };
    let (sign, digits) = match integer.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}.{fraction}")
}

/// Flattens a structured requirements list for single-cell display.
pub fn stringify_requirements(requirements: &Option<serde_json::Value>) -> String {
    match requirements {
        None => String::new(),
        Some(serde_json::Value::String(text)) => text.clone(),
        Some(value) => value.to_string(),
    }
}

/// Reorders a column list so pinned columns come first (skipping any not
/// present), keeps the remaining columns in their existing order, and drops
/// internal storage columns.
pub fn order_columns<S: AsRef<str>>(columns: &[S]) -> Vec<String> {
    let visible: Vec<&str> = columns
        .iter()
        .map(AsRef::as_ref)
        .filter(|column| !HIDDEN_COLUMNS.contains(column))
        .collect();

    let mut ordered: Vec<String> = PINNED_COLUMNS
        .iter()
        .filter(|pinned| visible.contains(pinned))
        .map(|pinned| pinned.to_string())
        .collect();
    ordered.extend(
        visible
            .iter()
            .filter(|column| !PINNED_COLUMNS.contains(column))
            .map(|column| column.to_string()),
    );
    ordered
}

fn cell(record: &BiddingRecord, column: &str) -> String {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    match column {
        "ReferenceNo" => record.reference_no.to_string(),
        "Title" => text(&record.title),
        "Entity" => text(&record.entity),
        "category" => text(&record.category),
        "Classification" => text(&record.classification),
        "Status" => text(&record.status),
        "Type" => text(&record.bid_type),
        "Summary" => text(&record.summary),
        "PageURL" => text(&record.page_url),
        "PublishDate" => text(&record.publish_date),
        "ClosingDate" => text(&record.closing_date),
        "ABC" => format_budget(record.approved_budget),
        "REQT_LIST" => stringify_requirements(&record.requirements),
        "isApproved" => record.is_approved.to_string(),
        _ => String::new(),
    }
}

/// Builds the review table for a (usually filtered) set of records.
pub fn table_view(records: &[BiddingRecord]) -> TableView {
    let columns = order_columns(&SCHEMA_COLUMNS);
    let rows = records
        .iter()
        .map(|record| columns.iter().map(|column| cell(record, column)).collect())
        .collect();
    TableView { columns, rows }
}

/// Single-record view backing the record inspector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailView {
    pub reference_no: String,
    pub title: String,
    pub entity: String,
    pub category: String,
    pub classification: String,
    pub status: String,
    pub budget: String,
    pub publish_date: String,
    pub closing_date: String,
    pub page_url: String,
    pub summary: String,
}

impl DetailView {
    pub fn from_record(record: &BiddingRecord) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            reference_no: record.reference_no.to_string(),
            title: text(&record.title),
            entity: text(&record.entity),
            category: text(&record.category),
            classification: text(&record.classification),
            status: text(&record.status),
            budget: format_budget(record.approved_budget),
            publish_date: text(&record.publish_date),
            closing_date: text(&record.closing_date),
            page_url: text(&record.page_url),
            summary: text(&record.summary),
        }
    }
}

impl std::fmt::Display for DetailView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "  Reference No.:  {}", self.reference_no)?;
        writeln!(f, "  Entity:         {}", self.entity)?;
        writeln!(f, "  Category:       {}", self.category)?;
        writeln!(f, "  Classification: {}", self.classification)?;
        writeln!(f, "  Status:         {}", self.status)?;
        writeln!(f, "  ABC:            {}", self.budget)?;
        writeln!(f, "  Publish Date:   {}", self.publish_date)?;
        writeln!(f, "  Closing Date:   {}", self.closing_date)?;
        writeln!(f, "  Page URL:       {}", self.page_url)?;
        write!(f, "  Summary:        {}", self.summary)
    }
}

/// Looks up one record by reference number.
///
/// Exactly one match is expected. Zero matches is a reportable not-found
/// condition; duplicates (a known data-quality gap upstream) resolve to
/// the first record encountered.
pub fn find_by_reference<'a>(
    records: &'a [BiddingRecord],
    reference: &str,
) -> Result<&'a BiddingRecord, DomainError> {
    records
        .iter()
        .find(|record| record.reference_no.as_str() == reference)
        .ok_or_else(|| DomainError::ReferenceNotFound { reference: reference.to_string() })
}
