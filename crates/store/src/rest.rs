use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use bidwatch_core::config::StoreConfig;
use bidwatch_core::domain::record::{BiddingRecord, ReferenceNo};
use bidwatch_core::filter::{FilterSet, FilterValue};

use crate::{RecordStore, StoreError};

/// Remote table client speaking PostgREST conventions (Supabase-style):
/// `GET /rest/v1/<table>` with `offset`/`limit` for windows, a
/// `Prefer: count=exact` header for counts, and `PATCH` with an equality
/// filter for the single-field approval update.
pub struct RestRecordStore {
    client: Client,
    base_url: String,
    table: String,
    service_key: SecretString,
}

impl RestRecordStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(StoreError::Transport)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            table: config.table.clone(),
            service_key: config.service_key.clone(),
        })
    }

    fn table_url(&self) -> Result<Url, StoreError> {
        let raw = format!("{}/rest/v1/{}", self.base_url, self.table);
        Url::parse(&raw).map_err(|error| StoreError::InvalidUrl(format!("{raw}: {error}")))
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let key = self.service_key.expose_secret();
        if let Ok(value) = HeaderValue::from_str(key) {
            headers.insert("apikey", value);
        }
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {key}")) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }
}

fn append_filter_pairs(url: &mut Url, filters: &FilterSet) {
    let mut pairs = url.query_pairs_mut();
    pairs.append_pair("isApproved", "eq.false");
    for (field, value) in filters.active() {
        match value {
            FilterValue::One(accepted) => {
                pairs.append_pair(field.column(), &format!("eq.{accepted}"));
            }
            FilterValue::Any(accepted) => {
                let quoted: Vec<String> =
                    accepted.iter().map(|value| format!("\"{value}\"")).collect();
                pairs.append_pair(field.column(), &format!("in.({})", quoted.join(",")));
            }
        }
    }
}

/// The exact total sits after the `/` in `content-range: 0-0/57`.
fn parse_exact_count(header: Option<&HeaderValue>) -> Result<u64, StoreError> {
    let raw = header
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| StoreError::Decode("missing content-range header".to_string()))?;
    let total = raw
        .rsplit_once('/')
        .map(|(_, total)| total)
        .ok_or_else(|| StoreError::Decode(format!("malformed content-range `{raw}`")))?;
    total
        .parse()
        .map_err(|_| StoreError::Decode(format!("non-numeric content-range total `{raw}`")))
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn fetch_window(
        &self,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<BiddingRecord>, StoreError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("offset", &offset.to_string())
            .append_pair("limit", &limit.to_string());

        debug!(event_name = "store.fetch_window", offset, limit, "requesting window");
        let response = self.client.get(url).headers(self.auth_headers()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Rejected { status: status.as_u16() });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|error| StoreError::Decode(error.to_string()))
    }

    async fn count_pending(&self, filters: &FilterSet) -> Result<u64, StoreError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("select", "ReferenceNo")
            .append_pair("limit", "1");
        append_filter_pairs(&mut url, filters);

        let mut headers = self.auth_headers();
        headers.insert("Prefer", HeaderValue::from_static("count=exact"));

        let response = self.client.get(url).headers(headers).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Rejected { status: status.as_u16() });
        }

        parse_exact_count(response.headers().get("content-range"))
    }

    async fn mark_approved(&self, reference: &ReferenceNo) -> Result<(), StoreError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("ReferenceNo", &format!("eq.{}", reference.as_str()));

        let mut headers = self.auth_headers();
        headers.insert("Prefer", HeaderValue::from_static("return=minimal"));

        debug!(
            event_name = "store.mark_approved",
            reference = reference.as_str(),
            "writing approval flag"
        );
        let response = self
            .client
            .patch(url)
            .headers(headers)
            .json(&serde_json::json!({ "isApproved": true }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(StoreError::Rejected { status: status.as_u16() })
        }
    }
}
