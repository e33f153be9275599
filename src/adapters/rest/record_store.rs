//! PostgREST-compatible record store over HTTP.
//!
//! Talks to `{url}/rest/v1/{table}` the way a Supabase project exposes it.
//! Realtime websockets are not used: the change feed carries the confirmed
//! results of writes made through this client, and everything else shows up
//! on the next full reload.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::adapters::change_feed::ChangeFeed;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AgentId, AgentPatch, AgentRecord, NewAgent, RawNotification, StoreConfig,
};
use crate::domain::ports::{RecordStore, Subscription, SubscriptionId};

/// Connection settings for [`RestRecordStore`].
#[derive(Debug, Clone)]
pub struct RestStoreSettings {
    pub base_url: String,
    pub anon_key: String,
    pub table: String,
    pub timeout: Duration,
    pub feed_capacity: usize,
}

impl RestStoreSettings {
    /// Settings from the `store` config section; `None` without a url.
    pub fn from_config(config: &StoreConfig) -> Option<Self> {
        let base_url = config.url.as_deref()?.trim_end_matches('/').to_string();
        Some(Self {
            base_url,
            anon_key: config.anon_key.clone().unwrap_or_default(),
            table: config.table.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            feed_capacity: config.feed_capacity,
        })
    }
}

/// Record store backed by a PostgREST table.
pub struct RestRecordStore {
    http: Client,
    settings: RestStoreSettings,
    feed: Arc<ChangeFeed>,
}

impl RestRecordStore {
    pub fn new(settings: RestStoreSettings) -> DomainResult<Self> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| DomainError::Backend(format!("failed to build HTTP client: {e}")))?;
        let feed = ChangeFeed::new(settings.feed_capacity);
        Ok(Self {
            http,
            settings,
            feed,
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.settings.base_url, self.settings.table)
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.http
            .request(method, self.table_url())
            .header("apikey", &self.settings.anon_key)
            .bearer_auth(&self.settings.anon_key)
    }

    fn request_by_id(&self, method: Method, id: &AgentId) -> RequestBuilder {
        self.request(method).query(&[("id", format!("eq.{id}"))])
    }

    /// Error out on non-2xx with the status and body in the message.
    async fn check(resp: Response, op: &str) -> Result<Response, String> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(format!("{op} returned {status}: {body}"))
    }

    async fn rows<T: DeserializeOwned>(resp: Response, op: &str) -> Result<Vec<T>, String> {
        resp.json::<Vec<T>>()
            .await
            .map_err(|e| format!("{op} response parse failed: {e}"))
    }

    /// Returned representation of a single-row write.
    async fn first_record(resp: Response, op: &str) -> Result<Option<AgentRecord>, String> {
        let rows: Vec<Value> = Self::rows(resp, op).await?;
        match rows.into_iter().next() {
            Some(row) => serde_json::from_value(row)
                .map(Some)
                .map_err(|e| format!("{op} returned an invalid row: {e}")),
            None => Ok(None),
        }
    }
}

/// Decode rows one at a time, skipping the ones that do not fit.
fn decode_rows(rows: Vec<Value>) -> Vec<AgentRecord> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<AgentRecord>(row.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                let id = row.get("id").cloned().unwrap_or_default();
                tracing::warn!(
                    id = %id,
                    error = %e,
                    "skipping undecodable agent row"
                );
                None
            }
        })
        .collect()
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn fetch_all(&self) -> DomainResult<Vec<AgentRecord>> {
        let resp = self
            .request(Method::GET)
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await
            .map_err(|e| DomainError::FetchFailed(format!("request failed: {e}")))?;
        let resp = Self::check(resp, "fetch").await.map_err(DomainError::FetchFailed)?;
        let rows: Vec<Value> = Self::rows(resp, "fetch")
            .await
            .map_err(DomainError::FetchFailed)?;

        let total = rows.len();
        let records = decode_rows(rows);
        tracing::debug!(total, decoded = records.len(), "fetched agent rows");
        Ok(records)
    }

    async fn fetch_by_id(&self, id: &AgentId) -> DomainResult<Option<AgentRecord>> {
        let resp = self
            .request_by_id(Method::GET, id)
            .query(&[("select", "*")])
            .send()
            .await
            .map_err(|e| DomainError::FetchFailed(format!("request failed: {e}")))?;
        let resp = Self::check(resp, "fetch by id")
            .await
            .map_err(DomainError::FetchFailed)?;
        Self::first_record(resp, "fetch by id")
            .await
            .map_err(DomainError::FetchFailed)
    }

    async fn create(&self, fields: &NewAgent) -> DomainResult<AgentRecord> {
        fields.validate()?;
        let resp = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .json(&[fields])
            .send()
            .await
            .map_err(|e| DomainError::CreationFailed(format!("request failed: {e}")))?;
        let resp = Self::check(resp, "create")
            .await
            .map_err(DomainError::CreationFailed)?;
        let record = Self::first_record(resp, "create")
            .await
            .map_err(DomainError::CreationFailed)?
            .ok_or_else(|| DomainError::CreationFailed("backend returned no row".to_string()))?;

        self.feed
            .publish(RawNotification::insert(serde_json::to_value(&record)?));
        tracing::info!(id = %record.id, name = %record.name, "agent created");
        Ok(record)
    }

    async fn update(&self, id: &AgentId, patch: &AgentPatch) -> DomainResult<Option<AgentRecord>> {
        patch.validate()?;
        let failed = |reason: String| DomainError::UpdateFailed {
            id: id.clone(),
            reason,
        };
        let resp = self
            .request_by_id(Method::PATCH, id)
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await
            .map_err(|e| failed(format!("request failed: {e}")))?;
        let resp = Self::check(resp, "update").await.map_err(failed)?;
        let Some(record) = Self::first_record(resp, "update").await.map_err(failed)? else {
            return Ok(None);
        };

        self.feed.publish(RawNotification::update(
            serde_json::to_value(&record)?,
            json!({ "id": id.as_str() }),
        ));
        tracing::info!(%id, "agent updated");
        Ok(Some(record))
    }

    async fn delete(&self, id: &AgentId) -> DomainResult<bool> {
        let failed = |reason: String| DomainError::DeleteFailed {
            id: id.clone(),
            reason,
        };
        let resp = self
            .request_by_id(Method::DELETE, id)
            .header("Prefer", "return=representation")
            .send()
            .await
            .map_err(|e| failed(format!("request failed: {e}")))?;
        let resp = Self::check(resp, "delete").await.map_err(failed)?;
        let deleted: Vec<Value> = Self::rows(resp, "delete").await.map_err(failed)?;
        if deleted.is_empty() {
            return Ok(false);
        }

        self.feed
            .publish(RawNotification::delete(json!({ "id": id.as_str() })));
        tracing::info!(%id, "agent deleted");
        Ok(true)
    }

    fn subscribe(&self) -> DomainResult<Subscription> {
        Ok(self.feed.subscribe())
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.feed.unsubscribe(id);
    }
}

impl std::fmt::Debug for RestRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestRecordStore")
            .field("base_url", &self.settings.base_url)
            .field("table", &self.settings.table)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_require_url() {
        assert!(RestStoreSettings::from_config(&StoreConfig::default()).is_none());
    }

    #[test]
    fn test_settings_trim_trailing_slash() {
        let config = StoreConfig {
            url: Some("https://example.supabase.co/".into()),
            anon_key: Some("key".into()),
            ..Default::default()
        };
        let settings = RestStoreSettings::from_config(&config).unwrap();
        assert_eq!(settings.base_url, "https://example.supabase.co");

        let store = RestRecordStore::new(settings).unwrap();
        assert_eq!(store.table_url(), "https://example.supabase.co/rest/v1/agents");
    }

    #[test]
    fn test_decode_rows_skips_bad_rows() {
        let rows = vec![
            json!({
                "id": "a1",
                "name": "Alpha",
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-01T00:00:00Z"
            }),
            json!({ "id": "broken" }),
            json!({
                "id": "a2",
                "name": "Beta",
                "category": "not-a-category",
                "status": "",
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-01T00:00:00Z"
            }),
            json!({ "name": "No Id" }),
        ];

        let records = decode_rows(rows);
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
        assert!(records[1].category.is_none());
        assert!(records[1].status.is_none());
    }
}
