//! Common test utilities for integration tests
//!
//! Provides shared fixtures, helpers, and test utilities used across
//! multiple integration test files.

use agentdeck::domain::ports::{Subscription, SubscriptionId};
use agentdeck::{
    AgentCategory, AgentId, AgentPatch, AgentRecord, AgentStatus, DomainError, DomainResult,
    NewAgent, RecordStore,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Fixed point in time the fixtures are built around.
#[allow(dead_code)]
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
}

/// Minimal agent record; `minutes` offsets both timestamps from [`base_time`].
#[allow(dead_code)]
pub fn agent(id: &str, name: &str, minutes: i64) -> AgentRecord {
    let at = base_time() + Duration::minutes(minutes);
    AgentRecord {
        id: AgentId::from(id),
        name: name.to_string(),
        description: String::new(),
        context: String::new(),
        instructions: String::new(),
        knowledge: String::new(),
        category: None,
        status: None,
        tags: vec![],
        icon: None,
        color: None,
        created_at: at,
        updated_at: at,
    }
}

#[allow(dead_code)]
pub fn agent_with(
    id: &str,
    name: &str,
    category: Option<AgentCategory>,
    status: Option<AgentStatus>,
    tags: &[&str],
) -> AgentRecord {
    AgentRecord {
        category,
        status,
        tags: tags.iter().map(ToString::to_string).collect(),
        ..agent(id, name, 0)
    }
}

/// Backend row as it would appear in a notification or REST response.
#[allow(dead_code)]
pub fn row(record: &AgentRecord) -> Value {
    serde_json::to_value(record).unwrap()
}

#[allow(dead_code)]
pub fn minimal_row(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": null,
        "tags": null,
        "created_at": "2024-06-01T08:00:00Z",
        "updated_at": "2024-06-01T08:00:00Z"
    })
}

/// Record store whose every operation fails.
#[allow(dead_code)]
pub struct FailingRecordStore;

#[async_trait]
impl RecordStore for FailingRecordStore {
    async fn fetch_all(&self) -> DomainResult<Vec<AgentRecord>> {
        Err(DomainError::FetchFailed("connection refused".to_string()))
    }

    async fn fetch_by_id(&self, _id: &AgentId) -> DomainResult<Option<AgentRecord>> {
        Err(DomainError::FetchFailed("connection refused".to_string()))
    }

    async fn create(&self, _fields: &NewAgent) -> DomainResult<AgentRecord> {
        Err(DomainError::Backend("connection refused".to_string()))
    }

    async fn update(&self, id: &AgentId, _patch: &AgentPatch) -> DomainResult<Option<AgentRecord>> {
        Err(DomainError::UpdateFailed {
            id: id.clone(),
            reason: "permission denied".to_string(),
        })
    }

    async fn delete(&self, _id: &AgentId) -> DomainResult<bool> {
        Err(DomainError::Backend("connection refused".to_string()))
    }

    fn subscribe(&self) -> DomainResult<Subscription> {
        Err(DomainError::SubscriptionFailed("realtime unavailable".to_string()))
    }

    fn unsubscribe(&self, _id: SubscriptionId) {}
}
