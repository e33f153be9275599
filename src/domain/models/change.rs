//! Change notifications delivered by the record store's realtime feed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::agent::{AgentId, AgentRecord};

/// Raw realtime notification as delivered by the backend.
///
/// Mirrors the backend payload shape:
/// `{"eventType": "UPDATE", "new": {...row...}, "old": {"id": "..."}}`.
/// The unused side is usually sent as an empty object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNotification {
    #[serde(rename = "eventType")]
    pub event_type: String,

    #[serde(default)]
    pub new: Option<Value>,

    #[serde(default)]
    pub old: Option<Value>,
}

impl RawNotification {
    pub fn insert(new: Value) -> Self {
        Self {
            event_type: "INSERT".to_string(),
            new: Some(new),
            old: Some(Value::Object(serde_json::Map::new())),
        }
    }

    pub fn update(new: Value, old: Value) -> Self {
        Self {
            event_type: "UPDATE".to_string(),
            new: Some(new),
            old: Some(old),
        }
    }

    pub fn delete(old: Value) -> Self {
        Self {
            event_type: "DELETE".to_string(),
            new: Some(Value::Object(serde_json::Map::new())),
            old: Some(old),
        }
    }

    /// The `new` payload, treating `null` and `{}` as absent.
    pub fn new_payload(&self) -> Option<&Value> {
        present(self.new.as_ref())
    }

    /// The `old` payload, treating `null` and `{}` as absent.
    pub fn old_payload(&self) -> Option<&Value> {
        present(self.old.as_ref())
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) if map.is_empty() => None,
        Some(v) => Some(v),
    }
}

/// Canonical change applied to the in-memory agent list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    Inserted(AgentRecord),
    Updated(AgentRecord),
    Deleted(AgentId),
}

impl ChangeEvent {
    /// Id of the record this event touches.
    pub fn agent_id(&self) -> &AgentId {
        match self {
            Self::Inserted(record) | Self::Updated(record) => &record.id,
            Self::Deleted(id) => id,
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Inserted(_) => "inserted",
            Self::Updated(_) => "updated",
            Self::Deleted(_) => "deleted",
        }
    }
}
