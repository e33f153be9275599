//! Turns raw realtime notifications into canonical change events.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::models::{AgentId, AgentRecord, ChangeEvent, RawNotification};

/// Why a notification could not be turned into a change event.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedEvent {
    #[error("unknown event type: {0}")]
    UnknownEventType(String),

    #[error("{event_type} notification has no new record")]
    MissingNewRecord { event_type: String },

    #[error("DELETE notification has no old record")]
    MissingOldRecord,

    #[error("DELETE notification has no record id")]
    MissingId,

    #[error("{event_type} notification carries an invalid record: {reason}")]
    InvalidRecord { event_type: String, reason: String },
}

/// Normalize one notification. Pure; never panics.
pub fn normalize(raw: &RawNotification) -> Result<ChangeEvent, MalformedEvent> {
    match raw.event_type.to_ascii_uppercase().as_str() {
        "INSERT" => new_record(raw).map(ChangeEvent::Inserted),
        "UPDATE" => new_record(raw).map(ChangeEvent::Updated),
        "DELETE" => {
            let old = raw.old_payload().ok_or(MalformedEvent::MissingOldRecord)?;
            record_id(old)
                .map(ChangeEvent::Deleted)
                .ok_or(MalformedEvent::MissingId)
        }
        _ => Err(MalformedEvent::UnknownEventType(raw.event_type.clone())),
    }
}

/// Normalize, logging and dropping malformed notifications.
pub fn normalize_or_drop(raw: &RawNotification) -> Option<ChangeEvent> {
    match normalize(raw) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::warn!(
                event_type = %raw.event_type,
                error = %e,
                "dropping malformed change notification"
            );
            None
        }
    }
}

fn new_record(raw: &RawNotification) -> Result<AgentRecord, MalformedEvent> {
    let new = raw
        .new_payload()
        .ok_or_else(|| MalformedEvent::MissingNewRecord {
            event_type: raw.event_type.clone(),
        })?;
    AgentRecord::deserialize(new).map_err(|e| MalformedEvent::InvalidRecord {
        event_type: raw.event_type.clone(),
        reason: e.to_string(),
    })
}

/// Ids arrive as strings, but integer keys are accepted too.
fn record_id(row: &Value) -> Option<AgentId> {
    match row.get("id")? {
        Value::String(s) if !s.is_empty() => Some(AgentId::new(s.clone())),
        Value::Number(n) => Some(AgentId::new(n.to_string())),
        _ => None,
    }
}
