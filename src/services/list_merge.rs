//! Canonical in-memory agent list kept in step with the record store.
//!
//! The engine is seeded from a bulk fetch and then patched one change event
//! at a time. It trusts delivery order: the most recently applied record for
//! an id wins, whatever its `updated_at` says.

use std::collections::HashMap;

use crate::domain::models::{AgentId, AgentRecord, ChangeEvent};

/// Effect an applied event had on the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Added,
    Replaced,
    Removed,
    Unchanged,
}

/// Owner of the canonical agent collection for one view.
#[derive(Debug, Clone, Default)]
pub struct AgentListEngine {
    records: Vec<AgentRecord>,
}

impl AgentListEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection with a fresh bulk load.
    ///
    /// Duplicate ids inside `records` collapse to the last occurrence, kept
    /// at the position where the id first appeared.
    pub fn seed(&mut self, records: impl IntoIterator<Item = AgentRecord>) {
        let mut seeded: Vec<AgentRecord> = Vec::new();
        let mut positions: HashMap<AgentId, usize> = HashMap::new();

        for record in records {
            if let Some(&index) = positions.get(&record.id) {
                seeded[index] = record;
            } else {
                positions.insert(record.id.clone(), seeded.len());
                seeded.push(record);
            }
        }

        tracing::debug!(count = seeded.len(), "seeded agent list");
        self.records = seeded;
    }

    /// Apply one change event.
    pub fn apply(&mut self, event: ChangeEvent) -> ApplyOutcome {
        let outcome = match event {
            ChangeEvent::Inserted(record) | ChangeEvent::Updated(record) => self.upsert(record),
            ChangeEvent::Deleted(id) => self.remove(&id),
        };
        tracing::trace!(?outcome, len = self.records.len(), "applied change event");
        outcome
    }

    /// Replace in place, or add at the front when the id is new.
    ///
    /// An update for an untracked id lands here too: it is a late insert.
    fn upsert(&mut self, record: AgentRecord) -> ApplyOutcome {
        if let Some(existing) = self.records.iter_mut().find(|r| r.id == record.id) {
            *existing = record;
            ApplyOutcome::Replaced
        } else {
            self.records.insert(0, record);
            ApplyOutcome::Added
        }
    }

    fn remove(&mut self, id: &AgentId) -> ApplyOutcome {
        match self.records.iter().position(|r| &r.id == id) {
            Some(index) => {
                self.records.remove(index);
                ApplyOutcome::Removed
            }
            None => ApplyOutcome::Unchanged,
        }
    }

    /// Current collection as an owned sequence.
    pub fn snapshot(&self) -> Vec<AgentRecord> {
        self.records.clone()
    }

    pub fn records(&self) -> &[AgentRecord] {
        &self.records
    }

    pub fn get(&self, id: &AgentId) -> Option<&AgentRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
