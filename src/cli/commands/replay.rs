//! `replay` command: run recorded notifications through the list pipeline.
//!
//! Useful for reproducing what a screen showed after a given sequence of
//! backend changes without talking to the backend.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::cli::commands::agent::AgentListOutput;
use crate::cli::output::{output, CommandOutput};
use crate::cli::types::ReplayArgs;
use crate::domain::models::{AgentRecord, Config, RawNotification, ViewCriteria};
use crate::services::{normalize_or_drop, project, AgentListEngine, ApplyOutcome};

#[derive(Debug, Default, Serialize)]
pub struct ReplayStats {
    pub seeded: usize,
    pub applied: usize,
    pub unchanged: usize,
    pub dropped: usize,
}

#[derive(Debug, Serialize)]
pub struct ReplayOutput {
    pub stats: ReplayStats,
    pub criteria: ViewCriteria,
    #[serde(flatten)]
    pub list: AgentListOutput,
}

impl CommandOutput for ReplayOutput {
    fn to_human(&self) -> String {
        format!(
            "{}\n\nSeeded {}, applied {}, unchanged {}, dropped {}",
            self.list.to_human(),
            self.stats.seeded,
            self.stats.applied,
            self.stats.unchanged,
            self.stats.dropped
        )
    }
}

/// Apply each JSON line of `events` to an engine seeded with `seed`.
pub fn replay(seed: Vec<AgentRecord>, events: &str) -> (AgentListEngine, ReplayStats) {
    let mut stats = ReplayStats {
        seeded: seed.len(),
        ..Default::default()
    };
    let mut engine = AgentListEngine::new();
    engine.seed(seed);

    for (index, line) in events.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let raw = match serde_json::from_str::<RawNotification>(line) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(line = index + 1, error = %e, "skipping unparseable notification");
                stats.dropped += 1;
                continue;
            }
        };
        match normalize_or_drop(&raw) {
            Some(event) => match engine.apply(event) {
                ApplyOutcome::Unchanged => stats.unchanged += 1,
                _ => stats.applied += 1,
            },
            None => stats.dropped += 1,
        }
    }

    (engine, stats)
}

fn read_seed(path: &Path) -> Result<Vec<AgentRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Seed file {} is not a JSON array of agents", path.display()))
}

pub fn execute(config: &Config, args: ReplayArgs, json_mode: bool) -> Result<()> {
    let seed = read_seed(&args.seed)?;
    let events = std::fs::read_to_string(&args.events)
        .with_context(|| format!("Failed to read events file {}", args.events.display()))?;

    let (engine, stats) = replay(seed, &events);
    let criteria = args.criteria.to_criteria(&config.view);
    let projected = project(engine.records(), &criteria);

    tracing::info!(
        seeded = stats.seeded,
        applied = stats.applied,
        dropped = stats.dropped,
        "replay finished"
    );

    let out = ReplayOutput {
        stats,
        criteria,
        list: AgentListOutput::new(&projected),
    };
    output(&out, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: &str, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    #[test]
    fn test_replay_counts() {
        let seed: Vec<AgentRecord> = serde_json::from_value(json!([row("1", "One")])).unwrap();
        let events = [
            json!({ "eventType": "INSERT", "new": row("2", "Two"), "old": {} }).to_string(),
            String::new(),
            json!({ "eventType": "DELETE", "new": {}, "old": { "id": "404" } }).to_string(),
            json!({ "eventType": "TRUNCATE" }).to_string(),
            "not json".to_string(),
        ]
        .join("\n");

        let (engine, stats) = replay(seed, &events);

        assert_eq!(stats.seeded, 1);
        assert_eq!(stats.applied, 1);
        assert_eq!(stats.unchanged, 1);
        assert_eq!(stats.dropped, 2);
        assert_eq!(engine.len(), 2);
    }

    #[test]
    fn test_execute_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let seed = dir.path().join("seed.json");
        let events = dir.path().join("events.jsonl");
        std::fs::write(&seed, json!([row("1", "One")]).to_string()).unwrap();
        std::fs::write(
            &events,
            json!({ "eventType": "UPDATE", "new": row("1", "Uno"), "old": { "id": "1" } })
                .to_string(),
        )
        .unwrap();

        let args = ReplayArgs {
            seed,
            events,
            criteria: Default::default(),
        };
        assert!(execute(&Config::default(), args, true).is_ok());
    }

    #[test]
    fn test_missing_seed_file() {
        let args = ReplayArgs {
            seed: "/no/such/seed.json".into(),
            events: "/no/such/events.jsonl".into(),
            criteria: Default::default(),
        };
        let err = execute(&Config::default(), args, false).unwrap_err();
        assert!(err.to_string().contains("seed file"));
    }
}
