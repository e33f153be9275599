//! Agent CLI commands: list, show, create, update, delete.

use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;

use crate::cli::output::{colorize_status, list_table, output, render_list, truncate, CommandOutput};
use crate::cli::types::{CreateArgs, ListArgs, UpdateArgs};
use crate::domain::models::{
    find_template, AgentId, AgentRecord, ChangeEvent, Config, NewAgent, ViewCriteria,
};
use crate::domain::ports::RecordStore;
use crate::services::AgentListView;

#[derive(Debug, Serialize)]
pub struct AgentListOutput {
    pub agents: Vec<AgentRecord>,
    pub total: usize,
}

impl AgentListOutput {
    pub fn new(agents: &[AgentRecord]) -> Self {
        Self {
            agents: agents.to_vec(),
            total: agents.len(),
        }
    }
}

impl CommandOutput for AgentListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "name", "category", "status", "tags", "updated"]);
        for agent in &self.agents {
            table.add_row(vec![
                truncate(agent.id.as_str(), 8),
                truncate(&agent.name, 30),
                agent.effective_category().display_name().to_string(),
                colorize_status(agent.effective_status()).to_string(),
                truncate(&agent.tags.join(", "), 30),
                agent.updated_at.format("%Y-%m-%d %H:%M").to_string(),
            ]);
        }
        render_list("agent", &table, self.total)
    }
}

#[derive(Debug, Serialize)]
pub struct AgentDetailOutput {
    pub agent: AgentRecord,
}

impl CommandOutput for AgentDetailOutput {
    fn to_human(&self) -> String {
        let agent = &self.agent;
        let mut lines = vec![
            format!("Agent: {}", agent.name),
            format!("ID: {}", agent.id),
            format!("Category: {}", agent.effective_category().display_name()),
            format!("Status: {}", colorize_status(agent.effective_status())),
            format!("Created: {}", agent.created_at.to_rfc3339()),
            format!("Updated: {}", agent.updated_at.to_rfc3339()),
        ];

        if !agent.tags.is_empty() {
            lines.push(format!("Tags: {}", agent.tags.join(", ")));
        }
        for (label, text) in [
            ("Description", &agent.description),
            ("Context", &agent.context),
            ("Instructions", &agent.instructions),
            ("Knowledge", &agent.knowledge),
        ] {
            if !text.is_empty() {
                lines.push(format!("\n{label}:\n{text}"));
            }
        }

        lines.join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct AgentActionOutput {
    pub success: bool,
    pub message: String,
    pub agent: Option<AgentRecord>,
}

impl CommandOutput for AgentActionOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }
}

/// One change printed by `list --watch`.
#[derive(Debug, Serialize)]
pub struct ChangeOutput {
    pub kind: &'static str,
    pub id: String,
    pub name: Option<String>,
    pub visible: usize,
}

impl ChangeOutput {
    fn new(event: &ChangeEvent, visible: usize) -> Self {
        let name = match event {
            ChangeEvent::Inserted(r) | ChangeEvent::Updated(r) => Some(r.name.clone()),
            ChangeEvent::Deleted(_) => None,
        };
        Self {
            kind: event.kind(),
            id: event.agent_id().to_string(),
            name,
            visible,
        }
    }
}

impl CommandOutput for ChangeOutput {
    fn to_human(&self) -> String {
        match &self.name {
            Some(name) => format!("{} {} ({}), {} visible", self.kind, name, self.id, self.visible),
            None => format!("{} {}, {} visible", self.kind, self.id, self.visible),
        }
    }
}

pub async fn list(
    store: Arc<dyn RecordStore>,
    config: &Config,
    args: ListArgs,
    json_mode: bool,
) -> Result<()> {
    let criteria = args.criteria.to_criteria(&config.view);
    let mut view = if args.watch {
        AgentListView::open(store, criteria)
            .await
            .context("Failed to subscribe to agent changes")?
    } else {
        let mut view = AgentListView::new(store, criteria);
        view.reload().await;
        view
    };

    output(&AgentListOutput::new(&view.projection()), json_mode);

    if !args.watch {
        return Ok(());
    }

    loop {
        tokio::select! {
            change = view.next_change() => {
                let Some(event) = change else {
                    tracing::info!("change feed ended");
                    break;
                };
                output(&ChangeOutput::new(&event, view.projection().len()), json_mode);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    view.detach();
    Ok(())
}

pub async fn show(store: Arc<dyn RecordStore>, id: String, json_mode: bool) -> Result<()> {
    let id = AgentId::from(id);
    let agent = store
        .fetch_by_id(&id)
        .await
        .with_context(|| format!("Failed to load agent {id}"))?
        .ok_or_else(|| anyhow::anyhow!("Agent not found: {id}"))?;

    output(&AgentDetailOutput { agent }, json_mode);
    Ok(())
}

pub async fn create(
    store: Arc<dyn RecordStore>,
    args: CreateArgs,
    json_mode: bool,
) -> Result<()> {
    let mut fields = match &args.template {
        Some(id) => find_template(id)
            .ok_or_else(|| anyhow::anyhow!("Unknown template: {id}. Run 'agentdeck templates'"))?
            .to_new_agent(),
        None => NewAgent::default(),
    };
    if let Some(name) = args.name {
        fields.name = name;
    }
    args.fields.apply_to_new(&mut fields);

    let view = AgentListView::new(store, ViewCriteria::default());
    let agent = view.create(&fields).await?;

    let out = AgentActionOutput {
        success: true,
        message: format!("Agent created: {} ({})", agent.name, agent.id),
        agent: Some(agent),
    };
    output(&out, json_mode);
    Ok(())
}

pub async fn update(
    store: Arc<dyn RecordStore>,
    args: UpdateArgs,
    json_mode: bool,
) -> Result<()> {
    let patch = args.to_patch();
    if patch.is_empty() {
        anyhow::bail!("Nothing to update: pass at least one field");
    }

    let id = AgentId::from(args.id);
    let view = AgentListView::new(store, ViewCriteria::default());
    let agent = view.update(&id, &patch).await?;

    let out = AgentActionOutput {
        success: true,
        message: format!("Agent updated: {} ({})", agent.name, agent.id),
        agent: Some(agent),
    };
    output(&out, json_mode);
    Ok(())
}

pub async fn delete(store: Arc<dyn RecordStore>, id: String, json_mode: bool) -> Result<()> {
    let id = AgentId::from(id);
    let view = AgentListView::new(store, ViewCriteria::default());
    view.delete(&id).await?;

    let out = AgentActionOutput {
        success: true,
        message: format!("Agent deleted: {id}"),
        agent: None,
    };
    output(&out, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(name: &str) -> AgentRecord {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        AgentRecord {
            id: AgentId::from("0f8fad5b-d9cb-469f-a165-70867728950e"),
            name: name.to_string(),
            description: "Answers billing questions".to_string(),
            context: String::new(),
            instructions: String::new(),
            knowledge: String::new(),
            category: None,
            status: None,
            tags: vec!["billing".to_string()],
            icon: None,
            color: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_list_output_human() {
        let out = AgentListOutput::new(&[record("Billing Bot")]);
        let human = out.to_human();
        assert!(human.contains("Billing Bot"));
        assert!(human.contains("0f8fa..."));
        assert!(human.contains("General"));
    }

    #[test]
    fn test_list_output_json() {
        let out = AgentListOutput::new(&[record("Billing Bot")]);
        let json = out.to_json();
        assert_eq!(json["total"], 1);
        assert_eq!(json["agents"][0]["name"], "Billing Bot");
    }

    #[test]
    fn test_detail_output_skips_empty_sections() {
        let human = AgentDetailOutput {
            agent: record("Billing Bot"),
        }
        .to_human();
        assert!(human.contains("Description:"));
        assert!(!human.contains("Knowledge:"));
    }

    #[test]
    fn test_change_output() {
        let deleted = ChangeOutput::new(&ChangeEvent::Deleted(AgentId::from("a1")), 3);
        assert_eq!(deleted.to_human(), "deleted a1, 3 visible");
    }
}
