//! Starter templates offered when creating a new agent.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::agent::{AgentCategory, AgentStatus, NewAgent};

const BUILTIN_TEMPLATES_YAML: &str = include_str!("agent_templates.yaml");

/// Pre-filled agent definition a user can start from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub category: AgentCategory,
    pub context: String,
    pub instructions: String,
    #[serde(default)]
    pub knowledge: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl AgentTemplate {
    /// Create fields for a new draft agent based on this template.
    pub fn to_new_agent(&self) -> NewAgent {
        NewAgent {
            name: self.name.clone(),
            description: self.description.clone(),
            context: self.context.clone(),
            instructions: self.instructions.clone(),
            knowledge: self.knowledge.clone(),
            category: Some(self.category),
            status: Some(AgentStatus::Draft),
            tags: self.tags.clone(),
            icon: Some(self.icon.clone()),
            color: Some(self.color.clone()),
        }
    }
}

/// Parse a template catalog from YAML.
pub fn parse_templates(yaml: &str) -> Result<Vec<AgentTemplate>> {
    serde_yaml::from_str(yaml).context("Failed to parse agent templates")
}

/// Built-in template catalog, parsed once.
pub fn builtin_templates() -> &'static [AgentTemplate] {
    static TEMPLATES: OnceLock<Vec<AgentTemplate>> = OnceLock::new();
    TEMPLATES.get_or_init(|| {
        parse_templates(BUILTIN_TEMPLATES_YAML).unwrap_or_else(|e| {
            tracing::error!(error = %e, "built-in agent templates are invalid");
            Vec::new()
        })
    })
}

pub fn find_template(id: &str) -> Option<&'static AgentTemplate> {
    builtin_templates().iter().find(|t| t.id == id)
}
