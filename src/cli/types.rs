//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::models::{
    AgentCategory, AgentPatch, AgentStatus, CategoryFilter, NewAgent, SortKey, StatusFilter,
    ViewConfig, ViewCriteria,
};

#[derive(Parser, Debug)]
#[command(name = "agentdeck")]
#[command(about = "Agentdeck - browse and edit agent profiles kept in sync with their store", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .agentdeck/config.yaml and local.yaml)
    #[arg(short, long, global = true, env = "AGENTDECK_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List agents from the configured store
    List(ListArgs),

    /// Show a single agent
    Show {
        /// Agent ID
        id: String,
    },

    /// Create an agent from scratch or from a template
    Create(CreateArgs),

    /// Update fields of an existing agent
    Update(UpdateArgs),

    /// Delete an agent
    Delete {
        /// Agent ID
        id: String,
    },

    /// List the built-in agent templates
    Templates,

    /// Apply recorded change notifications to a seed list and print the result
    Replay(ReplayArgs),
}

/// Search, filter and sort options shared by `list` and `replay`.
#[derive(Args, Debug, Clone, Default)]
pub struct CriteriaArgs {
    /// Case-insensitive search over name, description and tags
    #[arg(short, long)]
    pub search: Option<String>,

    /// Status filter (all, active, draft, archived)
    #[arg(long)]
    pub status: Option<StatusFilter>,

    /// Category filter (all or a category slug)
    #[arg(long)]
    pub category: Option<CategoryFilter>,

    /// Sort order (recent, name, category)
    #[arg(long)]
    pub sort: Option<SortKey>,
}

impl CriteriaArgs {
    /// Flags on top of the configured view defaults.
    pub fn to_criteria(&self, defaults: &ViewConfig) -> ViewCriteria {
        ViewCriteria {
            search_text: self.search.clone().unwrap_or_default(),
            status_filter: self.status.unwrap_or(defaults.status),
            category_filter: self.category.unwrap_or_default(),
            sort_key: self.sort.unwrap_or(defaults.sort),
        }
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub criteria: CriteriaArgs,

    /// Keep running and print changes as they arrive
    #[arg(short, long)]
    pub watch: bool,
}

/// Editable agent fields shared by `create` and `update`.
#[derive(Args, Debug, Clone, Default)]
pub struct AgentFieldArgs {
    #[arg(short, long)]
    pub description: Option<String>,

    /// Role and purpose given to the agent
    #[arg(long)]
    pub context: Option<String>,

    /// How the agent should behave
    #[arg(long)]
    pub instructions: Option<String>,

    /// What the agent should know
    #[arg(long)]
    pub knowledge: Option<String>,

    #[arg(long)]
    pub category: Option<AgentCategory>,

    #[arg(long)]
    pub status: Option<AgentStatus>,

    /// Tags (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,

    #[arg(long)]
    pub icon: Option<String>,

    #[arg(long)]
    pub color: Option<String>,
}

impl AgentFieldArgs {
    /// Overwrite the given fields of `fields`.
    pub fn apply_to_new(&self, fields: &mut NewAgent) {
        if let Some(description) = &self.description {
            fields.description.clone_from(description);
        }
        if let Some(context) = &self.context {
            fields.context.clone_from(context);
        }
        if let Some(instructions) = &self.instructions {
            fields.instructions.clone_from(instructions);
        }
        if let Some(knowledge) = &self.knowledge {
            fields.knowledge.clone_from(knowledge);
        }
        if self.category.is_some() {
            fields.category = self.category;
        }
        if self.status.is_some() {
            fields.status = self.status;
        }
        if !self.tags.is_empty() {
            fields.tags.clone_from(&self.tags);
        }
        if self.icon.is_some() {
            fields.icon.clone_from(&self.icon);
        }
        if self.color.is_some() {
            fields.color.clone_from(&self.color);
        }
    }

    pub fn to_patch(&self, name: Option<String>) -> AgentPatch {
        AgentPatch {
            name,
            description: self.description.clone(),
            context: self.context.clone(),
            instructions: self.instructions.clone(),
            knowledge: self.knowledge.clone(),
            category: self.category.map(Some),
            status: self.status.map(Some),
            tags: (!self.tags.is_empty()).then(|| self.tags.clone()),
            icon: self.icon.clone().map(Some),
            color: self.color.clone().map(Some),
        }
    }
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Agent name (defaults to the template's name)
    #[arg(short, long, required_unless_present = "template")]
    pub name: Option<String>,

    /// Start from a built-in template (see `agentdeck templates`)
    #[arg(long)]
    pub template: Option<String>,

    #[command(flatten)]
    pub fields: AgentFieldArgs,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Agent ID
    pub id: String,

    /// New name
    #[arg(short, long)]
    pub name: Option<String>,

    #[command(flatten)]
    pub fields: AgentFieldArgs,

    /// Reset optional fields to unset (comma-separated)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub clear: Vec<ClearField>,
}

impl UpdateArgs {
    /// Patch carrying the given fields, with cleared fields sent as null.
    pub fn to_patch(&self) -> AgentPatch {
        let mut patch = self.fields.to_patch(self.name.clone());
        for field in &self.clear {
            match field {
                ClearField::Category => patch.category = Some(None),
                ClearField::Status => patch.status = Some(None),
                ClearField::Icon => patch.icon = Some(None),
                ClearField::Color => patch.color = Some(None),
            }
        }
        patch
    }
}

/// Optional agent fields that `update --clear` can reset.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearField {
    Category,
    Status,
    Icon,
    Color,
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// JSON file holding an array of agent rows
    #[arg(long)]
    pub seed: PathBuf,

    /// JSON-lines file of raw change notifications, one per line
    #[arg(long)]
    pub events: PathBuf,

    #[command(flatten)]
    pub criteria: CriteriaArgs,
}
