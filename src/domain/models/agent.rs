use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::{DomainError, DomainResult};

/// Opaque agent identifier assigned by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AgentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AgentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Agent category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentCategory {
    CustomerSupport,
    Sales,
    Content,
    Analysis,
    Development,
    General,
}

impl AgentCategory {
    pub const ALL: [Self; 6] = [
        Self::CustomerSupport,
        Self::Sales,
        Self::Content,
        Self::Analysis,
        Self::Development,
        Self::General,
    ];

    /// Wire slug, also the sort key for category ordering.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CustomerSupport => "customer-support",
            Self::Sales => "sales",
            Self::Content => "content",
            Self::Analysis => "analysis",
            Self::Development => "development",
            Self::General => "general",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::CustomerSupport => "Customer Support",
            Self::Sales => "Sales",
            Self::Content => "Content",
            Self::Analysis => "Analysis",
            Self::Development => "Development",
            Self::General => "General",
        }
    }

    /// Accent colour used when rendering agents of this category.
    pub const fn color(self) -> &'static str {
        match self {
            Self::CustomerSupport => "#5856D6",
            Self::Sales => "#34C759",
            Self::Content => "#FF9500",
            Self::Analysis => "#007AFF",
            Self::Development => "#AF52DE",
            Self::General => "#FF2D55",
        }
    }
}

impl fmt::Display for AgentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| anyhow::anyhow!("Invalid agent category: {s}"))
    }
}

/// Agent status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Active,
    Draft,
    Archived,
}

impl AgentStatus {
    pub const ALL: [Self; 3] = [Self::Active, Self::Draft, Self::Archived];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Draft => "draft",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "draft" => Ok(Self::Draft),
            "archived" => Ok(Self::Archived),
            _ => Err(anyhow::anyhow!("Invalid agent status: {s}")),
        }
    }
}

/// Backends send `null` for empty text and tag columns.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Empty or unrecognised enum values read as absent instead of failing the row.
fn lenient_enum<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let parsed = raw.parse().ok();
    if parsed.is_none() && !raw.trim().is_empty() {
        tracing::debug!(value = %raw, "unrecognised enum value, treating as absent");
    }
    Ok(parsed)
}

/// Distinguishes a missing key (`None`) from an explicit `null` (`Some(None)`).
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Agent profile record as stored by the record store.
///
/// Serialized in the backend's row shape (snake_case columns).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    /// Store-assigned identifier, immutable after creation
    pub id: AgentId,

    /// Display name
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    /// Role and purpose given to the agent
    #[serde(default, deserialize_with = "null_as_default")]
    pub context: String,

    /// How the agent should behave
    #[serde(default, deserialize_with = "null_as_default")]
    pub instructions: String,

    /// What the agent should know
    #[serde(default, deserialize_with = "null_as_default")]
    pub knowledge: String,

    /// Unknown or empty slugs read as absent
    #[serde(default, deserialize_with = "lenient_enum")]
    pub category: Option<AgentCategory>,

    #[serde(default, deserialize_with = "lenient_enum")]
    pub status: Option<AgentStatus>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,

    #[serde(default)]
    pub icon: Option<String>,

    #[serde(default)]
    pub color: Option<String>,

    pub created_at: DateTime<Utc>,

    /// Refreshed by the store on every successful update
    pub updated_at: DateTime<Utc>,
}

impl AgentRecord {
    /// Status used for display and filtering; absent means draft.
    pub fn effective_status(&self) -> AgentStatus {
        self.status.unwrap_or(AgentStatus::Draft)
    }

    /// Category used for display; absent means general.
    pub fn effective_category(&self) -> AgentCategory {
        self.category.unwrap_or(AgentCategory::General)
    }
}

/// Fields supplied when creating an agent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewAgent {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub knowledge: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<AgentCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AgentStatus>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NewAgent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "agent name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partial update: `None` leaves a field untouched, `Some` replaces it.
///
/// `Some(String::new())` is a deliberate clear and is sent as such. The
/// nullable columns take `Some(None)` to reset them to absent, sent as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AgentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "explicit_null"
    )]
    pub category: Option<Option<AgentCategory>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "explicit_null"
    )]
    pub status: Option<Option<AgentStatus>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "explicit_null"
    )]
    pub icon: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "explicit_null"
    )]
    pub color: Option<Option<String>>,
}

impl AgentPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(DomainError::ValidationFailed(
                    "agent name cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Copy every present field onto `record`. Timestamps are left alone.
    pub fn apply_to(&self, record: &mut AgentRecord) {
        if let Some(name) = &self.name {
            record.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            record.description.clone_from(description);
        }
        if let Some(context) = &self.context {
            record.context.clone_from(context);
        }
        if let Some(instructions) = &self.instructions {
            record.instructions.clone_from(instructions);
        }
        if let Some(knowledge) = &self.knowledge {
            record.knowledge.clone_from(knowledge);
        }
        if let Some(category) = self.category {
            record.category = category;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(tags) = &self.tags {
            record.tags.clone_from(tags);
        }
        if let Some(icon) = &self.icon {
            record.icon.clone_from(icon);
        }
        if let Some(color) = &self.color {
            record.color.clone_from(color);
        }
    }
}
