//! View criteria: search, filters and sort order applied to the agent list.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::agent::{AgentCategory, AgentStatus};

/// Status filter: everything, or a single status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(AgentStatus),
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => status.fmt(f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        Ok(Self::Only(s.parse()?))
    }
}

/// Category filter: everything, or a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(AgentCategory),
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(category) => category.fmt(f),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        Ok(Self::Only(s.parse()?))
    }
}

/// Sort order for the projected list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SortKey {
    /// Newest `updated_at` first
    #[default]
    MostRecentFirst,
    /// Name, A to Z
    NameAscending,
    /// Category slug, A to Z, uncategorized first
    CategoryAscending,
}

impl SortKey {
    pub const ALL: [Self; 3] = [
        Self::MostRecentFirst,
        Self::NameAscending,
        Self::CategoryAscending,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::MostRecentFirst => "Most Recent",
            Self::NameAscending => "Name (A-Z)",
            Self::CategoryAscending => "Category",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MostRecentFirst => f.write_str("recent"),
            Self::NameAscending => f.write_str("name"),
            Self::CategoryAscending => f.write_str("category"),
        }
    }
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recent" | "most_recent_first" => Ok(Self::MostRecentFirst),
            "name" | "name_ascending" => Ok(Self::NameAscending),
            "category" | "category_ascending" => Ok(Self::CategoryAscending),
            _ => Err(anyhow::anyhow!(
                "Invalid sort key: {s}. Must be one of: recent, name, category"
            )),
        }
    }
}

/// Criteria values travel as their CLI/config spelling (`all`, `draft`, `recent`).
macro_rules! string_serde {
    ($ty:ty) => {
        impl TryFrom<String> for $ty {
            type Error = anyhow::Error;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.to_string()
            }
        }
    };
}

string_serde!(StatusFilter);
string_serde!(CategoryFilter);
string_serde!(SortKey);

/// Complete set of inputs the projector applies on top of the record list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewCriteria {
    #[serde(default)]
    pub search_text: String,
    #[serde(default)]
    pub status_filter: StatusFilter,
    #[serde(default)]
    pub category_filter: CategoryFilter,
    #[serde(default)]
    pub sort_key: SortKey,
}

impl ViewCriteria {
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub const fn with_status(mut self, filter: StatusFilter) -> Self {
        self.status_filter = filter;
        self
    }

    pub const fn with_category(mut self, filter: CategoryFilter) -> Self {
        self.category_filter = filter;
        self
    }

    pub const fn with_sort(mut self, key: SortKey) -> Self {
        self.sort_key = key;
        self
    }

    /// Whether any filter is narrowing the list.
    pub fn is_filtering(&self) -> bool {
        !self.search_text.trim().is_empty()
            || self.status_filter != StatusFilter::All
            || self.category_filter != CategoryFilter::All
    }
}
