//! Domain models for agent records, change events and view criteria.

pub mod agent;
pub mod agent_template;
pub mod change;
pub mod config;
pub mod criteria;

pub use agent::{AgentCategory, AgentId, AgentPatch, AgentRecord, AgentStatus, NewAgent};
pub use agent_template::{builtin_templates, find_template, parse_templates, AgentTemplate};
pub use change::{ChangeEvent, RawNotification};
pub use config::{Config, LoggingConfig, StoreConfig, ViewConfig};
pub use criteria::{CategoryFilter, SortKey, StatusFilter, ViewCriteria};
