//! Services: the client-side agent list pipeline.
//!
//! Raw notifications flow through the normalizer into the merge engine,
//! and the projector derives what a view displays.

pub mod agent_list_view;
pub mod change_normalizer;
pub mod list_merge;
pub mod view_projector;

pub use agent_list_view::AgentListView;
pub use change_normalizer::{normalize, normalize_or_drop, MalformedEvent};
pub use list_merge::{AgentListEngine, ApplyOutcome};
pub use view_projector::{locale_compare, project};
