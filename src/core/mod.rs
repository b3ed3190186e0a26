// Core algorithm exports
pub mod error;
pub mod filters;
pub mod queue;
pub mod registry;
pub mod thread;

pub use error::{CoreError, CoreResult};
pub use filters::{
    apply_filters, matches_criteria, matches_interests, matches_location, matches_project_stage,
    matches_skills,
};
pub use queue::{DiscoveryQueue, QueueStatus};
pub use registry::{LikeOutcome, MatchRegistry};
pub use thread::{group_by_date, mark_read, send_message, sort_threads, unread_count, DateGroup};
