//! StackUp Match - discovery, matching and messaging core for the StackUp co-founder app
//!
//! This library provides the filter engine, the swipe queue, the match
//! registry and the message thread model, plus an in-memory store and HTTP
//! routes that expose them.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    apply_filters, sort_threads, CoreError, CoreResult, DiscoveryQueue, MatchRegistry,
};
pub use models::{FilterCriteria, FilterPatch, Match, Message, NewProfile, Profile, ProjectStage};
pub use services::Store;
