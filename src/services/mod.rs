// Service exports
pub mod seed;
pub mod store;

pub use seed::{load_seed_profiles, parse_seed_profiles, SeedError};
pub use store::{
    BrowseSession, BrowseView, Clock, ManualClock, Store, StoreState, SwipeOutcome, SystemClock,
    ThreadSummary,
};
