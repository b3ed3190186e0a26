// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Decision, FilterCriteria, FilterPatch, Match, Message, NewProfile, ParticipantPair, Profile,
    ProfileLinks, ProfilePatch, ProjectIdea, ProjectStage,
};
pub use requests::{
    FilterUpdateRequest, MarkReadRequest, RegisterRequest, SendMessageRequest, SwipeRequest,
    ViewerQuery,
};
pub use responses::{
    DateGroupResponse, ErrorResponse, HealthResponse, MarkReadResponse, PublicProfile,
    SendMessageResponse,
};
