use crate::models::domain::{Decision, FilterPatch, NewProfile, ProfileLinks, ProjectIdea};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to register a founder profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub profile_picture: String,
    #[serde(default)]
    pub links: ProfileLinks,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub looking_for: Vec<String>,
    #[serde(default)]
    pub project_ideas: Vec<ProjectIdea>,
}

impl From<RegisterRequest> for NewProfile {
    fn from(req: RegisterRequest) -> Self {
        NewProfile {
            name: req.name,
            email: req.email,
            bio: req.bio,
            location: req.location,
            profile_picture: req.profile_picture,
            links: req.links,
            skills: req.skills,
            interests: req.interests,
            looking_for: req.looking_for,
            project_ideas: req.project_ideas,
        }
    }
}

/// Viewer identity passed in the query string
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ViewerQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}

/// Partial filter update for a viewer's browsing session
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FilterUpdateRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[serde(flatten)]
    pub patch: FilterPatch,
}

/// Swipe on the current candidate
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SwipeRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    pub decision: String,
}

impl SwipeRequest {
    pub fn decision(&self) -> Option<Decision> {
        match self.decision.to_lowercase().as_str() {
            "like" => Some(Decision::Like),
            "pass" => Some(Decision::Pass),
            _ => None,
        }
    }
}

/// Append a message to a match
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub text: String,
}

/// Mark the viewer's received messages in a match as read
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MarkReadRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}
