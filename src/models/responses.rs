use crate::core::DateGroup;
use crate::models::domain::{Message, Profile, ProfileLinks, ProjectIdea};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub profiles: usize,
    pub matches: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Profile as other founders see it: everything but the contact email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: String,
    pub name: String,
    pub bio: String,
    pub location: String,
    pub profile_picture: String,
    pub links: ProfileLinks,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub looking_for: Vec<String>,
    pub project_ideas: Vec<ProjectIdea>,
}

impl From<&Profile> for PublicProfile {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.name.clone(),
            bio: profile.bio.clone(),
            location: profile.location.clone(),
            profile_picture: profile.profile_picture.clone(),
            links: profile.links.clone(),
            skills: profile.skills.clone(),
            interests: profile.interests.clone(),
            looking_for: profile.looking_for.clone(),
            project_ideas: profile.project_ideas.clone(),
        }
    }
}

/// Messages of one day, labelled for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateGroupResponse {
    pub date: NaiveDate,
    pub label: String,
    pub messages: Vec<Message>,
}

impl DateGroupResponse {
    /// Label the group "Today" when it falls on `today`, otherwise its ISO date
    pub fn labelled(group: DateGroup, today: NaiveDate) -> Self {
        let label = if group.date == today {
            "Today".to_string()
        } else {
            group.date.to_string()
        };
        Self {
            date: group.date,
            label,
            messages: group.messages,
        }
    }
}

/// Send message response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub sent: bool,
    pub message: Option<Message>,
}

/// Mark read response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadResponse {
    pub marked_read: usize,
}
