use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Maturity of a project idea
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStage {
    Idea,
    Prototype,
    Mvp,
    Growth,
}

impl ProjectStage {
    pub const ALL: [ProjectStage; 4] = [
        ProjectStage::Idea,
        ProjectStage::Prototype,
        ProjectStage::Mvp,
        ProjectStage::Growth,
    ];
}

/// A startup idea attached to exactly one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectIdea {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub stage: ProjectStage,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// External profile links
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<String>,
}

/// Founder profile as seen by discovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
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

impl Profile {
    /// Stages of every project idea on this profile, in idea order
    pub fn stages(&self) -> impl Iterator<Item = ProjectStage> + '_ {
        self.project_ideas.iter().map(|idea| idea.stage)
    }
}

/// Registration payload: a profile without an assigned id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProfile {
    pub name: String,
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

impl NewProfile {
    pub fn into_profile(self, id: String) -> Profile {
        Profile {
            id,
            name: self.name,
            email: self.email,
            bio: self.bio,
            location: self.location,
            profile_picture: self.profile_picture,
            links: self.links,
            skills: dedup_preserving_order(self.skills),
            interests: dedup_preserving_order(self.interests),
            looking_for: dedup_preserving_order(self.looking_for),
            project_ideas: normalize_ideas(self.project_ideas),
        }
    }
}

/// Owner edit of a profile; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub links: Option<ProfileLinks>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub interests: Option<Vec<String>>,
    #[serde(default)]
    pub looking_for: Option<Vec<String>>,
    #[serde(default)]
    pub project_ideas: Option<Vec<ProjectIdea>>,
}

impl ProfilePatch {
    /// Produce the edited profile without touching the original
    pub fn applied_to(&self, profile: &Profile) -> Profile {
        let mut next = profile.clone();
        if let Some(name) = &self.name {
            next.name = name.clone();
        }
        if let Some(bio) = &self.bio {
            next.bio = bio.clone();
        }
        if let Some(location) = &self.location {
            next.location = location.clone();
        }
        if let Some(picture) = &self.profile_picture {
            next.profile_picture = picture.clone();
        }
        if let Some(links) = &self.links {
            next.links = links.clone();
        }
        if let Some(skills) = &self.skills {
            next.skills = dedup_preserving_order(skills.clone());
        }
        if let Some(interests) = &self.interests {
            next.interests = dedup_preserving_order(interests.clone());
        }
        if let Some(looking_for) = &self.looking_for {
            next.looking_for = dedup_preserving_order(looking_for.clone());
        }
        if let Some(ideas) = &self.project_ideas {
            next.project_ideas = normalize_ideas(ideas.clone());
        }
        next
    }
}

/// Active discovery filters for one browsing session
///
/// Categories combine with AND; values inside a category combine with OR.
/// An empty category places no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default)]
    pub skills: BTreeSet<String>,
    #[serde(default)]
    pub interests: BTreeSet<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub project_stage: BTreeSet<ProjectStage>,
}

impl FilterCriteria {
    /// Lowercased location needle exactly as typed; whitespace-only means inactive
    pub fn location_needle(&self) -> Option<String> {
        if self.location.trim().is_empty() {
            None
        } else {
            Some(self.location.to_lowercase())
        }
    }

    /// Number of active predicates, counted the way the filter badge shows them
    pub fn active_count(&self) -> usize {
        self.skills.len()
            + self.interests.len()
            + self.project_stage.len()
            + usize::from(self.location_needle().is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// New criteria with only the fields present in `patch` replaced
    pub fn merged(&self, patch: &FilterPatch) -> FilterCriteria {
        FilterCriteria {
            skills: patch.skills.clone().unwrap_or_else(|| self.skills.clone()),
            interests: patch
                .interests
                .clone()
                .unwrap_or_else(|| self.interests.clone()),
            location: patch
                .location
                .clone()
                .unwrap_or_else(|| self.location.clone()),
            project_stage: patch
                .project_stage
                .clone()
                .unwrap_or_else(|| self.project_stage.clone()),
        }
    }
}

/// Partial criteria update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPatch {
    #[serde(default)]
    pub skills: Option<BTreeSet<String>>,
    #[serde(default)]
    pub interests: Option<BTreeSet<String>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub project_stage: Option<BTreeSet<ProjectStage>>,
}

/// Unordered pair of two distinct participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantPair([String; 2]);

impl ParticipantPair {
    /// Returns `None` when both sides name the same participant
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Option<Self> {
        let (first, second) = (first.into(), second.into());
        if first == second {
            return None;
        }
        Some(Self([first, second]))
    }

    pub fn contains(&self, participant: &str) -> bool {
        self.0.iter().any(|p| p == participant)
    }

    /// True when both pairs name the same two participants in any order
    pub fn same_as(&self, a: &str, b: &str) -> bool {
        (self.0[0] == a && self.0[1] == b) || (self.0[0] == b && self.0[1] == a)
    }

    pub fn other(&self, participant: &str) -> Option<&str> {
        if self.0[0] == participant {
            Some(&self.0[1])
        } else if self.0[1] == participant {
            Some(&self.0[0])
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[String; 2] {
        &self.0
    }
}

/// A connection between two participants and its message thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub users: ParticipantPair,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<Message>,
}

impl Match {
    pub fn other_participant(&self, viewer: &str) -> Option<&str> {
        self.users.other(viewer)
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// One chat message inside a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

/// Swipe decision on the current candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Like,
    Pass,
}

fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::with_capacity(values.len());
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

fn normalize_ideas(ideas: Vec<ProjectIdea>) -> Vec<ProjectIdea> {
    ideas
        .into_iter()
        .map(|mut idea| {
            if idea.id.trim().is_empty() {
                idea.id = uuid::Uuid::new_v4().to_string();
            }
            idea.tags = dedup_preserving_order(idea.tags);
            idea
        })
        .collect()
}
