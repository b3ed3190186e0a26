use crate::models::NewProfile;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading seed profiles
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid profile at index {index}: {reason}")]
    InvalidProfile { index: usize, reason: String },
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    profiles: Vec<NewProfile>,
}

/// Parse seed profiles from TOML text
///
/// Expects `[[profiles]]` tables using the same camelCase keys as the API.
pub fn parse_seed_profiles(source: &str) -> Result<Vec<NewProfile>, SeedError> {
    let file: SeedFile = toml::from_str(source)?;

    for (index, profile) in file.profiles.iter().enumerate() {
        if profile.name.trim().is_empty() {
            return Err(SeedError::InvalidProfile {
                index,
                reason: "missing name".to_string(),
            });
        }
        if profile.email.trim().is_empty() {
            return Err(SeedError::InvalidProfile {
                index,
                reason: "missing email".to_string(),
            });
        }
    }

    Ok(file.profiles)
}

/// Load seed profiles from a file
pub fn load_seed_profiles<P: AsRef<Path>>(path: P) -> Result<Vec<NewProfile>, SeedError> {
    let source = std::fs::read_to_string(path.as_ref())?;
    let profiles = parse_seed_profiles(&source)?;
    tracing::info!(
        "Loaded {} seed profiles from {}",
        profiles.len(),
        path.as_ref().display()
    );
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectStage;

    #[test]
    fn test_parse_seed_profiles() {
        let source = r#"
            [[profiles]]
            name = "Alex Johnson"
            email = "alex@example.com"
            location = "San Francisco, CA"
            skills = ["JavaScript", "React"]
            lookingFor = ["Technical Co-founder"]

            [profiles.links]
            github = "https://github.com/alexj"

            [[profiles.projectIdeas]]
            id = "101"
            title = "AI-Powered Task Manager"
            stage = "prototype"
            tags = ["AI"]
        "#;

        let profiles = parse_seed_profiles(source).unwrap();

        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].looking_for, vec!["Technical Co-founder"]);
        assert_eq!(profiles[0].project_ideas[0].stage, ProjectStage::Prototype);
        assert_eq!(
            profiles[0].links.github.as_deref(),
            Some("https://github.com/alexj")
        );
    }

    #[test]
    fn test_seed_requires_email() {
        let source = r#"
            [[profiles]]
            name = "No Email"
            email = ""
        "#;

        let err = parse_seed_profiles(source).unwrap_err();
        assert!(matches!(err, SeedError::InvalidProfile { index: 0, .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = load_seed_profiles("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, SeedError::Io(_)));
    }
}
