use crate::models::{FilterCriteria, Profile};
use std::borrow::Borrow;
use std::collections::BTreeSet;

/// True when `values` shares at least one entry with `wanted`, or `wanted` is empty
#[inline]
fn intersects_or_unconstrained(values: &[String], wanted: &BTreeSet<String>) -> bool {
    wanted.is_empty() || values.iter().any(|value| wanted.contains(value))
}

/// Check the skills category (ANY match)
#[inline]
pub fn matches_skills(profile: &Profile, criteria: &FilterCriteria) -> bool {
    intersects_or_unconstrained(&profile.skills, &criteria.skills)
}

/// Check the interests category (ANY match)
#[inline]
pub fn matches_interests(profile: &Profile, criteria: &FilterCriteria) -> bool {
    intersects_or_unconstrained(&profile.interests, &criteria.interests)
}

/// Check the location category (case-insensitive substring)
#[inline]
pub fn matches_location(profile: &Profile, criteria: &FilterCriteria) -> bool {
    match criteria.location_needle() {
        Some(needle) => profile.location.to_lowercase().contains(&needle),
        None => true,
    }
}

/// Check the project stage category: any idea at any requested stage
#[inline]
pub fn matches_project_stage(profile: &Profile, criteria: &FilterCriteria) -> bool {
    criteria.project_stage.is_empty()
        || profile
            .stages()
            .any(|stage| criteria.project_stage.contains(&stage))
}

/// Check a profile against every active category
#[inline]
pub fn matches_criteria(profile: &Profile, criteria: &FilterCriteria) -> bool {
    matches_skills(profile, criteria)
        && matches_interests(profile, criteria)
        && matches_location(profile, criteria)
        && matches_project_stage(profile, criteria)
}

/// Filter a candidate pool
///
/// Drops the viewer's own profile when `exclude_id` is set and keeps the
/// relative order of everything that passes. Works over owned profiles or
/// shared handles such as `Arc<Profile>`.
pub fn apply_filters<P>(pool: &[P], criteria: &FilterCriteria, exclude_id: Option<&str>) -> Vec<P>
where
    P: Borrow<Profile> + Clone,
{
    pool.iter()
        .filter(|candidate| {
            let profile = Borrow::<Profile>::borrow(*candidate);
            exclude_id != Some(profile.id.as_str()) && matches_criteria(profile, criteria)
        })
        .cloned()
        .collect()
}
