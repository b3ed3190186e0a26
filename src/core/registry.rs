use crate::core::error::{CoreError, CoreResult};
use crate::models::{Match, ParticipantPair};
use chrono::{DateTime, Utc};

/// Result of a like: the match for the pair and whether this call created it
#[derive(Debug, Clone, PartialEq)]
pub struct LikeOutcome {
    pub record: Match,
    pub created: bool,
}

/// Deduplicated set of matches, in creation order
///
/// Holds at most one match per unordered participant pair.
#[derive(Debug, Clone, Default)]
pub struct MatchRegistry {
    matches: Vec<Match>,
}

impl MatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `actor` likes `target`
    ///
    /// A single like is enough to form a match. Liking an existing pair in
    /// either direction returns the stored match untouched.
    pub fn like(
        &mut self,
        actor: &str,
        target: &str,
        now: DateTime<Utc>,
    ) -> CoreResult<LikeOutcome> {
        let users = ParticipantPair::new(actor, target).ok_or_else(|| {
            CoreError::validation(format!("participant {} cannot match with themselves", actor))
        })?;

        if let Some(existing) = self.find_pair(actor, target) {
            return Ok(LikeOutcome {
                record: existing.clone(),
                created: false,
            });
        }

        let record = Match {
            id: uuid::Uuid::new_v4().to_string(),
            users,
            created_at: now,
            messages: Vec::new(),
        };
        self.matches.push(record.clone());

        Ok(LikeOutcome {
            record,
            created: true,
        })
    }

    pub fn find_pair(&self, a: &str, b: &str) -> Option<&Match> {
        self.matches.iter().find(|m| m.users.same_as(a, b))
    }

    pub fn get(&self, match_id: &str) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == match_id)
    }

    pub(crate) fn get_mut(&mut self, match_id: &str) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == match_id)
    }

    /// Every match the participant belongs to, oldest first
    pub fn matches_for<'a>(&'a self, participant: &'a str) -> impl Iterator<Item = &'a Match> + 'a {
        self.matches
            .iter()
            .filter(move |m| m.users.contains(participant))
    }

    pub fn all(&self) -> &[Match] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
