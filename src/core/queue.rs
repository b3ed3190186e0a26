use crate::models::Profile;
use serde::Serialize;
use std::sync::Arc;

/// Observable state of a discovery queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueStatus {
    /// The filter produced no candidates at all
    Empty,
    /// Every candidate has been swiped
    Exhausted,
    /// A candidate is waiting at the cursor
    Active,
}

/// Filtered candidates plus a swipe cursor
///
/// The cursor never goes past `len()`; `cursor == len()` means exhausted.
/// Candidates are shared with the profile pool, so cloning a queue is cheap.
#[derive(Debug, Clone)]
pub struct DiscoveryQueue {
    candidates: Arc<[Arc<Profile>]>,
    cursor: usize,
}

impl Default for DiscoveryQueue {
    fn default() -> Self {
        Self::new(Vec::<Arc<Profile>>::new())
    }
}

impl DiscoveryQueue {
    pub fn new<P: Into<Arc<Profile>>>(candidates: impl IntoIterator<Item = P>) -> Self {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
            cursor: 0,
        }
    }

    /// Replace the candidates and rewind to the start
    pub fn reset<P: Into<Arc<Profile>>>(&mut self, candidates: impl IntoIterator<Item = P>) {
        *self = Self::new(candidates);
    }

    pub fn current(&self) -> Option<&Profile> {
        self.candidates.get(self.cursor).map(Arc::as_ref)
    }

    /// Move past the current candidate; a no-op once exhausted
    pub fn advance(&mut self) {
        if self.cursor < self.candidates.len() {
            self.cursor += 1;
        }
    }

    /// Up to `n` candidates starting at the cursor
    pub fn upcoming(&self, n: usize) -> &[Arc<Profile>] {
        let end = self.cursor.saturating_add(n).min(self.candidates.len());
        &self.candidates[self.cursor..end]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        !self.candidates.is_empty() && self.cursor >= self.candidates.len()
    }

    pub fn remaining(&self) -> usize {
        self.candidates.len() - self.cursor
    }

    pub fn status(&self) -> QueueStatus {
        if self.is_empty() {
            QueueStatus::Empty
        } else if self.is_exhausted() {
            QueueStatus::Exhausted
        } else {
            QueueStatus::Active
        }
    }
}
