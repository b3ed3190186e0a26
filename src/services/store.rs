use crate::core::{
    apply_filters, group_by_date, mark_read, send_message, sort_threads, unread_count, CoreError,
    CoreResult, DateGroup, DiscoveryQueue, LikeOutcome, MatchRegistry, QueueStatus,
};
use crate::models::{
    Decision, FilterCriteria, FilterPatch, Match, Message, NewProfile, Profile, ProfilePatch,
    PublicProfile,
};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Source of "now" for match and message timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One viewer's filters and swipe position
#[derive(Debug, Clone, Default)]
pub struct BrowseSession {
    pub criteria: FilterCriteria,
    pub queue: DiscoveryQueue,
}

/// Immutable snapshot of everything the service knows
///
/// Each part sits behind its own `Arc`; a mutation copies only the parts it
/// touches (`Arc::make_mut`) and shares the rest with the previous snapshot.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    profiles: Arc<Vec<Arc<Profile>>>,
    registry: Arc<MatchRegistry>,
    sessions: Arc<HashMap<String, BrowseSession>>,
}

impl StoreState {
    pub fn profiles(&self) -> &[Arc<Profile>] {
        &self.profiles
    }

    pub fn profile(&self, id: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == id).map(Arc::as_ref)
    }

    pub fn registry(&self) -> &MatchRegistry {
        &self.registry
    }

    pub fn session(&self, viewer_id: &str) -> Option<&BrowseSession> {
        self.sessions.get(viewer_id)
    }

    fn require_profile(&self, id: &str) -> CoreResult<&Profile> {
        self.profile(id)
            .ok_or_else(|| CoreError::not_found("profile", id))
    }

    fn require_session(&mut self, viewer_id: &str) -> CoreResult<&mut BrowseSession> {
        if !self.sessions.contains_key(viewer_id) {
            return Err(CoreError::not_found("profile", viewer_id));
        }
        Arc::make_mut(&mut self.sessions)
            .get_mut(viewer_id)
            .ok_or_else(|| CoreError::not_found("profile", viewer_id))
    }

    fn require_participant(&self, match_id: &str, viewer_id: &str) -> CoreResult<&Match> {
        let record = self
            .registry
            .get(match_id)
            .ok_or_else(|| CoreError::not_found("match", match_id))?;
        if !record.users.contains(viewer_id) {
            return Err(CoreError::validation(format!(
                "{} is not a participant of match {}",
                viewer_id, match_id
            )));
        }
        Ok(record)
    }

    /// Re-run every viewer's filters against the current pool and rewind their queues
    fn refresh_sessions(&mut self) {
        let StoreState {
            profiles, sessions, ..
        } = self;
        for (viewer_id, session) in Arc::make_mut(sessions).iter_mut() {
            let candidates =
                apply_filters(profiles.as_slice(), &session.criteria, Some(viewer_id.as_str()));
            session.queue.reset(candidates);
        }
        tracing::debug!("Refreshed {} browsing sessions", sessions.len());
    }

    fn refresh_session(&mut self, viewer_id: &str) -> CoreResult<&BrowseSession> {
        self.require_session(viewer_id)?;
        let StoreState {
            profiles, sessions, ..
        } = self;
        let session = Arc::make_mut(sessions)
            .get_mut(viewer_id)
            .ok_or_else(|| CoreError::not_found("profile", viewer_id))?;
        let candidates = apply_filters(profiles.as_slice(), &session.criteria, Some(viewer_id));
        tracing::debug!(
            "Filters for {} matched {} of {} profiles",
            viewer_id,
            candidates.len(),
            profiles.len()
        );
        session.queue.reset(candidates);
        Ok(session)
    }
}

/// What a viewer sees on the browse screen
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseView {
    pub candidate: Option<PublicProfile>,
    pub upcoming: Vec<PublicProfile>,
    pub status: QueueStatus,
    pub position: usize,
    pub total: usize,
    pub active_filters: usize,
}

impl BrowseView {
    fn from_session(session: &BrowseSession) -> Self {
        Self {
            candidate: session.queue.current().map(PublicProfile::from),
            upcoming: session
                .queue
                .upcoming(STACK_DEPTH)
                .iter()
                .map(|p| PublicProfile::from(p.as_ref()))
                .collect(),
            status: session.queue.status(),
            position: session.queue.cursor(),
            total: session.queue.len(),
            active_filters: session.criteria.active_count(),
        }
    }
}

/// Cards shown stacked behind and including the current one
const STACK_DEPTH: usize = 3;

/// Result of a swipe
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeOutcome {
    pub target_id: String,
    pub decision: Decision,
    #[serde(rename = "match")]
    pub matched: Option<Match>,
    pub new_match: bool,
    pub next: BrowseView,
}

/// One entry in the viewer's inbox
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSummary {
    pub match_id: String,
    pub other_participant: String,
    pub last_message: Option<Message>,
    pub unread: usize,
    pub created_at: DateTime<Utc>,
}

/// Single owned store for profiles, matches and browsing sessions
///
/// Every mutation works on a private copy of the current state and only
/// publishes it when the whole operation succeeds. Readers hold an `Arc`
/// snapshot that never changes underneath them.
pub struct Store {
    state: RwLock<Arc<StoreState>>,
    clock: Arc<dyn Clock>,
    offset: FixedOffset,
}

impl Store {
    pub fn new(clock: Arc<dyn Clock>, offset: FixedOffset) -> Self {
        Self {
            state: RwLock::new(Arc::new(StoreState::default())),
            clock,
            offset,
        }
    }

    pub fn with_system_clock(offset: FixedOffset) -> Self {
        Self::new(Arc::new(SystemClock), offset)
    }

    /// Current published state
    pub fn snapshot(&self) -> Arc<StoreState> {
        Arc::clone(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Local calendar date used for the "Today" label
    pub fn today(&self) -> NaiveDate {
        self.clock.now().with_timezone(&self.offset).date_naive()
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut StoreState, DateTime<Utc>) -> CoreResult<T>,
    ) -> CoreResult<T> {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = StoreState::clone(&guard);
        let output = op(&mut next, self.clock.now())?;
        *guard = Arc::new(next);
        Ok(output)
    }

    // ---- profiles ----

    /// Register a new founder and add them to every discovery pool
    pub fn register(&self, new_profile: NewProfile) -> CoreResult<Profile> {
        if new_profile.name.trim().is_empty() {
            return Err(CoreError::validation("name is required"));
        }
        let email = new_profile.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(CoreError::validation("email is required"));
        }

        let profile = self.mutate(|state, _| {
            if state
                .profiles
                .iter()
                .any(|p| p.email.trim().to_lowercase() == email)
            {
                return Err(CoreError::conflict(format!(
                    "email {} is already registered",
                    email
                )));
            }

            let profile = new_profile.into_profile(uuid::Uuid::new_v4().to_string());
            Arc::make_mut(&mut state.profiles).push(Arc::new(profile.clone()));
            Arc::make_mut(&mut state.sessions)
                .insert(profile.id.clone(), BrowseSession::default());
            state.refresh_sessions();
            Ok(profile)
        })?;

        tracing::info!("Registered profile {} ({})", profile.id, profile.name);
        Ok(profile)
    }

    pub fn profile(&self, id: &str) -> CoreResult<Profile> {
        self.snapshot().require_profile(id).cloned()
    }

    pub fn profiles(&self) -> Vec<Profile> {
        self.snapshot()
            .profiles
            .iter()
            .map(|p| Profile::clone(p))
            .collect()
    }

    /// Apply an owner edit; discovery queues are recomputed from the start
    pub fn update_profile(&self, id: &str, patch: &ProfilePatch) -> CoreResult<Profile> {
        if matches!(&patch.name, Some(name) if name.trim().is_empty()) {
            return Err(CoreError::validation("name cannot be empty"));
        }

        let profile = self.mutate(|state, _| {
            let index = state
                .profiles
                .iter()
                .position(|p| p.id == id)
                .ok_or_else(|| CoreError::not_found("profile", id))?;
            let updated = patch.applied_to(&state.profiles[index]);
            Arc::make_mut(&mut state.profiles)[index] = Arc::new(updated.clone());
            state.refresh_sessions();
            Ok(updated)
        })?;

        tracing::info!("Updated profile {}", id);
        Ok(profile)
    }

    // ---- discovery ----

    pub fn criteria(&self, viewer_id: &str) -> CoreResult<FilterCriteria> {
        self.snapshot()
            .session(viewer_id)
            .map(|s| s.criteria.clone())
            .ok_or_else(|| CoreError::not_found("profile", viewer_id))
    }

    /// Merge a filter patch into the viewer's criteria and restart their queue
    pub fn update_criteria(
        &self,
        viewer_id: &str,
        patch: &FilterPatch,
    ) -> CoreResult<BrowseView> {
        self.mutate(|state, _| {
            let session = state.require_session(viewer_id)?;
            session.criteria = session.criteria.merged(patch);
            state.refresh_session(viewer_id).map(BrowseView::from_session)
        })
    }

    /// Drop every filter for the viewer
    pub fn clear_criteria(&self, viewer_id: &str) -> CoreResult<BrowseView> {
        self.mutate(|state, _| {
            state.require_session(viewer_id)?.criteria = FilterCriteria::default();
            state.refresh_session(viewer_id).map(BrowseView::from_session)
        })
    }

    pub fn browse(&self, viewer_id: &str) -> CoreResult<BrowseView> {
        self.snapshot()
            .session(viewer_id)
            .map(BrowseView::from_session)
            .ok_or_else(|| CoreError::not_found("profile", viewer_id))
    }

    /// Like or pass on the viewer's current candidate
    pub fn swipe(&self, viewer_id: &str, decision: Decision) -> CoreResult<SwipeOutcome> {
        let outcome = self.mutate(|state, now| {
            let target_id = state
                .session(viewer_id)
                .ok_or_else(|| CoreError::not_found("profile", viewer_id))?
                .queue
                .current()
                .map(|p| p.id.clone())
                .ok_or_else(|| CoreError::validation("no candidate left to swipe"))?;

            let liked = match decision {
                Decision::Like => {
                    Some(Arc::make_mut(&mut state.registry).like(viewer_id, &target_id, now)?)
                }
                Decision::Pass => None,
            };
            let session = state.require_session(viewer_id)?;
            session.queue.advance();

            let (matched, new_match) = match liked {
                Some(LikeOutcome { record, created }) => (Some(record), created),
                None => (None, false),
            };
            Ok(SwipeOutcome {
                target_id,
                decision,
                matched,
                new_match,
                next: BrowseView::from_session(session),
            })
        })?;

        if outcome.new_match {
            tracing::info!("New match between {} and {}", viewer_id, outcome.target_id);
        }
        Ok(outcome)
    }

    // ---- matches ----

    /// Like a specific profile outside the swipe flow
    pub fn like(&self, actor_id: &str, target_id: &str) -> CoreResult<LikeOutcome> {
        let outcome = self.mutate(|state, now| {
            state.require_profile(actor_id)?;
            state.require_profile(target_id)?;
            Arc::make_mut(&mut state.registry).like(actor_id, target_id, now)
        })?;

        if outcome.created {
            tracing::info!("New match between {} and {}", actor_id, target_id);
        }
        Ok(outcome)
    }

    pub fn get_match(&self, match_id: &str) -> CoreResult<Match> {
        self.snapshot()
            .registry
            .get(match_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("match", match_id))
    }

    /// The viewer's matches in the order they were made
    pub fn matches_for(&self, viewer_id: &str) -> CoreResult<Vec<Match>> {
        let snapshot = self.snapshot();
        snapshot.require_profile(viewer_id)?;
        Ok(snapshot.registry.matches_for(viewer_id).cloned().collect())
    }

    // ---- messaging ----

    pub fn send_message(
        &self,
        match_id: &str,
        sender_id: &str,
        text: &str,
    ) -> CoreResult<Option<Message>> {
        let sent = self.mutate(|state, now| {
            let registry = Arc::make_mut(&mut state.registry);
            send_message(registry, match_id, sender_id, text, now)
        })?;

        if let Some(message) = &sent {
            tracing::debug!("Message {} appended to match {}", message.id, match_id);
        }
        Ok(sent)
    }

    pub fn mark_read(&self, match_id: &str, viewer_id: &str) -> CoreResult<usize> {
        self.mutate(|state, _| {
            let registry = Arc::make_mut(&mut state.registry);
            mark_read(registry, match_id, viewer_id)
        })
    }

    /// Thread contents; unknown matches read as empty
    pub fn messages(&self, match_id: &str) -> Vec<Message> {
        self.snapshot()
            .registry
            .get(match_id)
            .map(|m| m.messages.clone())
            .unwrap_or_default()
    }

    pub fn grouped_messages(
        &self,
        match_id: &str,
        viewer_id: &str,
    ) -> CoreResult<Vec<DateGroup>> {
        let snapshot = self.snapshot();
        let record = snapshot.require_participant(match_id, viewer_id)?;
        Ok(group_by_date(&record.messages, &self.offset))
    }

    pub fn unread_count(&self, match_id: &str, viewer_id: &str) -> CoreResult<usize> {
        let snapshot = self.snapshot();
        let record = snapshot
            .registry
            .get(match_id)
            .ok_or_else(|| CoreError::not_found("match", match_id))?;
        Ok(unread_count(record, viewer_id))
    }

    /// The viewer's inbox, most recent activity first
    pub fn threads(&self, viewer_id: &str) -> CoreResult<Vec<ThreadSummary>> {
        let snapshot = self.snapshot();
        snapshot.require_profile(viewer_id)?;

        Ok(sort_threads(snapshot.registry.all(), viewer_id)
            .into_iter()
            .map(|record| ThreadSummary {
                unread: unread_count(&record, viewer_id),
                other_participant: record
                    .other_participant(viewer_id)
                    .unwrap_or_default()
                    .to_string(),
                last_message: record.last_message().cloned(),
                created_at: record.created_at,
                match_id: record.id,
            })
            .collect())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::with_system_clock(Utc.fix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProjectIdea, ProjectStage};
    use chrono::TimeZone;

    fn founder(name: &str, skills: &[&str], location: &str) -> NewProfile {
        NewProfile {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            location: location.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn store_at(secs: i64) -> (Store, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc.timestamp_opt(secs, 0).unwrap()));
        let store = Store::new(clock.clone(), FixedOffset::east_opt(0).unwrap());
        (store, clock)
    }

    #[test]
    fn test_register_rejects_duplicate_email() {
        let store = Store::default();
        store.register(founder("Ada", &[], "")).unwrap();

        let mut dup = founder("Other", &[], "");
        dup.email = "ADA@example.com".to_string();
        let err = store.register(dup).unwrap_err();

        assert!(matches!(err, CoreError::Conflict(_)));
        assert_eq!(store.profiles().len(), 1);
    }

    #[test]
    fn test_register_requires_name() {
        let store = Store::default();
        let err = store.register(founder("  ", &[], "")).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_browse_excludes_self() {
        let store = Store::default();
        let ada = store.register(founder("Ada", &["Rust"], "Berlin")).unwrap();
        store.register(founder("Bob", &["Go"], "Paris")).unwrap();

        let view = store.browse(&ada.id).unwrap();

        assert_eq!(view.total, 1);
        assert_eq!(view.candidate.unwrap().name, "Bob");
    }

    #[test]
    fn test_swipe_like_creates_match_and_advances() {
        let (store, _) = store_at(1_000);
        let ada = store.register(founder("Ada", &[], "")).unwrap();
        let bob = store.register(founder("Bob", &[], "")).unwrap();

        let outcome = store.swipe(&ada.id, Decision::Like).unwrap();

        assert_eq!(outcome.target_id, bob.id);
        assert!(outcome.new_match);
        assert_eq!(outcome.next.status, QueueStatus::Exhausted);
        assert_eq!(store.snapshot().registry().len(), 1);

        // Bob liking Ada back reuses the same match
        let back = store.swipe(&bob.id, Decision::Like).unwrap();
        assert!(!back.new_match);
        assert_eq!(store.snapshot().registry().len(), 1);
    }

    #[test]
    fn test_swipe_on_exhausted_queue_fails_without_change() {
        let store = Store::default();
        let ada = store.register(founder("Ada", &[], "")).unwrap();
        store.register(founder("Bob", &[], "")).unwrap();
        store.swipe(&ada.id, Decision::Pass).unwrap();

        let before = store.snapshot();
        let err = store.swipe(&ada.id, Decision::Like).unwrap_err();

        assert!(matches!(err, CoreError::Validation(_)));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn test_update_criteria_resets_cursor() {
        let store = Store::default();
        let ada = store.register(founder("Ada", &[], "")).unwrap();
        store.register(founder("Bob", &["Rust"], "Berlin")).unwrap();
        store.register(founder("Cy", &["Go"], "Berlin")).unwrap();
        store.swipe(&ada.id, Decision::Pass).unwrap();

        let view = store
            .update_criteria(
                &ada.id,
                &FilterPatch {
                    location: Some("berlin".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(view.position, 0);
        assert_eq!(view.total, 2);
        assert_eq!(view.active_filters, 1);

        let view = store
            .update_criteria(
                &ada.id,
                &FilterPatch {
                    skills: Some(["Rust".to_string()].into_iter().collect()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(view.total, 1);
        assert_eq!(store.criteria(&ada.id).unwrap().location, "berlin");

        let cleared = store.clear_criteria(&ada.id).unwrap();
        assert_eq!(cleared.total, 2);
        assert_eq!(cleared.active_filters, 0);
    }

    #[test]
    fn test_profile_edit_rewinds_queues() {
        let store = Store::default();
        let ada = store.register(founder("Ada", &[], "")).unwrap();
        let bob = store.register(founder("Bob", &[], "")).unwrap();
        store.register(founder("Cy", &[], "")).unwrap();
        store.swipe(&ada.id, Decision::Pass).unwrap();
        assert_eq!(store.browse(&ada.id).unwrap().position, 1);

        let patch = ProfilePatch {
            project_ideas: Some(vec![ProjectIdea {
                id: String::new(),
                title: "Marketplace".to_string(),
                description: String::new(),
                stage: ProjectStage::Mvp,
                tags: vec![],
            }]),
            ..Default::default()
        };
        let edited = store.update_profile(&bob.id, &patch).unwrap();

        assert!(!edited.project_ideas[0].id.is_empty());
        assert_eq!(store.browse(&ada.id).unwrap().position, 0);
    }

    #[test]
    fn test_update_unknown_profile() {
        let store = Store::default();
        let err = store
            .update_profile("ghost", &ProfilePatch::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { kind: "profile", .. }));
    }

    #[test]
    fn test_threads_sorted_with_unread() {
        let (store, clock) = store_at(50);
        let me = store.register(founder("Me", &[], "")).unwrap();
        let a = store.register(founder("A", &[], "")).unwrap();
        let b = store.register(founder("B", &[], "")).unwrap();

        let with_a = store.like(&me.id, &a.id).unwrap().record.id;
        clock.advance(chrono::Duration::seconds(10));
        let with_b = store.like(&b.id, &me.id).unwrap().record.id;
        clock.advance(chrono::Duration::seconds(10));
        store.send_message(&with_a, &a.id, "hello").unwrap();

        let threads = store.threads(&me.id).unwrap();

        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].match_id, with_a);
        assert_eq!(threads[0].unread, 1);
        assert_eq!(threads[0].other_participant, a.id);
        assert_eq!(threads[1].match_id, with_b);

        assert_eq!(store.mark_read(&with_a, &me.id).unwrap(), 1);
        assert_eq!(store.unread_count(&with_a, &me.id).unwrap(), 0);
    }

    #[test]
    fn test_like_requires_known_profiles() {
        let store = Store::default();
        let ada = store.register(founder("Ada", &[], "")).unwrap();

        let err = store.like(&ada.id, "ghost").unwrap_err();

        assert!(matches!(err, CoreError::NotFound { .. }));
        assert!(store.snapshot().registry().is_empty());
    }

    #[test]
    fn test_grouped_messages_requires_participant() {
        let store = Store::default();
        let ada = store.register(founder("Ada", &[], "")).unwrap();
        let bob = store.register(founder("Bob", &[], "")).unwrap();
        let cy = store.register(founder("Cy", &[], "")).unwrap();
        let id = store.like(&ada.id, &bob.id).unwrap().record.id;
        store.send_message(&id, &bob.id, "hey").unwrap();

        assert_eq!(store.grouped_messages(&id, &ada.id).unwrap().len(), 1);
        assert!(store.grouped_messages(&id, &cy.id).is_err());
        assert!(store.messages("missing").is_empty());
    }

    #[test]
    fn test_mutation_copies_only_touched_parts() {
        let store = Store::default();
        let ada = store.register(founder("Ada", &[], "")).unwrap();
        let bob = store.register(founder("Bob", &[], "")).unwrap();
        let id = store.like(&ada.id, &bob.id).unwrap().record.id;

        let before = store.snapshot();
        store.send_message(&id, &ada.id, "hi").unwrap();
        let after = store.snapshot();

        assert!(!Arc::ptr_eq(&before.registry, &after.registry));
        assert!(Arc::ptr_eq(&before.profiles, &after.profiles));
        assert!(Arc::ptr_eq(&before.sessions, &after.sessions));
        assert!(before.registry().get(&id).unwrap().messages.is_empty());
    }

    #[test]
    fn test_queues_share_pool_profiles() {
        let store = Store::default();
        let ada = store.register(founder("Ada", &[], "")).unwrap();
        let bob = store.register(founder("Bob", &[], "")).unwrap();

        let snapshot = store.snapshot();
        let pooled = snapshot.profiles().iter().find(|p| p.id == bob.id).unwrap();
        let queued = &snapshot.session(&ada.id).unwrap().queue.upcoming(1)[0];

        assert!(Arc::ptr_eq(pooled, queued));
    }
}
