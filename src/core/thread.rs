use crate::core::error::{CoreError, CoreResult};
use crate::core::registry::MatchRegistry;
use crate::models::{Match, Message};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

/// Messages that share one local calendar date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateGroup {
    pub date: NaiveDate,
    pub messages: Vec<Message>,
}

/// Append a message to a match thread
///
/// Blank text is ignored and yields `Ok(None)`. The timestamp never goes
/// below the previous message's, so the thread stays chronological.
pub fn send_message(
    registry: &mut MatchRegistry,
    match_id: &str,
    sender_id: &str,
    text: &str,
    now: DateTime<Utc>,
) -> CoreResult<Option<Message>> {
    let record = registry
        .get_mut(match_id)
        .ok_or_else(|| CoreError::not_found("match", match_id))?;

    if text.trim().is_empty() {
        return Ok(None);
    }

    if !record.users.contains(sender_id) {
        return Err(CoreError::validation(format!(
            "{} is not a participant of match {}",
            sender_id, match_id
        )));
    }

    let created_at = match record.last_message() {
        Some(last) if last.created_at > now => last.created_at,
        _ => now,
    };

    let message = Message {
        id: uuid::Uuid::new_v4().to_string(),
        sender_id: sender_id.to_string(),
        text: text.to_string(),
        created_at,
        read: false,
    };
    record.messages.push(message.clone());

    Ok(Some(message))
}

/// Mark every message the viewer received in a match as read
///
/// Returns how many messages changed state.
pub fn mark_read(
    registry: &mut MatchRegistry,
    match_id: &str,
    viewer_id: &str,
) -> CoreResult<usize> {
    let record = registry
        .get_mut(match_id)
        .ok_or_else(|| CoreError::not_found("match", match_id))?;

    if !record.users.contains(viewer_id) {
        return Err(CoreError::validation(format!(
            "{} is not a participant of match {}",
            viewer_id, match_id
        )));
    }

    let mut flipped = 0;
    for message in record
        .messages
        .iter_mut()
        .filter(|m| m.sender_id != viewer_id && !m.read)
    {
        message.read = true;
        flipped += 1;
    }

    Ok(flipped)
}

/// Partition messages by calendar date in the given offset
pub fn group_by_date(messages: &[Message], offset: &FixedOffset) -> Vec<DateGroup> {
    let mut groups: Vec<DateGroup> = Vec::new();

    for message in messages {
        let date = message.created_at.with_timezone(offset).date_naive();
        match groups.iter_mut().find(|g| g.date == date) {
            Some(group) => group.messages.push(message.clone()),
            None => groups.push(DateGroup {
                date,
                messages: vec![message.clone()],
            }),
        }
    }

    groups
}

/// Messages in the match sent by someone other than the viewer and not yet read
pub fn unread_count(record: &Match, viewer_id: &str) -> usize {
    record
        .messages
        .iter()
        .filter(|m| m.sender_id != viewer_id && !m.read)
        .count()
}

/// The viewer's threads, most recent activity first
///
/// Threads with messages rank by their last message and always come before
/// threads without one; silent threads rank by creation time.
pub fn sort_threads<'a, I>(matches: I, viewer_id: &str) -> Vec<Match>
where
    I: IntoIterator<Item = &'a Match>,
{
    let mut threads: Vec<Match> = matches
        .into_iter()
        .filter(|m| m.users.contains(viewer_id))
        .cloned()
        .collect();

    threads.sort_by(|a, b| activity_key(b).cmp(&activity_key(a)));
    threads
}

fn activity_key(record: &Match) -> (bool, DateTime<Utc>) {
    match record.last_message() {
        Some(last) => (true, last.created_at),
        None => (false, record.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn message(sender: &str, secs: i64, read: bool) -> Message {
        Message {
            id: format!("m{}", secs),
            sender_id: sender.to_string(),
            text: "hi".to_string(),
            created_at: at(secs),
            read,
        }
    }

    #[test]
    fn test_send_appends_unread() {
        let mut registry = MatchRegistry::new();
        let id = registry.like("u1", "u2", at(0)).unwrap().record.id;

        let sent = send_message(&mut registry, &id, "u1", "hello", at(10))
            .unwrap()
            .unwrap();

        assert!(!sent.read);
        assert_eq!(sent.text, "hello");
        assert_eq!(registry.get(&id).unwrap().messages.len(), 1);
    }

    #[test]
    fn test_send_blank_is_noop() {
        let mut registry = MatchRegistry::new();
        let id = registry.like("u1", "u2", at(0)).unwrap().record.id;

        assert_eq!(send_message(&mut registry, &id, "u1", "   ", at(10)).unwrap(), None);
        assert!(registry.get(&id).unwrap().messages.is_empty());
    }

    #[test]
    fn test_send_unknown_match() {
        let mut registry = MatchRegistry::new();
        let err = send_message(&mut registry, "missing", "u1", "hello", at(10)).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn test_send_rejects_outsider() {
        let mut registry = MatchRegistry::new();
        let id = registry.like("u1", "u2", at(0)).unwrap().record.id;

        let err = send_message(&mut registry, &id, "u3", "hello", at(10)).unwrap_err();

        assert!(matches!(err, CoreError::Validation(_)));
        assert!(registry.get(&id).unwrap().messages.is_empty());
    }

    #[test]
    fn test_send_keeps_timestamps_monotonic() {
        let mut registry = MatchRegistry::new();
        let id = registry.like("u1", "u2", at(0)).unwrap().record.id;

        send_message(&mut registry, &id, "u1", "first", at(100)).unwrap();
        let second = send_message(&mut registry, &id, "u2", "second", at(50))
            .unwrap()
            .unwrap();

        assert_eq!(second.created_at, at(100));
    }

    #[test]
    fn test_unread_count_ignores_own_and_read() {
        let mut record = Match {
            id: "m".to_string(),
            users: crate::models::ParticipantPair::new("u1", "u2").unwrap(),
            created_at: at(0),
            messages: vec![],
        };
        record.messages.push(message("u1", 1, false));
        record.messages.push(message("u2", 2, false));
        record.messages.push(message("u2", 3, true));

        assert_eq!(unread_count(&record, "u1"), 1);
        assert_eq!(unread_count(&record, "u2"), 1);
    }

    #[test]
    fn test_mark_read_only_recipient_side() {
        let mut registry = MatchRegistry::new();
        let id = registry.like("u1", "u2", at(0)).unwrap().record.id;
        send_message(&mut registry, &id, "u1", "from u1", at(1)).unwrap();
        send_message(&mut registry, &id, "u2", "from u2", at(2)).unwrap();

        assert_eq!(mark_read(&mut registry, &id, "u1").unwrap(), 1);
        assert_eq!(mark_read(&mut registry, &id, "u1").unwrap(), 0);

        let record = registry.get(&id).unwrap();
        assert!(!record.messages[0].read);
        assert!(record.messages[1].read);
        assert_eq!(unread_count(record, "u2"), 1);
    }

    #[test]
    fn test_group_by_date_preserves_order() {
        let day = 86_400;
        let messages = vec![
            message("u1", 10, false),
            message("u2", 20, false),
            message("u1", day + 5, false),
            message("u2", 2 * day + 1, false),
            message("u1", 2 * day + 2, false),
        ];

        let groups = group_by_date(&messages, &FixedOffset::east_opt(0).unwrap());

        assert_eq!(groups.len(), 3);
        let flattened: Vec<&str> = groups
            .iter()
            .flat_map(|g| g.messages.iter().map(|m| m.id.as_str()))
            .collect();
        let original: Vec<&str> = messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(flattened, original);
        assert!(groups.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_group_by_date_uses_offset() {
        // 23:30 UTC is the next day at UTC+1
        let messages = vec![message("u1", 23 * 3600 + 1800, false)];

        let utc = group_by_date(&messages, &FixedOffset::east_opt(0).unwrap());
        let cet = group_by_date(&messages, &FixedOffset::east_opt(3600).unwrap());

        assert_eq!(utc[0].date, NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
        assert_eq!(cet[0].date, NaiveDate::from_ymd_opt(1970, 1, 2).unwrap());
    }

    #[test]
    fn test_sort_threads_by_activity() {
        let mut registry = MatchRegistry::new();
        let m1 = registry.like("me", "a", at(10)).unwrap().record.id;
        let m2 = registry.like("me", "b", at(50)).unwrap().record.id;
        let m3 = registry.like("c", "me", at(20)).unwrap().record.id;
        registry.like("a", "b", at(500)).unwrap();

        send_message(&mut registry, &m1, "a", "one", at(100)).unwrap();
        send_message(&mut registry, &m3, "me", "three", at(200)).unwrap();

        let ids: Vec<String> = sort_threads(registry.all(), "me")
            .into_iter()
            .map(|m| m.id)
            .collect();

        assert_eq!(ids, vec![m3, m1, m2]);
    }

    #[test]
    fn test_silent_threads_by_creation() {
        let mut registry = MatchRegistry::new();
        let older = registry.like("me", "a", at(10)).unwrap().record.id;
        let newer = registry.like("me", "b", at(20)).unwrap().record.id;

        let ids: Vec<String> = sort_threads(registry.all(), "me")
            .into_iter()
            .map(|m| m.id)
            .collect();

        assert_eq!(ids, vec![newer, older]);
    }
}
