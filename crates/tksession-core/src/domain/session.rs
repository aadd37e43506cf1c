// ============================================================================
// Token Session Core - Session Entity
// File: crates/tksession-core/src/domain/session.rs
// Description: Session entity and the capability set shared by its wrappers
// ============================================================================

use std::collections::HashMap;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use uuid::Uuid;

use super::AttributeValue;
use crate::error::SessionError;

/// Operations every session layer supports.
///
/// The bare [`Session`] entity, the notifier-observed wrapper, and the
/// managed wrapper all implement this; each layer decides which calls it
/// intercepts and which it forwards.
pub trait SessionOps {
    fn id(&self) -> Uuid;

    fn creation_time(&self) -> Result<DateTime<Utc>, SessionError>;

    fn last_accessed_time(&self) -> Result<DateTime<Utc>, SessionError>;

    fn max_inactive_interval(&self) -> i32;

    /// Negative input is stored as 0 (never expires).
    fn set_max_inactive_interval(&mut self, seconds: i32);

    fn attribute(&self, name: &str) -> Result<Option<&AttributeValue>, SessionError>;

    fn attribute_names(&self) -> Result<Vec<String>, SessionError>;

    /// `None` or an empty value removes the attribute.
    fn set_attribute(&mut self, name: &str, value: Option<AttributeValue>) -> Result<(), SessionError>;

    fn remove_attribute(&mut self, name: &str) -> Result<(), SessionError>;

    fn invalidate(&mut self) -> Result<(), SessionError>;

    fn is_new(&self) -> Result<bool, SessionError>;

    fn expired_at(&self, now: DateTime<Utc>) -> bool;

    fn expired(&self) -> bool {
        self.expired_at(Utc::now())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    /// Created during this exchange
    New,
    /// Decoded from an incoming token
    Restored,
}

/// Current time at the precision tokens carry.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Session entity
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    kind: SessionKind,
    creation_time: DateTime<Utc>,
    last_accessed_time: DateTime<Utc>,
    max_inactive_interval: i32,
    attributes: HashMap<String, AttributeValue>,
}

impl Session {
    /// Create a fresh session with a random id
    pub fn new() -> Self {
        Self::new_at(now_millis())
    }

    pub fn new_at(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: SessionKind::New,
            creation_time: now,
            last_accessed_time: now,
            max_inactive_interval: 0,
            attributes: HashMap::new(),
        }
    }

    /// Rebuild a session from decoded token state
    pub fn restored(
        id: Uuid,
        creation_time: DateTime<Utc>,
        last_accessed_time: DateTime<Utc>,
        max_inactive_interval: i32,
        attributes: HashMap<String, AttributeValue>,
    ) -> Self {
        Self {
            id,
            kind: SessionKind::Restored,
            creation_time,
            last_accessed_time: last_accessed_time.max(creation_time),
            max_inactive_interval: max_inactive_interval.max(0),
            attributes,
        }
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    pub fn attributes(&self) -> &HashMap<String, AttributeValue> {
        &self.attributes
    }

    /// Record an access at `now`; never moves before the creation time.
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.last_accessed_time = now.max(self.creation_time);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionOps for Session {
    fn id(&self) -> Uuid {
        self.id
    }

    fn creation_time(&self) -> Result<DateTime<Utc>, SessionError> {
        Ok(self.creation_time)
    }

    fn last_accessed_time(&self) -> Result<DateTime<Utc>, SessionError> {
        Ok(self.last_accessed_time)
    }

    fn max_inactive_interval(&self) -> i32 {
        self.max_inactive_interval
    }

    fn set_max_inactive_interval(&mut self, seconds: i32) {
        self.max_inactive_interval = seconds.max(0);
    }

    fn attribute(&self, name: &str) -> Result<Option<&AttributeValue>, SessionError> {
        Ok(self.attributes.get(name))
    }

    fn attribute_names(&self) -> Result<Vec<String>, SessionError> {
        Ok(self.attributes.keys().cloned().collect())
    }

    fn set_attribute(&mut self, name: &str, value: Option<AttributeValue>) -> Result<(), SessionError> {
        match value.filter(|v| !v.is_empty()) {
            Some(value) => {
                self.attributes.insert(name.to_string(), value);
                Ok(())
            }
            None => self.remove_attribute(name),
        }
    }

    fn remove_attribute(&mut self, name: &str) -> Result<(), SessionError> {
        self.attributes.remove(name);
        Ok(())
    }

    /// The bare entity has no invalidated state of its own; see
    /// [`ManagedSession`](super::ManagedSession).
    fn invalidate(&mut self) -> Result<(), SessionError> {
        Err(SessionError::UnsupportedTransition)
    }

    fn is_new(&self) -> Result<bool, SessionError> {
        Ok(self.kind == SessionKind::New)
    }

    /// A deadline past the representable range never arrives.
    fn expired_at(&self, now: DateTime<Utc>) -> bool {
        if self.max_inactive_interval == 0 {
            return false;
        }
        self.last_accessed_time
            .checked_add_signed(Duration::seconds(i64::from(self.max_inactive_interval)))
            .is_some_and(|deadline| now >= deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restored_at(last_accessed: DateTime<Utc>, interval: i32) -> Session {
        Session::restored(
            Uuid::new_v4(),
            last_accessed - Duration::hours(1),
            last_accessed,
            interval,
            HashMap::new(),
        )
    }

    #[test]
    fn test_new_session_defaults() {
        let session = Session::new();
        assert!(session.is_new().unwrap());
        assert_eq!(session.kind(), SessionKind::New);
        assert_eq!(session.max_inactive_interval(), 0);
        assert_eq!(
            session.creation_time().unwrap(),
            session.last_accessed_time().unwrap()
        );
        assert!(session.attribute_names().unwrap().is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(Session::new().id(), Session::new().id());
    }

    #[test]
    fn test_restored_session_is_not_new() {
        let session = restored_at(Utc::now(), 10);
        assert!(!session.is_new().unwrap());
        assert_eq!(session.kind(), SessionKind::Restored);
    }

    #[test]
    fn test_negative_interval_clamped() {
        let mut session = Session::new();
        session.set_max_inactive_interval(-1);
        assert_eq!(session.max_inactive_interval(), 0);

        let restored = restored_at(Utc::now(), -30);
        assert_eq!(restored.max_inactive_interval(), 0);
    }

    #[test]
    fn test_zero_interval_never_expires() {
        let session = restored_at(Utc::now() - Duration::days(3650), 0);
        assert!(!session.expired());
    }

    #[test]
    fn test_expiry_boundary() {
        let last = now_millis();
        let session = restored_at(last, 10);

        assert!(!session.expired_at(last + Duration::milliseconds(9_999)));
        assert!(session.expired_at(last + Duration::seconds(10)));
        assert!(session.expired_at(last + Duration::seconds(11)));
    }

    #[test]
    fn test_deadline_beyond_range_is_not_expired() {
        let far = DateTime::<Utc>::MAX_UTC.trunc_subsecs(3);
        let session = Session::restored(Uuid::new_v4(), far, far, 1, HashMap::new());

        assert!(!session.expired());
        assert!(!session.expired_at(far));
    }

    #[test]
    fn test_extending_interval_revives() {
        let mut session = restored_at(Utc::now() - Duration::seconds(15), 10);
        assert!(session.expired());

        session.set_max_inactive_interval(20);
        assert!(!session.expired());
    }

    #[test]
    fn test_attributes() {
        let mut session = Session::new();
        session.set_attribute("count", Some(1.into())).unwrap();
        session.set_attribute("name", Some("Foo".into())).unwrap();
        assert_eq!(session.attribute("count").unwrap(), Some(&AttributeValue::Int(1)));

        session.set_attribute("count", Some(2.into())).unwrap();
        assert_eq!(session.attribute("count").unwrap(), Some(&AttributeValue::Int(2)));

        let mut names = session.attribute_names().unwrap();
        names.sort();
        assert_eq!(names, vec!["count", "name"]);
    }

    #[test]
    fn test_empty_value_removes() {
        let mut session = Session::new();
        session.set_attribute("a", Some("x".into())).unwrap();
        session.set_attribute("b", Some("y".into())).unwrap();

        session.set_attribute("a", None).unwrap();
        session.set_attribute("b", Some(serde_json::Value::Null.into())).unwrap();

        assert!(session.attribute("a").unwrap().is_none());
        assert!(session.attribute("b").unwrap().is_none());
        assert!(session.attributes().is_empty());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut session = Session::new();
        session.remove_attribute("missing").unwrap();
        assert!(session.attributes().is_empty());
    }

    #[test]
    fn test_bare_entity_cannot_invalidate() {
        let mut session = Session::new();
        assert!(matches!(
            session.invalidate(),
            Err(SessionError::UnsupportedTransition)
        ));
        // still fully usable
        session.set_attribute("a", Some(true.into())).unwrap();
        assert!(session.is_new().unwrap());
    }

    #[test]
    fn test_touch_never_precedes_creation() {
        let mut session = Session::new();
        let created = session.creation_time().unwrap();

        session.touch(created - Duration::seconds(5));
        assert_eq!(session.last_accessed_time().unwrap(), created);

        session.touch(created + Duration::seconds(5));
        assert_eq!(
            session.last_accessed_time().unwrap(),
            created + Duration::seconds(5)
        );
    }
}
