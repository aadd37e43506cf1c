// ============================================================================
// Token Session Core - Observed Session
// File: crates/tksession-core/src/listener/observed.rs
// Description: Session wrapper that raises listener events around mutations
// ============================================================================

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use super::Notifier;
use crate::domain::{AttributeValue, Session, SessionKind, SessionOps};
use crate::error::SessionError;

/// A [`Session`] bound to a [`Notifier`].
///
/// Every event fires after the underlying entity has changed, so listeners
/// always see the new state. Listener errors surface as
/// [`SessionError::Listener`] from the mutating call; the mutation itself is
/// not rolled back.
#[derive(Debug)]
pub struct ObservedSession {
    notifier: Arc<Notifier>,
    inner: Session,
}

impl ObservedSession {
    pub(crate) fn new(notifier: Arc<Notifier>, inner: Session) -> Result<Self, SessionError> {
        let observed = Self { notifier, inner };
        if observed.inner.kind() == SessionKind::New {
            observed
                .notifier
                .session_created(&observed)
                .map_err(SessionError::Listener)?;
        }
        Ok(observed)
    }

    pub fn session(&self) -> &Session {
        &self.inner
    }

    pub fn into_inner(self) -> Session {
        self.inner
    }
}

impl SessionOps for ObservedSession {
    fn id(&self) -> Uuid {
        self.inner.id()
    }

    fn creation_time(&self) -> Result<DateTime<Utc>, SessionError> {
        self.inner.creation_time()
    }

    fn last_accessed_time(&self) -> Result<DateTime<Utc>, SessionError> {
        self.inner.last_accessed_time()
    }

    fn max_inactive_interval(&self) -> i32 {
        self.inner.max_inactive_interval()
    }

    fn set_max_inactive_interval(&mut self, seconds: i32) {
        self.inner.set_max_inactive_interval(seconds);
    }

    fn attribute(&self, name: &str) -> Result<Option<&AttributeValue>, SessionError> {
        self.inner.attribute(name)
    }

    fn attribute_names(&self) -> Result<Vec<String>, SessionError> {
        self.inner.attribute_names()
    }

    fn set_attribute(&mut self, name: &str, value: Option<AttributeValue>) -> Result<(), SessionError> {
        let value = match value.filter(|v| !v.is_empty()) {
            Some(value) => value,
            None => return self.remove_attribute(name),
        };

        let previous = self.inner.attribute(name)?.cloned();
        self.inner.set_attribute(name, Some(value.clone()))?;

        let notifier = Arc::clone(&self.notifier);
        let notified = match &previous {
            None => notifier.attribute_added(self, name, &value),
            Some(previous) => notifier.attribute_replaced(self, name, previous, &value),
        };
        notified.map_err(SessionError::Listener)?;

        if let Some(previous) = &previous {
            previous.unbound(self, name).map_err(SessionError::Listener)?;
        }
        value.bound(self, name).map_err(SessionError::Listener)
    }

    fn remove_attribute(&mut self, name: &str) -> Result<(), SessionError> {
        let previous = self.inner.attribute(name)?.cloned();
        self.inner.remove_attribute(name)?;

        let notifier = Arc::clone(&self.notifier);
        notifier
            .attribute_removed(self, name, previous.as_ref())
            .map_err(SessionError::Listener)?;

        match &previous {
            Some(previous) => previous.unbound(self, name).map_err(SessionError::Listener),
            None => Ok(()),
        }
    }

    /// Emits `session_destroyed`; the invalidated state itself belongs to
    /// [`ManagedSession`](crate::domain::ManagedSession).
    fn invalidate(&mut self) -> Result<(), SessionError> {
        debug!("Session {} destroyed", self.inner.id());
        self.notifier
            .session_destroyed(self)
            .map_err(SessionError::Listener)
    }

    fn is_new(&self) -> Result<bool, SessionError> {
        self.inner.is_new()
    }

    fn expired_at(&self, now: DateTime<Utc>) -> bool {
        self.inner.expired_at(now)
    }
}
