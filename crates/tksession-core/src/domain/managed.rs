// ============================================================================
// Token Session Core - Managed Session
// File: crates/tksession-core/src/domain/managed.rs
// Description: Invalidation state machine over any session layer
// ============================================================================

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{AttributeValue, SessionOps};
use crate::error::SessionError;
use crate::listener::ObservedSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    Invalidated,
}

/// The session handed to application code.
///
/// The first `invalidate()` asks the wrapped layer to invalidate (the
/// observed layer emits its destroyed event there) and then switches to
/// [`Lifecycle::Invalidated`]. From then on only the id and the TTL remain
/// accessible; everything else fails with [`SessionError::Invalidated`].
#[derive(Debug)]
pub struct ManagedSession<S: SessionOps = ObservedSession> {
    inner: S,
    lifecycle: Lifecycle,
}

impl<S: SessionOps> ManagedSession<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            lifecycle: Lifecycle::Active,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_invalidated(&self) -> bool {
        self.lifecycle == Lifecycle::Invalidated
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        match self.lifecycle {
            Lifecycle::Active => Ok(()),
            Lifecycle::Invalidated => Err(SessionError::Invalidated),
        }
    }
}

impl<S: SessionOps> SessionOps for ManagedSession<S> {
    fn id(&self) -> Uuid {
        self.inner.id()
    }

    fn creation_time(&self) -> Result<DateTime<Utc>, SessionError> {
        self.ensure_active()?;
        self.inner.creation_time()
    }

    fn last_accessed_time(&self) -> Result<DateTime<Utc>, SessionError> {
        self.ensure_active()?;
        self.inner.last_accessed_time()
    }

    fn max_inactive_interval(&self) -> i32 {
        self.inner.max_inactive_interval()
    }

    // allowed after invalidation
    fn set_max_inactive_interval(&mut self, seconds: i32) {
        self.inner.set_max_inactive_interval(seconds);
    }

    fn attribute(&self, name: &str) -> Result<Option<&AttributeValue>, SessionError> {
        self.ensure_active()?;
        self.inner.attribute(name)
    }

    fn attribute_names(&self) -> Result<Vec<String>, SessionError> {
        self.ensure_active()?;
        self.inner.attribute_names()
    }

    fn set_attribute(&mut self, name: &str, value: Option<AttributeValue>) -> Result<(), SessionError> {
        self.ensure_active()?;
        self.inner.set_attribute(name, value)
    }

    fn remove_attribute(&mut self, name: &str) -> Result<(), SessionError> {
        self.ensure_active()?;
        self.inner.remove_attribute(name)
    }

    fn invalidate(&mut self) -> Result<(), SessionError> {
        self.ensure_active()?;
        self.inner.invalidate()?;
        self.lifecycle = Lifecycle::Invalidated;
        Ok(())
    }

    fn is_new(&self) -> Result<bool, SessionError> {
        self.ensure_active()?;
        self.inner.is_new()
    }

    fn expired_at(&self, now: DateTime<Utc>) -> bool {
        self.inner.expired_at(now)
    }
}
