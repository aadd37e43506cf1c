// ============================================================================
// Token Session Core - Notifier
// File: crates/tksession-core/src/listener/notifier.rs
// ============================================================================

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::{ListenerResult, ObservedSession, SessionAttributeListener, SessionListener};
use crate::domain::{AttributeValue, Session, SessionOps};
use crate::error::SessionError;

/// Fan-out of session events to registered listeners.
///
/// Listeners run synchronously in registration order and the first failure
/// stops the fan-out.
pub enum Notifier {
    /// No listeners; sessions are still wrapped
    Unobserved,
    Lifecycle(Vec<Arc<dyn SessionListener>>),
    Attributes(Vec<Arc<dyn SessionAttributeListener>>),
    All(Vec<Notifier>),
}

impl Notifier {
    pub fn builder() -> super::NotifierBuilder {
        super::NotifierBuilder::new()
    }

    /// Merge the non-empty groups; nothing left means [`Notifier::Unobserved`].
    pub fn combine(notifiers: impl IntoIterator<Item = Option<Notifier>>) -> Notifier {
        let list: Vec<Notifier> = notifiers.into_iter().flatten().collect();
        if list.is_empty() {
            Notifier::Unobserved
        } else {
            Notifier::All(list)
        }
    }

    /// Wrap `session` so its mutations raise events. A new session raises
    /// `session_created` before this returns.
    pub fn observe(self: &Arc<Self>, session: Session) -> Result<ObservedSession, SessionError> {
        debug!("Observing session {} ({:?})", session.id(), session.kind());
        ObservedSession::new(Arc::clone(self), session)
    }

    pub fn session_created(&self, session: &ObservedSession) -> ListenerResult {
        match self {
            Notifier::Lifecycle(listeners) => listeners
                .iter()
                .try_for_each(|l| l.session_created(session)),
            Notifier::All(all) => all.iter().try_for_each(|n| n.session_created(session)),
            _ => Ok(()),
        }
    }

    pub fn session_destroyed(&self, session: &ObservedSession) -> ListenerResult {
        match self {
            Notifier::Lifecycle(listeners) => listeners
                .iter()
                .try_for_each(|l| l.session_destroyed(session)),
            Notifier::All(all) => all.iter().try_for_each(|n| n.session_destroyed(session)),
            _ => Ok(()),
        }
    }

    pub fn attribute_added(
        &self,
        session: &ObservedSession,
        name: &str,
        value: &AttributeValue,
    ) -> ListenerResult {
        match self {
            Notifier::Attributes(listeners) => listeners
                .iter()
                .try_for_each(|l| l.attribute_added(session, name, value)),
            Notifier::All(all) => all
                .iter()
                .try_for_each(|n| n.attribute_added(session, name, value)),
            _ => Ok(()),
        }
    }

    pub fn attribute_removed(
        &self,
        session: &ObservedSession,
        name: &str,
        previous: Option<&AttributeValue>,
    ) -> ListenerResult {
        match self {
            Notifier::Attributes(listeners) => listeners
                .iter()
                .try_for_each(|l| l.attribute_removed(session, name, previous)),
            Notifier::All(all) => all
                .iter()
                .try_for_each(|n| n.attribute_removed(session, name, previous)),
            _ => Ok(()),
        }
    }

    pub fn attribute_replaced(
        &self,
        session: &ObservedSession,
        name: &str,
        previous: &AttributeValue,
        value: &AttributeValue,
    ) -> ListenerResult {
        match self {
            Notifier::Attributes(listeners) => listeners
                .iter()
                .try_for_each(|l| l.attribute_replaced(session, name, previous, value)),
            Notifier::All(all) => all
                .iter()
                .try_for_each(|n| n.attribute_replaced(session, name, previous, value)),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notifier::Unobserved => f.write_str("Unobserved"),
            Notifier::Lifecycle(l) => write!(f, "Lifecycle({} listeners)", l.len()),
            Notifier::Attributes(l) => write!(f, "Attributes({} listeners)", l.len()),
            Notifier::All(all) => f.debug_list().entries(all).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::MockSessionListener;

    #[test]
    fn test_combine_without_groups_is_unobserved() {
        assert!(matches!(Notifier::combine([None, None]), Notifier::Unobserved));
        assert!(matches!(
            Notifier::combine([Some(Notifier::Lifecycle(vec![])), None]),
            Notifier::All(ref list) if list.len() == 1
        ));
    }

    #[test]
    fn test_fan_out_stops_at_first_failure() {
        let mut first = MockSessionListener::new();
        first
            .expect_session_destroyed()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("first failed")));
        let mut second = MockSessionListener::new();
        second.expect_session_destroyed().times(0);

        let notifier = Arc::new(
            Notifier::builder()
                .add_session_listener(Arc::new(first))
                .add_session_listener(Arc::new(second))
                .build(),
        );
        let mut observed = notifier
            .observe(Session::restored(
                uuid::Uuid::new_v4(),
                chrono::Utc::now(),
                chrono::Utc::now(),
                0,
                Default::default(),
            ))
            .unwrap();

        let err = observed.invalidate().unwrap_err();
        assert!(matches!(err, SessionError::Listener(ref e) if e.to_string() == "first failed"));
    }
}
