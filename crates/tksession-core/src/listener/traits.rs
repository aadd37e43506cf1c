//! Listener traits (ports)

#[cfg(test)]
use mockall::automock;

use super::ObservedSession;
use crate::domain::AttributeValue;

/// Listener callbacks report failure through `anyhow`; the error reaches the
/// caller of the mutating session call unchanged.
pub type ListenerResult = anyhow::Result<()>;

/// Session lifecycle events.
#[cfg_attr(test, automock)]
pub trait SessionListener: Send + Sync {
    fn session_created(&self, _session: &ObservedSession) -> ListenerResult {
        Ok(())
    }

    fn session_destroyed(&self, _session: &ObservedSession) -> ListenerResult {
        Ok(())
    }
}

/// Attribute change events. `session` already reflects the change.
pub trait SessionAttributeListener: Send + Sync {
    fn attribute_added(
        &self,
        _session: &ObservedSession,
        _name: &str,
        _value: &AttributeValue,
    ) -> ListenerResult {
        Ok(())
    }

    /// `previous` is `None` when the name was not bound.
    fn attribute_removed(
        &self,
        _session: &ObservedSession,
        _name: &str,
        _previous: Option<&AttributeValue>,
    ) -> ListenerResult {
        Ok(())
    }

    fn attribute_replaced(
        &self,
        _session: &ObservedSession,
        _name: &str,
        _previous: &AttributeValue,
        _value: &AttributeValue,
    ) -> ListenerResult {
        Ok(())
    }
}
