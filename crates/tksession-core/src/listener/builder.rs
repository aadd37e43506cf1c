//! Notifier assembly

use std::sync::Arc;

use super::{Notifier, SessionAttributeListener, SessionListener};

/// Collects listeners and produces the matching [`Notifier`].
///
/// Lifecycle listeners always run before attribute listeners.
#[derive(Default)]
pub struct NotifierBuilder {
    session_listeners: Vec<Arc<dyn SessionListener>>,
    attribute_listeners: Vec<Arc<dyn SessionAttributeListener>>,
}

impl NotifierBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_session_listener(mut self, listener: Arc<dyn SessionListener>) -> Self {
        self.session_listeners.push(listener);
        self
    }

    pub fn add_attribute_listener(mut self, listener: Arc<dyn SessionAttributeListener>) -> Self {
        self.attribute_listeners.push(listener);
        self
    }

    pub fn build(self) -> Notifier {
        let lifecycle = (!self.session_listeners.is_empty())
            .then(|| Notifier::Lifecycle(self.session_listeners));
        let attributes = (!self.attribute_listeners.is_empty())
            .then(|| Notifier::Attributes(self.attribute_listeners));
        Notifier::combine([lifecycle, attributes])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Session, SessionOps};
    use crate::listener::MockSessionListener;

    struct Noop;
    impl SessionAttributeListener for Noop {}

    #[test]
    fn test_empty_builder_is_unobserved() {
        assert!(matches!(Notifier::builder().build(), Notifier::Unobserved));
    }

    #[test]
    fn test_groups_in_registration_order() {
        let notifier = Notifier::builder()
            .add_attribute_listener(Arc::new(Noop))
            .add_session_listener(Arc::new(MockSessionListener::new()))
            .build();

        match notifier {
            Notifier::All(groups) => {
                assert_eq!(groups.len(), 2);
                assert!(matches!(groups[0], Notifier::Lifecycle(ref l) if l.len() == 1));
                assert!(matches!(groups[1], Notifier::Attributes(ref l) if l.len() == 1));
            }
            other => panic!("unexpected notifier {:?}", other),
        }
    }

    #[test]
    fn test_every_lifecycle_listener_is_called() {
        let mut first = MockSessionListener::new();
        first.expect_session_created().times(1).returning(|_| Ok(()));
        let mut second = MockSessionListener::new();
        second
            .expect_session_created()
            .withf(|s| s.is_new().unwrap())
            .times(1)
            .returning(|_| Ok(()));

        let notifier = Arc::new(
            Notifier::builder()
                .add_session_listener(Arc::new(first))
                .add_session_listener(Arc::new(second))
                .build(),
        );
        notifier.observe(Session::new()).unwrap();
    }
}
