//! # Token Session Core - Listener Module
//! 
//! Container-style session callbacks. Sessions know nothing about their
//! observers: the [`Notifier`] wraps a [`Session`](crate::domain::Session)
//! in an [`ObservedSession`] that raises events around every mutation.

pub mod traits;
pub mod notifier;
pub mod builder;
pub mod observed;

pub use traits::{ListenerResult, SessionAttributeListener, SessionListener};
pub use notifier::Notifier;
pub use builder::NotifierBuilder;
pub use observed::ObservedSession;

#[cfg(test)]
pub use traits::MockSessionListener;
