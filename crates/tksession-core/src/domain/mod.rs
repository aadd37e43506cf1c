//! # Token Session Core - Domain Module
//! 
//! Session entity, attribute values, and the managed wrapper.

pub mod session;
pub mod value;
pub mod managed;

pub use session::{now_millis, Session, SessionKind, SessionOps};
pub use value::{AttributeValue, SessionObject};
pub use managed::{Lifecycle, ManagedSession};
