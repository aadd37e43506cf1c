//! # Token Session Core
//! 
//! Stateless server-side sessions: the whole session travels inside an
//! encrypted token and is rebuilt from it on every request.
//!
//! - [`domain`]: the session entity, attribute values, and the managed
//!   wrapper that owns the invalidation state machine
//! - [`listener`]: lifecycle and attribute listeners plus the notifier that
//!   observes sessions on their behalf
//! - [`codec`]: binary record, encryption, and base64 stages of the token
//! - [`services`]: the per-request coordinator used by transport layers

pub mod domain;
pub mod listener;
pub mod codec;
pub mod services;
pub mod error;

pub use codec::{AttributeCodec, Base64Codec, BinaryCodec, EncryptedCodec, ObjectDecoder, SessionCodec};
pub use domain::{AttributeValue, ManagedSession, Session, SessionKind, SessionObject, SessionOps};
pub use error::SessionError;
pub use listener::{Notifier, NotifierBuilder, ObservedSession, SessionAttributeListener, SessionListener};
pub use services::{SessionExchange, SessionManager};
