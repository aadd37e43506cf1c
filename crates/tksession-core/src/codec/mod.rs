//! # Token Session Core - Codec Chain
//!
//! A token is built by stacking stages, outermost first:
//!
//! ```text
//! Base64Codec( EncryptedCodec( BinaryCodec ) )
//! ```
//!
//! Every stage implements [`SessionCodec`], so a stage can be added or
//! removed without touching callers. Expiry is not a codec concern: an
//! expired session decodes like any other.

pub mod binary;
pub mod encrypted;
pub mod transport;

pub use binary::{AttributeCodec, BinaryCodec, ObjectDecoder};
pub use encrypted::EncryptedCodec;
pub use transport::Base64Codec;

use crate::domain::{Session, SessionOps};
use crate::error::SessionError;

/// One stage of the token codec chain.
pub trait SessionCodec: Send + Sync {
    fn encode(&self, session: &dyn SessionOps) -> Result<Vec<u8>, SessionError>;

    fn decode(&self, bytes: &[u8]) -> Result<Session, SessionError>;
}

impl<C: SessionCodec + ?Sized> SessionCodec for Box<C> {
    fn encode(&self, session: &dyn SessionOps) -> Result<Vec<u8>, SessionError> {
        (**self).encode(session)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Session, SessionError> {
        (**self).decode(bytes)
    }
}
