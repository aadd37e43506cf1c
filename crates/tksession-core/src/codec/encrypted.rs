//! Encryption stage

use tksession_security::TokenCipher;
use tracing::debug;

use super::SessionCodec;
use crate::domain::{Session, SessionOps};
use crate::error::SessionError;

/// Seals the output of the wrapped stage with AES-256-GCM.
///
/// Any decryption failure (wrong key, truncation, tampering) is reported as
/// [`SessionError::InvalidToken`] before the inner stage sees a byte.
#[derive(Debug)]
pub struct EncryptedCodec<C> {
    cipher: TokenCipher,
    next: C,
}

impl<C: SessionCodec> EncryptedCodec<C> {
    pub fn new(secret: &str, next: C) -> Self {
        Self {
            cipher: TokenCipher::new(secret),
            next,
        }
    }

    pub fn with_cipher(cipher: TokenCipher, next: C) -> Self {
        Self { cipher, next }
    }

    pub fn inner(&self) -> &C {
        &self.next
    }
}

impl<C: SessionCodec> SessionCodec for EncryptedCodec<C> {
    fn encode(&self, session: &dyn SessionOps) -> Result<Vec<u8>, SessionError> {
        let plain = self.next.encode(session)?;
        self.cipher
            .encrypt(&plain)
            .map_err(|e| SessionError::Encoding(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Session, SessionError> {
        let plain = self.cipher.decrypt(bytes).map_err(|e| {
            debug!("Token failed authentication: {}", e);
            SessionError::InvalidToken(e.to_string())
        })?;
        self.next.decode(&plain)
    }
}
