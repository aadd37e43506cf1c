//! Token encryption with AES-256-GCM
//!
//! Envelope: `nonce (12 bytes) || ciphertext || tag (16 bytes)`.
//!
//! The key is the SHA-256 digest of the configured secret, so any secret
//! length yields a full-width key. A fresh random nonce is drawn for every
//! call; the cipher itself holds no per-call state and is shared freely
//! across threads.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::info;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 16;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    #[error("Encryption failed")]
    EncryptionFailed,
    #[error("Decryption failed")]
    DecryptionFailed,
    #[error("Invalid ciphertext length: {0}")]
    InvalidLength(usize),
}

/// Key derived from the server secret.
/// Automatically zeroized on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; KEY_LEN]);

impl SecretKey {
    pub fn derive(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(&digest);
        Self(key)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Short identifier safe to log: first 4 bytes of SHA-256(key), hex.
    pub fn fingerprint(&self) -> String {
        hex::encode(&Sha256::digest(self.0)[..4])
    }
}

pub struct TokenCipher {
    cipher: Aes256Gcm,
    fingerprint: String,
}

impl TokenCipher {
    pub fn new(secret: &str) -> Self {
        let key = SecretKey::derive(secret);
        let fingerprint = key.fingerprint();
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
        info!("Token cipher ready (key fingerprint {})", fingerprint);
        Self { cipher, fingerprint }
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn encrypt(&self, plain: &[u8]) -> Result<Vec<u8>, CipherError> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce);

        let sealed = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plain)
            .map_err(|_| CipherError::EncryptionFailed)?;

        let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);
        Ok(out)
    }

    pub fn decrypt(&self, envelope: &[u8]) -> Result<Vec<u8>, CipherError> {
        if envelope.len() < NONCE_LEN + TAG_LEN {
            return Err(CipherError::InvalidLength(envelope.len()));
        }
        let (nonce, sealed) = envelope.split_at(NONCE_LEN);
        self.cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| CipherError::DecryptionFailed)
    }
}

impl std::fmt::Debug for TokenCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCipher")
            .field("fingerprint", &self.fingerprint)
            .finish_non_exhaustive()
    }
}
