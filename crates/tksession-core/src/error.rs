//! Session errors

use thiserror::Error;
use tksession_shared::constants::{INVALID_SESSION_TOKEN, INVALID_SESSION_TOKEN_STATUS};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("Corrupt session attribute {name}: {reason}")]
    CorruptAttribute { name: String, reason: String },

    #[error("Session was invalidated")]
    Invalidated,

    #[error("Session cannot be invalidated directly")]
    UnsupportedTransition,

    #[error("Session listener failed: {0}")]
    Listener(anyhow::Error),

    #[error("Session encoding failed: {0}")]
    Encoding(String),
}

impl SessionError {
    /// Token could not be turned back into a session. Transport layers
    /// reject the request instead of silently starting a new session.
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            SessionError::InvalidToken(_) | SessionError::CorruptAttribute { .. }
        )
    }

    /// Status and body a transport layer sends for a rejected token.
    pub fn rejection(&self) -> Option<(u16, &'static str)> {
        self.is_token_rejection()
            .then_some((INVALID_SESSION_TOKEN_STATUS, INVALID_SESSION_TOKEN))
    }
}
