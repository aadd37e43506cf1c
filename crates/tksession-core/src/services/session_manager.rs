// ============================================================================
// Token Session Core - Session Manager
// File: crates/tksession-core/src/services/session_manager.rs
// ============================================================================
//! Turns an incoming token into the session a request works with, and the
//! session left at the end of the request into the outgoing token.

use std::mem;
use std::sync::Arc;

use tksession_shared::SessionSettings;
use tracing::{debug, info, warn};

use crate::codec::{Base64Codec, BinaryCodec, EncryptedCodec};
use crate::domain::{now_millis, ManagedSession, Session, SessionOps};
use crate::error::SessionError;
use crate::listener::Notifier;

/// Owns the codec chain and the notifier; shared by all requests.
#[derive(Debug)]
pub struct SessionManager {
    codec: Base64Codec<EncryptedCodec<BinaryCodec>>,
    notifier: Arc<Notifier>,
    default_ttl: i32,
}

impl SessionManager {
    pub fn new(secret: &str, binary: BinaryCodec, notifier: Arc<Notifier>, default_ttl: i32) -> Self {
        let codec = Base64Codec::new(EncryptedCodec::new(secret, binary));
        info!("Session manager ready (default ttl {}s)", default_ttl.max(0));
        Self {
            codec,
            notifier,
            default_ttl: default_ttl.max(0),
        }
    }

    pub fn from_config(settings: &SessionSettings, notifier: Arc<Notifier>) -> Self {
        Self::new(&settings.secret, BinaryCodec::new(), notifier, settings.default_ttl())
    }

    pub fn default_ttl(&self) -> i32 {
        self.default_ttl
    }

    pub fn notifier(&self) -> &Arc<Notifier> {
        &self.notifier
    }

    /// Decode path. Expired sessions are returned as well; deciding what to
    /// do with them is up to the caller.
    pub fn restore(&self, token: &str) -> Result<Session, SessionError> {
        self.codec.read_token(token).map_err(|e| {
            warn!("Session token rejected: {}", e);
            e
        })
    }

    /// Encode path.
    pub fn persist(&self, session: &dyn SessionOps) -> Result<String, SessionError> {
        self.codec.write_token(session)
    }

    /// Start the exchange for one request carrying `token` (if any).
    pub fn begin(&self, token: Option<&str>) -> SessionExchange<'_> {
        let incoming = match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => Incoming::Token(token.to_string()),
            None => Incoming::Absent,
        };
        SessionExchange {
            manager: self,
            incoming,
            session: None,
        }
    }

    fn resolve(&self, token: &str) -> Result<Incoming, SessionError> {
        let session = self.restore(token)?;
        if !session.expired() {
            return Ok(Incoming::Restored(session));
        }

        debug!("Session {} expired, destroying", session.id());
        let mut expired = ManagedSession::new(self.notifier.observe(session)?);
        expired.invalidate()?;
        Ok(Incoming::Expired)
    }

    fn create(&self) -> Result<ManagedSession, SessionError> {
        let mut session = ManagedSession::new(self.notifier.observe(Session::new())?);
        session.set_max_inactive_interval(self.default_ttl);
        debug!("Session {} created", session.id());
        Ok(session)
    }
}

/// What the request brought with it.
#[derive(Debug)]
enum Incoming {
    Absent,
    /// Not decoded yet
    Token(String),
    Restored(Session),
    Expired,
    /// Handed over to the exchange's session slot
    Attached,
}

/// One request/response pass over a [`SessionManager`].
#[derive(Debug)]
pub struct SessionExchange<'a> {
    manager: &'a SessionManager,
    incoming: Incoming,
    session: Option<ManagedSession>,
}

impl SessionExchange<'_> {
    /// The request's session.
    ///
    /// A token is decoded on the first call; a token that cannot be decoded
    /// yields the same error on every call and never falls back to a new
    /// session. Without a usable session, one is created only when `create`
    /// is set.
    pub fn session(&mut self, create: bool) -> Result<Option<&mut ManagedSession>, SessionError> {
        if let Incoming::Token(token) = &self.incoming {
            let token = token.clone();
            self.incoming = self.manager.resolve(&token)?;
        }

        if self.session.is_none() {
            match mem::replace(&mut self.incoming, Incoming::Attached) {
                Incoming::Restored(mut session) => {
                    session.touch(now_millis());
                    debug!("Session {} restored", session.id());
                    self.session = Some(ManagedSession::new(self.manager.notifier.observe(session)?));
                }
                other => {
                    self.incoming = other;
                    if create {
                        self.session = Some(self.manager.create()?);
                    }
                }
            }
        }

        Ok(self.session.as_mut())
    }

    /// Whether the request arrived with a session that had already expired.
    pub fn had_expired_session(&self) -> bool {
        matches!(self.incoming, Incoming::Expired)
    }

    /// The outgoing token: present only for a live, unexpired session.
    pub fn commit(self) -> Result<Option<String>, SessionError> {
        match &self.session {
            Some(session) if !session.is_invalidated() && !session.expired() => {
                self.manager.persist(session).map(Some)
            }
            _ => Ok(None),
        }
    }
}
