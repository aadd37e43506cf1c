//! Transport stage: standard base64 so the token fits in a header value

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::SessionCodec;
use crate::domain::{Session, SessionOps};
use crate::error::SessionError;

#[derive(Debug)]
pub struct Base64Codec<C> {
    next: C,
}

impl<C: SessionCodec> Base64Codec<C> {
    pub fn new(next: C) -> Self {
        Self { next }
    }

    pub fn inner(&self) -> &C {
        &self.next
    }

    /// Decode a header value; surrounding whitespace is ignored.
    pub fn read_token(&self, token: &str) -> Result<Session, SessionError> {
        let raw = STANDARD
            .decode(token.trim())
            .map_err(|e| SessionError::InvalidToken(format!("bad base64: {}", e)))?;
        self.next.decode(&raw)
    }

    pub fn write_token(&self, session: &dyn SessionOps) -> Result<String, SessionError> {
        Ok(STANDARD.encode(self.next.encode(session)?))
    }
}

impl<C: SessionCodec> SessionCodec for Base64Codec<C> {
    fn encode(&self, session: &dyn SessionOps) -> Result<Vec<u8>, SessionError> {
        self.write_token(session).map(String::into_bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Session, SessionError> {
        let token = std::str::from_utf8(bytes)
            .map_err(|_| SessionError::InvalidToken("token is not ASCII".into()))?;
        self.read_token(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{BinaryCodec, EncryptedCodec};

    fn chain() -> Base64Codec<EncryptedCodec<BinaryCodec>> {
        Base64Codec::new(EncryptedCodec::new("secr3t", BinaryCodec::new()))
    }

    #[test]
    fn test_token_is_header_safe() {
        let mut session = Session::new();
        session.set_attribute("name", Some("Foo".into())).unwrap();
        let token = chain().write_token(&session).unwrap();

        assert!(token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"+/=".contains(&b)));
        let restored = chain().read_token(&format!("  {}\n", token)).unwrap();
        assert_eq!(restored.id(), session.id());
    }

    #[test]
    fn test_byte_interface_matches_text_interface() {
        let session = Session::new();
        let codec = chain();
        let bytes = codec.encode(&session).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap().id(), session.id());
    }

    #[test]
    fn test_garbage_tokens_rejected() {
        let codec = chain();
        for token in ["", "ASDF", "not base64!", "%%%%"] {
            assert!(
                matches!(codec.read_token(token), Err(SessionError::InvalidToken(_))),
                "token {:?}",
                token
            );
        }
        assert!(matches!(
            codec.decode(&[0xff, 0xfe]),
            Err(SessionError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_shared_chain_across_threads() {
        let codec = chain();
        std::thread::scope(|scope| {
            for n in 0..8i64 {
                let codec = &codec;
                scope.spawn(move || {
                    for i in 0..25i64 {
                        let mut session = Session::new();
                        session.set_attribute("worker", Some(n.into())).unwrap();
                        session.set_attribute("seq", Some(i.into())).unwrap();

                        let token = codec.write_token(&session).unwrap();
                        let restored = codec.read_token(&token).unwrap();
                        assert_eq!(restored.id(), session.id());
                        assert_eq!(restored.attributes(), session.attributes());
                    }
                });
            }
        });
    }

    #[test]
    fn test_tampered_token_rejected() {
        let codec = chain();
        let token = codec.write_token(&Session::new()).unwrap();
        let mut raw = STANDARD.decode(&token).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;

        assert!(matches!(
            codec.read_token(&STANDARD.encode(raw)),
            Err(SessionError::InvalidToken(_))
        ));
    }
}
