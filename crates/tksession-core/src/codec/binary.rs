// ============================================================================
// Token Session Core - Binary Codec
// File: crates/tksession-core/src/codec/binary.rs
// Description: Self-contained binary record of a session
// ============================================================================

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bytes::{BufMut, BytesMut};
use chrono::{DateTime, Utc};
use tksession_proto::{self as proto, ProtoError, SessionHeader, ValueTag};
use tracing::debug;

use super::SessionCodec;
use crate::domain::{AttributeValue, Session, SessionObject, SessionOps};
use crate::error::SessionError;

/// Rebuilds a [`SessionObject`] from its payload; `None` rejects the payload.
pub type ObjectDecoder = fn(&[u8]) -> Option<Arc<dyn SessionObject>>;

/// Replaces the generic value encoding for one attribute name.
pub trait AttributeCodec: Send + Sync {
    fn encode(&self, value: &AttributeValue) -> Result<Vec<u8>, SessionError>;

    fn decode(&self, payload: &[u8]) -> Result<AttributeValue, SessionError>;
}

/// Innermost stage: session metadata plus every attribute, each value
/// prefixed by a [`ValueTag`].
#[derive(Default)]
pub struct BinaryCodec {
    object_decoders: HashMap<String, ObjectDecoder>,
    attribute_codecs: HashMap<String, Arc<dyn AttributeCodec>>,
}

impl BinaryCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the decoder for objects written with `type_tag`.
    pub fn with_object_decoder(mut self, type_tag: &str, decoder: ObjectDecoder) -> Self {
        self.object_decoders.insert(type_tag.to_string(), decoder);
        self
    }

    /// Route the attribute called `name` through `codec` instead of the
    /// generic value encoding.
    pub fn with_attribute_codec(mut self, name: &str, codec: Arc<dyn AttributeCodec>) -> Self {
        self.attribute_codecs.insert(name.to_string(), codec);
        self
    }

    fn encode_value(&self, name: &str, value: &AttributeValue, out: &mut BytesMut) -> Result<(), SessionError> {
        if let Some(codec) = self.attribute_codecs.get(name) {
            let payload = codec.encode(value)?;
            proto::put_tag(out, ValueTag::Named);
            return proto::put_bytes(out, &payload).map_err(encoding);
        }

        match value {
            AttributeValue::Bool(b) => {
                proto::put_tag(out, ValueTag::Bool);
                out.put_u8(u8::from(*b));
            }
            AttributeValue::Int(i) => {
                proto::put_tag(out, ValueTag::Int);
                out.put_i64_le(*i);
            }
            AttributeValue::Float(f) => {
                proto::put_tag(out, ValueTag::Float);
                out.put_f64_le(*f);
            }
            AttributeValue::Text(s) => {
                proto::put_tag(out, ValueTag::Text);
                proto::put_str(out, s).map_err(encoding)?;
            }
            AttributeValue::Bytes(b) => {
                proto::put_tag(out, ValueTag::Bytes);
                proto::put_bytes(out, b).map_err(encoding)?;
            }
            AttributeValue::Json(v) => {
                let json = serde_json::to_vec(v)
                    .map_err(|e| SessionError::Encoding(format!("attribute {}: {}", name, e)))?;
                proto::put_tag(out, ValueTag::Json);
                proto::put_bytes(out, &json).map_err(encoding)?;
            }
            AttributeValue::Object(o) => {
                proto::put_tag(out, ValueTag::Object);
                proto::put_short_str(out, o.type_tag()).map_err(encoding)?;
                proto::put_bytes(out, &o.encode()).map_err(encoding)?;
            }
        }
        Ok(())
    }

    fn decode_value(&self, name: &str, p: &mut &[u8]) -> Result<AttributeValue, String> {
        let value = match proto::get_tag(p).map_err(reason)? {
            ValueTag::Bool => match proto::get_u8(p).map_err(reason)? {
                0 => AttributeValue::Bool(false),
                1 => AttributeValue::Bool(true),
                other => return Err(format!("invalid bool byte {}", other)),
            },
            ValueTag::Int => AttributeValue::Int(proto::get_i64(p).map_err(reason)?),
            ValueTag::Float => AttributeValue::Float(proto::get_f64(p).map_err(reason)?),
            ValueTag::Text => AttributeValue::Text(proto::get_str(p).map_err(reason)?),
            ValueTag::Bytes => AttributeValue::Bytes(proto::get_bytes(p).map_err(reason)?.to_vec()),
            ValueTag::Json => {
                let raw = proto::get_bytes(p).map_err(reason)?;
                AttributeValue::Json(serde_json::from_slice(raw).map_err(|e| e.to_string())?)
            }
            ValueTag::Object => {
                let type_tag = proto::get_short_str(p).map_err(reason)?;
                let payload = proto::get_bytes(p).map_err(reason)?;
                let decoder = self
                    .object_decoders
                    .get(&type_tag)
                    .ok_or_else(|| format!("no decoder for object type {}", type_tag))?;
                let object = decoder(payload)
                    .ok_or_else(|| format!("undecodable {} payload", type_tag))?;
                AttributeValue::Object(object)
            }
            ValueTag::Named => {
                let payload = proto::get_bytes(p).map_err(reason)?;
                let codec = self
                    .attribute_codecs
                    .get(name)
                    .ok_or_else(|| "no attribute codec registered".to_string())?;
                codec.decode(payload).map_err(|e| e.to_string())?
            }
        };
        Ok(value)
    }
}

fn encoding(e: ProtoError) -> SessionError {
    SessionError::Encoding(e.to_string())
}

fn reason(e: ProtoError) -> String {
    e.to_string()
}

fn timestamp(ms: i64, field: &str) -> Result<DateTime<Utc>, SessionError> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| SessionError::InvalidToken(format!("{} out of range", field)))
}

impl SessionCodec for BinaryCodec {
    fn encode(&self, session: &dyn SessionOps) -> Result<Vec<u8>, SessionError> {
        let mut names = session.attribute_names()?;
        names.sort();

        let header = SessionHeader {
            id: session.id(),
            creation_ms: session.creation_time()?.timestamp_millis(),
            last_accessed_ms: session.last_accessed_time()?.timestamp_millis(),
            max_inactive_interval: session.max_inactive_interval(),
            attribute_count: u32::try_from(names.len())
                .map_err(|_| SessionError::Encoding("too many attributes".into()))?,
        };

        let mut out = BytesMut::with_capacity(proto::HEADER_LEN + 64 * names.len());
        proto::encode_header(&header, &mut out);

        for name in &names {
            let value = session.attribute(name)?.ok_or_else(|| {
                SessionError::Encoding(format!("attribute {} listed but not readable", name))
            })?;
            proto::put_str(&mut out, name).map_err(encoding)?;
            self.encode_value(name, value, &mut out)?;
        }

        Ok(out.to_vec())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Session, SessionError> {
        let mut p = bytes;
        let header = proto::decode_header(&mut p)
            .map_err(|e| SessionError::InvalidToken(e.to_string()))?;

        let creation_time = timestamp(header.creation_ms, "creation time")?;
        let last_accessed_time = timestamp(header.last_accessed_ms, "last accessed time")?;
        if last_accessed_time < creation_time {
            return Err(SessionError::InvalidToken(
                "last accessed time precedes creation time".into(),
            ));
        }

        let mut attributes = HashMap::new();
        for index in 0..header.attribute_count {
            let name = proto::get_str(&mut p).map_err(|e| SessionError::CorruptAttribute {
                name: format!("#{}", index),
                reason: e.to_string(),
            })?;
            let value = self
                .decode_value(&name, &mut p)
                .map_err(|reason| SessionError::CorruptAttribute {
                    name: name.clone(),
                    reason,
                })?;
            match attributes.entry(name) {
                Entry::Occupied(slot) => {
                    return Err(SessionError::CorruptAttribute {
                        name: slot.key().clone(),
                        reason: "duplicate attribute".into(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
            }
        }

        if !p.is_empty() {
            return Err(SessionError::InvalidToken(format!(
                "{} trailing bytes",
                p.len()
            )));
        }

        debug!("Decoded session {} with {} attributes", header.id, attributes.len());
        Ok(Session::restored(
            header.id,
            creation_time,
            last_accessed_time,
            header.max_inactive_interval,
            attributes,
        ))
    }
}

impl fmt::Debug for BinaryCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryCodec")
            .field("object_types", &self.object_decoders.keys().collect::<Vec<_>>())
            .field("named_attributes", &self.attribute_codecs.keys().collect::<Vec<_>>())
            .finish()
    }
}
