// ============================================================================
// Token Session Core - Attribute Values
// File: crates/tksession-core/src/domain/value.rs
// ============================================================================
//! Values stored under session attribute names

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::listener::{ListenerResult, ObservedSession};

/// Application type carried in a session.
///
/// The binary codec writes `type_tag()` followed by `encode()`; decoding
/// looks the tag up among the decoders registered on the codec.
pub trait SessionObject: fmt::Debug + Send + Sync {
    fn type_tag(&self) -> &str;

    fn encode(&self) -> Vec<u8>;

    fn as_any(&self) -> &dyn Any;

    /// Called after the object was stored under `name`.
    fn value_bound(&self, _session: &ObservedSession, _name: &str) -> ListenerResult {
        Ok(())
    }

    /// Called after the object was replaced or removed from `name`.
    fn value_unbound(&self, _session: &ObservedSession, _name: &str) -> ListenerResult {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
    Object(Arc<dyn SessionObject>),
}

impl AttributeValue {
    pub fn object<T: SessionObject + 'static>(value: T) -> Self {
        AttributeValue::Object(Arc::new(value))
    }

    /// `Json(null)` is the one value that counts as "no value".
    pub fn is_empty(&self) -> bool {
        matches!(self, AttributeValue::Json(serde_json::Value::Null))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            AttributeValue::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            AttributeValue::Object(o) => o.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    pub(crate) fn bound(&self, session: &ObservedSession, name: &str) -> ListenerResult {
        match self {
            AttributeValue::Object(o) => o.value_bound(session, name),
            _ => Ok(()),
        }
    }

    pub(crate) fn unbound(&self, session: &ObservedSession, name: &str) -> ListenerResult {
        match self {
            AttributeValue::Object(o) => o.value_unbound(session, name),
            _ => Ok(()),
        }
    }
}

impl PartialEq for AttributeValue {
    fn eq(&self, other: &Self) -> bool {
        use AttributeValue::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Text(a), Text(b)) => a == b,
            (Bytes(a), Bytes(b)) => a == b,
            (Json(a), Json(b)) => a == b,
            // Objects compare by their wire form.
            (Object(a), Object(b)) => a.type_tag() == b.type_tag() && a.encode() == b.encode(),
            _ => false,
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        AttributeValue::Int(i64::from(v))
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Text(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::Text(v)
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(v: Vec<u8>) -> Self {
        AttributeValue::Bytes(v)
    }
}

impl From<serde_json::Value> for AttributeValue {
    fn from(v: serde_json::Value) -> Self {
        AttributeValue::Json(v)
    }
}
