use crate::ProtoError;

pub const FORMAT_VERSION: u8 = 1;

/// Leading byte of every encoded attribute value.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ValueTag {
    Bool = 0x01,
    Int = 0x02,
    Float = 0x03,
    Text = 0x04,
    Bytes = 0x05,
    Json = 0x06,
    Object = 0x07, // collaborator type tag + payload
    Named = 0x08,  // payload owned by a per-attribute codec
}

impl TryFrom<u8> for ValueTag {
    type Error = ProtoError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0x01 => Ok(ValueTag::Bool),
            0x02 => Ok(ValueTag::Int),
            0x03 => Ok(ValueTag::Float),
            0x04 => Ok(ValueTag::Text),
            0x05 => Ok(ValueTag::Bytes),
            0x06 => Ok(ValueTag::Json),
            0x07 => Ok(ValueTag::Object),
            0x08 => Ok(ValueTag::Named),
            other => Err(ProtoError::UnknownTag(other)),
        }
    }
}
