use crate::{ProtoError, ValueTag, FORMAT_VERSION};
use bytes::{Buf, BufMut, BytesMut};
use uuid::Uuid;

/// version + id halves + two timestamps + interval + attribute count
pub const HEADER_LEN: usize = 1 + 8 + 8 + 8 + 8 + 4 + 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionHeader {
    pub id: Uuid,
    pub creation_ms: i64,
    pub last_accessed_ms: i64,
    pub max_inactive_interval: i32,
    pub attribute_count: u32,
}

pub fn encode_header(h: &SessionHeader, out: &mut BytesMut) {
    let (most, least) = h.id.as_u64_pair();
    out.reserve(HEADER_LEN);
    out.put_u8(FORMAT_VERSION);
    out.put_u64_le(most);
    out.put_u64_le(least);
    out.put_i64_le(h.creation_ms);
    out.put_i64_le(h.last_accessed_ms);
    out.put_i32_le(h.max_inactive_interval);
    out.put_u32_le(h.attribute_count);
}

pub fn decode_header(p: &mut &[u8]) -> Result<SessionHeader, ProtoError> {
    if p.remaining() < 1 {
        return Err(ProtoError::Truncated);
    }
    let ver = p.get_u8();
    if ver != FORMAT_VERSION {
        return Err(ProtoError::UnsupportedVersion(ver));
    }
    if p.remaining() < HEADER_LEN - 1 {
        return Err(ProtoError::Truncated);
    }

    let most = p.get_u64_le();
    let least = p.get_u64_le();
    Ok(SessionHeader {
        id: Uuid::from_u64_pair(most, least),
        creation_ms: p.get_i64_le(),
        last_accessed_ms: p.get_i64_le(),
        max_inactive_interval: p.get_i32_le(),
        attribute_count: p.get_u32_le(),
    })
}

pub fn put_tag(out: &mut BytesMut, tag: ValueTag) {
    out.put_u8(tag as u8);
}

pub fn get_tag(p: &mut &[u8]) -> Result<ValueTag, ProtoError> {
    ValueTag::try_from(get_u8(p)?)
}

pub fn get_u8(p: &mut &[u8]) -> Result<u8, ProtoError> {
    if p.remaining() < 1 {
        return Err(ProtoError::Truncated);
    }
    Ok(p.get_u8())
}

pub fn get_i64(p: &mut &[u8]) -> Result<i64, ProtoError> {
    if p.remaining() < 8 {
        return Err(ProtoError::Truncated);
    }
    Ok(p.get_i64_le())
}

pub fn get_f64(p: &mut &[u8]) -> Result<f64, ProtoError> {
    if p.remaining() < 8 {
        return Err(ProtoError::Truncated);
    }
    Ok(p.get_f64_le())
}

/// frame: [u32 len][bytes]
pub fn put_bytes(out: &mut BytesMut, value: &[u8]) -> Result<(), ProtoError> {
    let len = u32::try_from(value.len()).map_err(|_| ProtoError::TooLarge(value.len()))?;
    out.reserve(4 + value.len());
    out.put_u32_le(len);
    out.extend_from_slice(value);
    Ok(())
}

pub fn get_bytes<'a>(p: &mut &'a [u8]) -> Result<&'a [u8], ProtoError> {
    if p.remaining() < 4 {
        return Err(ProtoError::Truncated);
    }
    let len = p.get_u32_le() as usize;
    if p.remaining() < len {
        return Err(ProtoError::Truncated);
    }
    let (value, rest) = p.split_at(len);
    *p = rest;
    Ok(value)
}

pub fn put_str(out: &mut BytesMut, value: &str) -> Result<(), ProtoError> {
    put_bytes(out, value.as_bytes())
}

pub fn get_str(p: &mut &[u8]) -> Result<String, ProtoError> {
    let raw = get_bytes(p)?;
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|_| ProtoError::InvalidUtf8)
}

/// frame: [u16 len][utf-8], used for type tags
pub fn put_short_str(out: &mut BytesMut, value: &str) -> Result<(), ProtoError> {
    let len = u16::try_from(value.len()).map_err(|_| ProtoError::TooLarge(value.len()))?;
    out.reserve(2 + value.len());
    out.put_u16_le(len);
    out.extend_from_slice(value.as_bytes());
    Ok(())
}

pub fn get_short_str(p: &mut &[u8]) -> Result<String, ProtoError> {
    if p.remaining() < 2 {
        return Err(ProtoError::Truncated);
    }
    let len = p.get_u16_le() as usize;
    if p.remaining() < len {
        return Err(ProtoError::Truncated);
    }
    let value = std::str::from_utf8(&p[..len])
        .map_err(|_| ProtoError::InvalidUtf8)?
        .to_string();
    p.advance(len);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> SessionHeader {
        SessionHeader {
            id: Uuid::from_u64_pair(0x0102_0304_0506_0708, 0x1112_1314_1516_1718),
            creation_ms: 1_700_000_000_000,
            last_accessed_ms: 1_700_000_001_000,
            max_inactive_interval: 30,
            attribute_count: 2,
        }
    }

    #[test]
    fn test_header_layout_is_little_endian() {
        let mut out = BytesMut::new();
        encode_header(&sample_header(), &mut out);

        assert_eq!(out.len(), HEADER_LEN);
        assert_eq!(out[0], FORMAT_VERSION);
        assert_eq!(hex::encode(&out[1..9]), "0807060504030201");
        assert_eq!(hex::encode(&out[9..17]), "1817161514131211");
        assert_eq!(hex::encode(&out[33..37]), "1e000000");
        assert_eq!(hex::encode(&out[37..41]), "02000000");
    }

    #[test]
    fn test_header_decode_leaves_rest() {
        let mut out = BytesMut::new();
        encode_header(&sample_header(), &mut out);
        out.extend_from_slice(b"tail");

        let mut p = &out[..];
        assert_eq!(decode_header(&mut p).unwrap(), sample_header());
        assert_eq!(p, b"tail");
    }

    #[test]
    fn test_header_rejects_unknown_version() {
        let mut out = BytesMut::new();
        encode_header(&sample_header(), &mut out);
        out[0] = 9;

        let mut p = &out[..];
        assert_eq!(decode_header(&mut p), Err(ProtoError::UnsupportedVersion(9)));
    }

    #[test]
    fn test_header_rejects_truncation() {
        let mut out = BytesMut::new();
        encode_header(&sample_header(), &mut out);

        let mut p = &out[..HEADER_LEN - 1];
        assert_eq!(decode_header(&mut p), Err(ProtoError::Truncated));
        let mut empty: &[u8] = &[];
        assert_eq!(decode_header(&mut empty), Err(ProtoError::Truncated));
    }

    #[test]
    fn test_strings_keep_embedded_nul() {
        let mut out = BytesMut::new();
        put_str(&mut out, "a\0b").unwrap();
        put_short_str(&mut out, "tag").unwrap();

        let mut p = &out[..];
        assert_eq!(get_str(&mut p).unwrap(), "a\0b");
        assert_eq!(get_short_str(&mut p).unwrap(), "tag");
        assert!(p.is_empty());
    }

    #[test]
    fn test_length_prefix_beyond_input() {
        let mut out = BytesMut::new();
        put_bytes(&mut out, b"abcdef").unwrap();

        let mut p = &out[..out.len() - 1];
        assert_eq!(get_bytes(&mut p), Err(ProtoError::Truncated));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut out = BytesMut::new();
        put_bytes(&mut out, &[0xff, 0xfe]).unwrap();

        let mut p = &out[..];
        assert_eq!(get_str(&mut p), Err(ProtoError::InvalidUtf8));
    }

    #[test]
    fn test_unknown_tag() {
        let mut p: &[u8] = &[0x42];
        assert_eq!(get_tag(&mut p), Err(ProtoError::UnknownTag(0x42)));
    }
}
