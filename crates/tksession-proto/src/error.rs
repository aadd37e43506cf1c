use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtoError {
    #[error("payload truncated")]
    Truncated,
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u8),
    #[error("unknown value tag {0:#04x}")]
    UnknownTag(u8),
    #[error("invalid utf-8")]
    InvalidUtf8,
    #[error("field of {0} bytes exceeds its length prefix")]
    TooLarge(usize),
}
