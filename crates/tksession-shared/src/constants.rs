//! Application-wide constants

pub const DEFAULT_SESSION_HEADER: &str = "X-SESSION";
pub const DEFAULT_SESSION_TIMEOUT_SECONDS: i64 = 1800;
pub const INVALID_SESSION_TOKEN: &str = "INVALID_SESSION_TOKEN";
pub const INVALID_SESSION_TOKEN_STATUS: u16 = 400;
