//! Application-wide constants

/// Session key under which the external auth service stores the user id.
pub const USER_ID_SESSION_KEY: &str = "user_id";

/// Session key for the per-session CSRF token.
pub const CSRF_SESSION_KEY: &str = "csrf_token";

/// Confirmation codes avoid 0/O, 1/I/L so they can be read back over the phone.
pub const CONFIRMATION_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Symbols per confirmation code group.
pub const CONFIRMATION_CODE_GROUP_LEN: usize = 4;

/// Groups per confirmation code.
pub const CONFIRMATION_CODE_GROUPS: usize = 3;
