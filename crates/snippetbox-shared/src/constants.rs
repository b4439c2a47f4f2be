//! Application-wide constants

/// Number of snippets shown on the home page.
pub const LATEST_SNIPPETS_LIMIT: i64 = 10;
/// Expiry choices (in days) offered by the create-snippet form.
pub const PERMITTED_EXPIRY_DAYS: [i32; 3] = [1, 7, 365];
pub const DEFAULT_EXPIRY_DAYS: i32 = 365;
pub const MAX_TITLE_CHARS: usize = 100;
pub const MIN_PASSWORD_CHARS: usize = 8;
/// bcrypt work factor (log rounds).
pub const BCRYPT_COST: u32 = 12;
/// Where a freshly logged-in user lands when no redirect was remembered.
pub const DEFAULT_LOGIN_REDIRECT: &str = "/snippet/create";
pub const DEFAULT_SESSION_COOKIE: &str = "session";
pub const DEFAULT_SESSION_LIFETIME_HOURS: i64 = 12;
