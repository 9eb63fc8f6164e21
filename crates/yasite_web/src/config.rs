//! Runtime settings handed to the HTTP layer by the binary.

use std::time::Duration;
use yasite_core::service::account_service::DEFAULT_SESSION_TTL;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "sessionid";

/// Where anonymous users are sent for protected pages.
pub const LOGIN_URL: &str = "/auth/login/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    /// Lifetime of a session opened by a successful login.
    pub session_ttl: Duration,
    /// Marks the session cookie `Secure` (serve behind TLS only).
    pub secure_cookies: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            session_ttl: DEFAULT_SESSION_TTL,
            secure_cookies: false,
        }
    }
}
