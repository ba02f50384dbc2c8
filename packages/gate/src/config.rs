//! Access gate configuration.

use chrono::Duration;

/// How long an issued session stays valid unless configured otherwise.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 8;

/// Secrets and limits for the access gate.
///
/// Built once at startup and handed to [`crate::AccessGate::new`]; the gate
/// never changes it afterwards.
#[derive(Clone)]
pub struct GateConfig {
    /// Shared administrative password.
    pub admin_password: String,
    /// HMAC secret used to sign session tokens.
    pub signing_secret: String,
    /// Validity window of an issued session.
    pub session_ttl: Duration,
}

impl GateConfig {
    pub fn new(admin_password: impl Into<String>, signing_secret: impl Into<String>) -> Self {
        Self {
            admin_password: admin_password.into(),
            signing_secret: signing_secret.into(),
            session_ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
        }
    }

    /// Set the session validity window.
    pub fn with_session_ttl(mut self, session_ttl: Duration) -> Self {
        self.session_ttl = session_ttl;
        self
    }
}

impl std::fmt::Debug for GateConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateConfig")
            .field("admin_password", &"<redacted>")
            .field("signing_secret", &"<redacted>")
            .field("session_ttl", &self.session_ttl)
            .finish()
    }
}
