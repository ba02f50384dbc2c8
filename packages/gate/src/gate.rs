//! The access gate in front of privileged queue operations.

use actors::QueueStore;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use waitline_core::{EntryId, QueueError};

use crate::session::{ADMIN_ROLE, Session, SessionClaims, SessionCodec};
use crate::{GateConfig, GateError};

/// Which credential variant authorized a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    /// The raw administrative password presented as a bearer credential.
    Password,
    /// A session token issued by this gate.
    Session,
}

/// Proof that the current call was authorized.
///
/// Not `Clone`: it is produced per call and consumed by the operation it
/// guards.
#[derive(Debug, PartialEq, Eq)]
pub struct AdminCapability {
    method: AuthMethod,
    expires_at: Option<DateTime<Utc>>,
}

impl AdminCapability {
    pub fn method(&self) -> AuthMethod {
        self.method
    }

    /// Session expiry, `None` when authorized by password.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

/// Authorizes administrative calls against one shared credential.
///
/// Holds no mutable state, so a single instance can be shared freely across
/// concurrent requests.
pub struct AccessGate {
    config: GateConfig,
    codec: SessionCodec,
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AccessGate {
    pub fn new(config: GateConfig) -> Self {
        let codec = SessionCodec::new(&config.signing_secret);
        Self { config, codec }
    }

    /// Check a presented credential.
    ///
    /// The raw password is tried first, then a session token. Both paths end
    /// in the same capability or the same refusal.
    pub fn authorize(&self, presented: &str) -> Result<AdminCapability, GateError> {
        let result = self.check(presented);
        match &result {
            Ok(cap) => tracing::debug!(method = ?cap.method, "Administrative call authorized"),
            Err(e) => tracing::warn!(reason = %e, "Administrative call rejected"),
        }
        result
    }

    fn check(&self, presented: &str) -> Result<AdminCapability, GateError> {
        if presented.is_empty() {
            return Err(GateError::MissingCredential);
        }

        if constant_time_eq(presented, &self.config.admin_password) {
            return Ok(AdminCapability {
                method: AuthMethod::Password,
                expires_at: None,
            });
        }

        let claims = self.codec.verify_admin(presented)?;
        Ok(AdminCapability {
            method: AuthMethod::Session,
            expires_at: DateTime::from_timestamp(claims.exp, 0),
        })
    }

    /// Exchange the administrative password for a time-limited session.
    pub fn issue_session(&self, password: &str) -> Result<Session, GateError> {
        if password.is_empty() {
            return Err(GateError::MissingCredential);
        }
        if !constant_time_eq(password, &self.config.admin_password) {
            tracing::warn!("Session requested with invalid password");
            return Err(GateError::InvalidCredential);
        }

        let now = Utc::now();
        let expires_at = now + self.config.session_ttl;
        let claims = SessionClaims {
            sub: ADMIN_ROLE.to_string(),
            role: ADMIN_ROLE.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = self.codec.sign(&claims)?;

        tracing::info!(%expires_at, "Issued administrative session");
        Ok(Session { token, expires_at })
    }

    /// Remove an entry on behalf of an administrator.
    ///
    /// Authorization runs before the store is consulted, so a refused caller
    /// learns nothing about whether `entry_id` exists.
    pub async fn remove_by_id(
        &self,
        store: &QueueStore,
        entry_id: &str,
        credential: &str,
    ) -> Result<EntryId, QueueError> {
        let cap = self.authorize(credential)?;
        let id = EntryId::parse(entry_id).map_err(|_| QueueError::NotFound(entry_id.to_string()))?;

        let removed = store.remove_by_id(id).await?;
        tracing::info!(entry_id = %removed, method = ?cap.method(), "Entry removed");
        Ok(removed)
    }

    /// Wipe the line on behalf of an administrator.
    pub async fn clear(&self, store: &QueueStore, credential: &str) -> Result<usize, QueueError> {
        let cap = self.authorize(credential)?;

        let removed = store.clear().await?;
        tracing::info!(removed, method = ?cap.method(), "Queue cleared");
        Ok(removed)
    }
}

/// Compare two secrets without leaking where or whether their lengths differ.
fn constant_time_eq(a: &str, b: &str) -> bool {
    let hash_a = Sha256::digest(a.as_bytes());
    let hash_b = Sha256::digest(b.as_bytes());

    hash_a
        .iter()
        .zip(hash_b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
