use thiserror::Error;
use waitline_core::QueueError;

/// Why an authorization attempt was refused.
///
/// Callers outside the gate only ever see [`QueueError::Unauthorized`]; the
/// detail is kept for logs.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("missing credential")]
    MissingCredential,

    #[error("invalid credential")]
    InvalidCredential,

    #[error("session expired")]
    Expired,

    #[error("role '{0}' may not perform administrative operations")]
    Forbidden(String),

    #[error("failed to sign session: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

impl From<GateError> for QueueError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::Signing(e) => QueueError::Internal(e.to_string()),
            _ => QueueError::Unauthorized,
        }
    }
}
