//! Access gate for administrative queue operations.
//!
//! Two credential variants are accepted, tried in order:
//! - the raw administrative password as a bearer credential
//! - an HS256 session token previously issued by this gate
//!
//! Sessions are verified statelessly; the only server-side state is the
//! signing secret.

mod config;
mod error;
mod gate;
mod session;

pub use config::{DEFAULT_SESSION_TTL_HOURS, GateConfig};
pub use error::GateError;
pub use gate::{AccessGate, AdminCapability, AuthMethod};
pub use session::{ADMIN_ROLE, Session, SessionClaims};
