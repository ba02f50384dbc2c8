//! Actor-backed ordered queue store.
//!
//! # Architecture
//!
//! - `QueueActor` - Owns the line; handles one message at a time
//! - `QueueStore` - Cloneable handle that turns calls into messages
//!
//! # Usage
//!
//! ```ignore
//! use actors::QueueStore;
//!
//! db::init(db::DbConfig::memory()).await?;
//! let (store, _handle) = QueueStore::start().await?;
//! let entry = store.join(JoinRequest::new("Alice")).await?;
//! ```

mod messages;
mod queue_actor;
mod store;

pub use messages::QueueMessage;
pub use queue_actor::QueueActor;
pub use store::{QUEUE_ACTOR_NAME, QueueStore};
