//! SurrealDB integration for the waiting line.
//!
//! This crate provides database connectivity and the repository for
//! persisting queue entries.
//!
//! # Features
//!
//! - `memory` (default): in-memory storage, always compiled in
//! - `surrealkv`: embedded file storage (`surrealkv://path`)
//! - `rocksdb`: RocksDB file storage (`rocksdb://path`)
//! - `remote`: a SurrealDB server over WebSocket (`ws://host:port`)

mod connection;
mod schema;
pub mod repositories;

pub use connection::{Database, DbConfig, DbError, get_db, health_check, init_db};
pub use schema::init_schema;

/// Initialize the database with the given configuration.
///
/// This should be called once at application startup.
pub async fn init(config: DbConfig) -> Result<(), DbError> {
    init_db(config).await?;
    init_schema().await?;
    Ok(())
}
