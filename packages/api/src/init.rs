//! Startup of the waiting-line service.

use actors::QueueStore;
use db::DbConfig;
use gate::{AccessGate, GateConfig};
use waitline_core::QueueError;

use crate::QueueService;

/// Everything needed to bring the service up.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub db: DbConfig,
    pub gate: GateConfig,
}

impl ServiceConfig {
    pub fn new(db: DbConfig, gate: GateConfig) -> Self {
        Self { db, gate }
    }
}

/// Connect the database, apply the schema and start the queue actor.
///
/// Call once before serving requests. Any failure is returned so the caller
/// can exit instead of serving against an unreachable store.
pub async fn init(config: ServiceConfig) -> Result<QueueService, QueueError> {
    tracing::info!(endpoint = %config.db.endpoint, "Initializing waiting line...");

    db::init(config.db).await?;
    db::health_check().await?;

    let (store, _handle) = QueueStore::start().await?;
    let service = QueueService::new(store, AccessGate::new(config.gate));

    let waiting = service.list().await?.len();
    tracing::info!(waiting, "Waiting line initialized");
    Ok(service)
}
