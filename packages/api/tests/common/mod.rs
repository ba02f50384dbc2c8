use std::error::Error;
use std::sync::LazyLock;

use api::{DbConfig, GateConfig, QueueService, ServiceConfig};
use tokio::sync::{Mutex, MutexGuard};

pub const PASSWORD: &str = "service-password";

static TEST_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub async fn setup_service() -> Result<(MutexGuard<'static, ()>, QueueService), Box<dyn Error>> {
    let guard = TEST_LOCK.lock().await;
    stop_running_store().await;
    init_shared_db().await?;
    db::get_db()?.query("DELETE entry;").await?.check()?;

    let config = ServiceConfig::new(
        DbConfig::memory(),
        GateConfig::new(PASSWORD, "service-secret"),
    );
    let service = api::init(config).await?;
    Ok((guard, service))
}

/// A test that panicked before shutting down leaves its actor registered.
async fn stop_running_store() {
    if let Some(cell) = ractor::registry::where_is(actors::QUEUE_ACTOR_NAME.to_string()) {
        let _ = cell.stop_and_wait(None, None).await;
    }
}

/// Every `#[tokio::test]` runs on its own runtime, but the global connection's
/// engine task lives on the runtime that opened it, so open it on one shared
/// runtime that outlives all tests in this binary.
static DB_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("test database runtime")
});

async fn init_shared_db() -> Result<(), db::DbError> {
    DB_RUNTIME
        .spawn(db::init(DbConfig::memory()))
        .await
        .expect("database init task panicked")
}
