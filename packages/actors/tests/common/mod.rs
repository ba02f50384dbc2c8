use std::sync::LazyLock;

use tokio::sync::{Mutex, MutexGuard};

use db::{DbConfig, DbError};

static TEST_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub async fn setup_db() -> Result<MutexGuard<'static, ()>, DbError> {
    let guard = TEST_LOCK.lock().await;
    stop_running_store().await;
    init_shared_db().await?;
    let db_conn = db::get_db()?;
    db_conn.query("REMOVE TABLE IF EXISTS entry;").await?.check()?;
    db::init_schema().await?;
    Ok(guard)
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

async fn init_shared_db() -> Result<(), DbError> {
    DB_RUNTIME
        .spawn(db::init(DbConfig::memory()))
        .await
        .expect("database init task panicked")
}
