use std::error::Error;
use std::sync::LazyLock;

use api::{DbConfig, GateConfig, QueueService, ServiceConfig};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard};
use tower::ServiceExt;

pub const PASSWORD: &str = "http-password";

static TEST_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub struct TestApp {
    pub router: Router,
    pub service: QueueService,
    _guard: MutexGuard<'static, ()>,
}

pub async fn setup_app() -> Result<TestApp, Box<dyn Error>> {
    let guard = TEST_LOCK.lock().await;
    stop_running_store().await;
    init_shared_db().await?;
    db::get_db()?.query("DELETE entry;").await?.check()?;

    // Tests leave the store running, so it must live on the shared runtime
    // too for the next setup to be able to stop it.
    let service = DB_RUNTIME
        .spawn(api::init(ServiceConfig::new(
            DbConfig::memory(),
            GateConfig::new(PASSWORD, "http-secret"),
        )))
        .await
        .expect("service init task panicked")?;
    let router = server::router(server::AppState::new(service.clone()));

    Ok(TestApp {
        router,
        service,
        _guard: guard,
    })
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(
        &self,
        uri: &str,
        body: Value,
        bearer: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::post(uri).header("content-type", "application/json");
        if let Some(credential) = bearer {
            builder = builder.header("authorization", format!("Bearer {credential}"));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }
}

/// Tests leave their store running; the next setup stops it.
async fn stop_running_store() {
    if let Some(cell) = ractor::registry::where_is(actors::QUEUE_ACTOR_NAME.to_string()) {
        let _ = cell.stop_and_wait(None, None).await;
    }
}

/// Every `#[tokio::test]` runs on its own runtime, but the global connection's
/// engine task and the store actor live on the runtime that started them, so
/// start them on one shared runtime that outlives all tests in this binary.
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
