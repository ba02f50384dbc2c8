//! The process-wide SurrealDB handle.

use std::sync::LazyLock;

use surrealdb::Surreal;
use surrealdb::engine::any::{Any, connect};
use surrealdb::opt::auth::Root;
use thiserror::Error;
use tokio::sync::OnceCell;
use waitline_core::QueueError;

/// Connected SurrealDB client; the engine is picked from the endpoint scheme.
pub type Database = Surreal<Any>;

static DB: LazyLock<OnceCell<Database>> = LazyLock::new(OnceCell::new);

/// Where the line is stored.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// `mem://`, `surrealkv://path`, `rocksdb://path` or `ws://host:port`.
    /// Engines other than `mem` need the matching crate feature.
    pub endpoint: String,
    pub namespace: String,
    pub database: String,
    /// Root `(user, pass)`; only remote servers need it.
    pub credentials: Option<(String, String)>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::endpoint("mem://")
    }
}

impl DbConfig {
    /// Volatile in-process storage.
    pub fn memory() -> Self {
        Self::default()
    }

    pub fn endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            namespace: "waitline".to_string(),
            database: "main".to_string(),
            credentials: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_credentials(mut self, user: impl Into<String>, pass: impl Into<String>) -> Self {
        self.credentials = Some((user.into(), pass.into()));
        self
    }

    /// Scheme part of the endpoint, e.g. `mem` or `ws`.
    pub fn engine(&self) -> &str {
        self.endpoint
            .split_once("://")
            .map_or(self.endpoint.as_str(), |(scheme, _)| scheme)
    }

    /// Fail early when the endpoint's engine was not compiled in.
    pub fn check_engine(&self) -> Result<(), DbError> {
        let compiled = match self.engine() {
            "mem" | "memory" => true,
            "surrealkv" => cfg!(feature = "surrealkv"),
            "rocksdb" => cfg!(feature = "rocksdb"),
            "ws" | "wss" => cfg!(feature = "remote"),
            _ => false,
        };

        if compiled {
            Ok(())
        } else {
            Err(DbError::UnsupportedEngine(self.endpoint.clone()))
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database not initialized")]
    NotInitialized,
    #[error("storage engine for '{0}' is not enabled in this build")]
    UnsupportedEngine(String),
    #[error("database error: {0}")]
    Connection(#[from] surrealdb::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("malformed stored record: {0}")]
    Serialization(String),
}

impl From<DbError> for QueueError {
    fn from(err: DbError) -> Self {
        QueueError::StoreUnavailable(err.to_string())
    }
}

/// Connect once per process. Later calls return the existing handle and
/// ignore `config`.
pub async fn init_db(config: DbConfig) -> Result<&'static Database, DbError> {
    DB.get_or_try_init(|| async {
        config.check_engine()?;
        tracing::info!(endpoint = %config.endpoint, "Connecting to database");

        let db = connect(&config.endpoint).await?;
        if let Some((username, password)) = &config.credentials {
            db.signin(Root { username, password }).await?;
        }
        db.use_ns(&config.namespace).use_db(&config.database).await?;

        tracing::info!(
            namespace = %config.namespace,
            database = %config.database,
            "Database connected"
        );
        Ok(db)
    })
    .await
}

pub fn get_db() -> Result<&'static Database, DbError> {
    DB.get().ok_or(DbError::NotInitialized)
}

/// Check that the database answers.
pub async fn health_check() -> Result<(), DbError> {
    get_db()?.health().await?;
    Ok(())
}
