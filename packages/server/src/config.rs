//! Configuration module
//!
//! Settings are read from environment variables; a `.env` file is loaded
//! first when present.

use std::env;

use anyhow::{Context, Result};
use api::{DbConfig, GateConfig, ServiceConfig};

const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEFAULT_JWT_SECRET: &str = "dev_secret_change_me";

/// Application settings
#[derive(Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    /// Emit logs as JSON lines
    pub json_logs: bool,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// SurrealDB endpoint: `mem://`, `surrealkv://data` or `ws://localhost:8000`
    /// with default features, `rocksdb://data` with the `rocksdb` feature
    pub url: String,
    pub namespace: String,
    pub name: String,
    pub user: Option<String>,
    pub pass: Option<String>,
}

#[derive(Clone)]
pub struct AuthSettings {
    pub admin_password: String,
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let settings = Settings {
            server: ServerSettings {
                host: var("HOST", "0.0.0.0"),
                port: var("PORT", "4000").parse().context("Invalid PORT")?,
            },
            database: DatabaseSettings {
                url: var("DATABASE_URL", "mem://"),
                namespace: var("DATABASE_NAMESPACE", "waitline"),
                name: var("DATABASE_NAME", "main"),
                user: lookup("DATABASE_USER"),
                pass: lookup("DATABASE_PASS"),
            },
            auth: AuthSettings {
                admin_password: var("ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD),
                jwt_secret: var("JWT_SECRET", DEFAULT_JWT_SECRET),
                session_ttl_hours: var("SESSION_TTL_HOURS", "8")
                    .parse()
                    .context("Invalid SESSION_TTL_HOURS")?,
            },
            json_logs: lookup("JSON_LOGS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        };

        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.auth.admin_password.is_empty() {
            anyhow::bail!("ADMIN_PASSWORD must not be empty");
        }
        if self.auth.jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }
        if self.auth.session_ttl_hours <= 0 {
            anyhow::bail!(
                "SESSION_TTL_HOURS must be positive (current: {})",
                self.auth.session_ttl_hours
            );
        }
        if self.database.user.is_some() != self.database.pass.is_some() {
            anyhow::bail!("DATABASE_USER and DATABASE_PASS must be set together");
        }
        DbConfig::endpoint(&self.database.url)
            .check_engine()
            .context("Invalid DATABASE_URL")?;
        Ok(())
    }

    /// Log a warning for every built-in development secret still in use.
    pub fn warn_insecure_defaults(&self) {
        if self.auth.admin_password == DEFAULT_ADMIN_PASSWORD {
            tracing::warn!("ADMIN_PASSWORD is the built-in default; set it before deploying");
        }
        if self.auth.jwt_secret == DEFAULT_JWT_SECRET {
            tracing::warn!("JWT_SECRET is the built-in default; set it before deploying");
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn service_config(&self) -> ServiceConfig {
        let mut db = DbConfig::endpoint(&self.database.url)
            .with_namespace(&self.database.namespace)
            .with_database(&self.database.name);
        if let (Some(user), Some(pass)) = (&self.database.user, &self.database.pass) {
            db = db.with_credentials(user, pass);
        }

        let gate = GateConfig::new(&self.auth.admin_password, &self.auth.jwt_secret)
            .with_session_ttl(chrono::Duration::hours(self.auth.session_ttl_hours));

        ServiceConfig::new(db, gate)
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("server", &self.server)
            .field("database", &self.database.url)
            .field("session_ttl_hours", &self.auth.session_ttl_hours)
            .field("json_logs", &self.json_logs)
            .finish_non_exhaustive()
    }
}
