//! Database schema definitions using SurrealQL.

use crate::{DbError, get_db};

/// Initialize the database schema.
///
/// This creates all necessary tables, fields, and indexes.
pub async fn init_schema() -> Result<(), DbError> {
    let db = get_db()?;

    tracing::info!("Initializing database schema...");

    db.query(ENTRY_SCHEMA).await?.check()?;

    tracing::info!("Database schema initialized");

    Ok(())
}

/// Entry table schema.
///
/// `position` deliberately has no UNIQUE index: renumbering decrements many
/// rows in one statement and would collide transiently.
const ENTRY_SCHEMA: &str = r#"
-- One row per person waiting
DEFINE TABLE IF NOT EXISTS entry SCHEMAFULL;

DEFINE FIELD IF NOT EXISTS name ON entry TYPE string;
DEFINE FIELD IF NOT EXISTS student_id ON entry TYPE option<string>;
DEFINE FIELD IF NOT EXISTS position ON entry TYPE int ASSERT $value >= 1;
DEFINE FIELD IF NOT EXISTS created_at ON entry TYPE datetime DEFAULT time::now();

DEFINE INDEX IF NOT EXISTS entry_position ON entry FIELDS position;
DEFINE INDEX IF NOT EXISTS entry_student ON entry FIELDS student_id;
"#;
