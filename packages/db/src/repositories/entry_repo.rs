//! Entry repository: the persisted representation of the line.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use waitline_core::{Entry, EntryId, sort_entries};

use crate::{DbError, get_db};

/// Repository for entry persistence operations.
///
/// Positions are written exactly as given; keeping them dense is the job of
/// the single writer that owns the line.
pub struct EntryRepository;

/// Internal record type for SurrealDB reads.
#[derive(Debug, Deserialize)]
struct EntryRecord {
    id: String,
    name: String,
    student_id: Option<String>,
    position: i64,
    created_at: DateTime<Utc>,
}

impl EntryRecord {
    fn into_entry(self) -> Result<Entry, DbError> {
        let id = EntryId::parse(&self.id)
            .map_err(|e| DbError::Serialization(format!("bad entry id {}: {}", self.id, e)))?;
        let position = u32::try_from(self.position).map_err(|_| {
            DbError::Serialization(format!("bad position {} for entry {}", self.position, id))
        })?;

        Ok(Entry {
            id,
            name: self.name,
            student_id: self.student_id,
            position,
            created_at: self.created_at,
        })
    }
}

const SELECT_ENTRIES: &str = r#"
SELECT
    record::id(id) AS id,
    name,
    student_id,
    position,
    <string> created_at AS created_at
FROM entry
ORDER BY position ASC
"#;

impl EntryRepository {
    /// Insert a new entry with its already assigned position.
    pub async fn create(entry: &Entry) -> Result<(), DbError> {
        let db = get_db()?;

        db.query(
            "CREATE type::thing('entry', $id) SET name = $name, student_id = $student_id, position = $position, created_at = <datetime> $created_at",
        )
        .bind(("id", entry.id.to_string()))
        .bind(("name", entry.name.clone()))
        .bind(("student_id", entry.student_id.clone()))
        .bind(("position", i64::from(entry.position)))
        .bind(("created_at", entry.created_at.to_rfc3339()))
        .await?
        .check()?;

        Ok(())
    }

    /// List all entries ordered by position, ties broken by creation time.
    pub async fn list() -> Result<Vec<Entry>, DbError> {
        let db = get_db()?;

        let mut result = db.query(SELECT_ENTRIES).await?;
        let records: Vec<EntryRecord> = result.take(0)?;

        let mut entries = records
            .into_iter()
            .map(EntryRecord::into_entry)
            .collect::<Result<Vec<_>, _>>()?;
        sort_entries(&mut entries);

        Ok(entries)
    }

    /// Get an entry by ID.
    pub async fn get(id: EntryId) -> Result<Entry, DbError> {
        let db = get_db()?;

        let mut result = db
            .query(
                "SELECT record::id(id) AS id, name, student_id, position, <string> created_at AS created_at FROM type::thing('entry', $id)",
            )
            .bind(("id", id.to_string()))
            .await?;
        let records: Vec<EntryRecord> = result.take(0)?;

        records
            .into_iter()
            .next()
            .ok_or_else(|| DbError::NotFound(format!("Entry not found: {}", id)))?
            .into_entry()
    }

    /// Delete `entry` and shift everyone behind it forward by one.
    ///
    /// Both statements run in one transaction, so a reader of the store sees
    /// either the state before the removal or the fully renumbered state.
    pub async fn remove_and_renumber(entry: &Entry) -> Result<(), DbError> {
        let db = get_db()?;

        db.query(
            r#"
            BEGIN TRANSACTION;
            DELETE type::thing('entry', $id);
            UPDATE entry SET position -= 1 WHERE position > $position;
            COMMIT TRANSACTION;
            "#,
        )
        .bind(("id", entry.id.to_string()))
        .bind(("position", i64::from(entry.position)))
        .await?
        .check()?;

        Ok(())
    }

    /// Overwrite the stored position of every given entry in one transaction.
    pub async fn rewrite_positions(entries: &[Entry]) -> Result<(), DbError> {
        if entries.is_empty() {
            return Ok(());
        }

        let db = get_db()?;

        let mut sql = String::from("BEGIN TRANSACTION;\n");
        for i in 0..entries.len() {
            sql.push_str(&format!(
                "UPDATE type::thing('entry', $id{i}) SET position = $position{i};\n"
            ));
        }
        sql.push_str("COMMIT TRANSACTION;");

        let mut query = db.query(sql);
        for (i, entry) in entries.iter().enumerate() {
            query = query
                .bind((format!("id{i}"), entry.id.to_string()))
                .bind((format!("position{i}"), i64::from(entry.position)));
        }
        query.await?.check()?;

        Ok(())
    }

    /// Delete every entry.
    pub async fn clear() -> Result<(), DbError> {
        let db = get_db()?;

        db.query("DELETE entry").await?.check()?;

        Ok(())
    }

    /// Number of stored entries.
    pub async fn count() -> Result<usize, DbError> {
        let db = get_db()?;

        let mut result = db.query("SELECT count() FROM entry GROUP ALL").await?;

        #[derive(Deserialize)]
        struct CountResult {
            count: i64,
        }

        let counts: Vec<CountResult> = result.take(0)?;

        Ok(counts.first().map_or(0, |c| c.count.max(0) as usize))
    }
}
