//! Entry domain types for participants waiting in the line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::QueueError;

/// Longest display name accepted on join, in characters.
pub const MAX_NAME_LEN: usize = 200;

/// Unique identifier for an entry, using ULID so ids sort by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub Ulid);

impl EntryId {
    /// Create a new unique entry ID.
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Parse an entry ID from a string.
    pub fn parse(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input for joining the line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub student_id: Option<String>,
}

impl JoinRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            student_id: None,
        }
    }

    /// Attach a secondary identifier.
    pub fn with_student_id(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }

    /// Trim both fields and reject an empty or oversized name.
    ///
    /// A blank student id is treated as absent.
    pub fn normalize(self) -> Result<Self, QueueError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(QueueError::Validation("name required".into()));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(QueueError::Validation(format!(
                "name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }

        let student_id = self
            .student_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(Self {
            name: name.to_string(),
            student_id,
        })
    }
}

/// One participant waiting in the line.
///
/// `position` is 1-based and dense across all live entries; the store is the
/// only place that assigns or changes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    pub name: String,
    pub student_id: Option<String>,
    pub position: u32,
    pub created_at: DateTime<Utc>,
}

impl Entry {
    /// Build a fresh entry from an already normalized request.
    pub fn new(request: JoinRequest, position: u32) -> Self {
        Self {
            id: EntryId::new(),
            name: request.name,
            student_id: request.student_id,
            position,
            created_at: Utc::now(),
        }
    }

    /// Whether this entry is at the front of the line.
    pub fn is_head(&self) -> bool {
        self.position == 1
    }
}

/// Order entries by position, falling back to creation time.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

/// Whether the positions of `entries` (already sorted) are exactly `1..=N`.
pub fn is_dense(entries: &[Entry]) -> bool {
    entries
        .iter()
        .enumerate()
        .all(|(i, e)| e.position as usize == i + 1)
}
