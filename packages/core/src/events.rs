//! Event types for real-time updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Entry, EntryId};

/// Events emitted by the queue store after each committed change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum QueueEvent {
    /// Someone joined at the tail.
    Joined {
        entry: Entry,
        timestamp: DateTime<Utc>,
    },
    /// An entry left; everyone behind `position` moved up by one.
    Removed {
        entry_id: EntryId,
        position: u32,
        timestamp: DateTime<Utc>,
    },
    /// The whole line was wiped.
    Cleared {
        removed: usize,
        timestamp: DateTime<Utc>,
    },
}

impl QueueEvent {
    /// Get the timestamp of the event.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            QueueEvent::Joined { timestamp, .. } => *timestamp,
            QueueEvent::Removed { timestamp, .. } => *timestamp,
            QueueEvent::Cleared { timestamp, .. } => *timestamp,
        }
    }

    /// Event name, matching the serialized `event` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            QueueEvent::Joined { .. } => "joined",
            QueueEvent::Removed { .. } => "removed",
            QueueEvent::Cleared { .. } => "cleared",
        }
    }

    /// Get a short description of this event for logging.
    pub fn description(&self) -> String {
        match self {
            QueueEvent::Joined { entry, .. } => {
                format!("{} joined at #{}", entry.name, entry.position)
            }
            QueueEvent::Removed {
                entry_id, position, ..
            } => format!("Entry {} removed from #{}", entry_id, position),
            QueueEvent::Cleared { removed, .. } => format!("Queue cleared ({} removed)", removed),
        }
    }
}
