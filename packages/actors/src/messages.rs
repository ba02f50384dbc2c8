//! Message types for actor communication.

use ractor::RpcReplyPort;
use waitline_core::{Entry, EntryId, JoinRequest, QueueError};

/// Messages for the QueueActor.
#[derive(Debug)]
pub enum QueueMessage {
    /// Snapshot of the whole line, ordered by position.
    List { reply: RpcReplyPort<Vec<Entry>> },

    /// Get an entry by ID.
    Get {
        entry_id: EntryId,
        reply: RpcReplyPort<Option<Entry>>,
    },

    /// The entry at position 1, if any.
    Head { reply: RpcReplyPort<Option<Entry>> },

    /// Number of entries waiting.
    Len { reply: RpcReplyPort<usize> },

    /// Append a new entry at the tail.
    Join {
        request: JoinRequest,
        reply: RpcReplyPort<Result<Entry, QueueError>>,
    },

    /// Remove an entry and close the gap it leaves.
    Remove {
        entry_id: EntryId,
        reply: RpcReplyPort<Result<EntryId, QueueError>>,
    },

    /// Drop every entry. Replies with how many were removed.
    Clear {
        reply: RpcReplyPort<Result<usize, QueueError>>,
    },
}
