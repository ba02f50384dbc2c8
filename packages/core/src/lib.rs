//! Core domain types for the waiting line.
//!
//! This crate contains shared types used across all packages:
//! - Entry and EntryId for queued participants
//! - JoinRequest for validated join input
//! - QueueEvent for real-time updates
//! - QueueError for the error kinds of the queue contract

mod entry;
mod error;
mod events;

pub use entry::{Entry, EntryId, JoinRequest, MAX_NAME_LEN, is_dense, sort_entries};
pub use error::QueueError;
pub use events::QueueEvent;
