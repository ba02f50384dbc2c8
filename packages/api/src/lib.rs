//! Service layer for the waiting line.
//!
//! This crate wires the pieces together for transports:
//! - [`init`] connects the database and starts the queue actor
//! - [`QueueService`] exposes the public and administrative operations

mod init;
mod service;

pub use init::{ServiceConfig, init};
pub use service::QueueService;

// Re-export the types transports need
pub use db::DbConfig;
pub use gate::{GateConfig, Session};
pub use waitline_core::{Entry, EntryId, QueueError, QueueEvent};
