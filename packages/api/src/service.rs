//! The queue service: store plus gate behind one cloneable handle.

use std::sync::Arc;

use actors::QueueStore;
use gate::{AccessGate, Session};
use tokio::sync::broadcast;
use waitline_core::{Entry, EntryId, JoinRequest, QueueError, QueueEvent};

/// Entry point for every transport.
///
/// Public operations go straight to the store; administrative ones pass
/// through the [`AccessGate`] first.
#[derive(Clone)]
pub struct QueueService {
    store: QueueStore,
    gate: Arc<AccessGate>,
}

impl QueueService {
    pub fn new(store: QueueStore, gate: AccessGate) -> Self {
        Self {
            store,
            gate: Arc::new(gate),
        }
    }

    /// Current line ordered by position.
    pub async fn list(&self) -> Result<Vec<Entry>, QueueError> {
        self.store.list().await
    }

    /// Add a participant at the tail.
    pub async fn join(
        &self,
        name: impl Into<String>,
        student_id: Option<String>,
    ) -> Result<Entry, QueueError> {
        let mut request = JoinRequest::new(name);
        request.student_id = student_id;
        self.store.join(request).await
    }

    /// Remove an entry (administrative).
    pub async fn remove_by_id(
        &self,
        entry_id: &str,
        credential: &str,
    ) -> Result<EntryId, QueueError> {
        self.gate.remove_by_id(&self.store, entry_id, credential).await
    }

    /// Remove every entry (administrative).
    pub async fn clear(&self, credential: &str) -> Result<usize, QueueError> {
        self.gate.clear(&self.store, credential).await
    }

    /// Exchange the admin password for a session token.
    pub fn issue_session(&self, password: &str) -> Result<Session, QueueError> {
        Ok(self.gate.issue_session(password)?)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.store.subscribe()
    }

    /// Succeeds when both the database and the queue actor respond.
    pub async fn health(&self) -> Result<(), QueueError> {
        db::health_check().await?;
        self.store.len().await?;
        Ok(())
    }

    /// Stop the queue actor and wait for it. Later calls fail with
    /// `StoreUnavailable`.
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down waiting line");
        self.store.shutdown().await;
    }
}
