//! Queue actor owning the waiting line.
//!
//! Every operation is a message handled one at a time, so join, remove and
//! clear are serialized against each other and against reads. Changes are
//! written to the database first and applied to the in-memory line only once
//! the write succeeded.

use chrono::Utc;
use db::repositories::EntryRepository;
use ractor::{Actor, ActorProcessingErr, ActorRef};
use tokio::sync::broadcast;
use waitline_core::{Entry, EntryId, JoinRequest, QueueError, QueueEvent, is_dense, sort_entries};

use crate::messages::QueueMessage;

/// State for the queue actor.
pub struct QueueActorState {
    /// Live entries, sorted by position; positions are always 1..=len.
    entries: Vec<Entry>,
    /// Event broadcaster.
    event_tx: broadcast::Sender<QueueEvent>,
}

impl QueueActorState {
    fn new(entries: Vec<Entry>, event_tx: broadcast::Sender<QueueEvent>) -> Self {
        Self { entries, event_tx }
    }

    fn next_position(&self) -> u32 {
        self.entries.last().map_or(1, |e| e.position + 1)
    }

    fn find(&self, entry_id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == entry_id)
    }

    /// Broadcast an event. Nobody listening is fine.
    fn broadcast(&self, event: QueueEvent) {
        tracing::debug!("{}", event.description());
        let _ = self.event_tx.send(event);
    }

    async fn join(&mut self, request: JoinRequest) -> Result<Entry, QueueError> {
        let request = request.normalize()?;
        let entry = Entry::new(request, self.next_position());

        if let Err(e) = EntryRepository::create(&entry).await {
            tracing::warn!("Failed to persist entry {}: {}", entry.id, e);
            return Err(e.into());
        }

        self.entries.push(entry.clone());
        self.broadcast(QueueEvent::Joined {
            entry: entry.clone(),
            timestamp: Utc::now(),
        });

        Ok(entry)
    }

    async fn remove(&mut self, entry_id: EntryId) -> Result<EntryId, QueueError> {
        let index = self
            .find(entry_id)
            .ok_or_else(|| QueueError::not_found(entry_id))?;

        if let Err(e) = EntryRepository::remove_and_renumber(&self.entries[index]).await {
            tracing::warn!("Failed to remove entry {}: {}", entry_id, e);
            return Err(e.into());
        }

        let removed = self.entries.remove(index);
        for entry in &mut self.entries[index..] {
            entry.position -= 1;
        }

        self.broadcast(QueueEvent::Removed {
            entry_id,
            position: removed.position,
            timestamp: Utc::now(),
        });

        Ok(entry_id)
    }

    async fn clear(&mut self) -> Result<usize, QueueError> {
        if let Err(e) = EntryRepository::clear().await {
            tracing::warn!("Failed to clear queue: {}", e);
            return Err(e.into());
        }

        let removed = self.entries.len();
        self.entries.clear();

        self.broadcast(QueueEvent::Cleared {
            removed,
            timestamp: Utc::now(),
        });

        Ok(removed)
    }
}

/// Sort `entries` by (position, created_at) and renumber them 1..=N.
///
/// Returns the number of entries whose position changed.
pub(crate) fn normalize_positions(entries: &mut [Entry]) -> usize {
    sort_entries(entries);
    if is_dense(entries) {
        return 0;
    }

    let mut changed = 0;
    for (i, entry) in entries.iter_mut().enumerate() {
        let expected = i as u32 + 1;
        if entry.position != expected {
            entry.position = expected;
            changed += 1;
        }
    }
    changed
}

/// Queue actor that owns the single waiting line.
pub struct QueueActor;

impl Actor for QueueActor {
    type Msg = QueueMessage;
    type State = QueueActorState;
    type Arguments = broadcast::Sender<QueueEvent>;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        event_tx: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let mut entries = EntryRepository::list().await?;

        let repaired = normalize_positions(&mut entries);
        if repaired > 0 {
            tracing::warn!("Repairing {} out-of-place positions in stored queue", repaired);
            EntryRepository::rewrite_positions(&entries).await?;
        }

        tracing::info!("Starting queue actor with {} waiting", entries.len());
        Ok(QueueActorState::new(entries, event_tx))
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            QueueMessage::List { reply } => {
                let _ = reply.send(state.entries.clone());
            }

            QueueMessage::Get { entry_id, reply } => {
                let entry = state.find(entry_id).map(|i| state.entries[i].clone());
                let _ = reply.send(entry);
            }

            QueueMessage::Head { reply } => {
                let _ = reply.send(state.entries.first().cloned());
            }

            QueueMessage::Len { reply } => {
                let _ = reply.send(state.entries.len());
            }

            QueueMessage::Join { request, reply } => {
                let _ = reply.send(state.join(request).await);
            }

            QueueMessage::Remove { entry_id, reply } => {
                let _ = reply.send(state.remove(entry_id).await);
            }

            QueueMessage::Clear { reply } => {
                let _ = reply.send(state.clear().await);
            }
        }

        Ok(())
    }
}
