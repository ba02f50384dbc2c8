//! Cloneable handle to the queue actor.

use ractor::{Actor, ActorRef, RpcReplyPort, SpawnErr};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use waitline_core::{Entry, EntryId, JoinRequest, QueueError, QueueEvent};

use crate::messages::QueueMessage;
use crate::queue_actor::QueueActor;

/// Capacity of the event channel; slow subscribers lag instead of blocking.
const EVENT_CAPACITY: usize = 1024;

/// Registry name of the queue actor. At most one runs per process.
pub const QUEUE_ACTOR_NAME: &str = "waitline-queue";

/// The ordered queue store.
///
/// All clones talk to the same actor, which owns the line. The database must
/// be initialized before [`QueueStore::start`] is called.
#[derive(Clone)]
pub struct QueueStore {
    actor: ActorRef<QueueMessage>,
    event_tx: broadcast::Sender<QueueEvent>,
}

impl QueueStore {
    /// Load the persisted line and spawn the actor that owns it.
    ///
    /// Fails if the stored entries cannot be read, so callers never serve
    /// requests against a half-loaded line. Also fails while another store is
    /// running: the actor is the only writer of the `entry` table.
    pub async fn start() -> Result<(Self, JoinHandle<()>), QueueError> {
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);

        let (actor, handle) = Actor::spawn(
            Some(QUEUE_ACTOR_NAME.to_string()),
            QueueActor,
            event_tx.clone(),
        )
        .await
        .map_err(|e| match e {
            SpawnErr::ActorAlreadyRegistered(name) => {
                tracing::warn!("Queue actor '{}' is already running", name);
                QueueError::StoreUnavailable("queue store already running".into())
            }
            other => QueueError::StoreUnavailable(format!("Failed to start queue: {}", other)),
        })?;

        Ok((Self { actor, event_tx }, handle))
    }

    /// All live entries ordered by position.
    pub async fn list(&self) -> Result<Vec<Entry>, QueueError> {
        self.call(|reply| QueueMessage::List { reply }).await
    }

    pub async fn get(&self, entry_id: EntryId) -> Result<Option<Entry>, QueueError> {
        self.call(|reply| QueueMessage::Get { entry_id, reply })
            .await
    }

    /// The entry at position 1.
    pub async fn head(&self) -> Result<Option<Entry>, QueueError> {
        self.call(|reply| QueueMessage::Head { reply }).await
    }

    pub async fn len(&self) -> Result<usize, QueueError> {
        self.call(|reply| QueueMessage::Len { reply }).await
    }

    pub async fn is_empty(&self) -> Result<bool, QueueError> {
        Ok(self.len().await? == 0)
    }

    /// Append to the tail; the new entry gets position `N + 1`.
    pub async fn join(&self, request: JoinRequest) -> Result<Entry, QueueError> {
        self.call(|reply| QueueMessage::Join { request, reply })
            .await?
    }

    /// Remove an entry; every entry behind it moves up one place.
    pub async fn remove_by_id(&self, entry_id: EntryId) -> Result<EntryId, QueueError> {
        self.call(|reply| QueueMessage::Remove { entry_id, reply })
            .await?
    }

    /// Remove everything. Returns the number of entries dropped.
    pub async fn clear(&self) -> Result<usize, QueueError> {
        self.call(|reply| QueueMessage::Clear { reply }).await?
    }

    /// Receive a [`QueueEvent`] after every committed change.
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.event_tx.subscribe()
    }

    /// Stop the actor once its current message is handled and wait until it
    /// is gone. Later calls on any clone fail with `StoreUnavailable`, and a
    /// new store may be started.
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down queue actor");
        if let Err(e) = self.actor.stop_and_wait(None, None).await {
            tracing::debug!("Queue actor already stopped: {}", e);
        }
    }

    async fn call<T>(
        &self,
        build: impl FnOnce(RpcReplyPort<T>) -> QueueMessage,
    ) -> Result<T, QueueError>
    where
        T: Send + 'static,
    {
        let (tx, rx) = ractor::concurrency::oneshot();
        self.actor
            .send_message(build(tx.into()))
            .map_err(|e| QueueError::StoreUnavailable(format!("Failed to send message: {}", e)))?;

        rx.await
            .map_err(|_| QueueError::StoreUnavailable("Failed to receive response".into()))
    }
}
