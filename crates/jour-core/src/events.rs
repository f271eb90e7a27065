//! Change notifications emitted after committed writes.
//!
//! Every mutation publishes a [`ChangeEvent`] onto a broadcast channel once
//! its transaction has committed. Sessions subscribe per user and reconcile
//! their optimistic state from the stream; a lagging subscriber loses old
//! events rather than blocking writers and is expected to refetch.

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

pub use tokio::sync::broadcast::error::{RecvError, TryRecvError};

const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Change {
    DefinitionCreated {
        definition_id: Uuid,
    },
    DefinitionUpdated {
        definition_id: Uuid,
    },
    DefinitionDeleted {
        definition_id: Uuid,
    },
    CompletionToggled {
        definition_id: Uuid,
        date: NaiveDate,
        completed: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub user_id: Uuid,
    pub change: Change,
}

/// Fan-out handle held by the repository.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribes to the events of one user; other users' events are
    /// filtered out of the stream.
    pub fn subscribe(&self, user_id: Uuid) -> ChangeStream {
        ChangeStream {
            user_id,
            rx: self.tx.subscribe(),
        }
    }

    // A send error only means nobody is listening right now.
    pub(crate) fn publish(&self, event: ChangeEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// One user's view of the feed.
pub struct ChangeStream {
    user_id: Uuid,
    rx: broadcast::Receiver<ChangeEvent>,
}

impl ChangeStream {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Waits for the next event belonging to this stream's user.
    pub async fn recv(&mut self) -> Result<ChangeEvent, RecvError> {
        loop {
            let event = self.rx.recv().await?;
            if event.user_id == self.user_id {
                return Ok(event);
            }
        }
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Result<ChangeEvent, TryRecvError> {
        loop {
            let event = self.rx.try_recv()?;
            if event.user_id == self.user_id {
                return Ok(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_for(user_id: Uuid) -> ChangeEvent {
        ChangeEvent {
            user_id,
            change: Change::DefinitionCreated {
                definition_id: Uuid::new_v4(),
            },
        }
    }

    #[tokio::test]
    async fn stream_only_sees_its_own_user() {
        let feed = ChangeFeed::new();
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut stream = feed.subscribe(me);

        feed.publish(event_for(other));
        let mine = event_for(me);
        feed.publish(mine.clone());

        let received = stream.recv().await.unwrap();
        assert_eq!(received, mine);
        assert!(matches!(stream.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn publish_without_subscribers_is_a_noop() {
        let feed = ChangeFeed::new();
        feed.publish(event_for(Uuid::new_v4()));
    }
}
