use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

const DEFAULT_CAPACITY: usize = 64;

/// Notifications pushed to connected admin dashboards
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum DashboardEvent {
    /// Student data changed after a CSV import
    DataUpdated { batch_id: Uuid, inserted: u64 },
}

/// Fan-out channel between request handlers and dashboard sockets
#[derive(Debug, Clone)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<DashboardEvent>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Sends to every subscriber. Returns how many received it; zero
    /// subscribers is not an error.
    pub fn publish(&self, event: DashboardEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                debug!("No dashboard listeners for {:?}", event);
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
