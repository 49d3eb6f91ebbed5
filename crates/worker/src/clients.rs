//! Connected application instances and the notification channel.
//!
//! Each open page of the hosting application connects as a client and
//! receives fire-and-forget notifications over its own unbounded channel.
//! Delivery is best-effort: no acknowledgment, no retry, no ordering
//! guarantee across clients. Activation "claims" every connected client,
//! taking control without a reload.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::sync::mpsc;

/// Identifier of one connected application instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(u64);

/// A message delivered to application instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Notification {
    /// Instructs the instance to re-synchronize its own data.
    #[serde(rename = "SYNC_DATA")]
    SyncData,
}

struct ClientSlot {
    sender: mpsc::UnboundedSender<Notification>,
    controlled: bool,
}

/// Registry of connected application instances.
#[derive(Default)]
pub struct ClientHub {
    next_id: AtomicU64,
    clients: Mutex<HashMap<ClientId, ClientSlot>>,
}

impl ClientHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new client; the returned receiver yields its notifications.
    pub async fn connect(&self) -> (ClientId, mpsc::UnboundedReceiver<Notification>) {
        let id = ClientId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = mpsc::unbounded_channel();
        self.clients
            .lock()
            .await
            .insert(id, ClientSlot { sender, controlled: false });
        (id, receiver)
    }

    /// Remove a client. Returns whether it was connected.
    pub async fn disconnect(&self, id: ClientId) -> bool {
        self.clients.lock().await.remove(&id).is_some()
    }

    /// Take control of every connected client (activation completion).
    pub async fn claim(&self) {
        let mut clients = self.clients.lock().await;
        for slot in clients.values_mut() {
            slot.controlled = true;
        }
        tracing::debug!("claimed {} clients", clients.len());
    }

    /// Whether a client is controlled by the active worker.
    pub async fn is_controlled(&self, id: ClientId) -> bool {
        self.clients.lock().await.get(&id).is_some_and(|s| s.controlled)
    }

    pub async fn client_count(&self) -> usize {
        self.clients.lock().await.len()
    }

    /// Deliver a notification to every connected client, best-effort.
    ///
    /// Clients whose receiver is gone are dropped from the registry.
    pub async fn broadcast(&self, notification: Notification) {
        let mut clients = self.clients.lock().await;
        clients.retain(|id, slot| {
            if slot.sender.send(notification).is_ok() {
                true
            } else {
                tracing::debug!("dropping disconnected client {id:?}");
                false
            }
        });
    }
}
