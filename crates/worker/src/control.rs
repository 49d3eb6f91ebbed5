//! The control channel: commands the hosting application sends the worker.

use serde::{Deserialize, Serialize};

use awning_core::Error;

use crate::clients::Notification;
use crate::phase::Phase;
use crate::worker::Worker;

/// An inbound control message.
///
/// `SKIP_WAITING` and `CLEAR_CACHE` come from the application itself;
/// `SYNC` is the platform-delivered connectivity/periodic-sync trigger
/// carrying an opaque tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    #[serde(rename = "SKIP_WAITING")]
    SkipWaiting,
    #[serde(rename = "CLEAR_CACHE")]
    ClearCache,
    #[serde(rename = "SYNC")]
    Sync { tag: String },
}

impl Worker {
    /// Consume one control message.
    pub async fn handle_command(&self, command: Command) -> Result<(), Error> {
        match command {
            Command::SkipWaiting => self.skip_waiting().await,
            Command::ClearCache => self.clear_cache().await,
            Command::Sync { tag } => {
                self.handle_sync(&tag).await;
                Ok(())
            }
        }
    }

    /// Advance a waiting worker through activation immediately instead of
    /// waiting for pages using the previous version to close.
    ///
    /// In any other phase the command has nothing to do: install already
    /// signals immediate readiness on completion.
    pub async fn skip_waiting(&self) -> Result<(), Error> {
        let phase = self.phase().await;
        if phase == Phase::Waiting {
            self.activate().await
        } else {
            tracing::debug!("SKIP_WAITING ignored in phase {phase}");
            Ok(())
        }
    }

    /// Delete every partition unconditionally, current versions included.
    ///
    /// Intentionally broader than activation cleanup; used for full manual
    /// reset.
    pub async fn clear_cache(&self) -> Result<(), Error> {
        let names = self.store().partition_names().await?;
        for name in names {
            match self.store().delete_partition(&name).await {
                Ok(count) => tracing::info!("cleared partition {name} ({count} entries)"),
                Err(e) => tracing::warn!("failed to clear partition {name}: {e}"),
            }
        }
        Ok(())
    }

    /// React to a sync trigger: the recognized tag broadcasts a
    /// fire-and-forget resync notification to every connected client.
    pub async fn handle_sync(&self, tag: &str) {
        if tag == self.config().sync_tag {
            tracing::info!("sync trigger {tag:?}: notifying {} clients", self.clients().client_count().await);
            self.clients().broadcast(Notification::SyncData).await;
        } else {
            tracing::debug!("ignoring unrecognized sync tag {tag:?}");
        }
    }
}
