//! Durable conversation snapshot.
//!
//! The snapshot lives under [`STORAGE_KEY`]. Clearing the conversation
//! also records a timestamp under [`CLEARED_KEY`]; any snapshot saved
//! before that moment is treated as stale and not rehydrated.

mod backend;
pub mod snapshot;

pub use backend::{FileStorage, MemoryStorage, StorageBackend};
pub use snapshot::{PersistedSnapshot, SnapshotState, CURRENT_VERSION};

use chrono::{DateTime, Utc};
use querychat_common::StorageError;
use tracing::{debug, info};

use crate::message::{HistoryEntry, Message};

pub const STORAGE_KEY: &str = "querychat-storage";
pub const CLEARED_KEY: &str = "querychat-storage-cleared-at";

pub struct SnapshotStore {
    backend: Box<dyn StorageBackend>,
}

impl SnapshotStore {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Latest snapshot, migrated to the current version. `None` when nothing
    /// was saved yet or the saved snapshot predates the last clear.
    pub fn load(&self) -> Result<Option<SnapshotState>, StorageError> {
        let Some(raw) = self.backend.get(STORAGE_KEY)? else {
            return Ok(None);
        };
        let snapshot = snapshot::decode(&raw)?;

        if let Some(cleared_at) = self.cleared_at()? {
            if snapshot.saved_at < cleared_at {
                info!(%cleared_at, saved_at = %snapshot.saved_at, "ignoring snapshot older than last clear");
                return Ok(None);
            }
        }

        debug!(messages = snapshot.state.messages.len(), "snapshot loaded");
        Ok(Some(snapshot.state))
    }

    pub fn save(
        &self,
        history: &[HistoryEntry],
        messages: &[Message],
        saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let snapshot = PersistedSnapshot::new(
            SnapshotState {
                history: history.to_vec(),
                messages: messages.to_vec(),
            },
            saved_at,
        );
        self.backend.set(STORAGE_KEY, &snapshot::encode(&snapshot)?)
    }

    pub fn mark_cleared(&self, at: DateTime<Utc>) -> Result<(), StorageError> {
        let value = serde_json::to_string(&at).map_err(|e| StorageError::Encode(e.to_string()))?;
        self.backend.set(CLEARED_KEY, &value)
    }

    pub fn cleared_at(&self) -> Result<Option<DateTime<Utc>>, StorageError> {
        self.backend
            .get(CLEARED_KEY)?
            .map(|raw| serde_json::from_str(&raw).map_err(|e| StorageError::Decode(e.to_string())))
            .transpose()
    }
}
