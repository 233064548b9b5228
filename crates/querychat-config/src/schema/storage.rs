use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Conversation persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the persisted snapshot. `None` uses the platform
    /// data directory (`~/.local/share/querychat` on Linux).
    pub directory: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the storage directory, falling back to the platform default.
    pub fn resolved_directory(&self) -> Option<PathBuf> {
        self.directory
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("querychat")))
    }
}
