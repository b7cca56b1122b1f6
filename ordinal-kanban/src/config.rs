//! Workspace configuration, read from `<home>/.ordinal/config.yaml`.
//!
//! Every key is optional; absent keys and an absent file use the defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub const DEFAULT_BOARD_TITLE_MAX: usize = 30;
pub const DEFAULT_LIST_TITLE_MAX: usize = 20;
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KanbanConfig {
    pub board_title_max: usize,
    pub list_title_max: usize,
    /// How long a sequencer operation waits for a parent held by another.
    pub lock_timeout_ms: u64,
}

impl Default for KanbanConfig {
    fn default() -> Self {
        Self {
            board_title_max: DEFAULT_BOARD_TITLE_MAX,
            list_title_max: DEFAULT_LIST_TITLE_MAX,
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }
}

impl KanbanConfig {
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

/// `<home>/.ordinal/config.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    crate::store::root_at(home).join("config.yaml")
}

/// Load the config, falling back to defaults when the file is absent.
pub fn load_config_at(home: &Path) -> Result<KanbanConfig, StoreError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(KanbanConfig::default());
    }
    let contents = std::fs::read_to_string(&path)?;
    if contents.trim().is_empty() {
        return Ok(KanbanConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| StoreError::Parse { path, source: e })
}
