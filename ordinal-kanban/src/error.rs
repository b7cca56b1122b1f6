//! Error types for ordinal-kanban.

use std::path::PathBuf;

use ordinal_core::{SequencerError, StorageError};
use thiserror::Error;

use crate::types::BoardId;

/// Errors from entity lifecycle operations.
#[derive(Debug, Error)]
pub enum KanbanError {
    /// Ordinal maintenance failed, or a parent/item did not resolve.
    #[error(transparent)]
    Sequencer(#[from] SequencerError),

    #[error("{entity} title must be between 1 and {max} characters, got {len}")]
    TitleLength {
        entity: &'static str,
        len: usize,
        max: usize,
    },

    #[error("board {0} not found")]
    BoardNotFound(BoardId),

    #[error("board {0} is stored more than once")]
    DuplicateBoard(BoardId),
}

impl From<StorageError> for KanbanError {
    fn from(e: StorageError) -> Self {
        KanbanError::Sequencer(SequencerError::StorageFailure(e))
    }
}

/// Errors from loading or saving the workspace and its config.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load, with the offending file.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unsupported workspace version {found} in {path} (expected {expected})")]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    /// The file parsed but its rows could not be rebuilt into a workspace.
    #[error("workspace at {path} is inconsistent: {source}")]
    Inconsistent {
        path: PathBuf,
        #[source]
        source: KanbanError,
    },

    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}
