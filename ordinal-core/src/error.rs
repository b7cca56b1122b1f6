//! Error types for ordinal-core.

use thiserror::Error;

use crate::types::{CollectionKind, ItemId, Ordinal, ParentId};

/// All errors that can arise from sequencer operations.
#[derive(Debug, Error)]
pub enum SequencerError {
    /// A caller tried to write a sequencer-owned field directly.
    #[error("field `{field}` cannot be assigned directly; use the repositioning operations instead")]
    ManualFieldAssignment { field: &'static str },

    /// The parent reference is absent or does not resolve. No ordinal was assigned.
    #[error(
        "{} {} does not exist; cannot place {}",
        .kind.parent_noun(),
        .parent.map_or_else(|| "<none>".to_string(), |p| p.to_string()),
        .kind.item_noun()
    )]
    MissingParent {
        kind: CollectionKind,
        parent: Option<ParentId>,
    },

    #[error("{} {item} not found", .kind.item_noun())]
    ItemNotFound { kind: CollectionKind, item: ItemId },

    /// The repository failed; the operation was rolled back.
    #[error("storage failure: {0}")]
    StorageFailure(#[from] StorageError),
}

/// Errors raised by a [`SiblingStore`](crate::repository::SiblingStore) implementation.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The transaction touched a parent it did not lock in `begin`.
    #[error("parent {0} is not locked by this transaction")]
    UnlockedParent(ParentId),

    #[error("parent {0} is not registered")]
    UnknownParent(ParentId),

    #[error("item {0} is not stored")]
    UnknownItem(ItemId),

    /// Two restored rows carry the same item id.
    #[error("item {0} appears more than once")]
    DuplicateItem(ItemId),

    /// Commit-time check equivalent to `UNIQUE(parent, ordinal)`.
    #[error("duplicate ordinal {ordinal} under parent {parent}")]
    UniqueViolation { parent: ParentId, ordinal: Ordinal },

    #[error("timed out after {waited_ms} ms waiting for parent lock")]
    LockTimeout { waited_ms: u64 },

    /// The item kept changing parent while the sequencer tried to lock it.
    #[error("item {item} changed parent {attempts} times while locking")]
    Contended { item: ItemId, attempts: usize },

    #[error("store lock poisoned")]
    Poisoned,

    /// Failure reported by an external adapter.
    #[error("backend error: {0}")]
    Backend(String),
}
