//! Sibling repository contract.
//!
//! The sequencer never talks to storage directly. It opens a transaction on
//! a [`SiblingStore`], issuing reads and range shifts through [`SiblingTx`],
//! and commits once. A transaction dropped without [`SiblingTx::commit`] is
//! rolled back in full.

use crate::error::StorageError;
use crate::types::{ItemId, OrderedItem, Ordinal, OrdinalRange, ParentId, Shift, Sibling};

/// Storage that can hand out per-parent serializable transactions.
pub trait SiblingStore: Send + Sync {
    type Tx<'a>: SiblingTx
    where
        Self: 'a;

    /// Committed parent of `item`, read without locking.
    fn locate(&self, item: ItemId) -> Result<Option<ParentId>, StorageError>;

    /// Open a transaction holding exclusive access to every parent in
    /// `parents` until it is committed or dropped.
    ///
    /// Duplicates in `parents` are allowed. Implementations must acquire the
    /// whole set without risking lock-order deadlocks between transactions.
    fn begin(&self, parents: &[ParentId]) -> Result<Self::Tx<'_>, StorageError>;
}

/// Reads and writes against the parents locked by [`SiblingStore::begin`].
pub trait SiblingTx {
    fn parent_exists(&self, parent: ParentId) -> Result<bool, StorageError>;

    fn find_item(&self, item: ItemId) -> Result<Option<OrderedItem>, StorageError>;

    /// Siblings ordered by ordinal ascending; ties by creation time, then id.
    fn list_siblings(&self, parent: ParentId) -> Result<Vec<Sibling>, StorageError>;

    fn count_siblings(&self, parent: ParentId) -> Result<usize, StorageError>;

    /// Add `shift.delta()` to every sibling of `parent` whose ordinal lies in
    /// `range`. Returns the number of rows touched.
    fn shift_range(
        &mut self,
        parent: ParentId,
        range: OrdinalRange,
        shift: Shift,
    ) -> Result<usize, StorageError>;

    fn set_ordinal(&mut self, item: ItemId, ordinal: Ordinal) -> Result<(), StorageError>;

    /// Store a new row and return its id.
    fn create_item(&mut self, parent: ParentId, ordinal: Ordinal) -> Result<ItemId, StorageError>;

    /// Move the row to `parent` at `ordinal`. Both parents must be locked.
    fn set_parent(
        &mut self,
        item: ItemId,
        parent: ParentId,
        ordinal: Ordinal,
    ) -> Result<(), StorageError>;

    fn delete_item(&mut self, item: ItemId) -> Result<(), StorageError>;

    fn commit(self) -> Result<(), StorageError>;
}
