//! The ordinal sequencer.
//!
//! Every mutating operation runs inside exactly one repository transaction
//! that holds the affected parents for its whole duration:
//!
//! | operation   | parents locked     | shifted band                         |
//! |-------------|--------------------|--------------------------------------|
//! | `insert`    | parent             | `[at, N-1]` up                       |
//! | `move_item` | parent             | `(from, to]` down or `[to, from)` up |
//! | `reparent`  | old and new parent | `(from, N-1]` of the old parent down |
//! | `delete`    | parent             | `(from, N-1]` down                   |
//! | `normalize` | parent             | rewrites to `0..N`                   |
//!
//! Any error before `commit` drops the transaction, which rolls it back.

use tracing::{debug, warn};

use crate::audit::audit_siblings;
use crate::error::{SequencerError, StorageError};
use crate::plan;
use crate::repository::{SiblingStore, SiblingTx};
use crate::types::{
    CollectionKind, ItemId, MoveOutcome, OrderedItem, Ordinal, ParentId, RepairReport, Shift,
    Sibling,
};

/// How often an item-scoped operation re-reads the item's parent before
/// giving up because concurrent re-parenting keeps moving it.
const MAX_LOCATE_ATTEMPTS: usize = 8;

/// Maintains dense, unique ordinals for one kind of ordered collection.
#[derive(Debug)]
pub struct Sequencer<S> {
    kind: CollectionKind,
    store: S,
}

impl<S: SiblingStore> Sequencer<S> {
    pub fn new(kind: CollectionKind, store: S) -> Self {
        Self { kind, store }
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Create an item under `parent`.
    ///
    /// `None` appends. `Some(p)` is clamped to `[0, N]` and every sibling at
    /// or after the landing position shifts up by one.
    pub fn insert(
        &self,
        parent: ParentId,
        desired: Option<i64>,
    ) -> Result<OrderedItem, SequencerError> {
        let mut tx = self.store.begin(&[parent])?;
        if !tx.parent_exists(parent)? {
            return Err(self.missing_parent(parent));
        }

        let count = tx.count_siblings(parent)?;
        let plan = plan::plan_insert(count, desired);
        let displaced = match plan.displaced {
            Some(range) => tx.shift_range(parent, range, Shift::Up)?,
            None => 0,
        };
        let id = tx.create_item(parent, plan.ordinal)?;
        let item = tx.find_item(id)?.ok_or(StorageError::UnknownItem(id))?;
        tx.commit()?;

        debug!(
            kind = %self.kind,
            parent = %parent,
            item = %id,
            ordinal = %plan.ordinal,
            displaced,
            "inserted"
        );
        Ok(item)
    }

    /// Reposition an item within its current parent.
    ///
    /// The target is clamped to `[0, N-1]`. A clamped target equal to the
    /// current ordinal writes nothing.
    pub fn move_item(&self, item: ItemId, target: i64) -> Result<MoveOutcome, SequencerError> {
        let (mut tx, row) = self.lock_item(item, None)?;
        let count = tx.count_siblings(row.parent)?;
        let Some(plan) = plan::plan_move(row.ordinal, target, count) else {
            debug!(kind = %self.kind, item = %item, ordinal = %row.ordinal, "move is a no-op");
            return Ok(MoveOutcome::Unchanged {
                ordinal: row.ordinal,
            });
        };

        // The band first, the moved item last.
        let displaced = tx.shift_range(row.parent, plan.displaced, plan.shift)?;
        tx.set_ordinal(item, plan.to)?;
        tx.commit()?;

        debug!(
            kind = %self.kind,
            parent = %row.parent,
            item = %item,
            from = %plan.from,
            to = %plan.to,
            displaced,
            "moved"
        );
        Ok(MoveOutcome::Moved {
            from: plan.from,
            to: plan.to,
            displaced,
        })
    }

    /// Move an item to the end of `new_parent`, closing the gap it leaves.
    ///
    /// Re-parenting to the current parent changes nothing.
    pub fn reparent(
        &self,
        item: ItemId,
        new_parent: ParentId,
    ) -> Result<OrderedItem, SequencerError> {
        let (mut tx, row) = self.lock_item(item, Some(new_parent))?;
        if row.parent == new_parent {
            return Ok(row);
        }
        if !tx.parent_exists(new_parent)? {
            return Err(self.missing_parent(new_parent));
        }

        let old_count = tx.count_siblings(row.parent)?;
        let landing = plan::plan_insert(tx.count_siblings(new_parent)?, None).ordinal;
        // Detach before closing the gap so the old band never overlaps the item.
        tx.set_parent(item, new_parent, landing)?;
        let closed = match plan::plan_removal(row.ordinal, old_count) {
            Some(range) => tx.shift_range(row.parent, range, Shift::Down)?,
            None => 0,
        };
        let moved = tx.find_item(item)?.ok_or(StorageError::UnknownItem(item))?;
        tx.commit()?;

        debug!(
            kind = %self.kind,
            item = %item,
            from_parent = %row.parent,
            to_parent = %new_parent,
            ordinal = %landing,
            closed,
            "reparented"
        );
        Ok(moved)
    }

    /// Remove an item and shift every later sibling down by one.
    ///
    /// Returns the row as it was before removal.
    pub fn delete(&self, item: ItemId) -> Result<OrderedItem, SequencerError> {
        let (mut tx, row) = self.lock_item(item, None)?;
        let count = tx.count_siblings(row.parent)?;
        tx.delete_item(item)?;
        let closed = match plan::plan_removal(row.ordinal, count) {
            Some(range) => tx.shift_range(row.parent, range, Shift::Down)?,
            None => 0,
        };
        tx.commit()?;

        debug!(
            kind = %self.kind,
            parent = %row.parent,
            item = %item,
            ordinal = %row.ordinal,
            closed,
            "deleted"
        );
        Ok(row)
    }

    /// Rewrite the ordinals of `parent`'s children to `0..N`, keeping their
    /// current relative order (ties broken by creation time).
    ///
    /// Writes nothing when the set is already dense.
    pub fn normalize(&self, parent: ParentId) -> Result<RepairReport, SequencerError> {
        let mut tx = self.store.begin(&[parent])?;
        if !tx.parent_exists(parent)? {
            return Err(self.missing_parent(parent));
        }

        let siblings = tx.list_siblings(parent)?;
        let check = audit_siblings(&siblings);
        let mut rewritten = 0usize;
        for (index, sibling) in siblings.iter().enumerate() {
            let want = Ordinal::from_index(index);
            if sibling.ordinal != want {
                tx.set_ordinal(sibling.id, want)?;
                rewritten += 1;
            }
        }
        tx.commit()?;

        let report = RepairReport {
            kind: self.kind,
            parent,
            siblings: siblings.len(),
            rewritten,
            duplicates: check.duplicates,
            gaps: check.gaps,
        };
        if report.repaired() {
            warn!(
                kind = %self.kind,
                parent = %parent,
                rewritten,
                duplicates = ?report.duplicates,
                gaps = ?report.gaps,
                "repair performed"
            );
        }
        Ok(report)
    }

    /// Children of `parent` in ordinal order.
    pub fn siblings(&self, parent: ParentId) -> Result<Vec<Sibling>, SequencerError> {
        let tx = self.store.begin(&[parent])?;
        if !tx.parent_exists(parent)? {
            return Err(self.missing_parent(parent));
        }
        Ok(tx.list_siblings(parent)?)
    }

    pub fn find(&self, item: ItemId) -> Result<Option<OrderedItem>, SequencerError> {
        match self.lock_item(item, None) {
            Ok((_, row)) => Ok(Some(row)),
            Err(SequencerError::ItemNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Lock the item's parent (plus `also`) and return the row as seen under
    /// that lock.
    fn lock_item(
        &self,
        item: ItemId,
        also: Option<ParentId>,
    ) -> Result<(S::Tx<'_>, OrderedItem), SequencerError> {
        for attempt in 1..=MAX_LOCATE_ATTEMPTS {
            let parent = self
                .store
                .locate(item)?
                .ok_or_else(|| self.not_found(item))?;
            let mut parents = vec![parent];
            parents.extend(also);

            let tx = self.store.begin(&parents)?;
            match tx.find_item(item)? {
                Some(row) if row.parent == parent => return Ok((tx, row)),
                Some(row) => {
                    debug!(
                        kind = %self.kind,
                        item = %item,
                        attempt,
                        expected = %parent,
                        found = %row.parent,
                        "item changed parent while locking"
                    );
                }
                None => return Err(self.not_found(item)),
            }
        }
        Err(StorageError::Contended {
            item,
            attempts: MAX_LOCATE_ATTEMPTS,
        }
        .into())
    }

    fn missing_parent(&self, parent: ParentId) -> SequencerError {
        SequencerError::MissingParent {
            kind: self.kind,
            parent: Some(parent),
        }
    }

    fn not_found(&self, item: ItemId) -> SequencerError {
        SequencerError::ItemNotFound {
            kind: self.kind,
            item,
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
