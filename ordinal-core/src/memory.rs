//! In-memory [`SiblingStore`].
//!
//! # Locking
//!
//! Each transaction claims its parents in a shared busy-set. A claim is
//! all-or-nothing, so two transactions that need overlapping parents cannot
//! deadlock on acquisition order. Waiters block on a condvar for at most the
//! configured lock timeout.
//!
//! # Writes
//!
//! Every sibling set is keyed by ordinal, so a range shift visits only the
//! rows inside the band. A transaction writes straight into the claimed sets
//! and keeps the first before-image of every row it touches. `commit` checks
//! `UNIQUE(parent, ordinal)` against the colliding ordinals each set tracks
//! and then forgets the before-images. Dropping the transaction puts them
//! back.
//!
//! Unclaimed reads (`locate`) may observe rows of an open transaction.
//! [`MemoryStore::snapshot`] claims every parent first.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Condvar, Mutex, RwLock};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::error::StorageError;
use crate::repository::{SiblingStore, SiblingTx};
use crate::types::{ItemId, OrderedItem, Ordinal, OrdinalRange, ParentId, Shift, Sibling};

pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Tie-break key inside one ordinal slot.
type TieKey = (DateTime<Utc>, ItemId);

/// Rows of one parent, keyed by ordinal.
#[derive(Debug, Default)]
struct SiblingSet {
    slots: BTreeMap<Ordinal, BTreeSet<TieKey>>,
    /// Ordinals currently held by more than one row.
    collisions: BTreeSet<Ordinal>,
    len: usize,
}

impl SiblingSet {
    fn insert(&mut self, ordinal: Ordinal, key: TieKey) {
        let slot = self.slots.entry(ordinal).or_default();
        if slot.insert(key) {
            self.len += 1;
        }
        if slot.len() > 1 {
            self.collisions.insert(ordinal);
        }
    }

    fn remove(&mut self, ordinal: Ordinal, key: &TieKey) {
        let Some(slot) = self.slots.get_mut(&ordinal) else {
            return;
        };
        if slot.remove(key) {
            self.len -= 1;
        }
        match slot.len() {
            0 => {
                self.slots.remove(&ordinal);
            }
            1 => {
                self.collisions.remove(&ordinal);
            }
            _ => {}
        }
    }

    /// Rows whose ordinal lies in `range`, in order.
    fn band(&self, range: OrdinalRange) -> Vec<(Ordinal, TieKey)> {
        self.slots
            .range(range.lo..=range.hi)
            .flat_map(|(ordinal, slot)| slot.iter().map(move |key| (*ordinal, *key)))
            .collect()
    }

    /// Every row ordered by ordinal, then creation time, then id.
    fn ordered(&self) -> impl Iterator<Item = (Ordinal, ItemId)> + '_ {
        self.slots
            .iter()
            .flat_map(|(ordinal, slot)| slot.iter().map(move |(_, id)| (*ordinal, *id)))
    }

    fn first_collision(&self) -> Option<Ordinal> {
        self.collisions.first().copied()
    }
}

#[derive(Debug, Default)]
struct State {
    sets: HashMap<ParentId, SiblingSet>,
    rows: HashMap<ItemId, OrderedItem>,
}

impl State {
    fn place(&mut self, row: OrderedItem) -> Result<(), StorageError> {
        let set = self
            .sets
            .get_mut(&row.parent)
            .ok_or(StorageError::UnknownParent(row.parent))?;
        set.insert(row.ordinal, (row.created_at, row.id));
        self.rows.insert(row.id, row);
        Ok(())
    }

    fn unplace(&mut self, item: ItemId) -> Option<OrderedItem> {
        let row = self.rows.remove(&item)?;
        if let Some(set) = self.sets.get_mut(&row.parent) {
            set.remove(row.ordinal, &(row.created_at, row.id));
        }
        Some(row)
    }

    fn ordered_rows(&self, parent: ParentId) -> Vec<OrderedItem> {
        self.sets
            .get(&parent)
            .map(|set| {
                set.ordered()
                    .filter_map(|(_, id)| self.rows.get(&id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Reference sibling repository backed by process memory.
#[derive(Debug)]
pub struct MemoryStore {
    state: RwLock<State>,
    busy: Mutex<HashSet<ParentId>>,
    released: Condvar,
    lock_timeout: Duration,
    next_id: AtomicU64,
    writes: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
            busy: Mutex::new(HashSet::new()),
            released: Condvar::new(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            next_id: AtomicU64::new(1),
            writes: AtomicU64::new(0),
        }
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Rebuild a store from raw rows without checking density.
    ///
    /// Every item's parent must appear in `parents` and every item id must be
    /// distinct. Item ids continue after the highest restored id.
    pub fn restore<P, I>(parents: P, items: I) -> Result<Self, StorageError>
    where
        P: IntoIterator<Item = ParentId>,
        I: IntoIterator<Item = OrderedItem>,
    {
        let mut state = State::default();
        for parent in parents {
            state.sets.entry(parent).or_default();
        }
        let mut max_id = 0u64;
        for item in items {
            if state.rows.contains_key(&item.id) {
                return Err(StorageError::DuplicateItem(item.id));
            }
            max_id = max_id.max(item.id.0);
            state.place(item)?;
        }

        let store = Self::new();
        store.next_id.store(max_id + 1, Ordering::SeqCst);
        *store.state.write().map_err(|_| StorageError::Poisoned)? = state;
        Ok(store)
    }

    /// Register a parent so that items can be placed under it. Idempotent.
    pub fn add_parent(&self, parent: ParentId) -> Result<(), StorageError> {
        let _guard = self.acquire(&[parent])?;
        let mut state = self.state.write().map_err(|_| StorageError::Poisoned)?;
        state.sets.entry(parent).or_default();
        Ok(())
    }

    /// Unregister a parent and purge its items, returning them in order.
    pub fn remove_parent(&self, parent: ParentId) -> Result<Vec<OrderedItem>, StorageError> {
        let _guard = self.acquire(&[parent])?;
        let mut state = self.state.write().map_err(|_| StorageError::Poisoned)?;
        let items = state.ordered_rows(parent);
        state.sets.remove(&parent);
        for item in &items {
            state.rows.remove(&item.id);
        }
        self.writes.fetch_add(items.len() as u64, Ordering::Relaxed);
        Ok(items)
    }

    /// Re-register `parent` and put back rows taken by [`remove_parent`].
    ///
    /// [`remove_parent`]: MemoryStore::remove_parent
    pub fn restore_parent(
        &self,
        parent: ParentId,
        items: Vec<OrderedItem>,
    ) -> Result<(), StorageError> {
        let _guard = self.acquire(&[parent])?;
        let mut state = self.state.write().map_err(|_| StorageError::Poisoned)?;
        for item in &items {
            if item.parent != parent {
                return Err(StorageError::UnknownParent(item.parent));
            }
            if state.rows.contains_key(&item.id) {
                return Err(StorageError::DuplicateItem(item.id));
            }
        }
        state.sets.entry(parent).or_default();
        for item in items {
            state.place(item)?;
        }
        Ok(())
    }

    pub fn has_parent(&self, parent: ParentId) -> Result<bool, StorageError> {
        let state = self.state.read().map_err(|_| StorageError::Poisoned)?;
        Ok(state.sets.contains_key(&parent))
    }

    pub fn parents(&self) -> Result<Vec<ParentId>, StorageError> {
        let state = self.state.read().map_err(|_| StorageError::Poisoned)?;
        let mut parents: Vec<_> = state.sets.keys().copied().collect();
        parents.sort();
        Ok(parents)
    }

    /// All committed rows, grouped by parent and ordered within each parent.
    pub fn snapshot(&self) -> Result<Vec<OrderedItem>, StorageError> {
        let parents = self.parents()?;
        let _guard = self.acquire(&parents)?;
        let state = self.state.read().map_err(|_| StorageError::Poisoned)?;
        Ok(parents
            .iter()
            .flat_map(|parent| state.ordered_rows(*parent))
            .collect())
    }

    /// Number of row writes committed so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// The id the next created item will receive.
    pub fn next_id(&self) -> ItemId {
        ItemId(self.next_id.load(Ordering::SeqCst))
    }

    /// Never hand out ids below `next`. Lowering is ignored.
    pub fn reserve_ids_from(&self, next: ItemId) {
        self.next_id.fetch_max(next.0, Ordering::SeqCst);
    }

    fn acquire(&self, parents: &[ParentId]) -> Result<ParentGuard<'_>, StorageError> {
        let mut wanted = parents.to_vec();
        wanted.sort();
        wanted.dedup();

        let started = Instant::now();
        let deadline = started + self.lock_timeout;
        let mut busy = self.busy.lock().map_err(|_| StorageError::Poisoned)?;
        while wanted.iter().any(|p| busy.contains(p)) {
            let now = Instant::now();
            if now >= deadline {
                return Err(StorageError::LockTimeout {
                    waited_ms: started.elapsed().as_millis() as u64,
                });
            }
            let (guard, _) = self
                .released
                .wait_timeout(busy, deadline - now)
                .map_err(|_| StorageError::Poisoned)?;
            busy = guard;
        }
        busy.extend(wanted.iter().copied());
        Ok(ParentGuard {
            store: self,
            parents: wanted,
        })
    }
}

/// Claim on a set of parents, released on drop.
#[derive(Debug)]
struct ParentGuard<'a> {
    store: &'a MemoryStore,
    parents: Vec<ParentId>,
}

impl ParentGuard<'_> {
    fn holds(&self, parent: ParentId) -> bool {
        self.parents.binary_search(&parent).is_ok()
    }
}

impl Drop for ParentGuard<'_> {
    fn drop(&mut self) {
        let mut busy = match self.store.busy.lock() {
            Ok(busy) => busy,
            Err(poisoned) => poisoned.into_inner(),
        };
        for parent in &self.parents {
            busy.remove(parent);
        }
        self.store.released.notify_all();
    }
}

impl SiblingStore for MemoryStore {
    type Tx<'a> = MemoryTx<'a>;

    fn locate(&self, item: ItemId) -> Result<Option<ParentId>, StorageError> {
        let state = self.state.read().map_err(|_| StorageError::Poisoned)?;
        Ok(state.rows.get(&item).map(|row| row.parent))
    }

    fn begin(&self, parents: &[ParentId]) -> Result<MemoryTx<'_>, StorageError> {
        let guard = self.acquire(parents)?;
        Ok(MemoryTx {
            store: self,
            guard,
            undo: HashMap::new(),
            touched: HashSet::new(),
            writes: 0,
        })
    }
}

/// Transaction over a [`MemoryStore`].
#[derive(Debug)]
pub struct MemoryTx<'a> {
    store: &'a MemoryStore,
    guard: ParentGuard<'a>,
    /// First before-image of every touched row; `None` for rows created here.
    undo: HashMap<ItemId, Option<OrderedItem>>,
    touched: HashSet<ParentId>,
    writes: u64,
}

impl MemoryTx<'_> {
    /// Number of distinct rows this transaction has written so far.
    pub fn staged_rows(&self) -> usize {
        self.undo.len()
    }

    fn check_held(&self, parent: ParentId) -> Result<(), StorageError> {
        if self.guard.holds(parent) {
            Ok(())
        } else {
            Err(StorageError::UnlockedParent(parent))
        }
    }

    fn check_writable(&self, state: &State, parent: ParentId) -> Result<(), StorageError> {
        self.check_held(parent)?;
        if state.sets.contains_key(&parent) {
            Ok(())
        } else {
            Err(StorageError::UnknownParent(parent))
        }
    }

    /// The row of `item`, if it lives under a locked parent.
    fn held_row(&self, state: &State, item: ItemId) -> Result<OrderedItem, StorageError> {
        state
            .rows
            .get(&item)
            .filter(|row| self.guard.holds(row.parent))
            .cloned()
            .ok_or(StorageError::UnknownItem(item))
    }

    fn remember(&mut self, state: &State, item: ItemId) {
        self.undo
            .entry(item)
            .or_insert_with(|| state.rows.get(&item).cloned());
    }
}

impl SiblingTx for MemoryTx<'_> {
    fn parent_exists(&self, parent: ParentId) -> Result<bool, StorageError> {
        self.store.has_parent(parent)
    }

    fn find_item(&self, item: ItemId) -> Result<Option<OrderedItem>, StorageError> {
        let state = self.store.state.read().map_err(|_| StorageError::Poisoned)?;
        Ok(state.rows.get(&item).cloned())
    }

    fn list_siblings(&self, parent: ParentId) -> Result<Vec<Sibling>, StorageError> {
        let state = self.store.state.read().map_err(|_| StorageError::Poisoned)?;
        self.check_writable(&state, parent)?;
        Ok(state.ordered_rows(parent).iter().map(Sibling::from).collect())
    }

    fn count_siblings(&self, parent: ParentId) -> Result<usize, StorageError> {
        let state = self.store.state.read().map_err(|_| StorageError::Poisoned)?;
        self.check_writable(&state, parent)?;
        Ok(state.sets.get(&parent).map_or(0, |set| set.len))
    }

    fn shift_range(
        &mut self,
        parent: ParentId,
        range: OrdinalRange,
        shift: Shift,
    ) -> Result<usize, StorageError> {
        let store = self.store;
        let mut state = store.state.write().map_err(|_| StorageError::Poisoned)?;
        self.check_writable(&state, parent)?;
        self.touched.insert(parent);

        let band = state
            .sets
            .get(&parent)
            .map(|set| set.band(range))
            .unwrap_or_default();
        for (_, (_, id)) in &band {
            self.remember(&state, *id);
        }

        let State { sets, rows } = &mut *state;
        if let Some(set) = sets.get_mut(&parent) {
            for (ordinal, key) in &band {
                set.remove(*ordinal, key);
            }
            for (ordinal, key) in &band {
                let shifted = shift.apply(*ordinal);
                set.insert(shifted, *key);
                if let Some(row) = rows.get_mut(&key.1) {
                    row.ordinal = shifted;
                }
            }
        }
        self.writes += band.len() as u64;
        Ok(band.len())
    }

    fn set_ordinal(&mut self, item: ItemId, ordinal: Ordinal) -> Result<(), StorageError> {
        let store = self.store;
        let mut state = store.state.write().map_err(|_| StorageError::Poisoned)?;
        let mut row = self.held_row(&state, item)?;
        self.remember(&state, item);
        state.unplace(item);
        row.ordinal = ordinal;
        self.touched.insert(row.parent);
        state.place(row)?;
        self.writes += 1;
        Ok(())
    }

    fn create_item(&mut self, parent: ParentId, ordinal: Ordinal) -> Result<ItemId, StorageError> {
        let store = self.store;
        let mut state = store.state.write().map_err(|_| StorageError::Poisoned)?;
        self.check_writable(&state, parent)?;
        let id = ItemId(store.next_id.fetch_add(1, Ordering::SeqCst));
        self.undo.insert(id, None);
        self.touched.insert(parent);
        state.place(OrderedItem {
            id,
            parent,
            ordinal,
            created_at: Utc::now(),
        })?;
        self.writes += 1;
        Ok(id)
    }

    fn set_parent(
        &mut self,
        item: ItemId,
        parent: ParentId,
        ordinal: Ordinal,
    ) -> Result<(), StorageError> {
        let store = self.store;
        let mut state = store.state.write().map_err(|_| StorageError::Poisoned)?;
        // Validate the destination before detaching anything.
        self.check_writable(&state, parent)?;
        let mut row = self.held_row(&state, item)?;
        self.remember(&state, item);
        state.unplace(item);
        self.touched.insert(row.parent);
        self.touched.insert(parent);
        row.parent = parent;
        row.ordinal = ordinal;
        state.place(row)?;
        self.writes += 1;
        Ok(())
    }

    fn delete_item(&mut self, item: ItemId) -> Result<(), StorageError> {
        let store = self.store;
        let mut state = store.state.write().map_err(|_| StorageError::Poisoned)?;
        let row = self.held_row(&state, item)?;
        self.remember(&state, item);
        state.unplace(item);
        self.touched.insert(row.parent);
        self.writes += 1;
        Ok(())
    }

    fn commit(mut self) -> Result<(), StorageError> {
        let violation = {
            let state = self.store.state.read().map_err(|_| StorageError::Poisoned)?;
            self.touched.iter().find_map(|parent| {
                state
                    .sets
                    .get(parent)
                    .and_then(SiblingSet::first_collision)
                    .map(|ordinal| (*parent, ordinal))
            })
        };
        // Returning with the before-images still recorded rolls back on drop.
        if let Some((parent, ordinal)) = violation {
            return Err(StorageError::UniqueViolation { parent, ordinal });
        }

        let rows = self.undo.len();
        self.undo.clear();
        self.store.writes.fetch_add(self.writes, Ordering::Relaxed);
        tracing::trace!(
            parents = self.touched.len(),
            rows,
            writes = self.writes,
            "memory transaction committed"
        );
        Ok(())
    }
}

impl Drop for MemoryTx<'_> {
    fn drop(&mut self) {
        if self.undo.is_empty() {
            return;
        }
        let mut state = match self.store.state.write() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        for (id, before) in self.undo.drain() {
            state.unplace(id);
            if let Some(row) = before {
                if let Err(e) = state.place(row) {
                    tracing::error!(item = %id, error = %e, "rollback could not restore row");
                }
            }
        }
        tracing::trace!(parents = self.touched.len(), "memory transaction rolled back");
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const P: ParentId = ParentId(1);
    const Q: ParentId = ParentId(2);

    fn store_with(parents: &[ParentId]) -> MemoryStore {
        let store = MemoryStore::new();
        for p in parents {
            store.add_parent(*p).expect("add parent");
        }
        store
    }

    fn ordinals(store: &MemoryStore, parent: ParentId) -> Vec<(ItemId, u32)> {
        let tx = store.begin(&[parent]).expect("begin");
        tx.list_siblings(parent)
            .expect("list")
            .into_iter()
            .map(|s| (s.id, s.ordinal.0))
            .collect()
    }

    #[test]
    fn committed_rows_are_visible() {
        let store = store_with(&[P]);
        let mut tx = store.begin(&[P]).expect("begin");
        let a = tx.create_item(P, Ordinal(0)).expect("create");
        let b = tx.create_item(P, Ordinal(1)).expect("create");
        tx.commit().expect("commit");

        assert_eq!(ordinals(&store, P), vec![(a, 0), (b, 1)]);
        assert_eq!(store.locate(a).expect("locate"), Some(P));
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn dropped_transaction_rolls_back() {
        let store = store_with(&[P]);
        {
            let mut tx = store.begin(&[P]).expect("begin");
            tx.create_item(P, Ordinal(0)).expect("create");
        }
        assert!(ordinals(&store, P).is_empty());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn commit_rejects_duplicate_ordinals() {
        let store = store_with(&[P]);
        let mut tx = store.begin(&[P]).expect("begin");
        tx.create_item(P, Ordinal(0)).expect("create");
        tx.create_item(P, Ordinal(0)).expect("create");
        let err = tx.commit().unwrap_err();
        assert!(matches!(err, StorageError::UniqueViolation { ordinal: Ordinal(0), .. }));
        assert!(ordinals(&store, P).is_empty());
    }

    #[test]
    fn unlocked_parent_is_refused() {
        let store = store_with(&[P, Q]);
        let mut tx = store.begin(&[P]).expect("begin");
        let err = tx.create_item(Q, Ordinal(0)).unwrap_err();
        assert!(matches!(err, StorageError::UnlockedParent(p) if p == Q));
    }

    #[test]
    fn second_claim_on_held_parent_times_out() {
        let store = store_with(&[P, Q]).with_lock_timeout(Duration::from_millis(20));
        let _held = store.begin(&[P]).expect("begin");
        let err = store.begin(&[Q, P]).unwrap_err();
        assert!(matches!(err, StorageError::LockTimeout { .. }));
        // Independent parents are not blocked.
        store.begin(&[Q]).expect("begin Q");
    }

    #[test]
    fn shift_range_touches_only_the_band() {
        let store = store_with(&[P]);
        let mut tx = store.begin(&[P]).expect("begin");
        for i in 0..5 {
            tx.create_item(P, Ordinal(i)).expect("create");
        }
        let range = OrdinalRange::new(Ordinal(3), Ordinal(4)).expect("range");
        assert_eq!(tx.shift_range(P, range, Shift::Up).expect("shift"), 2);
        let ords: Vec<u32> = tx
            .list_siblings(P)
            .expect("list")
            .iter()
            .map(|s| s.ordinal.0)
            .collect();
        assert_eq!(ords, vec![0, 1, 2, 4, 5]);
    }

    #[test]
    fn set_parent_moves_row_between_locked_parents() {
        let store = store_with(&[P, Q]);
        let mut tx = store.begin(&[P, Q]).expect("begin");
        let a = tx.create_item(P, Ordinal(0)).expect("create");
        tx.set_parent(a, Q, Ordinal(0)).expect("set parent");
        tx.commit().expect("commit");

        assert_eq!(store.locate(a).expect("locate"), Some(Q));
        assert!(ordinals(&store, P).is_empty());
    }

    #[test]
    fn restore_keeps_raw_ordinals_and_continues_ids() {
        let now = Utc::now();
        let rows = vec![
            OrderedItem { id: ItemId(4), parent: P, ordinal: Ordinal(3), created_at: now },
            OrderedItem { id: ItemId(9), parent: P, ordinal: Ordinal(3), created_at: now },
        ];
        let store = MemoryStore::restore([P], rows).expect("restore");
        assert_eq!(ordinals(&store, P), vec![(ItemId(4), 3), (ItemId(9), 3)]);

        let mut tx = store.begin(&[P]).expect("begin");
        let id = tx.create_item(P, Ordinal(0)).expect("create");
        assert_eq!(id, ItemId(10));
    }

    #[test]
    fn restore_rejects_orphans() {
        let row = OrderedItem { id: ItemId(1), parent: Q, ordinal: Ordinal(0), created_at: Utc::now() };
        let err = MemoryStore::restore([P], [row]).unwrap_err();
        assert!(matches!(err, StorageError::UnknownParent(p) if p == Q));
    }

    #[test]
    fn restore_rejects_repeated_item_ids() {
        let now = Utc::now();
        let rows = vec![
            OrderedItem { id: ItemId(1), parent: P, ordinal: Ordinal(0), created_at: now },
            OrderedItem { id: ItemId(1), parent: P, ordinal: Ordinal(1), created_at: now },
        ];
        let err = MemoryStore::restore([P], rows).unwrap_err();
        assert!(matches!(err, StorageError::DuplicateItem(ItemId(1))));
    }

    #[test]
    fn dropped_transaction_restores_shifted_rows() {
        let store = store_with(&[P]);
        let mut tx = store.begin(&[P]).expect("begin");
        let a = tx.create_item(P, Ordinal(0)).expect("create");
        let b = tx.create_item(P, Ordinal(1)).expect("create");
        tx.commit().expect("commit");

        {
            let mut tx = store.begin(&[P]).expect("begin");
            let range = OrdinalRange::new(Ordinal(0), Ordinal(1)).expect("range");
            tx.shift_range(P, range, Shift::Up).expect("shift");
            tx.delete_item(a).expect("delete");
            tx.create_item(P, Ordinal(0)).expect("create");
        }
        assert_eq!(ordinals(&store, P), vec![(a, 0), (b, 1)]);
        assert_eq!(store.locate(a).expect("locate"), Some(P));
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn narrow_move_in_large_set_stages_only_the_band() {
        const N: u32 = 10_000;
        let now = Utc::now();
        let rows = (0..N).map(|i| OrderedItem {
            id: ItemId(u64::from(i) + 1),
            parent: P,
            ordinal: Ordinal(i),
            created_at: now,
        });
        let store = MemoryStore::restore([P], rows).expect("restore");

        // Second-to-last row moves to the end: one neighbour shifts down.
        let mut tx = store.begin(&[P]).expect("begin");
        let band = OrdinalRange::new(Ordinal(N - 1), Ordinal(N - 1)).expect("range");
        assert_eq!(tx.shift_range(P, band, Shift::Down).expect("shift"), 1);
        tx.set_ordinal(ItemId(u64::from(N - 1)), Ordinal(N - 1)).expect("set");
        assert_eq!(tx.staged_rows(), 2);
        tx.commit().expect("commit");

        assert_eq!(store.write_count(), 2);
        let tail: Vec<_> = ordinals(&store, P).into_iter().skip(N as usize - 2).collect();
        assert_eq!(
            tail,
            vec![
                (ItemId(u64::from(N)), N - 2),
                (ItemId(u64::from(N - 1)), N - 1),
            ]
        );
    }

    #[test]
    fn remove_parent_purges_items() {
        let store = store_with(&[P]);
        let mut tx = store.begin(&[P]).expect("begin");
        let a = tx.create_item(P, Ordinal(0)).expect("create");
        tx.commit().expect("commit");

        let purged = store.remove_parent(P).expect("remove");
        assert_eq!(purged.len(), 1);
        assert_eq!(store.locate(a).expect("locate"), None);
        assert!(!store.has_parent(P).expect("has parent"));
    }

    #[test]
    fn restore_parent_puts_purged_rows_back() {
        let store = store_with(&[P]);
        let mut tx = store.begin(&[P]).expect("begin");
        let a = tx.create_item(P, Ordinal(0)).expect("create");
        let b = tx.create_item(P, Ordinal(1)).expect("create");
        tx.commit().expect("commit");

        let purged = store.remove_parent(P).expect("remove");
        store.restore_parent(P, purged.clone()).expect("restore parent");
        assert_eq!(ordinals(&store, P), vec![(a, 0), (b, 1)]);
        assert_eq!(store.locate(b).expect("locate"), Some(P));

        let err = store.restore_parent(P, purged).unwrap_err();
        assert!(matches!(err, StorageError::DuplicateItem(id) if id == a));
    }

    #[test]
    fn reserved_ids_are_never_reused() {
        let store = store_with(&[P]);
        store.reserve_ids_from(ItemId(20));
        store.reserve_ids_from(ItemId(3));
        assert_eq!(store.next_id(), ItemId(20));

        let mut tx = store.begin(&[P]).expect("begin");
        assert_eq!(tx.create_item(P, Ordinal(0)).expect("create"), ItemId(20));
    }
}
