//! Domain types for the ordinal sequencer.
//!
//! Ordinals are zero-based and dense per parent. Requested positions coming
//! from callers are plain `i64` so that out-of-range values can be clamped
//! instead of rejected.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Opaque identifier of an ordered item (a list, a card, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for ItemId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Opaque reference to the parent that owns a sibling set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParentId(pub u64);

impl fmt::Display for ParentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for ParentId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// An item of one collection is the parent of the next one down
/// (a list holds cards).
impl From<ItemId> for ParentId {
    fn from(id: ItemId) -> Self {
        Self(id.0)
    }
}

/// Zero-based position of an item among its siblings.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Ordinal(pub u32);

impl Ordinal {
    pub const ZERO: Ordinal = Ordinal(0);

    /// Converts a sibling index or count, saturating at `u32::MAX`.
    pub fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u32> for Ordinal {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which nesting a sequencer maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollectionKind {
    ListsInBoard,
    CardsInList,
}

impl CollectionKind {
    pub fn item_noun(self) -> &'static str {
        match self {
            CollectionKind::ListsInBoard => "list",
            CollectionKind::CardsInList => "card",
        }
    }

    pub fn parent_noun(self) -> &'static str {
        match self {
            CollectionKind::ListsInBoard => "board",
            CollectionKind::CardsInList => "list",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionKind::ListsInBoard => write!(f, "lists-in-board"),
            CollectionKind::CardsInList => write!(f, "cards-in-list"),
        }
    }
}

/// Direction of a range shift. `Up` adds one, `Down` subtracts one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Up,
    Down,
}

impl Shift {
    pub fn delta(self) -> i64 {
        match self {
            Shift::Up => 1,
            Shift::Down => -1,
        }
    }

    pub fn apply(self, ordinal: Ordinal) -> Ordinal {
        match self {
            Shift::Up => Ordinal(ordinal.0.saturating_add(1)),
            Shift::Down => Ordinal(ordinal.0.saturating_sub(1)),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// Inclusive band of ordinals, `lo <= hi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdinalRange {
    pub lo: Ordinal,
    pub hi: Ordinal,
}

impl OrdinalRange {
    /// Returns `None` when `lo > hi`.
    pub fn new(lo: Ordinal, hi: Ordinal) -> Option<Self> {
        (lo <= hi).then_some(Self { lo, hi })
    }

    pub fn contains(&self, ordinal: Ordinal) -> bool {
        self.lo <= ordinal && ordinal <= self.hi
    }

    pub fn len(&self) -> usize {
        (self.hi.0 - self.lo.0) as usize + 1
    }

    /// Always `false`: [`OrdinalRange::new`] rejects `lo > hi`.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for OrdinalRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

/// A stored row: an item, its parent and its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedItem {
    pub id: ItemId,
    pub parent: ParentId,
    pub ordinal: Ordinal,
    /// Stable secondary key used when ordinals collide.
    pub created_at: DateTime<Utc>,
}

/// The `(id, ordinal)` projection returned by sibling listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sibling {
    pub id: ItemId,
    pub ordinal: Ordinal,
}

impl From<&OrderedItem> for Sibling {
    fn from(item: &OrderedItem) -> Self {
        Self {
            id: item.id,
            ordinal: item.ordinal,
        }
    }
}

/// Result of a reposition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum MoveOutcome {
    /// The clamped target equals the current ordinal; nothing was written.
    Unchanged { ordinal: Ordinal },
    Moved {
        from: Ordinal,
        to: Ordinal,
        /// Number of siblings that shifted by one.
        displaced: usize,
    },
}

impl MoveOutcome {
    pub fn ordinal(&self) -> Ordinal {
        match self {
            MoveOutcome::Unchanged { ordinal } => *ordinal,
            MoveOutcome::Moved { to, .. } => *to,
        }
    }
}

/// Diagnostic produced by a normalize pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    pub kind: CollectionKind,
    pub parent: ParentId,
    pub siblings: usize,
    /// Rows whose ordinal was rewritten.
    pub rewritten: usize,
    pub duplicates: Vec<Ordinal>,
    pub gaps: Vec<Ordinal>,
}

impl RepairReport {
    pub fn repaired(&self) -> bool {
        self.rewritten > 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
