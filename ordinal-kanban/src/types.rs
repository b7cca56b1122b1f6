//! Kanban entities: boards hold lists, lists hold cards.
//!
//! Boards are unordered roots. Lists and cards carry an `ordinal` that only
//! the sequencer writes; drafts and patches expose the field solely so that
//! direct assignment can be rejected.

use std::fmt;

use chrono::{DateTime, Utc};
use ordinal_core::{ItemId, Ordinal, ParentId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(pub u64);

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for BoardId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl From<BoardId> for ParentId {
    fn from(id: BoardId) -> Self {
        ParentId(id.0)
    }
}

impl From<ParentId> for BoardId {
    fn from(id: ParentId) -> Self {
        Self(id.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(pub u64);

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for ListId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl From<ListId> for ItemId {
    fn from(id: ListId) -> Self {
        ItemId(id.0)
    }
}

impl From<ItemId> for ListId {
    fn from(id: ItemId) -> Self {
        Self(id.0)
    }
}

impl From<ListId> for ParentId {
    fn from(id: ListId) -> Self {
        ParentId(id.0)
    }
}

impl From<ParentId> for ListId {
    fn from(id: ParentId) -> Self {
        Self(id.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u64);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for CardId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl From<CardId> for ItemId {
    fn from(id: CardId) -> Self {
        ItemId(id.0)
    }
}

impl From<ItemId> for CardId {
    fn from(id: ItemId) -> Self {
        Self(id.0)
    }
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

/// Where a newly created list or card goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    #[default]
    End,
    /// Clamped to `[0, N]`; siblings at and after it shift up.
    At(i64),
}

impl Placement {
    pub fn desired(self) -> Option<i64> {
        match self {
            Placement::End => None,
            Placement::At(p) => Some(p),
        }
    }
}

impl From<Option<i64>> for Placement {
    fn from(at: Option<i64>) -> Self {
        at.map_or(Placement::End, Placement::At)
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanbanList {
    pub id: ListId,
    pub board: BoardId,
    pub ordinal: Ordinal,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanbanCard {
    pub id: CardId,
    pub list: ListId,
    pub ordinal: Ordinal,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Drafts and patches
// ---------------------------------------------------------------------------

/// Fields a caller supplies to create a list.
#[derive(Debug, Clone, Default)]
pub struct ListDraft {
    pub board: Option<BoardId>,
    pub title: String,
    /// Rejected when set; positions come from [`Placement`].
    pub ordinal: Option<i64>,
}

impl ListDraft {
    pub fn new(board: BoardId, title: impl Into<String>) -> Self {
        Self {
            board: Some(board),
            title: title.into(),
            ordinal: None,
        }
    }
}

/// Partial update of a list. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ListPatch {
    pub title: Option<String>,
    /// `Some(None)` clears the board reference, which is never allowed.
    pub board: Option<Option<BoardId>>,
    /// Rejected when set; use `move_list`.
    pub ordinal: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct CardDraft {
    pub list: Option<ListId>,
    pub content: String,
    pub ordinal: Option<i64>,
}

impl CardDraft {
    pub fn new(list: ListId, content: impl Into<String>) -> Self {
        Self {
            list: Some(list),
            content: content.into(),
            ordinal: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CardPatch {
    pub content: Option<String>,
    pub list: Option<Option<ListId>>,
    pub ordinal: Option<i64>,
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListView {
    #[serde(flatten)]
    pub list: KanbanList,
    pub cards: Vec<KanbanCard>,
}

/// A board with its lists and cards in presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    #[serde(flatten)]
    pub board: Board,
    pub lists: Vec<ListView>,
}

/// What a board deletion removed alongside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cascade {
    pub lists: usize,
    pub cards: usize,
}
