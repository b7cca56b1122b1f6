//! Kanban boards on top of the ordinal sequencer.
//!
//! Public API surface:
//! - [`types`] — boards, lists, cards, drafts, patches, views
//! - [`workspace`] — [`Workspace`]: entity lifecycle
//! - [`store`] — load / save `~/.ordinal/workspace.yaml`
//! - [`config`] — [`KanbanConfig`]
//! - [`error`] — [`KanbanError`], [`StoreError`]

pub mod config;
pub mod error;
pub mod store;
pub mod types;
pub mod workspace;

pub use config::KanbanConfig;
pub use error::{KanbanError, StoreError};
pub use types::{
    Board, BoardId, BoardView, Cascade, CardDraft, CardId, CardPatch, KanbanCard, KanbanList,
    ListDraft, ListId, ListPatch, ListView, Placement,
};
pub use workspace::Workspace;
