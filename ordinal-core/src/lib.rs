//! Ordinal core library: keeps sibling positions dense and unique.
//!
//! Public API surface:
//! - [`types`] — ids, ordinals, ranges, outcomes
//! - [`plan`] — pure shift arithmetic and clamping
//! - [`repository`] — [`SiblingStore`] / [`SiblingTx`] contract
//! - [`memory`] — [`MemoryStore`], the in-process repository
//! - [`sequencer`] — [`Sequencer`]: insert, move, reparent, delete, normalize
//! - [`audit`] — density and uniqueness checks
//! - [`error`] — [`SequencerError`], [`StorageError`]

pub mod audit;
pub mod error;
pub mod memory;
pub mod plan;
pub mod repository;
pub mod sequencer;
pub mod types;

pub use audit::{audit, audit_siblings, Audit};
pub use error::{SequencerError, StorageError};
pub use memory::{MemoryStore, MemoryTx};
pub use repository::{SiblingStore, SiblingTx};
pub use sequencer::Sequencer;
pub use types::{
    CollectionKind, ItemId, MoveOutcome, OrderedItem, Ordinal, OrdinalRange, ParentId,
    RepairReport, Shift, Sibling,
};
