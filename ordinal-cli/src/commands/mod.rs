//! Subcommand implementations. Each mutating command loads the workspace,
//! applies one change and saves it back.

pub mod board;
pub mod card;
pub mod list;
pub mod normalize;
pub mod show;

use std::path::PathBuf;

use anyhow::{Context, Result};
use ordinal_core::MoveOutcome;
use ordinal_kanban::{store, Workspace};
use tracing::debug;

pub(crate) fn home() -> Result<PathBuf> {
    dirs::home_dir().context("could not determine home directory")
}

pub(crate) fn read_workspace() -> Result<Workspace> {
    let home = home()?;
    store::load_at(&home).context("failed to load workspace")
}

/// Load, apply `change`, and save only if it succeeded.
pub(crate) fn with_workspace<T>(change: impl FnOnce(&mut Workspace) -> Result<T>) -> Result<T> {
    let home = home()?;
    let mut workspace = store::load_at(&home).context("failed to load workspace")?;
    let out = change(&mut workspace)?;
    store::save_at(&home, &workspace).context("failed to save workspace")?;
    debug!(path = %store::workspace_path_at(&home).display(), "workspace saved");
    Ok(out)
}

pub(crate) fn describe_move(outcome: &MoveOutcome) -> String {
    match outcome {
        MoveOutcome::Unchanged { ordinal } => format!("already at position {ordinal}"),
        MoveOutcome::Moved { from, to, displaced } => {
            format!("moved {from} → {to} ({displaced} shifted)")
        }
    }
}
