//! `ordinal list add|rename|mv|reparent|rm`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use ordinal_kanban::{BoardId, ListDraft, ListId, ListPatch, Placement};

use super::{describe_move, with_workspace};

#[derive(Subcommand, Debug)]
pub enum ListCommand {
    /// Add a list to a board. Appends unless `--at` is given.
    Add(AddArgs),

    /// Change a list's title.
    Rename {
        /// List id.
        list: u64,
        /// New title.
        title: String,
    },

    /// Move a list to another position within its board.
    Mv(MoveArgs),

    /// Move a list to the end of another board.
    Reparent {
        /// List id.
        list: u64,
        /// Destination board id.
        board: u64,
    },

    /// Delete a list and its cards.
    Rm {
        /// List id.
        list: u64,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Board id.
    pub board: u64,

    /// List title (1 to 20 characters by default).
    pub title: String,

    /// Insert at this position instead of appending; clamped to the board.
    #[arg(long, allow_negative_numbers = true)]
    pub at: Option<i64>,
}

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// List id.
    pub list: u64,

    /// Target position; clamped to the board.
    #[arg(allow_negative_numbers = true)]
    pub to: i64,
}

pub fn run(cmd: ListCommand) -> Result<()> {
    match cmd {
        ListCommand::Add(args) => add(args),
        ListCommand::Rename { list, title } => rename(ListId(list), title),
        ListCommand::Mv(args) => move_to(args),
        ListCommand::Reparent { list, board } => reparent(ListId(list), BoardId(board)),
        ListCommand::Rm { list } => remove(ListId(list)),
    }
}

fn add(args: AddArgs) -> Result<()> {
    let board = BoardId(args.board);
    let list = with_workspace(|ws| {
        ws.create_list(ListDraft::new(board, args.title.clone()), Placement::from(args.at))
            .with_context(|| format!("failed to add list '{}' to board {board}", args.title))
    })?;
    println!(
        "✓ Added list {} '{}' to board {} at position {}",
        list.id, list.title, list.board, list.ordinal
    );
    Ok(())
}

fn rename(id: ListId, title: String) -> Result<()> {
    let patch = ListPatch {
        title: Some(title),
        ..ListPatch::default()
    };
    let list = with_workspace(|ws| {
        ws.update_list(id, patch)
            .with_context(|| format!("failed to rename list {id}"))
    })?;
    println!("✓ Renamed list {} to '{}'", list.id, list.title);
    Ok(())
}

fn move_to(args: MoveArgs) -> Result<()> {
    let id = ListId(args.list);
    let outcome = with_workspace(|ws| {
        ws.move_list(id, args.to)
            .with_context(|| format!("failed to move list {id}"))
    })?;
    println!("✓ List {id} {}", describe_move(&outcome));
    Ok(())
}

fn reparent(id: ListId, board: BoardId) -> Result<()> {
    let patch = ListPatch {
        board: Some(Some(board)),
        ..ListPatch::default()
    };
    let list = with_workspace(|ws| {
        ws.update_list(id, patch)
            .with_context(|| format!("failed to move list {id} to board {board}"))
    })?;
    println!(
        "✓ Moved list {} to board {} at position {}",
        list.id, list.board, list.ordinal
    );
    Ok(())
}

fn remove(id: ListId) -> Result<()> {
    let cards = with_workspace(|ws| {
        ws.delete_list(id)
            .with_context(|| format!("failed to delete list {id}"))
    })?;
    println!("✓ Deleted list {id} ({cards} cards)");
    Ok(())
}
