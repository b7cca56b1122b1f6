//! `ordinal board add|rename|rm|ls`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use ordinal_kanban::BoardId;

use super::{read_workspace, with_workspace};

#[derive(Subcommand, Debug)]
pub enum BoardCommand {
    /// Create a board.
    Add(AddArgs),

    /// Change a board's title.
    Rename(RenameArgs),

    /// Delete a board together with its lists and cards.
    Rm {
        /// Board id.
        board: u64,
    },

    /// List all boards.
    Ls {
        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Board title (1 to 30 characters by default).
    pub title: String,
}

#[derive(Args, Debug)]
pub struct RenameArgs {
    /// Board id.
    pub board: u64,

    /// New title.
    pub title: String,
}

pub fn run(cmd: BoardCommand) -> Result<()> {
    match cmd {
        BoardCommand::Add(args) => add(args),
        BoardCommand::Rename(args) => rename(args),
        BoardCommand::Rm { board } => remove(BoardId(board)),
        BoardCommand::Ls { json } => list(json),
    }
}

fn add(args: AddArgs) -> Result<()> {
    let board = with_workspace(|ws| {
        ws.create_board(&args.title)
            .with_context(|| format!("failed to create board '{}'", args.title))
    })?;
    println!("✓ Created board {} '{}'", board.id, board.title);
    Ok(())
}

fn rename(args: RenameArgs) -> Result<()> {
    let id = BoardId(args.board);
    let board = with_workspace(|ws| {
        ws.rename_board(id, &args.title)
            .with_context(|| format!("failed to rename board {id}"))
    })?;
    println!("✓ Renamed board {} to '{}'", board.id, board.title);
    Ok(())
}

fn remove(id: BoardId) -> Result<()> {
    let cascade = with_workspace(|ws| {
        ws.delete_board(id)
            .with_context(|| format!("failed to delete board {id}"))
    })?;
    println!(
        "✓ Deleted board {id} ({} lists, {} cards)",
        cascade.lists, cascade.cards
    );
    Ok(())
}

#[derive(Serialize, Tabled)]
struct BoardRow {
    #[tabled(rename = "id")]
    id: u64,
    #[tabled(rename = "title")]
    title: String,
    #[tabled(rename = "lists")]
    lists: usize,
    #[tabled(rename = "created")]
    created: String,
}

fn list(json: bool) -> Result<()> {
    let ws = read_workspace()?;
    let rows = ws
        .boards()
        .map(|board| {
            Ok(BoardRow {
                id: board.id.0,
                title: board.title.clone(),
                lists: ws.lists_of(board.id)?.len(),
                created: board.created_at.format("%Y-%m-%d %H:%M").to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&rows).context("failed to serialize boards")?
        );
        return Ok(());
    }

    if rows.is_empty() {
        println!("No boards yet.");
        println!("Run: ordinal board add <title>");
        return Ok(());
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}
