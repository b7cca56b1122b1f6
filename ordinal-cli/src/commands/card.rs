//! `ordinal card add|edit|mv|reparent|rm`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use ordinal_kanban::{CardDraft, CardId, CardPatch, ListId, Placement};

use super::{describe_move, with_workspace};

#[derive(Subcommand, Debug)]
pub enum CardCommand {
    /// Add a card to a list. Appends unless `--at` is given.
    Add(AddArgs),

    /// Replace a card's content.
    Edit {
        /// Card id.
        card: u64,
        /// New content.
        content: String,
    },

    /// Move a card to another position within its list.
    Mv {
        /// Card id.
        card: u64,
        /// Target position; clamped to the list.
        #[arg(allow_negative_numbers = true)]
        to: i64,
    },

    /// Move a card to the end of another list.
    Reparent {
        /// Card id.
        card: u64,
        /// Destination list id.
        list: u64,
    },

    /// Delete a card.
    Rm {
        /// Card id.
        card: u64,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// List id.
    pub list: u64,

    /// Card text.
    pub content: String,

    /// Insert at this position instead of appending; clamped to the list.
    #[arg(long, allow_negative_numbers = true)]
    pub at: Option<i64>,
}

pub fn run(cmd: CardCommand) -> Result<()> {
    match cmd {
        CardCommand::Add(args) => add(args),
        CardCommand::Edit { card, content } => edit(CardId(card), content),
        CardCommand::Mv { card, to } => {
            let id = CardId(card);
            let outcome = with_workspace(|ws| {
                ws.move_card(id, to)
                    .with_context(|| format!("failed to move card {id}"))
            })?;
            println!("✓ Card {id} {}", describe_move(&outcome));
            Ok(())
        }
        CardCommand::Reparent { card, list } => reparent(CardId(card), ListId(list)),
        CardCommand::Rm { card } => remove(CardId(card)),
    }
}

fn add(args: AddArgs) -> Result<()> {
    let list = ListId(args.list);
    let card = with_workspace(|ws| {
        ws.create_card(CardDraft::new(list, args.content.clone()), Placement::from(args.at))
            .with_context(|| format!("failed to add card to list {list}"))
    })?;
    println!(
        "✓ Added card {} to list {} at position {}",
        card.id, card.list, card.ordinal
    );
    Ok(())
}

fn edit(id: CardId, content: String) -> Result<()> {
    let patch = CardPatch {
        content: Some(content),
        ..CardPatch::default()
    };
    let card = with_workspace(|ws| {
        ws.update_card(id, patch)
            .with_context(|| format!("failed to edit card {id}"))
    })?;
    println!("✓ Updated card {}", card.id);
    Ok(())
}

fn reparent(id: CardId, list: ListId) -> Result<()> {
    let patch = CardPatch {
        list: Some(Some(list)),
        ..CardPatch::default()
    };
    let card = with_workspace(|ws| {
        ws.update_card(id, patch)
            .with_context(|| format!("failed to move card {id} to list {list}"))
    })?;
    println!(
        "✓ Moved card {} to list {} at position {}",
        card.id, card.list, card.ordinal
    );
    Ok(())
}

fn remove(id: CardId) -> Result<()> {
    let card = with_workspace(|ws| {
        ws.delete_card(id)
            .with_context(|| format!("failed to delete card {id}"))
    })?;
    println!("✓ Deleted card {} from list {}", card.id, card.list);
    Ok(())
}
