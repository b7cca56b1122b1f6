//! `ordinal show <board>` — a board's lists and cards in order.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use ordinal_kanban::{BoardId, BoardView};

use super::read_workspace;

/// Arguments for `ordinal show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Board id.
    pub board: u64,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ShowArgs {
    pub fn run(self) -> Result<()> {
        let ws = read_workspace()?;
        let id = BoardId(self.board);
        let view = ws
            .board_view(id)
            .with_context(|| format!("failed to show board {id}"))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&view).context("failed to serialize board JSON")?
            );
            return Ok(());
        }
        print_board(view);
        Ok(())
    }
}

#[derive(Tabled)]
struct CardRow {
    #[tabled(rename = "#")]
    ordinal: u32,
    #[tabled(rename = "card")]
    id: u64,
    #[tabled(rename = "content")]
    content: String,
    #[tabled(rename = "age")]
    age: String,
}

fn print_board(view: BoardView) {
    println!(
        "{} {} | {} lists",
        view.board.title.bold(),
        format!("(board {})", view.board.id).bright_black(),
        view.lists.len(),
    );
    if view.lists.is_empty() {
        println!("No lists yet.");
        println!("Run: ordinal list add {} <title>", view.board.id);
        return;
    }

    let now = Utc::now();
    for entry in view.lists {
        println!(
            "\n[{}] {} {}",
            entry.list.ordinal,
            entry.list.title.bold(),
            format!("(list {}, {} cards)", entry.list.id, entry.cards.len()).bright_black(),
        );
        if entry.cards.is_empty() {
            continue;
        }
        let rows: Vec<CardRow> = entry
            .cards
            .into_iter()
            .map(|card| CardRow {
                ordinal: card.ordinal.0,
                id: card.id.0,
                content: card.content,
                age: format_age(now, card.created_at),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }
}

fn format_age(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    match secs {
        0..=59 => "just now".to_string(),
        60..=3_599 => format!("{}m ago", secs / 60),
        3_600..=86_399 => format!("{}h ago", secs / 3_600),
        _ => format!("{}d ago", secs / 86_400),
    }
}
