//! Ordinal — ordered kanban boards from the command line.
//!
//! # Usage
//!
//! ```text
//! ordinal board add <title>
//! ordinal board rename <board> <title>
//! ordinal board rm <board>
//! ordinal board ls [--json]
//! ordinal list add <board> <title> [--at <pos>]
//! ordinal list rename <list> <title>
//! ordinal list mv <list> <pos>
//! ordinal list reparent <list> <board>
//! ordinal list rm <list>
//! ordinal card add <list> <content> [--at <pos>]
//! ordinal card edit <card> <content>
//! ordinal card mv <card> <pos>
//! ordinal card reparent <card> <list>
//! ordinal card rm <card>
//! ordinal show <board> [--json]
//! ordinal normalize [--json]
//! ```
//!
//! Positions are clamped to the valid range; negative values mean "first".

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    board::BoardCommand, card::CardCommand, list::ListCommand, normalize::NormalizeArgs,
    show::ShowArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "ordinal",
    version,
    about = "Kanban boards whose lists and cards keep a dense, gap-free order",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create, rename, delete and list boards.
    Board {
        #[command(subcommand)]
        command: BoardCommand,
    },

    /// Manage the lists of a board.
    List {
        #[command(subcommand)]
        command: ListCommand,
    },

    /// Manage the cards of a list.
    Card {
        #[command(subcommand)]
        command: CardCommand,
    },

    /// Print a board with its lists and cards in order.
    Show(ShowArgs),

    /// Repair gaps and duplicate positions in the stored workspace.
    Normalize(NormalizeArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Board { command } => commands::board::run(command),
        Commands::List { command } => commands::list::run(command),
        Commands::Card { command } => commands::card::run(command),
        Commands::Show(args) => args.run(),
        Commands::Normalize(args) => args.run(),
    }
}

/// Log to stderr; stdout carries command output only.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
