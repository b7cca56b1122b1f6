//! `ordinal normalize` — repair stored positions and report what changed.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use ordinal_core::RepairReport;
use ordinal_kanban::store;

use super::home;

/// Arguments for `ordinal normalize`.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize, Tabled)]
struct RepairRow {
    #[tabled(rename = "collection")]
    kind: String,
    #[tabled(rename = "parent")]
    parent: u64,
    #[tabled(rename = "items")]
    siblings: usize,
    #[tabled(rename = "rewritten")]
    rewritten: usize,
    #[tabled(rename = "duplicates")]
    duplicates: usize,
    #[tabled(rename = "gaps")]
    gaps: usize,
}

impl From<&RepairReport> for RepairRow {
    fn from(r: &RepairReport) -> Self {
        Self {
            kind: r.kind.to_string(),
            parent: r.parent.0,
            siblings: r.siblings,
            rewritten: r.rewritten,
            duplicates: r.duplicates.len(),
            gaps: r.gaps.len(),
        }
    }
}

impl NormalizeArgs {
    pub fn run(self) -> Result<()> {
        let home = home()?;
        let ws = store::load_raw_at(&home).context("failed to load workspace")?;
        let reports = ws.normalize_all().context("normalize failed")?;
        let repaired: Vec<RepairRow> = reports
            .iter()
            .filter(|r| r.repaired())
            .map(RepairRow::from)
            .collect();
        if !repaired.is_empty() {
            store::save_at(&home, &ws).context("failed to save workspace")?;
        }

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&repaired).context("failed to serialize repairs")?
            );
            return Ok(());
        }

        if repaired.is_empty() {
            println!("✓ All {} collections already in order", reports.len());
            return Ok(());
        }
        println!("✓ Repaired {} of {} collections", repaired.len(), reports.len());
        let mut table = Table::new(repaired);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
