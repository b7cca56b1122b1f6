//! YAML persistence for the workspace.
//!
//! # Storage layout
//!
//! ```text
//! ~/.ordinal/                 (mode 0700)
//!   config.yaml               (optional, see `config`)
//!   workspace.yaml            (boards, lists, cards — mode 0600)
//! ```
//!
//! # API pattern
//!
//! Every function has two forms:
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with `TempDir`
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::load_config_at;
use crate::error::StoreError;
use crate::types::{Board, KanbanCard, KanbanList};
use crate::workspace::Workspace;

pub const WORKSPACE_VERSION: u32 = 1;

/// On-disk form of a [`Workspace`]. Rows carry their stored ordinals as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    pub version: u32,
    #[serde(default)]
    pub next_board_id: u64,
    #[serde(default)]
    pub next_list_id: u64,
    #[serde(default)]
    pub next_card_id: u64,
    #[serde(default)]
    pub boards: Vec<Board>,
    #[serde(default)]
    pub lists: Vec<KanbanList>,
    #[serde(default)]
    pub cards: Vec<KanbanCard>,
}

// ---------------------------------------------------------------------------
// 1. Path helpers
// ---------------------------------------------------------------------------

/// `<home>/.ordinal/` — pure, no I/O.
pub fn root_at(home: &Path) -> PathBuf {
    home.join(".ordinal")
}

/// `<home>/.ordinal/workspace.yaml` — pure, no I/O.
pub fn workspace_path_at(home: &Path) -> PathBuf {
    root_at(home).join("workspace.yaml")
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Load config and workspace. A missing workspace file is an empty workspace.
///
/// Parents whose stored ordinals are not dense and unique are normalized
/// before the workspace is returned.
pub fn load_at(home: &Path) -> Result<Workspace, StoreError> {
    let workspace = load_raw_at(home)?;
    let path = workspace_path_at(home);
    let reports = workspace
        .normalize_all()
        .map_err(|e| StoreError::Inconsistent {
            path: path.clone(),
            source: e,
        })?;

    let repaired = reports.iter().filter(|r| r.repaired()).count();
    if repaired > 0 {
        warn!(
            path = %path.display(),
            parents = repaired,
            "stored ordinals were not dense; repaired on load"
        );
    }
    Ok(workspace)
}

/// Like [`load_at`], but keeps stored ordinals exactly as found.
pub fn load_raw_at(home: &Path) -> Result<Workspace, StoreError> {
    let config = load_config_at(home)?;
    let path = workspace_path_at(home);
    if !path.exists() {
        return Ok(Workspace::new(config));
    }
    let contents = std::fs::read_to_string(&path)?;
    if contents.trim().is_empty() {
        return Ok(Workspace::new(config));
    }

    let snapshot: WorkspaceSnapshot =
        serde_yaml::from_str(&contents).map_err(|e| StoreError::Parse {
            path: path.clone(),
            source: e,
        })?;
    if snapshot.version != WORKSPACE_VERSION {
        return Err(StoreError::UnsupportedVersion {
            path,
            found: snapshot.version,
            expected: WORKSPACE_VERSION,
        });
    }
    Workspace::from_snapshot(config, snapshot)
        .map_err(|e| StoreError::Inconsistent { path, source: e })
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<Workspace, StoreError> {
    load_at(&home()?)
}

// ---------------------------------------------------------------------------
// 3. Save
// ---------------------------------------------------------------------------

/// Atomically save the workspace to `<home>/.ordinal/workspace.yaml`.
///
/// Write flow: serialize → `workspace.yaml.tmp` sibling → `chmod 0600` → `rename`.
pub fn save_at(home: &Path, workspace: &Workspace) -> Result<(), StoreError> {
    let root = root_at(home);
    if !root.exists() {
        std::fs::create_dir_all(&root)?;
        set_dir_permissions(&root)?;
    }
    let snapshot = workspace
        .to_snapshot()
        .map_err(|e| StoreError::Inconsistent {
            path: workspace_path_at(home),
            source: e,
        })?;

    let path = workspace_path_at(home);
    let tmp_path = path.with_file_name("workspace.yaml.tmp");
    let yaml = serde_yaml::to_string(&snapshot)?;
    std::fs::write(&tmp_path, yaml)?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, &path)?;
    Ok(())
}

/// `save_at` convenience wrapper.
pub fn save(workspace: &Workspace) -> Result<(), StoreError> {
    save_at(&home()?, workspace)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, StoreError> {
    dirs::home_dir().ok_or(StoreError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ListDraft, Placement};
    use tempfile::TempDir;

    fn make_home() -> TempDir {
        TempDir::new().expect("tempdir")
    }

    #[test]
    fn workspace_path_is_correct() {
        let home = make_home();
        assert!(workspace_path_at(home.path()).ends_with(".ordinal/workspace.yaml"));
    }

    #[test]
    fn missing_file_is_empty_workspace() {
        let home = make_home();
        let ws = load_at(home.path()).expect("load");
        assert!(ws.boards().next().is_none());
    }

    #[test]
    fn root_created_with_perms() {
        let home = make_home();
        save_at(home.path(), &Workspace::default()).expect("save");
        let root = root_at(home.path());
        assert!(root.exists());
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let dir_mode = std::fs::metadata(&root).unwrap().permissions().mode() & 0o777;
            assert_eq!(dir_mode, 0o700);
            let file = workspace_path_at(home.path());
            let file_mode = std::fs::metadata(&file).unwrap().permissions().mode() & 0o777;
            assert_eq!(file_mode, 0o600);
        }
    }

    #[test]
    fn atomic_write_cleans_up_tmp() {
        let home = make_home();
        save_at(home.path(), &Workspace::default()).expect("save");
        let tmp = workspace_path_at(home.path()).with_file_name("workspace.yaml.tmp");
        assert!(!tmp.exists(), ".tmp must be gone after successful save");
    }

    #[test]
    fn save_and_load_keeps_order() {
        let home = make_home();
        let mut ws = Workspace::default();
        let board = ws.create_board("Roadmap").expect("board").id;
        let a = ws
            .create_list(ListDraft::new(board, "A"), Placement::End)
            .expect("a");
        ws.create_list(ListDraft::new(board, "B"), Placement::At(0))
            .expect("b");
        save_at(home.path(), &ws).expect("save");

        let loaded = load_at(home.path()).expect("load");
        let titles: Vec<String> = loaded
            .lists_of(board)
            .expect("lists")
            .into_iter()
            .map(|l| l.title)
            .collect();
        assert_eq!(titles, vec!["B", "A"]);
        assert_eq!(loaded.list(a.id).expect("a").ordinal.0, 1);
    }

    #[test]
    fn wrong_version_is_rejected() {
        let home = make_home();
        let path = workspace_path_at(home.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "version: 9\n").unwrap();
        let err = load_at(home.path()).unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedVersion { found: 9, .. }));
    }

    #[test]
    fn raw_load_keeps_stored_gaps() {
        let home = make_home();
        let path = workspace_path_at(home.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            "version: 1\n\
             boards:\n  - {id: 1, title: B, created_at: \"2024-01-01T00:00:00Z\", updated_at: \"2024-01-01T00:00:00Z\"}\n\
             lists:\n  - {id: 1, board: 1, ordinal: 3, title: A, created_at: \"2024-01-01T00:00:00Z\"}\n",
        )
        .unwrap();

        let raw = load_raw_at(home.path()).expect("raw");
        assert_eq!(raw.list(crate::types::ListId(1)).expect("list").ordinal.0, 3);
        let repaired = load_at(home.path()).expect("load");
        assert_eq!(repaired.list(crate::types::ListId(1)).expect("list").ordinal.0, 0);
    }

    #[test]
    fn home_not_found_error_message() {
        assert!(StoreError::HomeNotFound.to_string().contains("home directory"));
    }
}
