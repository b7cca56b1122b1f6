//! Board, list and card lifecycle on top of two sequencers.
//!
//! Lists are ordered within their board and cards within their list. Every
//! board is registered as a parent in the list store and every list as a
//! parent in the card store, so deleting a board or list purges its
//! children in one step. Titles and contents live beside the sequencers,
//! keyed by id; ordinals are only ever written by the sequencers.

use std::collections::BTreeMap;

use chrono::Utc;
use ordinal_core::{
    CollectionKind, ItemId, MemoryStore, MoveOutcome, OrderedItem, ParentId, RepairReport,
    Sequencer, SequencerError,
};
use tracing::{debug, warn};

use crate::config::KanbanConfig;
use crate::error::KanbanError;
use crate::store::{WorkspaceSnapshot, WORKSPACE_VERSION};
use crate::types::{
    Board, BoardId, BoardView, Cascade, CardDraft, CardId, CardPatch, KanbanCard, KanbanList,
    ListDraft, ListId, ListPatch, ListView, Placement,
};

#[derive(Debug)]
pub struct Workspace {
    config: KanbanConfig,
    boards: BTreeMap<BoardId, Board>,
    next_board: u64,
    lists: Sequencer<MemoryStore>,
    cards: Sequencer<MemoryStore>,
    list_titles: BTreeMap<ListId, String>,
    card_contents: BTreeMap<CardId, String>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(KanbanConfig::default())
    }
}

impl Workspace {
    pub fn new(config: KanbanConfig) -> Self {
        let timeout = config.lock_timeout();
        Self {
            lists: Sequencer::new(
                CollectionKind::ListsInBoard,
                MemoryStore::new().with_lock_timeout(timeout),
            ),
            cards: Sequencer::new(
                CollectionKind::CardsInList,
                MemoryStore::new().with_lock_timeout(timeout),
            ),
            config,
            boards: BTreeMap::new(),
            next_board: 1,
            list_titles: BTreeMap::new(),
            card_contents: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &KanbanConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // 1. Boards
    // -----------------------------------------------------------------------

    pub fn create_board(&mut self, title: &str) -> Result<Board, KanbanError> {
        check_title("board", title, self.config.board_title_max)?;
        let id = BoardId(self.next_board);
        self.lists.store().add_parent(id.into())?;
        self.next_board += 1;

        let now = Utc::now();
        let board = Board {
            id,
            title: title.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.boards.insert(id, board.clone());
        debug!(board = %id, "board created");
        Ok(board)
    }

    pub fn rename_board(&mut self, id: BoardId, title: &str) -> Result<Board, KanbanError> {
        check_title("board", title, self.config.board_title_max)?;
        let board = self
            .boards
            .get_mut(&id)
            .ok_or(KanbanError::BoardNotFound(id))?;
        board.title = title.to_string();
        board.updated_at = Utc::now();
        Ok(board.clone())
    }

    /// Delete a board together with its lists and their cards.
    pub fn delete_board(&mut self, id: BoardId) -> Result<Cascade, KanbanError> {
        if !self.boards.contains_key(&id) {
            return Err(KanbanError::BoardNotFound(id));
        }
        let lists = self.lists.store().remove_parent(id.into())?;
        let mut cascade = Cascade {
            lists: lists.len(),
            cards: 0,
        };
        for row in &lists {
            let list = ListId::from(row.id);
            cascade.cards += self.purge_cards(list)?;
            self.list_titles.remove(&list);
        }
        self.boards.remove(&id);
        debug!(board = %id, lists = cascade.lists, cards = cascade.cards, "board deleted");
        Ok(cascade)
    }

    pub fn board(&self, id: BoardId) -> Result<&Board, KanbanError> {
        self.boards.get(&id).ok_or(KanbanError::BoardNotFound(id))
    }

    /// All boards by id.
    pub fn boards(&self) -> impl Iterator<Item = &Board> + '_ {
        self.boards.values()
    }

    // -----------------------------------------------------------------------
    // 2. Lists
    // -----------------------------------------------------------------------

    pub fn create_list(
        &mut self,
        draft: ListDraft,
        placement: Placement,
    ) -> Result<KanbanList, KanbanError> {
        if draft.ordinal.is_some() {
            return Err(manual_ordinal());
        }
        let board = draft
            .board
            .ok_or_else(|| no_parent(CollectionKind::ListsInBoard))?;
        check_title("list", &draft.title, self.config.list_title_max)?;

        let row = self.lists.insert(board.into(), placement.desired())?;
        let id = ListId::from(row.id);
        if let Err(e) = self.cards.store().add_parent(id.into()) {
            self.lists.delete(row.id)?;
            return Err(e.into());
        }
        self.list_titles.insert(id, draft.title);
        Ok(self.list_from_row(row))
    }

    pub fn list(&self, id: ListId) -> Result<KanbanList, KanbanError> {
        let row = self
            .lists
            .find(id.into())?
            .ok_or_else(|| not_found(CollectionKind::ListsInBoard, id.into()))?;
        Ok(self.list_from_row(row))
    }

    /// Lists of `board` in ordinal order.
    pub fn lists_of(&self, board: BoardId) -> Result<Vec<KanbanList>, KanbanError> {
        self.board(board)?;
        self.lists
            .siblings(board.into())?
            .into_iter()
            .map(|s| self.list(ListId::from(s.id)))
            .collect()
    }

    /// Apply a patch. Moving to another board appends the list there and
    /// closes the gap it leaves behind.
    pub fn update_list(&mut self, id: ListId, patch: ListPatch) -> Result<KanbanList, KanbanError> {
        if patch.ordinal.is_some() {
            return Err(manual_ordinal());
        }
        let target = match patch.board {
            Some(None) => return Err(no_parent(CollectionKind::ListsInBoard)),
            Some(Some(board)) => Some(board),
            None => None,
        };
        if let Some(title) = &patch.title {
            check_title("list", title, self.config.list_title_max)?;
        }
        self.list(id)?;

        if let Some(board) = target {
            self.lists.reparent(id.into(), board.into())?;
        }
        if let Some(title) = patch.title {
            self.list_titles.insert(id, title);
        }
        self.list(id)
    }

    /// Reposition a list within its board. `target` is clamped.
    pub fn move_list(&self, id: ListId, target: i64) -> Result<MoveOutcome, KanbanError> {
        Ok(self.lists.move_item(id.into(), target)?)
    }

    /// Delete a list and its cards. Returns how many cards went with it.
    pub fn delete_list(&mut self, id: ListId) -> Result<usize, KanbanError> {
        self.list(id)?;
        let purged = delete_list_rows(&self.lists, &self.cards, id)?;
        for row in &purged {
            self.card_contents.remove(&CardId::from(row.id));
        }
        let cards = purged.len();
        self.list_titles.remove(&id);
        debug!(list = %id, cards, "list deleted");
        Ok(cards)
    }

    // -----------------------------------------------------------------------
    // 3. Cards
    // -----------------------------------------------------------------------

    pub fn create_card(
        &mut self,
        draft: CardDraft,
        placement: Placement,
    ) -> Result<KanbanCard, KanbanError> {
        if draft.ordinal.is_some() {
            return Err(manual_ordinal());
        }
        let list = draft
            .list
            .ok_or_else(|| no_parent(CollectionKind::CardsInList))?;

        let row = self.cards.insert(list.into(), placement.desired())?;
        self.card_contents.insert(CardId::from(row.id), draft.content);
        Ok(self.card_from_row(row))
    }

    pub fn card(&self, id: CardId) -> Result<KanbanCard, KanbanError> {
        let row = self
            .cards
            .find(id.into())?
            .ok_or_else(|| not_found(CollectionKind::CardsInList, id.into()))?;
        Ok(self.card_from_row(row))
    }

    /// Cards of `list` in ordinal order.
    pub fn cards_of(&self, list: ListId) -> Result<Vec<KanbanCard>, KanbanError> {
        self.cards
            .siblings(list.into())?
            .into_iter()
            .map(|s| self.card(CardId::from(s.id)))
            .collect()
    }

    pub fn update_card(&mut self, id: CardId, patch: CardPatch) -> Result<KanbanCard, KanbanError> {
        if patch.ordinal.is_some() {
            return Err(manual_ordinal());
        }
        let target = match patch.list {
            Some(None) => return Err(no_parent(CollectionKind::CardsInList)),
            Some(Some(list)) => Some(list),
            None => None,
        };
        self.card(id)?;

        if let Some(list) = target {
            self.cards.reparent(id.into(), list.into())?;
        }
        if let Some(content) = patch.content {
            self.card_contents.insert(id, content);
        }
        self.card(id)
    }

    pub fn move_card(&self, id: CardId, target: i64) -> Result<MoveOutcome, KanbanError> {
        Ok(self.cards.move_item(id.into(), target)?)
    }

    pub fn delete_card(&mut self, id: CardId) -> Result<KanbanCard, KanbanError> {
        let row = self.cards.delete(id.into())?;
        let card = self.card_from_row(row);
        self.card_contents.remove(&id);
        Ok(card)
    }

    // -----------------------------------------------------------------------
    // 4. Views and maintenance
    // -----------------------------------------------------------------------

    pub fn board_view(&self, id: BoardId) -> Result<BoardView, KanbanError> {
        let board = self.board(id)?.clone();
        let lists = self
            .lists_of(id)?
            .into_iter()
            .map(|list| {
                let cards = self.cards_of(list.id)?;
                Ok(ListView { list, cards })
            })
            .collect::<Result<Vec<_>, KanbanError>>()?;
        Ok(BoardView { board, lists })
    }

    /// Normalize every board's lists and every list's cards.
    ///
    /// Returns one report per parent, including parents that needed nothing.
    pub fn normalize_all(&self) -> Result<Vec<RepairReport>, KanbanError> {
        let mut reports = Vec::new();
        for seq in [&self.lists, &self.cards] {
            for parent in seq.store().parents()? {
                reports.push(seq.normalize(parent)?);
            }
        }
        Ok(reports)
    }

    // -----------------------------------------------------------------------
    // 5. Snapshots
    // -----------------------------------------------------------------------

    pub(crate) fn to_snapshot(&self) -> Result<WorkspaceSnapshot, KanbanError> {
        let lists = self
            .lists
            .store()
            .snapshot()?
            .into_iter()
            .map(|row| self.list_from_row(row))
            .collect();
        let cards = self
            .cards
            .store()
            .snapshot()?
            .into_iter()
            .map(|row| self.card_from_row(row))
            .collect();
        Ok(WorkspaceSnapshot {
            version: WORKSPACE_VERSION,
            next_board_id: self.next_board,
            next_list_id: self.lists.store().next_id().0,
            next_card_id: self.cards.store().next_id().0,
            boards: self.boards.values().cloned().collect(),
            lists,
            cards,
        })
    }

    /// Rebuild from persisted rows. Ordinals are taken as stored; call
    /// [`Workspace::normalize_all`] to repair them.
    pub(crate) fn from_snapshot(
        config: KanbanConfig,
        snapshot: WorkspaceSnapshot,
    ) -> Result<Self, KanbanError> {
        let timeout = config.lock_timeout();
        let mut boards: BTreeMap<BoardId, Board> = BTreeMap::new();
        for board in snapshot.boards {
            let id = board.id;
            if boards.insert(id, board).is_some() {
                return Err(KanbanError::DuplicateBoard(id));
            }
        }

        let list_rows: Vec<OrderedItem> = snapshot
            .lists
            .iter()
            .map(|l| OrderedItem {
                id: l.id.into(),
                parent: l.board.into(),
                ordinal: l.ordinal,
                created_at: l.created_at,
            })
            .collect();
        let lists = MemoryStore::restore(boards.keys().map(|&b| ParentId::from(b)), list_rows)?
            .with_lock_timeout(timeout);
        lists.reserve_ids_from(ItemId(snapshot.next_list_id));

        let card_rows: Vec<OrderedItem> = snapshot
            .cards
            .iter()
            .map(|c| OrderedItem {
                id: c.id.into(),
                parent: c.list.into(),
                ordinal: c.ordinal,
                created_at: c.created_at,
            })
            .collect();
        let cards = MemoryStore::restore(snapshot.lists.iter().map(|l| ParentId::from(l.id)), card_rows)?
            .with_lock_timeout(timeout);
        cards.reserve_ids_from(ItemId(snapshot.next_card_id));

        let highest_board = boards.keys().next_back().map_or(0, |b| b.0);
        Ok(Self {
            next_board: snapshot.next_board_id.max(highest_board + 1),
            lists: Sequencer::new(CollectionKind::ListsInBoard, lists),
            cards: Sequencer::new(CollectionKind::CardsInList, cards),
            list_titles: snapshot.lists.into_iter().map(|l| (l.id, l.title)).collect(),
            card_contents: snapshot
                .cards
                .into_iter()
                .map(|c| (c.id, c.content))
                .collect(),
            boards,
            config,
        })
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn purge_cards(&mut self, list: ListId) -> Result<usize, KanbanError> {
        let cards = self.cards.store().remove_parent(list.into())?;
        for row in &cards {
            self.card_contents.remove(&CardId::from(row.id));
        }
        Ok(cards.len())
    }

    fn list_from_row(&self, row: OrderedItem) -> KanbanList {
        let id = ListId::from(row.id);
        KanbanList {
            id,
            board: row.parent.into(),
            ordinal: row.ordinal,
            title: self.list_titles.get(&id).cloned().unwrap_or_default(),
            created_at: row.created_at,
        }
    }

    fn card_from_row(&self, row: OrderedItem) -> KanbanCard {
        let id = CardId::from(row.id);
        KanbanCard {
            id,
            list: row.parent.into(),
            ordinal: row.ordinal,
            content: self.card_contents.get(&id).cloned().unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}

fn check_title(entity: &'static str, title: &str, max: usize) -> Result<(), KanbanError> {
    let len = title.chars().count();
    if len == 0 || len > max {
        return Err(KanbanError::TitleLength { entity, len, max });
    }
    Ok(())
}

/// Purge a list's card rows, then its own row. If the list row cannot be
/// deleted the cards are put back under it.
fn delete_list_rows(
    lists: &Sequencer<MemoryStore>,
    cards: &Sequencer<MemoryStore>,
    id: ListId,
) -> Result<Vec<OrderedItem>, KanbanError> {
    let purged = cards.store().remove_parent(id.into())?;
    if let Err(e) = lists.delete(id.into()) {
        if let Err(restore) = cards.store().restore_parent(id.into(), purged) {
            warn!(list = %id, error = %restore, "could not put cards back after failed list delete");
        }
        return Err(e.into());
    }
    Ok(purged)
}

fn manual_ordinal() -> KanbanError {
    SequencerError::ManualFieldAssignment { field: "ordinal" }.into()
}

fn no_parent(kind: CollectionKind) -> KanbanError {
    SequencerError::MissingParent { kind, parent: None }.into()
}

fn not_found(kind: CollectionKind, item: ItemId) -> KanbanError {
    SequencerError::ItemNotFound { kind, item }.into()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use ordinal_core::{Ordinal, SiblingStore, StorageError};
    use rstest::rstest;

    fn workspace() -> Workspace {
        Workspace::new(KanbanConfig::default())
    }

    fn titles(ws: &Workspace, board: BoardId) -> Vec<String> {
        ws.lists_of(board)
            .expect("lists")
            .into_iter()
            .map(|l| l.title)
            .collect()
    }

    #[test]
    fn lists_append_in_creation_order() {
        let mut ws = workspace();
        let board = ws.create_board("Roadmap").expect("board").id;
        for title in ["Todo", "Doing", "Done"] {
            ws.create_list(ListDraft::new(board, title), Placement::End)
                .expect("list");
        }
        let lists = ws.lists_of(board).expect("lists");
        let ordinals: Vec<u32> = lists.iter().map(|l| l.ordinal.0).collect();
        assert_eq!(ordinals, vec![0, 1, 2]);
        assert_eq!(titles(&ws, board), vec!["Todo", "Doing", "Done"]);
    }

    #[test]
    fn create_list_with_ordinal_is_rejected() {
        let mut ws = workspace();
        let board = ws.create_board("Roadmap").expect("board").id;
        let draft = ListDraft {
            ordinal: Some(0),
            ..ListDraft::new(board, "Todo")
        };
        let err = ws.create_list(draft, Placement::End).unwrap_err();
        assert!(matches!(
            err,
            KanbanError::Sequencer(SequencerError::ManualFieldAssignment { field: "ordinal" })
        ));
        assert!(ws.lists_of(board).expect("lists").is_empty());
    }

    #[test]
    fn create_list_without_board_is_rejected() {
        let mut ws = workspace();
        let draft = ListDraft {
            board: None,
            title: "Todo".into(),
            ordinal: None,
        };
        let err = ws.create_list(draft, Placement::End).unwrap_err();
        assert!(matches!(
            err,
            KanbanError::Sequencer(SequencerError::MissingParent { parent: None, .. })
        ));
    }

    #[test]
    fn lists_may_share_a_title() {
        let mut ws = workspace();
        let board = ws.create_board("Roadmap").expect("board").id;
        ws.create_list(ListDraft::new(board, "Todo"), Placement::End)
            .expect("first");
        ws.create_list(ListDraft::new(board, "Todo"), Placement::End)
            .expect("second");
        assert_eq!(titles(&ws, board), vec!["Todo", "Todo"]);
    }

    #[rstest]
    #[case("board", "", 30)]
    #[case("board", "abcdefghijklmnopqrstuvwxyzabcde", 30)]
    #[case("list", "abcdefghijklmnopqrstu", 20)]
    fn title_limits_are_enforced(#[case] entity: &str, #[case] title: &str, #[case] max: usize) {
        let mut ws = workspace();
        let err = if entity == "board" {
            ws.create_board(title).unwrap_err()
        } else {
            let board = ws.create_board("Roadmap").expect("board").id;
            ws.create_list(ListDraft::new(board, title), Placement::End)
                .unwrap_err()
        };
        assert!(matches!(
            err,
            KanbanError::TitleLength { max: m, .. } if m == max
        ));
    }

    #[test]
    fn update_list_ordinal_is_rejected() {
        let mut ws = workspace();
        let board = ws.create_board("Roadmap").expect("board").id;
        let list = ws
            .create_list(ListDraft::new(board, "Todo"), Placement::End)
            .expect("list");
        let patch = ListPatch {
            ordinal: Some(3),
            title: Some("Later".into()),
            ..ListPatch::default()
        };
        let err = ws.update_list(list.id, patch).unwrap_err();
        assert!(matches!(
            err,
            KanbanError::Sequencer(SequencerError::ManualFieldAssignment { .. })
        ));
        assert_eq!(ws.list(list.id).expect("list").title, "Todo");
    }

    #[test]
    fn update_list_to_no_board_is_rejected() {
        let mut ws = workspace();
        let board = ws.create_board("Roadmap").expect("board").id;
        let list = ws
            .create_list(ListDraft::new(board, "Todo"), Placement::End)
            .expect("list");
        let patch = ListPatch {
            board: Some(None),
            ..ListPatch::default()
        };
        let err = ws.update_list(list.id, patch).unwrap_err();
        assert!(matches!(
            err,
            KanbanError::Sequencer(SequencerError::MissingParent { parent: None, .. })
        ));
        assert_eq!(ws.list(list.id).expect("list").board, board);
    }

    #[test]
    fn moving_list_to_other_board_appends_and_closes_gap() {
        let mut ws = workspace();
        let first = ws.create_board("One").expect("board").id;
        let second = ws.create_board("Two").expect("board").id;
        let a = ws
            .create_list(ListDraft::new(first, "A"), Placement::End)
            .expect("a");
        ws.create_list(ListDraft::new(first, "B"), Placement::End)
            .expect("b");
        ws.create_list(ListDraft::new(first, "C"), Placement::End)
            .expect("c");
        ws.create_list(ListDraft::new(second, "X"), Placement::End)
            .expect("x");

        let patch = ListPatch {
            board: Some(Some(second)),
            ..ListPatch::default()
        };
        let moved = ws.update_list(a.id, patch).expect("update");
        assert_eq!(moved.board, second);
        assert_eq!(moved.ordinal, Ordinal(1));

        let remaining = ws.lists_of(first).expect("lists");
        let ordinals: Vec<u32> = remaining.iter().map(|l| l.ordinal.0).collect();
        assert_eq!(ordinals, vec![0, 1]);
        assert_eq!(titles(&ws, first), vec!["B", "C"]);
        assert_eq!(titles(&ws, second), vec!["X", "A"]);
    }

    #[test]
    fn delete_list_shifts_later_lists_and_drops_cards() {
        let mut ws = workspace();
        let board = ws.create_board("Roadmap").expect("board").id;
        let a = ws
            .create_list(ListDraft::new(board, "A"), Placement::End)
            .expect("a");
        ws.create_list(ListDraft::new(board, "B"), Placement::End)
            .expect("b");
        let card = ws
            .create_card(CardDraft::new(a.id, "write docs"), Placement::End)
            .expect("card");

        let dropped = ws.delete_list(a.id).expect("delete");
        assert_eq!(dropped, 1);
        assert_eq!(titles(&ws, board), vec!["B"]);
        assert_eq!(ws.lists_of(board).expect("lists")[0].ordinal, Ordinal(0));
        assert!(matches!(
            ws.card(card.id).unwrap_err(),
            KanbanError::Sequencer(SequencerError::ItemNotFound { .. })
        ));
    }

    #[test]
    fn failed_list_delete_keeps_its_cards() {
        let timeout = Duration::from_millis(20);
        let lists = Sequencer::new(
            CollectionKind::ListsInBoard,
            MemoryStore::new().with_lock_timeout(timeout),
        );
        let cards = Sequencer::new(
            CollectionKind::CardsInList,
            MemoryStore::new().with_lock_timeout(timeout),
        );
        let board = ParentId(1);
        lists.store().add_parent(board).expect("board");
        let list = ListId::from(lists.insert(board, None).expect("list").id);
        cards.store().add_parent(list.into()).expect("card parent");
        let a = cards.insert(list.into(), None).expect("card").id;
        let b = cards.insert(list.into(), None).expect("card").id;

        let held = lists.store().begin(&[board]).expect("hold board");
        let err = delete_list_rows(&lists, &cards, list).unwrap_err();
        assert!(matches!(
            err,
            KanbanError::Sequencer(SequencerError::StorageFailure(StorageError::LockTimeout { .. }))
        ));
        drop(held);

        let order: Vec<ItemId> = cards
            .siblings(list.into())
            .expect("cards")
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(order, vec![a, b]);
        assert_eq!(delete_list_rows(&lists, &cards, list).expect("delete").len(), 2);
        assert!(lists.find(list.into()).expect("find").is_none());
    }

    #[test]
    fn delete_board_cascades() {
        let mut ws = workspace();
        let board = ws.create_board("Roadmap").expect("board").id;
        let list = ws
            .create_list(ListDraft::new(board, "A"), Placement::End)
            .expect("list");
        ws.create_card(CardDraft::new(list.id, "one"), Placement::End)
            .expect("card");
        ws.create_card(CardDraft::new(list.id, "two"), Placement::End)
            .expect("card");

        let cascade = ws.delete_board(board).expect("delete");
        assert_eq!(cascade, Cascade { lists: 1, cards: 2 });
        assert!(ws.boards().next().is_none());
        assert!(ws.list(list.id).is_err());
        assert!(matches!(
            ws.delete_board(board).unwrap_err(),
            KanbanError::BoardNotFound(_)
        ));
    }

    #[test]
    fn cards_insert_at_position() {
        let mut ws = workspace();
        let board = ws.create_board("Roadmap").expect("board").id;
        let list = ws
            .create_list(ListDraft::new(board, "A"), Placement::End)
            .expect("list");
        for content in ["one", "two", "three"] {
            ws.create_card(CardDraft::new(list.id, content), Placement::End)
                .expect("card");
        }
        let front = ws
            .create_card(CardDraft::new(list.id, "zero"), Placement::At(-1))
            .expect("card");
        assert_eq!(front.ordinal, Ordinal(0));

        let contents: Vec<String> = ws
            .cards_of(list.id)
            .expect("cards")
            .into_iter()
            .map(|c| c.content)
            .collect();
        assert_eq!(contents, vec!["zero", "one", "two", "three"]);
    }

    #[test]
    fn card_moves_between_lists() {
        let mut ws = workspace();
        let board = ws.create_board("Roadmap").expect("board").id;
        let a = ws
            .create_list(ListDraft::new(board, "A"), Placement::End)
            .expect("a");
        let b = ws
            .create_list(ListDraft::new(board, "B"), Placement::End)
            .expect("b");
        let first = ws
            .create_card(CardDraft::new(a.id, "one"), Placement::End)
            .expect("card");
        let second = ws
            .create_card(CardDraft::new(a.id, "two"), Placement::End)
            .expect("card");

        let patch = CardPatch {
            list: Some(Some(b.id)),
            content: Some("one (moved)".into()),
            ..CardPatch::default()
        };
        let moved = ws.update_card(first.id, patch).expect("update");
        assert_eq!(moved.list, b.id);
        assert_eq!(moved.ordinal, Ordinal(0));
        assert_eq!(moved.content, "one (moved)");
        assert_eq!(ws.card(second.id).expect("card").ordinal, Ordinal(0));
    }

    #[test]
    fn card_under_unknown_list_is_rejected() {
        let mut ws = workspace();
        let err = ws
            .create_card(CardDraft::new(ListId(77), "lost"), Placement::End)
            .unwrap_err();
        assert!(err.to_string().contains("list 77 does not exist"));
    }

    #[test]
    fn move_list_clamps_and_reports() {
        let mut ws = workspace();
        let board = ws.create_board("Roadmap").expect("board").id;
        let a = ws
            .create_list(ListDraft::new(board, "A"), Placement::End)
            .expect("a");
        ws.create_list(ListDraft::new(board, "B"), Placement::End)
            .expect("b");
        ws.create_list(ListDraft::new(board, "C"), Placement::End)
            .expect("c");

        let outcome = ws.move_list(a.id, 99).expect("move");
        assert_eq!(outcome.ordinal(), Ordinal(2));
        assert_eq!(titles(&ws, board), vec!["B", "C", "A"]);
        let outcome = ws.move_list(a.id, 2).expect("noop");
        assert!(matches!(outcome, MoveOutcome::Unchanged { .. }));
    }

    #[test]
    fn board_view_nests_cards_in_order() {
        let mut ws = workspace();
        let board = ws.create_board("Roadmap").expect("board").id;
        let a = ws
            .create_list(ListDraft::new(board, "A"), Placement::End)
            .expect("a");
        ws.create_card(CardDraft::new(a.id, "one"), Placement::End)
            .expect("card");
        let view = ws.board_view(board).expect("view");
        assert_eq!(view.board.title, "Roadmap");
        assert_eq!(view.lists.len(), 1);
        assert_eq!(view.lists[0].cards[0].content, "one");
    }
}
