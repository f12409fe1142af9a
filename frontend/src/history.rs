//! History pagination controller.
//!
//! Holds the two cursor-paginated collections (found / not found), their
//! running totals and more-available flags, and keeps them consistent
//! across incremental loads, deletions, description edits and full resets.
//!
//! This is a pure state machine: it never performs I/O. The lookup
//! component asks it for a `LoadTicket` before fetching and feeds the
//! outcome back in. Every ticket carries the generation current at issue
//! time; `reset_all` bumps the generation, so a response that raced a
//! base switch or re-login arrives with a stale ticket and is dropped
//! instead of being merged into state it no longer belongs to.
//!
//! Invariants maintained here:
//! - `items.len() <= total` per collection (local items are a prefix of
//!   the remote set; `total` is clamped up when the racy totals probe
//!   lags behind the pages already fetched);
//! - `has_more` mirrors the presence of a next cursor;
//! - a collection whose load failed stops loading until the next reset;
//! - deletes decrement the total by exactly one, floored at zero.

use common::model::page::CursorPage;
use common::model::product::{FoundProduct, NotFoundProduct};

/// Which of the two history collections an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryKind {
    Found,
    NotFound,
}

/// Permission to issue exactly one page fetch, handed out by `begin_load`.
///
/// `cursor` is the resume point to send; `generation` is checked when the
/// response comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub cursor: Option<i64>,
}

/// Client-side state of one collection: the materialized prefix plus the
/// bookkeeping for incremental loading.
#[derive(Debug, Clone, PartialEq)]
pub struct PageState<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<i64>,
    pub total: u64,
    pub loading: bool,
    pub has_more: bool,
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        PageState {
            items: Vec::new(),
            next_cursor: None,
            total: 0,
            loading: false,
            has_more: true,
        }
    }
}

trait HasId {
    fn id(&self) -> i64;
}

impl HasId for FoundProduct {
    fn id(&self) -> i64 {
        self.id
    }
}

impl HasId for NotFoundProduct {
    fn id(&self) -> i64 {
        self.id
    }
}

impl<T: HasId> PageState<T> {
    fn begin(&mut self, generation: u64) -> Option<LoadTicket> {
        if self.loading || !self.has_more {
            return None;
        }
        self.loading = true;
        Some(LoadTicket {
            generation,
            cursor: self.next_cursor,
        })
    }

    fn apply(&mut self, page: CursorPage<T>) {
        self.loading = false;
        self.items.extend(page.items);
        self.next_cursor = page.next_cursor_id;
        self.has_more = self.next_cursor.is_some();
        self.clamp_total();
    }

    fn fail(&mut self) {
        self.loading = false;
        self.has_more = false;
    }

    fn set_total(&mut self, total: u64) {
        self.total = total;
        self.clamp_total();
    }

    fn remove(&mut self, id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        if self.items.len() < before {
            self.total = self.total.saturating_sub(1);
            true
        } else {
            false
        }
    }

    /// Local items are always a prefix of the remote collection, so the
    /// total may never undercut what is already materialized.
    fn clamp_total(&mut self) {
        let len = self.items.len() as u64;
        if self.total < len {
            self.total = len;
        }
    }
}

/// The whole history: both collections plus the generation counter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryState {
    pub found: PageState<FoundProduct>,
    pub not_found: PageState<NotFoundProduct>,
    generation: u64,
}

impl HistoryState {
    pub fn new() -> HistoryState {
        HistoryState::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Clears both collections ahead of a full reload and invalidates
    /// every in-flight ticket. Returns the new generation for tagging the
    /// totals probe.
    pub fn reset_all(&mut self) -> u64 {
        self.found = PageState::default();
        self.not_found = PageState::default();
        self.generation += 1;
        self.generation
    }

    /// Requests permission to fetch the next page of `kind`. Returns
    /// `None` when a fetch is already in flight or the collection is
    /// exhausted/halted; callers must not issue a request in that case.
    pub fn begin_load(&mut self, kind: HistoryKind) -> Option<LoadTicket> {
        let generation = self.generation;
        match kind {
            HistoryKind::Found => self.found.begin(generation),
            HistoryKind::NotFound => self.not_found.begin(generation),
        }
    }

    pub fn apply_found_page(&mut self, ticket: LoadTicket, page: CursorPage<FoundProduct>) {
        if ticket.generation == self.generation {
            self.found.apply(page);
        }
    }

    pub fn apply_not_found_page(&mut self, ticket: LoadTicket, page: CursorPage<NotFoundProduct>) {
        if ticket.generation == self.generation {
            self.not_found.apply(page);
        }
    }

    /// Marks a fetch as failed. The collection stops loading until the
    /// next reset; a partial or broken page is never retried on its own.
    pub fn fail_load(&mut self, kind: HistoryKind, ticket: LoadTicket) {
        if ticket.generation != self.generation {
            return;
        }
        match kind {
            HistoryKind::Found => self.found.fail(),
            HistoryKind::NotFound => self.not_found.fail(),
        }
    }

    /// Applies one collection's totals probe. The two probes run as
    /// independent branches; a probe failure simply never reaches this
    /// method, leaving the previous total in place (stale-but-available).
    pub fn apply_total(&mut self, kind: HistoryKind, generation: u64, total: u64) {
        if generation != self.generation {
            return;
        }
        match kind {
            HistoryKind::Found => self.found.set_total(total),
            HistoryKind::NotFound => self.not_found.set_total(total),
        }
    }

    /// Removes a confirmed-deleted item and decrements the total by one,
    /// floored at zero. Only called after the remote delete succeeded.
    pub fn delete(&mut self, kind: HistoryKind, id: i64) -> bool {
        match kind {
            HistoryKind::Found => self.found.remove(id),
            HistoryKind::NotFound => self.not_found.remove(id),
        }
    }

    /// Replaces the description of a not-found record after the remote
    /// patch succeeded. Every other field is untouched.
    pub fn update_description(&mut self, id: i64, descricao: &str) {
        if let Some(item) = self.not_found.items.iter_mut().find(|item| item.id == id) {
            item.descricao = Some(descricao.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(id: i64) -> FoundProduct {
        FoundProduct {
            id,
            client_id: 1,
            base: "homecenter".into(),
            codauxiliar: format!("789{id:010}"),
            codprod: format!("{id}"),
            descricao: Some(format!("PRODUTO {id}")),
            datahora: "2025-08-12T10:00:00".into(),
        }
    }

    fn not_found(id: i64, descricao: Option<&str>) -> NotFoundProduct {
        NotFoundProduct {
            id,
            client_id: 1,
            base: "homecenter".into(),
            codauxiliar: format!("789{id:010}"),
            descricao: descricao.map(str::to_owned),
            datahora: "2025-08-12T10:00:00".into(),
        }
    }

    fn page(items: Vec<FoundProduct>, next: Option<i64>) -> CursorPage<FoundProduct> {
        CursorPage { items, per_page: 50, next_cursor_id: next }
    }

    #[test]
    fn pages_accumulate_in_order_and_stay_within_total() {
        let mut history = HistoryState::new();
        let generation = history.reset_all();
        history.apply_total(HistoryKind::Found, generation, 3);

        let ticket = history.begin_load(HistoryKind::Found).expect("first load");
        assert_eq!(ticket.cursor, None);
        history.apply_found_page(ticket, page(vec![found(1), found(2)], Some(2)));
        assert_eq!(history.found.items.len(), 2);
        assert!(history.found.items.len() as u64 <= history.found.total);
        assert!(history.found.has_more);

        let ticket = history.begin_load(HistoryKind::Found).expect("second load");
        assert_eq!(ticket.cursor, Some(2));
        history.apply_found_page(ticket, page(vec![found(3)], None));
        assert_eq!(history.found.items.len(), 3);
        assert!(history.found.items.len() as u64 <= history.found.total);
        assert!(!history.found.has_more);
        assert_eq!(
            history.found.items.iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![1, 2, 3],
            "pages append in response order, never re-sorted"
        );
    }

    #[test]
    fn begin_load_is_a_noop_while_loading_or_exhausted() {
        let mut history = HistoryState::new();
        history.reset_all();

        let ticket = history.begin_load(HistoryKind::Found).expect("first load");
        assert_eq!(history.begin_load(HistoryKind::Found), None, "already loading");

        history.apply_found_page(ticket, page(vec![found(1)], None));
        assert_eq!(history.begin_load(HistoryKind::Found), None, "exhausted");
    }

    #[test]
    fn failed_load_halts_the_collection_until_reset() {
        let mut history = HistoryState::new();
        history.reset_all();

        let ticket = history.begin_load(HistoryKind::NotFound).expect("load");
        history.fail_load(HistoryKind::NotFound, ticket);
        assert!(!history.not_found.loading);
        assert!(!history.not_found.has_more);
        assert_eq!(history.begin_load(HistoryKind::NotFound), None);

        history.reset_all();
        assert!(history.begin_load(HistoryKind::NotFound).is_some());
    }

    #[test]
    fn stale_responses_are_discarded_after_a_reset() {
        let mut history = HistoryState::new();
        history.reset_all();
        let stale = history.begin_load(HistoryKind::Found).expect("load");
        let old_generation = stale.generation;

        // Base switch mid-flight.
        let generation = history.reset_all();
        assert_ne!(generation, old_generation);

        history.apply_found_page(stale, page(vec![found(9)], Some(9)));
        assert!(history.found.items.is_empty(), "stale page must not be merged");
        history.fail_load(HistoryKind::Found, stale);
        assert!(history.found.has_more, "stale failure must not halt the new state");
        history.apply_total(HistoryKind::Found, old_generation, 99);
        assert_eq!(history.found.total, 0, "stale totals must be dropped");
    }

    #[test]
    fn totals_clamp_to_the_materialized_prefix() {
        let mut history = HistoryState::new();
        let generation = history.reset_all();
        let ticket = history.begin_load(HistoryKind::Found).expect("load");
        history.apply_found_page(ticket, page(vec![found(1), found(2)], Some(2)));
        // Probe answered late with a smaller number than what is visible.
        history.apply_total(HistoryKind::Found, generation, 1);
        assert_eq!(history.found.total, 2);
    }

    #[test]
    fn delete_removes_the_item_and_decrements_total_floored_at_zero() {
        let mut history = HistoryState::new();
        let generation = history.reset_all();
        let ticket = history.begin_load(HistoryKind::Found).expect("load");
        history.apply_found_page(ticket, page(vec![found(1), found(2)], None));
        history.apply_total(HistoryKind::Found, generation, 5);

        assert!(history.delete(HistoryKind::Found, 1));
        assert!(history.found.items.iter().all(|item| item.id != 1));
        assert_eq!(history.found.total, 4);

        assert!(!history.delete(HistoryKind::Found, 1), "already gone");
        assert_eq!(history.found.total, 4, "missing id must not decrement");

        assert!(history.delete(HistoryKind::Found, 2));
        assert_eq!(history.found.total, 3);
        assert!(!history.delete(HistoryKind::Found, 2));
        let mut empty = HistoryState::new();
        empty.reset_all();
        assert!(!empty.delete(HistoryKind::NotFound, 7));
        assert_eq!(empty.not_found.total, 0, "floor at zero");
    }

    #[test]
    fn update_description_touches_exactly_one_field_of_one_record() {
        let mut history = HistoryState::new();
        history.reset_all();
        let ticket = history.begin_load(HistoryKind::NotFound).expect("load");
        history.apply_not_found_page(
            ticket,
            CursorPage {
                items: vec![not_found(1, None), not_found(2, Some("antiga"))],
                per_page: 50,
                next_cursor_id: None,
            },
        );
        let untouched = history.not_found.items[1].clone();

        history.update_description(1, "cabo hdmi 2m");
        assert_eq!(history.not_found.items[0].descricao.as_deref(), Some("cabo hdmi 2m"));
        assert_eq!(history.not_found.items[0].codauxiliar, "7890000000001");
        assert_eq!(history.not_found.items[1], untouched);
    }

    #[test]
    fn reset_all_clears_both_collections_before_any_refetch() {
        let mut history = HistoryState::new();
        let generation = history.reset_all();
        let ticket = history.begin_load(HistoryKind::Found).expect("load");
        history.apply_found_page(ticket, page(vec![found(1)], Some(1)));
        history.apply_total(HistoryKind::Found, generation, 10);
        history.apply_total(HistoryKind::NotFound, generation, 10);

        history.reset_all();
        assert!(history.found.items.is_empty());
        assert!(history.not_found.items.is_empty());
        assert_eq!(history.found.total, 0);
        assert_eq!(history.not_found.total, 0);
        assert!(history.found.has_more && history.not_found.has_more);
    }

    #[test]
    fn first_page_composition_yields_one_ticket_per_collection() {
        let mut history = HistoryState::new();
        history.reset_all();
        // One totals probe is tagged with the generation; each kind hands
        // out exactly one ticket until its fetch resolves.
        assert!(history.begin_load(HistoryKind::Found).is_some());
        assert!(history.begin_load(HistoryKind::NotFound).is_some());
        assert_eq!(history.begin_load(HistoryKind::Found), None);
        assert_eq!(history.begin_load(HistoryKind::NotFound), None);
    }
}
