//! Quantity Debouncer - coalesces rapid quantity edits into one write.
//!
//! N rapid taps on a +/- control must not produce N network writes. Each
//! schedule replaces any pending write for the same product (replace, never
//! queue) and restarts the quiescence window. A write only fires once the
//! window elapses with no further edits to that id.
//!
//! Cancellation is explicit: every schedule bumps a per-id generation
//! counter, and a firing timer must prove it still holds the latest
//! generation before sending. A stale timer silently no-ops.

use crate::{Generation, ProductId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default quiescence window in milliseconds.
pub const DEFAULT_DEBOUNCE_WINDOW_MS: u64 = 500;

/// A coalesced write waiting for its quiescence window to elapse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingWrite {
    /// Product the write targets
    pub product_id: ProductId,
    /// Net quantity change accumulated since the last flush
    pub delta: i64,
    /// Absolute quantity captured at the latest schedule; this is what the
    /// remote upsert carries, making retried or duplicated sends idempotent
    pub quantity: u32,
    /// When the write may fire
    pub deadline: Timestamp,
    /// Generation at the latest schedule
    pub generation: Generation,
}

/// Pending-write table with strict replace-on-key discipline.
///
/// At most one pending write per product id is live at any time. Scheduling
/// for an id that already has one cancels and replaces it, folding the new
/// delta into the accumulated net change.
#[derive(Debug, Clone)]
pub struct DebounceMap {
    window_ms: u64,
    pending: HashMap<ProductId, PendingWrite>,
    generations: HashMap<ProductId, Generation>,
}

impl DebounceMap {
    /// Create a debounce table with the given quiescence window.
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            pending: HashMap::new(),
            generations: HashMap::new(),
        }
    }

    /// The quiescence window in milliseconds.
    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Schedule a coalesced write for `id`.
    ///
    /// `delta` is the change of this edit alone; it accumulates with any
    /// pending delta. `quantity` is the resulting absolute quantity.
    /// Returns the new generation; only a timer holding it may flush.
    pub fn schedule(
        &mut self,
        id: impl Into<ProductId>,
        delta: i64,
        quantity: u32,
        now: Timestamp,
    ) -> Generation {
        let id = id.into();
        let generation = self.bump(&id);
        let carried = self
            .pending
            .get(&id)
            .map(|w| w.delta)
            .unwrap_or_default();

        self.pending.insert(
            id.clone(),
            PendingWrite {
                product_id: id,
                delta: carried + delta,
                quantity,
                deadline: now + self.window_ms,
                generation,
            },
        );
        generation
    }

    /// Whether `generation` is still the latest scheduled for `id`.
    pub fn is_current(&self, id: &str, generation: Generation) -> bool {
        self.generations.get(id).copied() == Some(generation)
    }

    /// Remove and return the pending write for `id` if `generation` is
    /// current. A superseded timer gets `None` and must not send.
    pub fn take(&mut self, id: &str, generation: Generation) -> Option<PendingWrite> {
        if !self.is_current(id, generation) {
            return None;
        }
        self.pending.remove(id)
    }

    /// Like [`take`](Self::take), but also requires the quiescence window to
    /// have elapsed.
    pub fn take_due(
        &mut self,
        id: &str,
        generation: Generation,
        now: Timestamp,
    ) -> Option<PendingWrite> {
        if self.pending.get(id).is_some_and(|w| w.deadline > now) {
            return None;
        }
        self.take(id, generation)
    }

    /// Cancel any pending write for `id` unconditionally.
    ///
    /// Used when the line item is deleted while an update is pending: a
    /// quantity update for a nonexistent line is a dropped operation, not an
    /// error. Bumps the generation so in-flight timers no-op.
    pub fn cancel(&mut self, id: &str) -> Option<PendingWrite> {
        let removed = self.pending.remove(id);
        if removed.is_some() {
            self.bump(id);
        }
        removed
    }

    /// Cancel every pending write, invalidating all in-flight timers.
    pub fn clear(&mut self) {
        let ids: Vec<ProductId> = self.pending.keys().cloned().collect();
        for id in ids {
            self.cancel(&id);
        }
    }

    /// Inspect the pending write for `id` without removing it.
    pub fn pending(&self, id: &str) -> Option<&PendingWrite> {
        self.pending.get(id)
    }

    /// Count of live pending writes.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if no writes are pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn bump(&mut self, id: &str) -> Generation {
        let entry = self.generations.entry(id.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }
}

impl Default for DebounceMap {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_WINDOW_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_creates_pending_write() {
        let mut map = DebounceMap::new(500);
        let generation = map.schedule("p-1", 1, 3, 1_000);

        let w = map.pending("p-1").unwrap();
        assert_eq!(w.delta, 1);
        assert_eq!(w.quantity, 3);
        assert_eq!(w.deadline, 1_500);
        assert_eq!(w.generation, generation);
    }

    #[test]
    fn reschedule_replaces_and_accumulates() {
        let mut map = DebounceMap::new(500);
        let g1 = map.schedule("p-1", 1, 3, 1_000);
        let g2 = map.schedule("p-1", 1, 4, 1_200);
        let g3 = map.schedule("p-1", -1, 3, 1_300);

        assert_eq!(map.len(), 1);
        assert!(g1 < g2 && g2 < g3);

        let w = map.pending("p-1").unwrap();
        assert_eq!(w.delta, 1); // +1 +1 -1
        assert_eq!(w.quantity, 3); // final quantity, not intermediate
        assert_eq!(w.deadline, 1_800); // window restarted at the last edit
    }

    #[test]
    fn stale_generation_cannot_take() {
        let mut map = DebounceMap::new(500);
        let g1 = map.schedule("p-1", 1, 3, 1_000);
        let g2 = map.schedule("p-1", 1, 4, 1_200);

        assert!(map.take("p-1", g1).is_none());
        // The replacement is still pending for the live generation.
        assert!(map.is_current("p-1", g2));
        assert!(map.take("p-1", g2).is_some());
        assert!(map.is_empty());
    }

    #[test]
    fn take_due_respects_deadline() {
        let mut map = DebounceMap::new(500);
        let generation = map.schedule("p-1", 1, 3, 1_000);

        assert!(map.take_due("p-1", generation, 1_400).is_none());
        assert!(map.take_due("p-1", generation, 1_500).is_some());
    }

    #[test]
    fn cancel_drops_write_and_invalidates_timers() {
        let mut map = DebounceMap::new(500);
        let generation = map.schedule("p-1", 2, 5, 1_000);

        let cancelled = map.cancel("p-1").unwrap();
        assert_eq!(cancelled.delta, 2);
        assert!(!map.is_current("p-1", generation));
        assert!(map.take("p-1", generation).is_none());
    }

    #[test]
    fn cancel_without_pending_is_noop() {
        let mut map = DebounceMap::new(500);
        assert!(map.cancel("ghost").is_none());
    }

    #[test]
    fn independent_ids_do_not_interfere() {
        let mut map = DebounceMap::new(500);
        let g1 = map.schedule("p-1", 1, 2, 1_000);
        let g2 = map.schedule("p-2", 1, 9, 1_000);

        assert_eq!(map.len(), 2);
        assert!(map.take("p-1", g1).is_some());
        assert!(map.take("p-2", g2).is_some());
    }

    #[test]
    fn schedule_after_flush_starts_fresh_delta() {
        let mut map = DebounceMap::new(500);
        let g1 = map.schedule("p-1", 3, 4, 1_000);
        map.take("p-1", g1).unwrap();

        map.schedule("p-1", -1, 3, 2_000);
        assert_eq!(map.pending("p-1").unwrap().delta, -1);
    }

    #[test]
    fn clear_invalidates_every_timer() {
        let mut map = DebounceMap::new(500);
        let g1 = map.schedule("p-1", 1, 2, 1_000);
        let g2 = map.schedule("p-2", 1, 9, 1_000);

        map.clear();
        assert!(map.is_empty());
        assert!(map.take("p-1", g1).is_none());
        assert!(map.take("p-2", g2).is_none());
    }

    #[test]
    fn default_window() {
        let map = DebounceMap::default();
        assert_eq!(map.window_ms(), DEFAULT_DEBOUNCE_WINDOW_MS);
    }
}
