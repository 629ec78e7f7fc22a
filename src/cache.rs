//! Read-through cache for single-entity lookups by id.
//!
//! A cache is created once at startup and shared by every request worker.
//! Entries are filled on a read miss, refreshed after an update and removed
//! after a delete. Each id carries its own generation, bumped under the
//! entry's shard lock by every `refresh`/`evict`. Readers and updaters take a
//! ticket before touching storage; when they come back, a value only lands if
//! the id's generation still matches that ticket. An updater that lost the
//! race evicts instead, so the next read goes to storage.
//!
//! Evicted ids keep an empty slot holding their generation. Dropping it would
//! reset the generation and let a ticket from before the eviction match again.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

struct Slot<V> {
    generation: u64,
    value: Option<V>,
}

pub struct EntityCache<V> {
    name: &'static str,
    slots: DashMap<i64, Slot<V>>,
}

/// Generation of one id observed before a storage call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

impl<V: Clone> EntityCache<V> {
    pub fn new(name: &'static str) -> Self {
        EntityCache {
            name,
            slots: DashMap::new(),
        }
    }

    pub fn get(&self, id: i64) -> Option<V> {
        self.slots.get(&id).and_then(|slot| slot.value.clone())
    }

    pub fn ticket(&self, id: i64) -> Ticket {
        Ticket(self.slots.get(&id).map_or(0, |slot| slot.generation))
    }

    /// Stores a value read from storage unless the id was mutated since
    /// `ticket` was taken. Returns whether the value was stored.
    pub fn fill(&self, id: i64, ticket: Ticket, value: V) -> bool {
        match self.slots.entry(id) {
            Entry::Occupied(mut slot) => {
                let slot = slot.get_mut();
                if slot.value.is_some() {
                    return false;
                }
                if slot.generation != ticket.0 {
                    tracing::trace!(cache = self.name, id, "dropping stale fill");
                    return false;
                }
                slot.value = Some(value);
                true
            }
            Entry::Vacant(slot) => {
                if ticket.0 != 0 {
                    return false;
                }
                slot.insert(Slot {
                    generation: 0,
                    value: Some(value),
                });
                true
            }
        }
    }

    /// Records a successful update. The new value is cached only if no other
    /// mutation of `id` landed since `ticket`; otherwise the entry is dropped.
    /// Returns whether the value was cached.
    pub fn refresh(&self, id: i64, ticket: Ticket, value: V) -> bool {
        let mut slot = self.slots.entry(id).or_insert_with(|| Slot {
            generation: 0,
            value: None,
        });
        let current = slot.generation == ticket.0;
        slot.generation += 1;
        if current {
            slot.value = Some(value);
        } else {
            tracing::trace!(cache = self.name, id, "concurrent update, evicting");
            slot.value = None;
        }
        current
    }

    /// Removes the entry for `id` after a delete or a failed update.
    pub fn evict(&self, id: i64) {
        let mut slot = self.slots.entry(id).or_insert_with(|| Slot {
            generation: 0,
            value: None,
        });
        slot.generation += 1;
        slot.value = None;
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.value.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_then_get() {
        let cache = EntityCache::new("test");
        let ticket = cache.ticket(1);
        assert!(cache.fill(1, ticket, "one"));
        assert_eq!(cache.get(1), Some("one"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn fill_does_not_replace_existing_entry() {
        let cache = EntityCache::new("test");
        let ticket = cache.ticket(1);
        assert!(cache.refresh(1, ticket, "fresh"));
        let ticket = cache.ticket(1);
        assert!(!cache.fill(1, ticket, "old"));
        assert_eq!(cache.get(1), Some("fresh"));
    }

    #[test]
    fn fill_started_before_update_is_dropped() {
        let cache = EntityCache::new("test");
        let ticket = cache.ticket(1);
        cache.refresh(1, cache.ticket(1), "updated");
        cache.evict(1);
        assert!(!cache.fill(1, ticket, "before update"));
        assert_eq!(cache.get(1), None);
    }

    #[test]
    fn fill_started_before_evict_is_dropped() {
        let cache = EntityCache::new("test");
        let ticket = cache.ticket(9);
        cache.evict(9);
        assert!(!cache.fill(9, ticket, "deleted"));
        assert!(cache.is_empty());
    }

    #[test]
    fn refresh_replaces_and_evict_removes() {
        let cache = EntityCache::new("test");
        cache.refresh(3, cache.ticket(3), "a");
        cache.refresh(3, cache.ticket(3), "b");
        assert_eq!(cache.get(3), Some("b"));
        cache.evict(3);
        assert_eq!(cache.get(3), None);
    }

    #[test]
    fn overlapping_updates_leave_no_entry() {
        let cache = EntityCache::new("test");
        let first = cache.ticket(1);
        let second = cache.ticket(1);
        // The second writer reaches the cache first.
        assert!(cache.refresh(1, second, "v2"));
        assert!(!cache.refresh(1, first, "v1"));
        assert_eq!(cache.get(1), None);
        // The next read fills from storage again.
        assert!(cache.fill(1, cache.ticket(1), "v2"));
        assert_eq!(cache.get(1), Some("v2"));
    }

    #[test]
    fn mutations_do_not_disturb_other_ids() {
        let cache = EntityCache::new("test");
        let ticket = cache.ticket(1);
        cache.refresh(2, cache.ticket(2), "two");
        cache.evict(3);
        assert!(cache.fill(1, ticket, "one"));
        assert_eq!(cache.len(), 2);
    }
}
