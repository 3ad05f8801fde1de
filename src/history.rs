// history.rs

use tracing::trace;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: u64,
    pub text: String,
}

/// Fixed-capacity ring of recently issued command lines.
///
/// Slots are written by advancing `newest`; once the ring is full `oldest`
/// advances with it and the logically oldest entry is overwritten. Ids keep
/// counting up across evictions and are never reused.
pub struct RingStore {
    slots: Vec<Option<HistoryEntry>>,
    newest: usize,
    oldest: usize,
    count: usize,
    next_id: u64,
}

impl RingStore {
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be positive");
        Self {
            slots: vec![None; capacity],
            // First insert advances onto slot 0.
            newest: capacity - 1,
            oldest: 0,
            count: 0,
            next_id: 1,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Records `text` and returns the id it was given.
    pub fn insert(&mut self, text: &str) -> u64 {
        self.newest = self.advance(self.newest);
        if self.count < self.capacity() {
            self.count += 1;
        } else {
            self.oldest = self.advance(self.oldest);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.slots[self.newest] = Some(HistoryEntry {
            id,
            text: text.to_string(),
        });
        trace!(id, text, "recorded history entry");
        id
    }

    /// Oldest to newest. Borrowing only, so calling it again restarts the walk.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> + '_ {
        let capacity = self.capacity();
        (0..self.count).filter_map(move |step| self.slots[(self.oldest + step) % capacity].as_ref())
    }

    pub fn find_by_id(&self, id: u64) -> Option<&HistoryEntry> {
        self.iter().find(|entry| entry.id == id)
    }

    fn advance(&self, index: usize) -> usize {
        (index + 1) % self.capacity()
    }
}
