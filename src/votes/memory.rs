use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
};

use crate::{
    foundation::error::{TricolorError, TricolorResult},
    votes::store::{
        CounterStore, CountsCallback, Subscribers, Subscription, VoteCounts, VoteRecord,
        now_unix_ms, validate_counter_key,
    },
};

/// In-process document store holding one [`VoteRecord`] per id.
///
/// Stands in for the hosted document database: it can be switched offline to exercise the
/// fallback path, and it notifies subscribers with the full mapping after each write.
pub struct MemoryCounterStore {
    records: RefCell<BTreeMap<String, VoteRecord>>,
    available: Cell<bool>,
    subscribers: Subscribers,
}

impl Default for MemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self {
            records: RefCell::new(BTreeMap::new()),
            available: Cell::new(true),
            subscribers: Subscribers::new(),
        }
    }

    /// Store pre-populated with `counts`.
    pub fn with_counts<'a>(counts: impl IntoIterator<Item = (&'a str, u64)>) -> Self {
        let store = Self::new();
        {
            let mut records = store.records.borrow_mut();
            for (id, count) in counts {
                records.insert(
                    id.to_string(),
                    VoteRecord {
                        fighter_id: id.to_string(),
                        count,
                        last_updated: now_unix_ms(),
                    },
                );
            }
        }
        store
    }

    /// Simulate losing or regaining connectivity.
    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    pub fn is_available(&self) -> bool {
        self.available.get()
    }

    /// Copy of the stored documents, ignoring availability.
    pub fn records(&self) -> Vec<VoteRecord> {
        self.records.borrow().values().cloned().collect()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn ensure_available(&self, op: &str) -> TricolorResult<()> {
        if self.available.get() {
            Ok(())
        } else {
            Err(TricolorError::store_unavailable(format!(
                "{op}: document store is offline"
            )))
        }
    }

    fn counts(&self) -> VoteCounts {
        self.records
            .borrow()
            .iter()
            .map(|(id, rec)| (id.clone(), rec.count))
            .collect()
    }

    fn add(&self, id: &str, delta: u64) {
        {
            let mut records = self.records.borrow_mut();
            let rec = records.entry(id.to_string()).or_insert_with(|| VoteRecord {
                fighter_id: id.to_string(),
                count: 0,
                last_updated: 0,
            });
            rec.count = rec.count.saturating_add(delta);
            rec.last_updated = now_unix_ms();
        }
        self.subscribers.notify(self.counts());
    }
}

impl CounterStore for MemoryCounterStore {
    fn get(&self, id: &str) -> TricolorResult<Option<u64>> {
        self.ensure_available("get")?;
        Ok(self.records.borrow().get(id).map(|r| r.count))
    }

    fn increment(&self, id: &str) -> TricolorResult<()> {
        validate_counter_key(id)?;
        self.ensure_available("increment")?;
        self.add(id, 1);
        Ok(())
    }

    fn merge_add(&self, id: &str, delta: u64) -> TricolorResult<()> {
        validate_counter_key(id)?;
        self.ensure_available("merge_add")?;
        if delta > 0 {
            self.add(id, delta);
        }
        Ok(())
    }

    fn snapshot(&self) -> TricolorResult<VoteCounts> {
        self.ensure_available("snapshot")?;
        Ok(self.counts())
    }

    fn subscribe_all(&self, callback: CountsCallback) -> TricolorResult<Subscription> {
        self.ensure_available("subscribe")?;
        Ok(self.subscribers.insert(callback, &self.counts()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/votes/memory.rs"]
mod tests;
