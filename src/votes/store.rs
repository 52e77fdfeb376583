use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
    rc::{Rc, Weak},
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{TricolorError, TricolorResult};

/// Namespace of the vote documents, distinct from any other application data.
pub const VOTES_COLLECTION: &str = "freedom_fighter_votes";

/// Full id → count mapping as delivered to subscribers.
pub type VoteCounts = BTreeMap<String, u64>;

/// Callback receiving the complete current mapping after every change.
pub type CountsCallback = Box<dyn FnMut(&VoteCounts)>;

/// One vote document in the remote store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    /// Gallery id this record counts for.
    pub fighter_id: String,
    /// Number of votes, never negative.
    pub count: u64,
    /// Unix time of the last write, in milliseconds.
    pub last_updated: u64,
}

/// Key → counter persistence with atomic increment.
///
/// All methods take `&self`: stores are shared by the gallery view and the vote service on a
/// single thread and mutate through interior mutability. Any failure to reach the backing store
/// is reported as [`TricolorError::StoreUnavailable`].
pub trait CounterStore {
    /// Current count for `id`, `None` if no vote was ever recorded.
    fn get(&self, id: &str) -> TricolorResult<Option<u64>>;

    /// Create the record with count 1, or add 1 to an existing one, as a single step.
    fn increment(&self, id: &str) -> TricolorResult<()>;

    /// Merge-write: add `delta` to whatever count exists (creating the record if needed).
    fn merge_add(&self, id: &str, delta: u64) -> TricolorResult<()>;

    /// Every known count.
    fn snapshot(&self) -> TricolorResult<VoteCounts>;

    /// Register `callback`; it receives the current mapping once immediately and then the full
    /// mapping after every change until the returned handle is dropped.
    fn subscribe_all(&self, callback: CountsCallback) -> TricolorResult<Subscription>;
}

impl<T: CounterStore + ?Sized> CounterStore for Rc<T> {
    fn get(&self, id: &str) -> TricolorResult<Option<u64>> {
        (**self).get(id)
    }

    fn increment(&self, id: &str) -> TricolorResult<()> {
        (**self).increment(id)
    }

    fn merge_add(&self, id: &str, delta: u64) -> TricolorResult<()> {
        (**self).merge_add(id, delta)
    }

    fn snapshot(&self) -> TricolorResult<VoteCounts> {
        (**self).snapshot()
    }

    fn subscribe_all(&self, callback: CountsCallback) -> TricolorResult<Subscription> {
        (**self).subscribe_all(callback)
    }
}

/// Counter keys end up in file names and document ids.
pub fn validate_counter_key(id: &str) -> TricolorResult<()> {
    if id.is_empty() {
        return Err(TricolorError::validation("counter id must be non-empty"));
    }
    if id.len() > 100 {
        return Err(TricolorError::validation("counter id exceeds 100 bytes"));
    }
    if !id
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
    {
        return Err(TricolorError::validation(format!(
            "counter id \"{id}\" may only contain a-z, 0-9, '-' and '_'"
        )));
    }
    Ok(())
}

pub(crate) fn now_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Handle returned by [`CounterStore::subscribe_all`]; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    slots: Weak<RefCell<Slots>>,
    key: u64,
}

impl Subscription {
    /// A handle bound to nothing.
    pub fn detached() -> Self {
        Self {
            slots: Weak::new(),
            key: 0,
        }
    }

    /// Explicitly release the subscription. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {}

    /// `false` once the store that issued this handle is gone.
    pub fn is_attached(&self) -> bool {
        self.slots.strong_count() > 0
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(slots) = self.slots.upgrade() else {
            return;
        };
        let Ok(mut slots) = slots.try_borrow_mut() else {
            return;
        };
        if slots.delivering {
            slots.removed.insert(self.key);
        }
        slots.callbacks.remove(&self.key);
    }
}

#[derive(Default)]
struct Slots {
    next_key: u64,
    callbacks: BTreeMap<u64, CountsCallback>,
    delivering: bool,
    removed: BTreeSet<u64>,
    pending: Option<VoteCounts>,
}

/// Subscriber registry shared by the store implementations.
///
/// Delivery never holds a borrow while a callback runs, so callbacks may subscribe, unsubscribe
/// or trigger further changes. A change raised during delivery is coalesced and delivered once
/// the current round finishes.
#[derive(Default)]
pub(crate) struct Subscribers {
    slots: Rc<RefCell<Slots>>,
}

impl Subscribers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Deliver `initial` to `callback`, then register it.
    pub(crate) fn insert(&self, mut callback: CountsCallback, initial: &VoteCounts) -> Subscription {
        callback(initial);
        let mut slots = self.slots.borrow_mut();
        slots.next_key += 1;
        let key = slots.next_key;
        slots.callbacks.insert(key, callback);
        Subscription {
            slots: Rc::downgrade(&self.slots),
            key,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.borrow().callbacks.len()
    }

    pub(crate) fn notify(&self, counts: VoteCounts) {
        {
            let mut slots = self.slots.borrow_mut();
            if slots.delivering {
                slots.pending = Some(counts);
                return;
            }
            slots.delivering = true;
        }

        let mut next = Some(counts);
        while let Some(counts) = next.take() {
            let mut round = std::mem::take(&mut self.slots.borrow_mut().callbacks);
            for callback in round.values_mut() {
                callback(&counts);
            }

            let mut slots = self.slots.borrow_mut();
            let removed = std::mem::take(&mut slots.removed);
            round.retain(|key, _| !removed.contains(key));
            let added = std::mem::replace(&mut slots.callbacks, round);
            slots.callbacks.extend(added);
            next = slots.pending.take();
        }

        self.slots.borrow_mut().delivering = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/votes/store.rs"]
mod tests;
