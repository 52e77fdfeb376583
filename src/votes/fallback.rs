use std::{cell::RefCell, rc::Rc};

use tracing::warn;

use crate::{
    foundation::error::TricolorResult,
    votes::store::{CounterStore, CountsCallback, Subscription, VoteCounts},
};

/// Which store accepted a write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitTier {
    Remote,
    LocalFallback,
}

/// Primary store with a secondary that takes over whenever the primary reports
/// [`StoreUnavailable`](crate::TricolorError::StoreUnavailable).
///
/// The primary is always tried first and the secondary only after it has failed; the two are
/// never written concurrently. Errors other than `StoreUnavailable` (for example a rejected id)
/// come straight back from the primary.
pub struct FallbackCounterStore<P, S> {
    primary: P,
    secondary: S,
}

impl<P: CounterStore, S: CounterStore> FallbackCounterStore<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn secondary(&self) -> &S {
        &self.secondary
    }

    /// Increment `id`, reporting which tier committed the vote.
    pub fn increment_tiered(&self, id: &str) -> TricolorResult<CommitTier> {
        match self.primary.increment(id) {
            Ok(()) => Ok(CommitTier::Remote),
            Err(e) if e.is_store_unavailable() => {
                warn!(id, error = %e, "primary store unavailable; recording vote locally");
                self.secondary.increment(id)?;
                Ok(CommitTier::LocalFallback)
            }
            Err(e) => Err(e),
        }
    }

    fn either<T>(
        &self,
        op: &str,
        primary: impl FnOnce(&P) -> TricolorResult<T>,
        secondary: impl FnOnce(&S) -> TricolorResult<T>,
    ) -> TricolorResult<T> {
        match primary(&self.primary) {
            Err(e) if e.is_store_unavailable() => {
                warn!(op, error = %e, "primary store unavailable; using fallback");
                secondary(&self.secondary)
            }
            other => other,
        }
    }
}

impl<P: CounterStore, S: CounterStore> CounterStore for FallbackCounterStore<P, S> {
    fn get(&self, id: &str) -> TricolorResult<Option<u64>> {
        self.either("get", |p| p.get(id), |s| s.get(id))
    }

    fn increment(&self, id: &str) -> TricolorResult<()> {
        self.increment_tiered(id).map(|_| ())
    }

    fn merge_add(&self, id: &str, delta: u64) -> TricolorResult<()> {
        self.either(
            "merge_add",
            |p| p.merge_add(id, delta),
            |s| s.merge_add(id, delta),
        )
    }

    fn snapshot(&self) -> TricolorResult<VoteCounts> {
        self.either("snapshot", |p| p.snapshot(), |s| s.snapshot())
    }

    fn subscribe_all(&self, callback: CountsCallback) -> TricolorResult<Subscription> {
        let shared = Rc::new(RefCell::new(callback));
        let forward = |cb: &Rc<RefCell<CountsCallback>>| -> CountsCallback {
            let cb = Rc::clone(cb);
            Box::new(move |counts: &VoteCounts| (*cb.borrow_mut())(counts))
        };
        self.either(
            "subscribe_all",
            |p| p.subscribe_all(forward(&shared)),
            |s| s.subscribe_all(forward(&shared)),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/votes/fallback.rs"]
mod tests;
