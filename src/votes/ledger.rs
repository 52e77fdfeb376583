use tracing::{debug, info, warn};

use crate::{
    foundation::error::TricolorResult,
    votes::{
        storage::KeyValueStorage,
        store::{
            CounterStore, CountsCallback, Subscribers, Subscription, VoteCounts,
            validate_counter_key,
        },
    },
};

/// Storage key of the persisted id → count mapping.
pub const LEDGER_KEY: &str = "independenceday-votes";

/// Outcome of one [`LocalFallbackLedger::merge_into_remote`] pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Ids whose local count was added to the remote store, with the amount added.
    pub merged: Vec<(String, u64)>,
    /// Ids left in the ledger because the merge-write failed, with the reason.
    pub failed: Vec<(String, String)>,
}

impl MergeReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn merged_votes(&self) -> u64 {
        self.merged.iter().map(|(_, n)| n).sum()
    }
}

/// Votes recorded on the device while the remote store was unreachable.
///
/// The whole mapping lives under [`LEDGER_KEY`] as a JSON object. Every mutation is a single
/// read-modify-write of that entry with no suspension point in between, so concurrent casts for
/// different ids on the same client cannot clobber each other.
pub struct LocalFallbackLedger<S> {
    storage: S,
    subscribers: Subscribers,
}

impl<S: KeyValueStorage> LocalFallbackLedger<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            subscribers: Subscribers::new(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Current mapping. A corrupt entry reads as empty and is replaced on the next write.
    pub fn read_all(&self) -> TricolorResult<VoteCounts> {
        let Some(raw) = self.storage.get_item(LEDGER_KEY)? else {
            return Ok(VoteCounts::new());
        };
        match serde_json::from_str::<VoteCounts>(&raw) {
            Ok(counts) => Ok(counts),
            Err(e) => {
                warn!(error = %e, "local vote ledger is corrupt; treating as empty");
                Ok(VoteCounts::new())
            }
        }
    }

    /// Add one vote for `id`; returns the new local count.
    pub fn record_increment(&self, id: &str) -> TricolorResult<u64> {
        self.add(id, 1)
    }

    fn add(&self, id: &str, delta: u64) -> TricolorResult<u64> {
        validate_counter_key(id)?;
        let mut counts = self.read_all()?;
        let slot = counts.entry(id.to_string()).or_insert(0);
        *slot = slot.saturating_add(delta);
        let now = *slot;
        self.write_all(&counts)?;
        debug!(id, count = now, "vote recorded in local ledger");
        self.subscribers.notify(counts);
        Ok(now)
    }

    fn write_all(&self, counts: &VoteCounts) -> TricolorResult<()> {
        if counts.is_empty() {
            return self.storage.remove_item(LEDGER_KEY);
        }
        let raw = serde_json::to_string(counts)?;
        self.storage.set_item(LEDGER_KEY, &raw)
    }

    /// Upload every positive local count into `remote` with a merge-write.
    ///
    /// Remote counts are only ever added to. Each id that was merged is subtracted from the
    /// ledger (re-reading the entry first, so votes recorded while the merge ran survive); ids
    /// whose write failed stay for the next pass.
    pub fn merge_into_remote<R: CounterStore + ?Sized>(
        &self,
        remote: &R,
    ) -> TricolorResult<MergeReport> {
        let local = self.read_all()?;
        let mut report = MergeReport::default();

        for (id, count) in local {
            if count == 0 {
                continue;
            }
            match remote.merge_add(&id, count) {
                Ok(()) => report.merged.push((id, count)),
                Err(e) => {
                    warn!(id = %id, error = %e, "could not merge local votes; keeping them");
                    report.failed.push((id, e.to_string()));
                }
            }
        }

        if !report.merged.is_empty() {
            let mut remaining = self.read_all()?;
            for (id, n) in &report.merged {
                if let Some(c) = remaining.get_mut(id) {
                    *c = c.saturating_sub(*n);
                }
            }
            remaining.retain(|_, c| *c > 0);
            self.write_all(&remaining)?;
            info!(
                ids = report.merged.len(),
                votes = report.merged_votes(),
                "local votes merged into remote store"
            );
            self.subscribers.notify(remaining);
        }

        Ok(report)
    }
}

impl<S: KeyValueStorage> CounterStore for LocalFallbackLedger<S> {
    fn get(&self, id: &str) -> TricolorResult<Option<u64>> {
        Ok(self.read_all()?.get(id).copied())
    }

    fn increment(&self, id: &str) -> TricolorResult<()> {
        self.record_increment(id).map(|_| ())
    }

    fn merge_add(&self, id: &str, delta: u64) -> TricolorResult<()> {
        if delta == 0 {
            return validate_counter_key(id);
        }
        self.add(id, delta).map(|_| ())
    }

    fn snapshot(&self) -> TricolorResult<VoteCounts> {
        self.read_all()
    }

    fn subscribe_all(&self, callback: CountsCallback) -> TricolorResult<Subscription> {
        let current = self.read_all()?;
        Ok(self.subscribers.insert(callback, &current))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/votes/ledger.rs"]
mod tests;
