use std::{
    cell::{Cell, RefCell},
    collections::BTreeSet,
    rc::Rc,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    foundation::error::{TricolorError, TricolorResult},
    gallery::fighters::fighter_by_id,
    votes::{
        fallback::{CommitTier, FallbackCounterStore},
        ledger::{LocalFallbackLedger, MergeReport},
        storage::KeyValueStorage,
        store::{CounterStore, Subscription, VoteCounts},
    },
};

/// Storage key remembering which fighters this client already voted for.
pub const VOTED_KEY: &str = "independenceday-voted";

/// How many votes one client may cast per fighter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VotePolicy {
    #[default]
    Unlimited,
    OncePerFighter,
}

impl std::str::FromStr for VotePolicy {
    type Err = TricolorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "unlimited" => Ok(Self::Unlimited),
            "once_per_fighter" | "once-per-fighter" => Ok(Self::OncePerFighter),
            other => Err(TricolorError::validation(format!(
                "unknown vote policy \"{other}\" (expected unlimited or once_per_fighter)"
            ))),
        }
    }
}

/// Where the most recent cast stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CastState {
    #[default]
    Idle,
    Casting,
    Committed(CommitTier),
}

/// Result of one [`VoteService::cast`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastOutcome {
    Committed(CommitTier),
    /// Another cast was still in flight; nothing was written.
    Ignored,
    /// [`VotePolicy::OncePerFighter`] already saw a vote for this id.
    AlreadyVoted,
}

/// User-facing message for a cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub success: bool,
    pub title: &'static str,
    pub description: &'static str,
}

impl Feedback {
    /// Message shown when a cast returned an error.
    pub fn failure() -> Self {
        Self {
            success: false,
            title: "Failed to cast vote",
            description: "Please try again later.",
        }
    }
}

impl CastOutcome {
    /// Toast text for this outcome; `None` when the cast was silently dropped.
    pub fn feedback(self) -> Option<Feedback> {
        const THANKS: &str = "Thank you for your tribute! 🇮🇳";
        match self {
            Self::Committed(CommitTier::Remote) => Some(Feedback {
                success: true,
                title: THANKS,
                description: "Your vote has been counted and synced to the database.",
            }),
            Self::Committed(CommitTier::LocalFallback) => Some(Feedback {
                success: true,
                title: THANKS,
                description: "Your vote has been saved locally and will sync when online.",
            }),
            Self::AlreadyVoted => Some(Feedback {
                success: false,
                title: "Already voted",
                description: "You have already paid tribute to this freedom fighter.",
            }),
            Self::Ignored => None,
        }
    }
}

/// Casts votes against a remote store with the local ledger as fallback, and keeps the counts
/// the gallery displays.
///
/// Displayed counts only ever come from the live subscription; a cast's return value is a
/// feedback signal and never updates them directly.
pub struct VoteService<R, S> {
    ledger: Rc<LocalFallbackLedger<S>>,
    store: FallbackCounterStore<R, Rc<LocalFallbackLedger<S>>>,
    policy: VotePolicy,
    state: Cell<CastState>,
    displayed: Rc<RefCell<VoteCounts>>,
    subscription: RefCell<Option<Subscription>>,
}

impl<R: CounterStore, S: KeyValueStorage> VoteService<R, S> {
    pub fn new(remote: R, storage: S, policy: VotePolicy) -> Self {
        let ledger = Rc::new(LocalFallbackLedger::new(storage));
        Self {
            store: FallbackCounterStore::new(remote, Rc::clone(&ledger)),
            ledger,
            policy,
            state: Cell::new(CastState::Idle),
            displayed: Rc::new(RefCell::new(VoteCounts::new())),
            subscription: RefCell::new(None),
        }
    }

    pub fn remote(&self) -> &R {
        self.store.primary()
    }

    pub fn ledger(&self) -> &LocalFallbackLedger<S> {
        &self.ledger
    }

    pub fn policy(&self) -> VotePolicy {
        self.policy
    }

    pub fn state(&self) -> CastState {
        self.state.get()
    }

    /// Reconcile stranded local votes once, then follow the live counts.
    ///
    /// Neither step is fatal: a failed merge keeps the local votes for the next start, and when
    /// the remote cannot be subscribed to the displayed counts follow the local ledger instead.
    pub fn start(&self) -> TricolorResult<MergeReport> {
        let report = match self.ledger.merge_into_remote(self.store.primary()) {
            Ok(r) => r,
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, "vote reconciliation skipped");
                MergeReport::default()
            }
            Err(e) => return Err(e),
        };

        let sink = Rc::clone(&self.displayed);
        let sub = self.store.subscribe_all(Box::new(move |counts: &VoteCounts| {
            *sink.borrow_mut() = counts.clone();
        }))?;
        self.subscription.replace(Some(sub));
        info!(
            merged = report.merged_votes(),
            pending = report.failed.len(),
            "vote service started"
        );
        Ok(report)
    }

    /// Release the live subscription. Displayed counts stay at their last value.
    pub fn stop(&self) {
        if let Some(sub) = self.subscription.take() {
            sub.unsubscribe();
            debug!("vote subscription released");
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription
            .borrow()
            .as_ref()
            .is_some_and(Subscription::is_attached)
    }

    /// Latest mapping delivered by the subscription.
    pub fn displayed_counts(&self) -> VoteCounts {
        self.displayed.borrow().clone()
    }

    pub fn displayed_count(&self, id: &str) -> u64 {
        self.displayed.borrow().get(id).copied().unwrap_or(0)
    }

    /// Cast one vote for `id`.
    ///
    /// The remote store is tried first and the ledger only after it reported itself
    /// unavailable. A cast that arrives while another is still running is ignored.
    #[tracing::instrument(skip(self), fields(policy = ?self.policy))]
    pub fn cast(&self, id: &str) -> TricolorResult<CastOutcome> {
        if self.state.get() == CastState::Casting {
            debug!("cast already in flight; ignoring");
            return Ok(CastOutcome::Ignored);
        }
        if fighter_by_id(id).is_none() {
            return Err(TricolorError::validation(format!("unknown fighter \"{id}\"")));
        }
        if self.policy == VotePolicy::OncePerFighter && self.voted_ids()?.contains(id) {
            return Ok(CastOutcome::AlreadyVoted);
        }

        self.state.set(CastState::Casting);
        let tier = match self.store.increment_tiered(id) {
            Ok(tier) => tier,
            Err(e) => {
                self.state.set(CastState::Idle);
                warn!(error = %e, "vote failed");
                return Err(e);
            }
        };
        self.state.set(CastState::Committed(tier));
        info!(?tier, "vote committed");
        if self.policy == VotePolicy::OncePerFighter
            && let Err(e) = self.remember_vote(id)
        {
            warn!(error = %e, "vote counted but could not be remembered");
        }
        Ok(CastOutcome::Committed(tier))
    }

    fn voted_ids(&self) -> TricolorResult<BTreeSet<String>> {
        let Some(raw) = self.ledger.storage().get_item(VOTED_KEY)? else {
            return Ok(BTreeSet::new());
        };
        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "voted-id list is corrupt; treating as empty");
            BTreeSet::new()
        }))
    }

    fn remember_vote(&self, id: &str) -> TricolorResult<()> {
        let mut ids = self.voted_ids()?;
        ids.insert(id.to_string());
        let raw = serde_json::to_string(&ids)?;
        self.ledger.storage().set_item(VOTED_KEY, &raw)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/votes/service.rs"]
mod tests;
