use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::votes::{
    ledger::LocalFallbackLedger, memory::MemoryCounterStore, storage::MemoryStorage,
};

type Ledger = LocalFallbackLedger<Rc<MemoryStorage>>;

fn stores() -> (Rc<MemoryCounterStore>, Rc<Ledger>) {
    (
        Rc::new(MemoryCounterStore::new()),
        Rc::new(LocalFallbackLedger::new(Rc::new(MemoryStorage::new()))),
    )
}

#[test]
fn remote_commit_when_primary_is_up() {
    let (remote, ledger) = stores();
    let store = FallbackCounterStore::new(Rc::clone(&remote), Rc::clone(&ledger));
    assert_eq!(store.increment_tiered("gandhi").unwrap(), CommitTier::Remote);
    assert_eq!(remote.get("gandhi").unwrap(), Some(1));
    assert!(ledger.read_all().unwrap().is_empty());
}

#[test]
fn local_commit_when_primary_is_down() {
    let (remote, ledger) = stores();
    remote.set_available(false);
    let store = FallbackCounterStore::new(Rc::clone(&remote), Rc::clone(&ledger));
    assert_eq!(
        store.increment_tiered("gandhi").unwrap(),
        CommitTier::LocalFallback
    );
    assert_eq!(ledger.read_all().unwrap().get("gandhi"), Some(&1));
    assert_eq!(store.get("gandhi").unwrap(), Some(1));
}

#[test]
fn validation_errors_do_not_fall_back() {
    let (remote, ledger) = stores();
    let store = FallbackCounterStore::new(Rc::clone(&remote), Rc::clone(&ledger));
    let err = store.increment_tiered("Not Valid").unwrap_err();
    assert!(matches!(err, crate::TricolorError::Validation(_)));
    assert!(ledger.read_all().unwrap().is_empty());
}

#[test]
fn subscription_falls_back_to_secondary() {
    let (remote, ledger) = stores();
    ledger.record_increment("bose").unwrap();
    remote.set_available(false);
    let store = FallbackCounterStore::new(Rc::clone(&remote), Rc::clone(&ledger));

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _sub = store
        .subscribe_all(Box::new(move |c| sink.borrow_mut().push(c.clone())))
        .unwrap();
    store.increment("bose").unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].get("bose"), Some(&1));
    assert_eq!(seen[1].get("bose"), Some(&2));
}
