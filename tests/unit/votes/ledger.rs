use std::rc::Rc;

use super::*;
use crate::votes::{memory::MemoryCounterStore, storage::MemoryStorage};

fn ledger() -> LocalFallbackLedger<Rc<MemoryStorage>> {
    LocalFallbackLedger::new(Rc::new(MemoryStorage::new()))
}

#[test]
fn record_increment_starts_from_zero() {
    let l = ledger();
    assert!(l.read_all().unwrap().is_empty());
    assert_eq!(l.record_increment("gandhi").unwrap(), 1);
    assert_eq!(l.record_increment("gandhi").unwrap(), 2);
    assert_eq!(l.record_increment("nehru").unwrap(), 1);

    let all = l.read_all().unwrap();
    assert_eq!(all.get("gandhi"), Some(&2));
    assert_eq!(all.get("nehru"), Some(&1));

    let raw = l.storage().get_item(LEDGER_KEY).unwrap().unwrap();
    assert_eq!(raw, r#"{"gandhi":2,"nehru":1}"#);
}

#[test]
fn corrupt_entry_reads_as_empty_and_is_replaced() {
    let l = ledger();
    l.storage().set_item(LEDGER_KEY, "not json").unwrap();
    assert!(l.read_all().unwrap().is_empty());
    assert_eq!(l.record_increment("tilak").unwrap(), 1);
    assert_eq!(l.read_all().unwrap().get("tilak"), Some(&1));
}

#[test]
fn merge_adds_to_remote_and_clears_merged_ids() {
    let l = ledger();
    for _ in 0..3 {
        l.record_increment("gandhi").unwrap();
    }
    let remote = MemoryCounterStore::with_counts([("gandhi", 10)]);

    let report = l.merge_into_remote(&remote).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.merged, vec![("gandhi".to_string(), 3)]);
    assert_eq!(report.merged_votes(), 3);
    assert_eq!(remote.get("gandhi").unwrap(), Some(13));
    assert!(l.read_all().unwrap().is_empty());
    assert_eq!(l.storage().get_item(LEDGER_KEY).unwrap(), None);

    // a second pass must not add the same votes again
    let again = l.merge_into_remote(&remote).unwrap();
    assert!(again.merged.is_empty());
    assert_eq!(remote.get("gandhi").unwrap(), Some(13));
}

#[test]
fn failed_merge_keeps_local_votes() {
    let l = ledger();
    l.record_increment("nehru").unwrap();
    let remote = MemoryCounterStore::new();
    remote.set_available(false);

    let report = l.merge_into_remote(&remote).unwrap();
    assert!(!report.is_clean());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(l.read_all().unwrap().get("nehru"), Some(&1));
}

#[test]
fn ledger_is_a_counter_store() {
    let l = ledger();
    l.increment("bharati").unwrap();
    l.merge_add("bharati", 2).unwrap();
    l.merge_add("bharati", 0).unwrap();
    assert_eq!(l.get("bharati").unwrap(), Some(3));
    assert_eq!(l.snapshot().unwrap().len(), 1);
    assert!(l.increment("Bad Id").is_err());
}
