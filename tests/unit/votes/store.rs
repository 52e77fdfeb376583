use std::{cell::RefCell, rc::Rc};

use super::*;

fn counts(pairs: &[(&str, u64)]) -> VoteCounts {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn recorder() -> (Rc<RefCell<Vec<VoteCounts>>>, CountsCallback) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    (seen, Box::new(move |c: &VoteCounts| sink.borrow_mut().push(c.clone())))
}

#[test]
fn record_uses_camel_case_fields() {
    let rec = VoteRecord {
        fighter_id: "gandhi".to_string(),
        count: 3,
        last_updated: 42,
    };
    let json = serde_json::to_value(&rec).unwrap();
    assert_eq!(json["fighterId"], "gandhi");
    assert_eq!(json["count"], 3);
    assert_eq!(json["lastUpdated"], 42);
}

#[test]
fn counter_keys_are_restricted() {
    assert!(validate_counter_key("bhagat-singh").is_ok());
    assert!(validate_counter_key("azad_2").is_ok());
    assert!(validate_counter_key("").is_err());
    assert!(validate_counter_key("../etc").is_err());
    assert!(validate_counter_key("Gandhi").is_err());
    assert!(validate_counter_key(&"a".repeat(101)).is_err());
}

#[test]
fn insert_primes_then_notify_delivers_full_mapping() {
    let subs = Subscribers::new();
    let (seen, cb) = recorder();
    let _sub = subs.insert(cb, &counts(&[("a", 1)]));
    subs.notify(counts(&[("a", 2), ("b", 1)]));

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], counts(&[("a", 1)]));
    assert_eq!(seen[1], counts(&[("a", 2), ("b", 1)]));
}

#[test]
fn dropping_handle_stops_delivery() {
    let subs = Subscribers::new();
    let (seen, cb) = recorder();
    let sub = subs.insert(cb, &VoteCounts::new());
    assert_eq!(subs.len(), 1);
    sub.unsubscribe();
    assert_eq!(subs.len(), 0);
    subs.notify(counts(&[("a", 1)]));
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn handle_outliving_registry_is_detached() {
    let sub = {
        let subs = Subscribers::new();
        subs.insert(Box::new(|_| {}), &VoteCounts::new())
    };
    assert!(!sub.is_attached());
    assert!(!Subscription::detached().is_attached());
}

#[test]
fn unsubscribe_during_delivery_is_honoured() {
    let subs = Rc::new(Subscribers::new());
    let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
    let calls = Rc::new(RefCell::new(0u32));

    let slot_in = Rc::clone(&slot);
    let calls_in = Rc::clone(&calls);
    let sub = subs.insert(
        Box::new(move |_| {
            *calls_in.borrow_mut() += 1;
            slot_in.borrow_mut().take();
        }),
        &VoteCounts::new(),
    );
    *slot.borrow_mut() = Some(sub);

    subs.notify(counts(&[("a", 1)]));
    subs.notify(counts(&[("a", 2)]));
    // one priming call + one delivery, then the callback removed itself
    assert_eq!(*calls.borrow(), 2);
    assert_eq!(subs.len(), 0);
}

#[test]
fn change_raised_during_delivery_is_coalesced() {
    let subs = Rc::new(Subscribers::new());
    let (seen, cb) = recorder();
    let _observer = subs.insert(cb, &VoteCounts::new());

    let fired = Rc::new(RefCell::new(false));
    let subs_in = Rc::clone(&subs);
    let fired_in = Rc::clone(&fired);
    let _trigger = subs.insert(
        Box::new(move |c: &VoteCounts| {
            if c.get("a") == Some(&1) && !*fired_in.borrow() {
                *fired_in.borrow_mut() = true;
                subs_in.notify(counts(&[("a", 5)]));
            }
        }),
        &VoteCounts::new(),
    );

    subs.notify(counts(&[("a", 1)]));
    let seen = seen.borrow();
    assert_eq!(seen.last(), Some(&counts(&[("a", 5)])));
    assert_eq!(seen.len(), 3);
}
