use std::collections::BTreeSet;

use super::*;

#[test]
fn roster_ids_are_unique_and_non_empty() {
    let ids: BTreeSet<_> = fighters().iter().map(|f| f.id).collect();
    assert_eq!(ids.len(), fighters().len());
    assert!(fighters().iter().all(|f| !f.id.is_empty() && !f.name.is_empty()));
}

#[test]
fn lookup_by_id() {
    let gandhi = fighter_by_id("gandhi").unwrap();
    assert_eq!(gandhi.name, "Mahatma Gandhi");
    assert_eq!(gandhi.description, "Father of the Nation");
    assert!(fighter_by_id("nobody").is_none());
}

#[test]
fn escaped_quotes_survive() {
    let besant = fighter_by_id("annie-besant").unwrap();
    assert!(besant.contribution.contains("women's rights"));
}
