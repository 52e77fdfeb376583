use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TricolorError::store_unavailable("x")
            .to_string()
            .contains("store unavailable:")
    );
    assert!(
        TricolorError::asset_load("x")
            .to_string()
            .contains("asset load failure:")
    );
    assert!(
        TricolorError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        TricolorError::share_unsupported("x")
            .to_string()
            .contains("share unsupported:")
    );
    assert!(
        TricolorError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn file_too_large_reports_both_sizes() {
    let msg = TricolorError::FileTooLarge {
        size: 10,
        limit: 5,
    }
    .to_string();
    assert!(msg.contains("10 bytes"));
    assert!(msg.contains("5 byte limit"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TricolorError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_recoverable());
}

#[test]
fn degraded_outcomes_are_recoverable() {
    assert!(TricolorError::store_unavailable("offline").is_recoverable());
    assert!(TricolorError::store_unavailable("offline").is_store_unavailable());
    assert!(TricolorError::validation("empty").is_recoverable());
    assert!(!TricolorError::validation("empty").is_store_unavailable());
}

#[test]
fn json_errors_become_serde() {
    let err: TricolorError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, TricolorError::Serde(_)));
}
