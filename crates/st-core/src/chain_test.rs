use super::*;
use std::path::PathBuf;

fn file(index: &str, name: &str) -> MigrationFile {
    MigrationFile {
        index: index.to_string(),
        name: name.to_string(),
        path: PathBuf::from(format!("/migrations/{index}_{name}.sql")),
    }
}

fn record(id: i64, index: &str) -> AppliedRecord {
    AppliedRecord {
        id,
        index: index.to_string(),
        applied_at: "2024-01-01 00:00:00".to_string(),
    }
}

#[test]
fn test_all_pending_when_ledger_empty() {
    let files = vec![file("240101000000", "a"), file("240102000000", "b")];

    let chain = build_chain(files, vec![]).unwrap();
    assert_eq!(chain.len(), 2);
    assert!(chain.iter().all(|m| m.status == MigrationStatus::Pending));
    assert!(chain.iter().all(|m| m.applied_at.is_none()));
}

#[test]
fn test_all_applied() {
    let files = vec![file("240101000000", "a"), file("240102000000", "b")];
    let records = vec![record(1, "240101000000"), record(2, "240102000000")];

    let chain = build_chain(files, records).unwrap();
    assert_eq!(chain.len(), 2);
    assert!(chain.iter().all(|m| m.status == MigrationStatus::Applied));
    assert!(chain.iter().all(|m| m.applied_at.is_some()));
}

#[test]
fn test_mixed_applied_then_pending() {
    let files = vec![file("240101000000", "a"), file("240102000000", "b")];
    let records = vec![record(1, "240101000000")];

    let chain = build_chain(files, records).unwrap();
    assert_eq!(chain[0].status, MigrationStatus::Applied);
    assert_eq!(chain[0].index, "240101000000");
    assert_eq!(chain[1].status, MigrationStatus::Pending);
    assert_eq!(chain[1].index, "240102000000");
}

#[test]
fn test_broken_chain_on_unresolvable_record() {
    let files = vec![file("240101000000", "a"), file("240102000000", "b")];
    let records = vec![record(1, "999999999999")];

    let err = build_chain(files, records).unwrap_err();
    match err {
        CoreError::BrokenChain { index } => assert_eq!(index, "999999999999"),
        other => panic!("expected BrokenChain, got {other:?}"),
    }
}

#[test]
fn test_broken_chain_even_when_other_records_reconcile() {
    let files = vec![file("240101000000", "a"), file("240102000000", "b")];
    let records = vec![record(1, "240101000000"), record(2, "999999999999")];

    assert!(matches!(
        build_chain(files, records),
        Err(CoreError::BrokenChain { .. })
    ));
}

#[test]
fn test_broken_chain_with_no_files_at_all() {
    let records = vec![record(1, "240101000000")];

    assert!(matches!(
        build_chain(vec![], records),
        Err(CoreError::BrokenChain { .. })
    ));
}

#[test]
fn test_empty_inputs_yield_empty_chain() {
    let chain = build_chain(vec![], vec![]).unwrap();
    assert!(chain.is_empty());
}

#[test]
fn test_chain_preserves_file_order() {
    let files = vec![
        file("240101000000", "a"),
        file("240102000000", "b"),
        file("240103000000", "c"),
    ];
    let records = vec![record(1, "240102000000")];

    let chain = build_chain(files, records).unwrap();
    let indices: Vec<&str> = chain.iter().map(|m| m.index.as_str()).collect();
    assert_eq!(
        indices,
        vec!["240101000000", "240102000000", "240103000000"]
    );
}
