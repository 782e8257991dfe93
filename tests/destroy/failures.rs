use zfs_resource::adapters::{EngineError, EngineOp, MemoryEngine};
use zfs_resource::types::DestroyRequest;

use crate::common::harness;

#[test]
fn failed_step_does_not_stop_later_steps() {
    let h = harness(MemoryEngine::new().with_dataset("tank/a").with_dataset("tank/b"));
    h.engine
        .fail(EngineOp::Destroy, "tank/b", EngineError::other("pool I/O is currently suspended"));
    let res = h
        .api
        .destroy(&DestroyRequest::new(["tank/a", "tank/b"]))
        .expect("planning succeeds");
    assert_eq!(res.get("tank/b"), Some(Some("pool I/O is currently suspended")));
    assert_eq!(res.get("tank/a"), Some(None));
    assert!(!res.is_success());
    assert!(h.engine.exists("tank/b"));
    assert!(!h.engine.exists("tank/a"));
}

#[test]
fn busy_unmount_suggests_children() {
    let h = harness(MemoryEngine::new().with_dataset("tank/a/b"));
    let res = h
        .api
        .destroy(&DestroyRequest::new(["tank/a"]))
        .expect("planning succeeds");
    assert_eq!(
        res.get("tank/a"),
        Some(Some("Failed to unmount, does 'tank/a' have children?"))
    );
    assert!(h.engine.exists("tank/a"));
}

#[test]
fn missing_dataset_reports_does_not_exist() {
    let h = harness(MemoryEngine::new().with_dataset("tank/present"));
    let res = h
        .api
        .destroy(&DestroyRequest::new(["tank/gone", "tank/present"]))
        .expect("planning succeeds");
    assert_eq!(res.get("tank/gone"), Some(Some("'tank/gone' does not exist")));
    assert_eq!(res.get("tank/present"), Some(None));
}

#[test]
fn bulk_failure_applies_to_every_key_of_the_step() {
    let h = harness(MemoryEngine::new().with_snapshot("tank/ds@snap"));
    h.engine
        .fail(EngineOp::Bulk, "tank/ds", EngineError::other("channel program timed out"));
    let res = h
        .api
        .destroy(&DestroyRequest::new(["tank/ds", "tank/ds@snap"]).recursive(true))
        .expect("planning succeeds");
    assert_eq!(res.len(), 2);
    for key in ["tank/ds", "tank/ds@snap"] {
        assert_eq!(res.get(key), Some(Some("channel program timed out")), "{key}");
    }
    assert_eq!(h.engine.snapshots_of("tank/ds"), vec!["snap"]);
}

#[test]
fn batch_failure_marks_every_snapshot() {
    let h = harness(
        MemoryEngine::new()
            .with_snapshot("tank/a@s1")
            .with_snapshot("tank/b@s1"),
    );
    h.engine.fail(
        EngineOp::DestroySnapshots,
        "tank/b@s1",
        EngineError::busy("dataset is busy"),
    );
    let res = h
        .api
        .destroy(&DestroyRequest::new(["tank/a@s1", "tank/b@s1"]))
        .expect("planning succeeds");
    assert_eq!(res.failures().count(), 2);
    assert_eq!(res.get("tank/a@s1"), Some(Some("dataset is busy")));
}
