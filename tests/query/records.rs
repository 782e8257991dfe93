use serde_json::json;

use zfs_resource::adapters::{EngineCall, EngineError, EngineOp, MemoryEngine};
use zfs_resource::types::{PropertySelection, QueryRequest};
use zfs_resource::ApiError;

use crate::common::harness;

fn engine() -> MemoryEngine {
    MemoryEngine::new()
        .with_dataset("tank/a/b")
        .with_dataset("tank/c")
        .with_property("tank/a", "compression", json!("lz4"))
        .with_property("tank/a", "secret", json!("x"))
        .with_snapshot("tank/a@daily")
        .with_snapshot("tank/a@weekly")
}

#[test]
fn overlapping_paths_with_children_never_reach_engine() {
    let h = harness(engine());
    let e = h
        .api
        .query(QueryRequest::new(["tank/a", "tank/a/b"]).get_children(true))
        .expect_err("overlap");
    assert!(e.is_validation());
    assert_eq!(h.engine.call_count(), 0);
}

#[test]
fn snapshot_paths_are_rejected() {
    let h = harness(engine());
    let e = h
        .api
        .query(QueryRequest::new(["tank/a@daily"]))
        .expect_err("snapshot path");
    assert!(matches!(e, ApiError::Validation(_)));
    assert_eq!(h.engine.call_count(), 0);
}

#[test]
fn default_selection_uses_policy_properties() {
    let h = harness(engine());
    let recs = h
        .api
        .query(QueryRequest::new(["tank/a"]))
        .expect("query")
        .into_flat()
        .expect("flat");
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].properties.get("compression"), Some(&json!("lz4")));
    assert!(!recs[0].properties.contains_key("secret"));
    assert_eq!(recs[0].properties.get("mounted"), Some(&json!(true)));
    assert!(recs[0].snapshots.is_none());

    match h.engine.calls().as_slice() {
        [EngineCall::Query(q)] => {
            let props = q.properties.as_ref().expect("default properties");
            assert_eq!(props, &h.api.policy().query.properties);
        }
        other => panic!("unexpected calls: {other:?}"),
    }
}

#[test]
fn named_and_empty_selections() {
    let h = harness(engine());
    let recs = h
        .api
        .query(
            QueryRequest::new(["tank/a"])
                .properties(PropertySelection::Named(vec!["secret".into()])),
        )
        .expect("query")
        .into_flat()
        .expect("flat");
    assert_eq!(recs[0].properties.len(), 1);
    assert_eq!(recs[0].properties.get("secret"), Some(&json!("x")));

    let recs = h
        .api
        .query(QueryRequest::new(["tank/a"]).properties(PropertySelection::Nothing))
        .expect("query")
        .into_flat()
        .expect("flat");
    assert!(recs[0].properties.is_empty());
}

#[test]
fn children_and_snapshots_are_included_on_request() {
    let h = harness(engine());
    let recs = h
        .api
        .query(
            QueryRequest::new(["tank/a"])
                .get_children(true)
                .get_snapshots(true),
        )
        .expect("query")
        .into_flat()
        .expect("flat");
    let names: Vec<&str> = recs.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["tank/a", "tank/a/b"]);
    assert_eq!(
        recs[0].snapshots.as_deref(),
        Some(&["tank/a@daily".to_string(), "tank/a@weekly".to_string()][..])
    );
}

#[test]
fn missing_paths_are_omitted_unless_required() {
    let h = harness(engine());
    let res = h
        .api
        .query(QueryRequest::new(["tank/c", "tank/nope"]))
        .expect("query");
    assert_eq!(res.len(), 1);

    let e = h
        .api
        .query(QueryRequest::new(["tank/c", "tank/nope"]).require_existing(true))
        .expect_err("required");
    assert_eq!(e, ApiError::NotFound("'tank/nope' does not exist".into()));
}

#[test]
fn engine_failures_propagate() {
    let h = harness(engine());
    h.engine
        .fail(EngineOp::Query, "tank/c", EngineError::not_found("no such pool"));
    let e = h
        .api
        .query(QueryRequest::new(["tank/c"]))
        .expect_err("engine failure");
    assert_eq!(e, ApiError::NotFound("no such pool".into()));

    h.engine
        .fail(EngineOp::Query, "tank/a", EngineError::other("ioctl failed"));
    let e = h
        .api
        .query(QueryRequest::new(["tank/a"]))
        .expect_err("engine failure");
    assert_eq!(e, ApiError::Engine("ioctl failed".into()));
}

#[test]
fn snapshot_exists_checks_the_full_name() {
    let h = harness(engine());
    assert!(h.api.snapshot_exists("tank/a@daily").expect("query"));
    assert!(!h.api.snapshot_exists("tank/a@monthly").expect("query"));
    assert!(!h.api.snapshot_exists("tank/a/b@daily").expect("query"));
    assert!(!h.api.snapshot_exists("tank/missing@daily").expect("query"));
    assert!(h.api.snapshot_exists("tank/a").expect_err("no @").is_validation());
    assert!(h.api.snapshot_exists("tank/a@x@y").is_err());
}
