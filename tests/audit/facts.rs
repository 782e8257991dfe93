use log::Level;
use serde_json::Value;

use zfs_resource::adapters::{EngineError, EngineOp, MemoryEngine};
use zfs_resource::constants::SUBSYSTEM;
use zfs_resource::policy::Policy;
use zfs_resource::types::{DestroyRequest, QueryRequest};

use crate::common::{harness, harness_with};

fn field<'a>(fields: &'a Value, key: &str) -> &'a Value {
    fields.get(key).unwrap_or(&Value::Null)
}

#[test]
fn destroy_emits_plan_attempt_result_and_summary() {
    let h = harness(MemoryEngine::new().with_dataset("tank/a").with_dataset("tank/b"));
    h.api
        .destroy(&DestroyRequest::new(["tank/a", "tank/b"]))
        .expect("destroy");

    assert_eq!(h.facts.stage("destroy.plan").len(), 2);
    assert_eq!(h.facts.stage("destroy.attempt").len(), 2);
    let results = h.facts.stage("destroy.result");
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|(d, _)| d == "success"));

    let summary = h.facts.stage("destroy.summary");
    assert_eq!(summary.len(), 1);
    let (decision, fields) = &summary[0];
    assert_eq!(decision, "success");
    assert_eq!(field(fields, "steps"), &Value::from(2));
    assert_eq!(field(fields, "failed_keys"), &Value::from(0));

    let events = h.facts.events.lock().unwrap();
    assert!(events.iter().all(|(s, _, _, _)| s == SUBSYSTEM));
    for (_, _, _, f) in events.iter() {
        for key in ["schema_version", "ts", "plan_id", "path"] {
            assert!(f.get(key).is_some(), "missing {key} in {f}");
        }
    }
}

#[test]
fn plan_and_execute_share_a_plan_id() {
    let h = harness(MemoryEngine::new().with_dataset("tank/a"));
    let plan = h
        .api
        .plan_destroy(&DestroyRequest::new(["tank/a"]))
        .expect("plan");
    h.api.execute(&plan);
    let planned = h.facts.stage("destroy.plan");
    let attempted = h.facts.stage("destroy.attempt");
    assert_eq!(
        field(&planned[0].1, "plan_id"),
        field(&attempted[0].1, "plan_id")
    );
    assert_eq!(field(&planned[0].1, "step_id"), field(&attempted[0].1, "step_id"));
}

#[test]
fn failed_step_carries_error_id_and_warns() {
    let h = harness(MemoryEngine::new().with_dataset("tank/a"));
    h.engine
        .fail(EngineOp::Destroy, "tank/a", EngineError::other("boom"));
    h.api
        .destroy(&DestroyRequest::new(["tank/a"]))
        .expect("destroy");

    let results = h.facts.stage("destroy.result");
    let (decision, fields) = &results[0];
    assert_eq!(decision, "failure");
    assert_eq!(field(fields, "error"), &Value::from("boom"));
    assert_eq!(field(fields, "error_id"), &Value::from("E_ENGINE"));
    assert_eq!(field(fields, "exit_code"), &Value::from(40));
    assert_eq!(h.facts.stage("destroy.summary")[0].0, "failure");

    let lines = h.audit.lines.lock().unwrap();
    assert!(lines
        .iter()
        .any(|(lvl, msg)| *lvl == Level::Warn && msg.contains("tank/a failed: boom")));
}

#[test]
fn rejected_request_emits_no_facts() {
    let h = harness(MemoryEngine::new());
    let _ = h.api.destroy(&DestroyRequest::new(["tank"]));
    assert!(h.facts.events.lock().unwrap().is_empty());
    let lines = h.audit.lines.lock().unwrap();
    assert!(lines.iter().any(|(lvl, _)| *lvl == Level::Warn));
}

#[test]
fn deterministic_policy_zeroes_timestamps() {
    let h = harness_with(
        MemoryEngine::new().with_dataset("tank/a"),
        Policy::deterministic(),
    );
    h.api
        .destroy(&DestroyRequest::new(["tank/a"]))
        .expect("destroy");
    let events = h.facts.events.lock().unwrap();
    for (_, event, _, f) in events.iter() {
        assert_eq!(field(f, "ts"), &Value::from("1970-01-01T00:00:00Z"), "{event}");
        assert!(f.get("duration_ms").is_none(), "{event}");
    }
}

#[test]
fn query_emits_one_fact() {
    let h = harness(MemoryEngine::new().with_dataset("tank/a"));
    h.api.query(QueryRequest::new(["tank/a"])).expect("query");
    let q = h.facts.stage("query");
    assert_eq!(q.len(), 1);
    assert_eq!(q[0].0, "success");
    assert_eq!(field(&q[0].1, "records"), &Value::from(1));
}
