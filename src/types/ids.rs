//! Deterministic UUIDv5 identifiers for destroy plans and their steps.
//!
//! The UUID namespace is derived from a stable tag (`NS_TAG`) so that
//! `plan_id` and `step_id` are reproducible across runs for the same
//! serialized step sequence.
use std::fmt::Write;
use uuid::Uuid;

use super::plan::{DestroyPlan, DestroyStep};
use crate::constants::NS_TAG;

fn namespace() -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, NS_TAG.as_bytes())
}

/// Serialize a step into a stable, human-readable string used for UUIDv5 input.
fn serialize_step(s: &DestroyStep) -> String {
    match s {
        DestroyStep::Individual { target, keys } => format!("I:{target}[{}]", keys.join(",")),
        DestroyStep::BulkRecursive {
            target,
            operation,
            pattern,
            recursive,
            defer,
            keys,
            ..
        } => format!(
            "B:{}:{target}:{}:{recursive}:{defer}[{}]",
            operation.as_str(),
            pattern.as_deref().unwrap_or(""),
            keys.join(",")
        ),
        DestroyStep::SnapshotBatch { snapshots } => format!("S:[{}]", snapshots.join(",")),
    }
}

/// Compute a deterministic UUIDv5 for a plan by serializing steps in order.
#[must_use]
pub fn plan_id(plan: &DestroyPlan) -> Uuid {
    let mut s = String::new();
    let _ = writeln!(s, "f={};r={};d={}", plan.force, plan.recursive, plan.defer);
    for step in &plan.steps {
        s.push_str(&serialize_step(step));
        s.push('\n');
    }
    Uuid::new_v5(&namespace(), s.as_bytes())
}

/// Compute a deterministic UUIDv5 for a step as a function of the plan ID,
/// the step's serialized form and its position.
#[must_use]
pub fn step_id(plan_id: &Uuid, step: &DestroyStep, idx: usize) -> Uuid {
    let mut s = serialize_step(step);
    let _ = write!(s, "#{idx}");
    Uuid::new_v5(plan_id, s.as_bytes())
}
