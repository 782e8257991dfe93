//! Destroy stage: walks a `DestroyPlan` in order against the storage engine.
//!
//! Side-effects:
//! - Emits `destroy.attempt` and `destroy.result` facts per step, plus a
//!   `destroy.summary` once every step has run.
//! - Never stops early: a failed step is recorded against each of its keys and
//!   the next step runs regardless. Steps are strictly sequential because
//!   individual steps depend on deeper datasets being gone first.

use std::time::Instant;

use log::Level;
use serde_json::json;

use crate::api::errors::{exit_code_for, id_str};
use crate::api::ZfsResource;
use crate::logging::audit::{AuditCtx, AuditMode};
use crate::logging::{now_iso, AuditSink, FactsEmitter, StageLogger, TS_ZERO};
use crate::types::ids::{plan_id, step_id};
use crate::types::plan::{DestroyPlan, DestroyStep};
use crate::types::report::DestroyResult;

mod handlers;

use handlers::{handle_step, StepFailure};

/// Outcome of one step fanned out to every key it covers.
fn fan_out(step: &DestroyStep, outcome: &Result<(), StepFailure>) -> Vec<(String, Option<String>)> {
    let value = outcome.as_ref().err().map(|f| f.msg.clone());
    step.keys()
        .iter()
        .map(|k| (k.clone(), value.clone()))
        .collect()
}

pub(crate) fn run<E: FactsEmitter, A: AuditSink>(
    api: &ZfsResource<E, A>,
    plan: &DestroyPlan,
) -> DestroyResult {
    let t0 = Instant::now();
    let pid = plan_id(plan);
    let redact = api.policy.audit.redact;
    let ctx = AuditCtx::new(
        &api.facts as &dyn FactsEmitter,
        pid.to_string(),
        if redact { TS_ZERO.to_string() } else { now_iso() },
        AuditMode { redact },
    );
    let slog = StageLogger::new(&ctx);
    api.audit.log(
        Level::Info,
        &format!("destroy: starting {} step(s)", plan.steps.len()),
    );

    let mut result = DestroyResult::new();
    let mut failed_steps = 0usize;
    for (idx, step) in plan.steps.iter().enumerate() {
        let sid = step_id(&pid, step, idx).to_string();
        slog.destroy_attempt()
            .step(sid.clone())
            .path(step.label())
            .field("kind", json!(step.kind()))
            .emit_success();

        let ts = Instant::now();
        let outcome = handle_step(api.engine.as_ref(), plan, step);
        let duration_ms = u64::try_from(ts.elapsed().as_millis()).unwrap_or(u64::MAX);

        let ev = slog
            .destroy_result()
            .step(sid)
            .path(step.label())
            .field("kind", json!(step.kind()))
            .field("keys", json!(step.keys()))
            .field("duration_ms", json!(duration_ms));
        match &outcome {
            Ok(()) => ev.emit_success(),
            Err(f) => {
                failed_steps += 1;
                api.audit
                    .log(Level::Warn, &format!("destroy: {} failed: {}", step.label(), f.msg));
                ev.field("error", json!(f.msg))
                    .field("error_id", json!(id_str(f.id)))
                    .field("exit_code", json!(exit_code_for(f.id)))
                    .emit_failure();
            }
        }
        result.merge(fan_out(step, &outcome));
    }

    let failed_keys = result.failures().count();
    let summary = slog.destroy_summary().merge(&json!({
        "steps": plan.steps.len(),
        "failed_steps": failed_steps,
        "keys": result.len(),
        "failed_keys": failed_keys,
        "duration_ms": u64::try_from(t0.elapsed().as_millis()).unwrap_or(u64::MAX),
    }));
    if failed_keys == 0 {
        summary.emit_success();
    } else {
        summary.emit_failure();
    }
    api.audit.log(Level::Info, "destroy: finished");
    result
}
