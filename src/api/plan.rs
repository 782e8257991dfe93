//! api/plan.rs — destroy planning.
//!
//! Turns a `DestroyRequest` into an immutable, ordered `DestroyPlan`. All
//! validation happens here, before the executor touches the engine.

use std::collections::{BTreeMap, HashSet};

use serde_json::json;

use crate::adapters::InternalPathPredicate;
use crate::logging::{AuditSink, FactsEmitter, StageLogger, TS_ZERO};
use crate::namespace::group_by_ancestry;
use crate::types::ids::{plan_id, step_id};
use crate::types::path::{pool_of, ClassifyOptions, ResourcePath, SnapshotName};
use crate::types::plan::{BulkOperation, DestroyPlan, DestroyRequest, DestroyStep};

use super::errors::ApiError;
use crate::logging::audit::{AuditCtx, AuditMode};

/// Build a destroy plan without touching any engine.
///
/// Step order:
/// 1. datasets/volumes in reverse lexicographic order, so `tank/a/b/c` runs
///    before `tank/a/b` before `tank/a`: one `Individual` step each, or one
///    atomic `BulkRecursive` subtree destroy each when `recursive`;
/// 2. one `SnapshotBatch` for every literal snapshot when not `recursive`;
/// 3. one `BulkRecursive` snapshot destroy per wildcard or recursive snapshot
///    request, in request order.
///
/// Snapshots whose source dataset is itself being destroyed are not planned on
/// their own; their keys ride along on the dataset's step.
///
/// # Errors
/// `Validation` for an empty or malformed request, `Protected` for internal
/// paths without `allow_internal`, `Conflict` for overlapping recursive targets.
pub fn plan_destroy(
    req: &DestroyRequest,
    internal: &dyn InternalPathPredicate,
) -> Result<DestroyPlan, ApiError> {
    if req.paths.is_empty() {
        return Err(ApiError::Validation("One path must be given".to_string()));
    }

    let opts = ClassifyOptions {
        recursive: req.recursive,
        allow_internal: req.allow_internal,
    };
    let mut seen: HashSet<&str> = HashSet::new();
    let mut fs_or_vols: Vec<String> = Vec::new();
    let mut snapshots: Vec<(String, String, SnapshotName)> = Vec::new();
    for raw in &req.paths {
        if !seen.insert(raw.as_str()) {
            continue;
        }
        match ResourcePath::classify(raw, opts, internal)? {
            ResourcePath::Dataset { name } => fs_or_vols.push(name),
            ResourcePath::Snapshot { source, snapshot } => {
                snapshots.push((raw.clone(), source, snapshot));
            }
        }
    }

    if req.recursive {
        // one offending ancestor per error reads better than all of them at once
        if let Some(g) = group_by_ancestry(&fs_or_vols).into_iter().next() {
            return Err(ApiError::Conflict(format!(
                "Overlapping paths are not allowed when recursive is true ({} overlaps with {})",
                g.ancestor,
                g.descendants.join(", ")
            )));
        }
    }

    let datasets: HashSet<String> = fs_or_vols.iter().cloned().collect();
    let mut folded: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut batch: Vec<String> = Vec::new();
    let mut bulk_snapshots: Vec<DestroyStep> = Vec::new();
    for (raw, source, snapshot) in snapshots {
        if datasets.contains(&source) {
            folded.entry(source).or_default().push(raw);
            continue;
        }
        match (&snapshot, req.recursive) {
            (SnapshotName::Literal(_), false) => batch.push(raw),
            _ => bulk_snapshots.push(DestroyStep::BulkRecursive {
                pool: pool_of(&source).to_string(),
                pattern: snapshot.literal().map(str::to_string),
                target: source,
                operation: BulkOperation::DestroySnapshots,
                recursive: req.recursive,
                defer: req.defer,
                keys: vec![raw],
            }),
        }
    }

    fs_or_vols.sort_unstable_by(|a, b| b.cmp(a));
    let mut steps: Vec<DestroyStep> = Vec::with_capacity(fs_or_vols.len() + bulk_snapshots.len() + 1);
    for name in fs_or_vols {
        let mut keys = vec![name.clone()];
        if let Some(extra) = folded.remove(&name) {
            keys.extend(extra);
        }
        steps.push(if req.recursive {
            DestroyStep::BulkRecursive {
                pool: pool_of(&name).to_string(),
                target: name,
                operation: BulkOperation::DestroySubtree,
                pattern: None,
                recursive: true,
                defer: req.defer,
                keys,
            }
        } else {
            DestroyStep::Individual { target: name, keys }
        });
    }
    if !batch.is_empty() {
        steps.push(DestroyStep::SnapshotBatch { snapshots: batch });
    }
    steps.extend(bulk_snapshots);

    Ok(DestroyPlan {
        steps,
        recursive: req.recursive,
        force: req.force,
        defer: req.defer,
    })
}

/// Plan through the facade and emit one `destroy.plan` fact per step.
pub(super) fn build<E: FactsEmitter, A: AuditSink>(
    api: &super::ZfsResource<E, A>,
    req: &DestroyRequest,
) -> Result<DestroyPlan, ApiError> {
    let plan = match plan_destroy(req, api.internal.as_ref()) {
        Ok(p) => p,
        Err(e) => {
            api.audit.log(log::Level::Warn, &format!("destroy: rejected: {e}"));
            return Err(e);
        }
    };

    let pid_uuid = plan_id(&plan);
    let ctx = AuditCtx::new(
        &api.facts as &dyn FactsEmitter,
        pid_uuid.to_string(),
        TS_ZERO.to_string(),
        AuditMode { redact: true },
    );
    let slog = StageLogger::new(&ctx);
    for (idx, step) in plan.steps.iter().enumerate() {
        slog.destroy_plan()
            .step(step_id(&pid_uuid, step, idx).to_string())
            .path(step.label())
            .field("kind", json!(step.kind()))
            .field("keys", json!(step.keys()))
            .emit_success();
    }

    Ok(plan)
}
