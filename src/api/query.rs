//! api/query.rs — query assembly.

use log::Level;
use serde_json::json;
use uuid::Uuid;

use crate::adapters::EngineQuery;
use crate::constants::SNAPSHOT_SEP;
use crate::logging::audit::{AuditCtx, AuditMode};
use crate::logging::{now_iso, AuditSink, FactsEmitter, StageLogger, TS_ZERO};
use crate::namespace::{group_by_ancestry, nest};
use crate::types::query::{PropertySelection, QueryRequest, QueryResult, ResourceNode};

use super::errors::{exit_code_for, id_str, ApiError};

/// Reject requests the engine should never see.
///
/// # Errors
/// `Validation` when a path names a snapshot, or when `get_children` is set and
/// two paths overlap.
pub fn validate_query(req: &QueryRequest) -> Result<(), ApiError> {
    if let Some(p) = req.paths.iter().find(|p| p.contains(SNAPSHOT_SEP)) {
        return Err(ApiError::Validation(format!(
            "'{p}' is a snapshot; set get_snapshots to query snapshot information"
        )));
    }
    if req.get_children && !group_by_ancestry(&req.paths).is_empty() {
        return Err(ApiError::Validation(
            "Paths must be non-overlapping - no path can be relative to another when get_children is set"
                .to_string(),
        ));
    }
    Ok(())
}

pub(super) fn run<E: FactsEmitter, A: AuditSink>(
    api: &super::ZfsResource<E, A>,
    req: QueryRequest,
) -> Result<QueryResult, ApiError> {
    validate_query(&req)?;

    let qid = Uuid::new_v5(
        &Uuid::NAMESPACE_URL,
        format!("query:{}", req.paths.join(",")).as_bytes(),
    );
    let redact = api.policy.audit.redact;
    let ctx = AuditCtx::new(
        &api.facts as &dyn FactsEmitter,
        qid.to_string(),
        if redact { TS_ZERO.to_string() } else { now_iso() },
        AuditMode { redact },
    );
    let slog = StageLogger::new(&ctx);

    let properties = match req.properties {
        PropertySelection::Default => Some(api.policy.query.properties.clone()),
        PropertySelection::Nothing => None,
        PropertySelection::Named(names) => Some(names),
    };
    let q = EngineQuery {
        paths: req.paths,
        properties,
        get_children: req.get_children,
        get_snapshots: req.get_snapshots,
    };

    let outcome = api.engine.query(&q).map_err(ApiError::from).and_then(|records| {
        if req.require_existing {
            if let Some(missing) = q.paths.iter().find(|p| !records.iter().any(|r| &r.name == *p)) {
                return Err(ApiError::NotFound(format!("'{missing}' does not exist")));
            }
        }
        Ok(records)
    });
    let records = match outcome {
        Ok(r) => r,
        Err(e) => {
            api.audit.log(Level::Warn, &format!("query: {e}"));
            slog.query()
                .path(q.paths.join(","))
                .field("error", json!(e.message()))
                .field("error_id", json!(id_str(e.error_id())))
                .field("exit_code", json!(exit_code_for(e.error_id())))
                .emit_failure();
            return Err(e);
        }
    };

    slog.query()
        .path(q.paths.join(","))
        .field("records", json!(records.len()))
        .field("nested", json!(req.nest_results))
        .emit_success();

    if req.nest_results {
        let nodes: Vec<ResourceNode> = records.into_iter().map(ResourceNode::from).collect();
        Ok(QueryResult::Nested(nest(nodes)))
    } else {
        Ok(QueryResult::Flat(records))
    }
}
