use crate::adapters::{BulkArgs, EngineError, EngineErrorCode, StorageEngine};
use crate::api::errors::{id_for_engine, ErrorId};
use crate::types::plan::{BulkOperation, DestroyPlan, DestroyStep};

/// Why a step failed. `msg` is what the caller sees for every key of the step.
#[derive(Debug, Clone)]
pub(crate) struct StepFailure {
    pub msg: String,
    pub id: ErrorId,
}

impl From<EngineError> for StepFailure {
    fn from(e: EngineError) -> Self {
        Self {
            id: id_for_engine(e.code),
            msg: e.msg,
        }
    }
}

/// Execute one plan step against the engine.
pub(crate) fn handle_step(
    engine: &dyn StorageEngine,
    plan: &DestroyPlan,
    step: &DestroyStep,
) -> Result<(), StepFailure> {
    match step {
        DestroyStep::Individual { target, .. } => {
            open_and_unmount(engine, target, plan.force, false)?;
            engine.destroy_resource(target)?;
            Ok(())
        }
        DestroyStep::BulkRecursive {
            pool,
            target,
            operation,
            pattern,
            recursive,
            defer,
            ..
        } => {
            // the bulk subtree program destroys but does not unmount
            if *operation == BulkOperation::DestroySubtree {
                open_and_unmount(engine, target, plan.force, *recursive)?;
            }
            let args = BulkArgs {
                recursive: *recursive,
                target: target.clone(),
                defer: *defer,
                pattern: pattern.clone(),
            };
            engine.run_bulk_program(pool, *operation, &args)?;
            Ok(())
        }
        DestroyStep::SnapshotBatch { snapshots } => {
            engine.destroy_snapshots(snapshots)?;
            Ok(())
        }
    }
}

fn open_and_unmount(
    engine: &dyn StorageEngine,
    target: &str,
    force: bool,
    recursive: bool,
) -> Result<(), StepFailure> {
    let rsrc = engine.open_resource(target).map_err(|e| match e.code {
        EngineErrorCode::NotFound => StepFailure {
            msg: format!("'{target}' does not exist"),
            id: ErrorId::E_NOT_FOUND,
        },
        _ => e.into(),
    })?;
    rsrc.unmount(force, recursive).map_err(|e| match e.code {
        EngineErrorCode::Busy if !recursive => StepFailure {
            msg: format!("Failed to unmount, does '{target}' have children?"),
            id: ErrorId::E_BUSY,
        },
        _ => e.into(),
    })
}
