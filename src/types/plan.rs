use serde::Serialize;

/// Caller-supplied destroy parameters.
#[derive(Clone, Debug, Default)]
pub struct DestroyRequest {
    pub paths: Vec<String>,
    pub recursive: bool,
    pub force: bool,
    pub defer: bool,
    pub allow_internal: bool,
}

impl DestroyRequest {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn recursive(mut self, yes: bool) -> Self {
        self.recursive = yes;
        self
    }

    #[must_use]
    pub fn force(mut self, yes: bool) -> Self {
        self.force = yes;
        self
    }

    #[must_use]
    pub fn defer(mut self, yes: bool) -> Self {
        self.defer = yes;
        self
    }

    #[must_use]
    pub fn allow_internal(mut self, yes: bool) -> Self {
        self.allow_internal = yes;
        self
    }
}

/// Whole-subtree operation run atomically by the engine's bulk facility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkOperation {
    DestroySubtree,
    DestroySnapshots,
}

impl BulkOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            BulkOperation::DestroySubtree => "destroy_subtree",
            BulkOperation::DestroySnapshots => "destroy_snapshots",
        }
    }
}

/// One unit of destroy execution.
///
/// `keys` are the caller-supplied paths whose outcome is decided by the step:
/// the step's own path followed by any snapshot paths folded into it because
/// their source is destroyed by the same step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum DestroyStep {
    /// Unmount then destroy exactly one dataset/volume.
    Individual { target: String, keys: Vec<String> },
    /// One atomic engine call covering `target` and its descendants.
    BulkRecursive {
        pool: String,
        target: String,
        operation: BulkOperation,
        pattern: Option<String>,
        recursive: bool,
        defer: bool,
        keys: Vec<String>,
    },
    /// Literal, non-recursive snapshot deletions issued as one batched call.
    SnapshotBatch { snapshots: Vec<String> },
}

impl DestroyStep {
    pub fn keys(&self) -> &[String] {
        match self {
            DestroyStep::Individual { keys, .. } | DestroyStep::BulkRecursive { keys, .. } => keys,
            DestroyStep::SnapshotBatch { snapshots } => snapshots,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DestroyStep::Individual { .. } => "individual",
            DestroyStep::BulkRecursive { .. } => "bulk_recursive",
            DestroyStep::SnapshotBatch { .. } => "snapshot_batch",
        }
    }

    /// Path the step is logged against.
    pub fn label(&self) -> String {
        match self {
            DestroyStep::Individual { target, .. } => target.clone(),
            DestroyStep::BulkRecursive {
                target,
                operation: BulkOperation::DestroySnapshots,
                pattern,
                ..
            } => format!("{target}@{}", pattern.as_deref().unwrap_or("*")),
            DestroyStep::BulkRecursive { target, .. } => target.clone(),
            DestroyStep::SnapshotBatch { snapshots } => snapshots.join(","),
        }
    }
}

/// Immutable, ordered destroy plan. Request-scoped.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DestroyPlan {
    pub steps: Vec<DestroyStep>,
    pub recursive: bool,
    pub force: bool,
    pub defer: bool,
}

impl DestroyPlan {
    /// Every caller-supplied path covered by the plan, in step order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().flat_map(|s| s.keys().iter().map(String::as_str))
    }
}
