use thiserror::Error;

use crate::types::plan::BulkOperation;
use crate::types::query::ResourceRecord;

/// Failure categories reported by a storage engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineErrorCode {
    NotFound,
    Busy,
    Other,
}

/// Engine failure. `msg` is surfaced verbatim in destroy results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{msg}")]
pub struct EngineError {
    pub code: EngineErrorCode,
    pub msg: String,
}

impl EngineError {
    pub fn new(code: EngineErrorCode, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(EngineErrorCode::NotFound, msg)
    }

    pub fn busy(msg: impl Into<String>) -> Self {
        Self::new(EngineErrorCode::Busy, msg)
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::new(EngineErrorCode::Other, msg)
    }
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Arguments handed to the engine's bulk program facility.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkArgs {
    pub recursive: bool,
    pub target: String,
    pub defer: bool,
    /// Snapshot name filter for `DestroySnapshots`; `None` selects all.
    pub pattern: Option<String>,
}

/// Flat enumeration request passed through to the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineQuery {
    /// Empty means every resource.
    pub paths: Vec<String>,
    /// `None` means no properties.
    pub properties: Option<Vec<String>>,
    pub get_children: bool,
    pub get_snapshots: bool,
}

/// Open handle on a dataset/volume.
pub trait Resource {
    fn name(&self) -> &str;

    /// # Errors
    /// `Busy` when mounted descendants prevent a non-recursive unmount.
    fn unmount(&self, force: bool, recursive: bool) -> EngineResult<()>;

    /// # Errors
    /// Returns the engine failure when the resource cannot be destroyed.
    fn destroy(self: Box<Self>) -> EngineResult<()>;
}

/// Storage engine that performs the actual namespace mutations.
///
/// Bulk programs take a pool-wide lock for their duration; callers sharing the
/// engine should expect latency on unrelated operations while one runs.
pub trait StorageEngine: Send + Sync {
    /// # Errors
    /// `NotFound` when no resource has this name.
    fn open_resource(&self, name: &str) -> EngineResult<Box<dyn Resource + '_>>;

    /// Destroy exactly one (already unmounted) resource.
    ///
    /// # Errors
    /// Propagates open and destroy failures.
    fn destroy_resource(&self, name: &str) -> EngineResult<()> {
        self.open_resource(name)?.destroy()
    }

    /// Destroy an explicit list of snapshots in one call.
    ///
    /// # Errors
    /// Returns one failure for the whole batch.
    fn destroy_snapshots(&self, names: &[String]) -> EngineResult<()>;

    /// Run an atomic whole-subtree operation.
    ///
    /// # Errors
    /// Returns one failure for the whole program; nothing is partially applied.
    fn run_bulk_program(&self, pool: &str, op: BulkOperation, args: &BulkArgs) -> EngineResult<()>;

    /// Enumerate flat resource records. Absent paths are omitted.
    ///
    /// # Errors
    /// Returns the engine failure; `NotFound` when the engine itself insists a
    /// path must exist.
    fn query(&self, q: &EngineQuery) -> EngineResult<Vec<ResourceRecord>>;
}

impl<T: StorageEngine + ?Sized> StorageEngine for std::sync::Arc<T> {
    fn open_resource(&self, name: &str) -> EngineResult<Box<dyn Resource + '_>> {
        (**self).open_resource(name)
    }

    fn destroy_resource(&self, name: &str) -> EngineResult<()> {
        (**self).destroy_resource(name)
    }

    fn destroy_snapshots(&self, names: &[String]) -> EngineResult<()> {
        (**self).destroy_snapshots(names)
    }

    fn run_bulk_program(&self, pool: &str, op: BulkOperation, args: &BulkArgs) -> EngineResult<()> {
        (**self).run_bulk_program(pool, op, args)
    }

    fn query(&self, q: &EngineQuery) -> EngineResult<Vec<ResourceRecord>> {
        (**self).query(q)
    }
}
