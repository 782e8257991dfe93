// Facade for API module; delegates to submodules under src/api/

use crate::adapters::{EngineQuery, InternalPathPredicate, StorageEngine};
use crate::constants::SNAPSHOT_SEP;
use crate::logging::{AuditSink, FactsEmitter};
use crate::policy::Policy;
use crate::types::{DestroyPlan, DestroyRequest, DestroyResult, QueryRequest, QueryResult};

mod builder;
mod destroy;
pub mod errors;
mod plan;
mod query;

pub use builder::ApiBuilder;
pub use errors::ApiError;
pub use plan::plan_destroy;
pub use query::validate_query;

pub struct ZfsResource<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    policy: Policy,
    engine: Box<dyn StorageEngine>,
    internal: Box<dyn InternalPathPredicate>, // derived from policy unless overridden
}

impl<E: FactsEmitter, A: AuditSink> ZfsResource<E, A> {
    pub fn new(facts: E, audit: A, policy: Policy, engine: Box<dyn StorageEngine>) -> Self {
        let internal = Box::new(policy.protected_components());
        Self {
            facts,
            audit,
            policy,
            engine,
            internal,
        }
    }

    /// Replace the policy-derived protected-path check.
    #[must_use]
    pub fn with_internal_predicate(mut self, internal: Box<dyn InternalPathPredicate>) -> Self {
        self.internal = internal;
        self
    }

    #[must_use]
    pub fn with_engine(mut self, engine: Box<dyn StorageEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Validate and plan a destroy request without touching the engine.
    ///
    /// # Errors
    /// Any validation, protection or overlap failure; see [`plan_destroy`].
    pub fn plan_destroy(&self, req: &DestroyRequest) -> Result<DestroyPlan, ApiError> {
        plan::build(self, req)
    }

    /// Run a plan to completion. Engine failures never abort the run; they are
    /// recorded against the affected keys.
    pub fn execute(&self, plan: &DestroyPlan) -> DestroyResult {
        destroy::run(self, plan)
    }

    /// Plan then execute. The result holds one entry per distinct input path:
    /// `None` on success, the failure message otherwise.
    ///
    /// # Errors
    /// Only planning failures; nothing has been mutated when this returns `Err`.
    pub fn destroy(&self, req: &DestroyRequest) -> Result<DestroyResult, ApiError> {
        let plan = self.plan_destroy(req)?;
        Ok(self.execute(&plan))
    }

    /// # Errors
    /// `Validation` for snapshot paths or overlapping paths with children,
    /// `NotFound` for absent paths when `require_existing` is set, or the
    /// engine failure.
    pub fn query(&self, req: QueryRequest) -> Result<QueryResult, ApiError> {
        query::run(self, req)
    }

    /// Whether `ds@name` exists. A missing dataset reads as `false`.
    ///
    /// # Errors
    /// `Validation` unless `name` has exactly one `@` with both sides
    /// non-empty; engine failures other than not-found.
    pub fn snapshot_exists(&self, name: &str) -> Result<bool, ApiError> {
        let (source, snap) = match name.split_once(SNAPSHOT_SEP) {
            Some((s, n)) if !s.is_empty() && !n.is_empty() && !n.contains(SNAPSHOT_SEP) => (s, n),
            _ => {
                return Err(ApiError::Validation(format!(
                    "'{name}' is not a valid snapshot name"
                )))
            }
        };
        let q = EngineQuery {
            paths: vec![source.to_string()],
            properties: None,
            get_children: false,
            get_snapshots: true,
        };
        let records = match self.engine.query(&q) {
            Ok(r) => r,
            Err(e) if e.code == crate::adapters::EngineErrorCode::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        let full = format!("{source}{SNAPSHOT_SEP}{snap}");
        Ok(records
            .iter()
            .filter(|r| r.name == source)
            .filter_map(|r| r.snapshots.as_ref())
            .any(|snaps| snaps.iter().any(|s| *s == full)))
    }
}
